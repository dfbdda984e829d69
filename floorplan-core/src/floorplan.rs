use rand::Rng;
use serde::Serialize;

use crate::bstar_tree::BStarTree;
use crate::contour::Contour;
use crate::database::Database;
use crate::point::Point;

/// Describes the single perturbation applied by the most recent call to
/// [`Floorplan::perturb`]. Only populated when the floorplan was built
/// with drawing enabled (spec's "visualization hook"): building this
/// unconditionally would cost an allocation per perturbation on the hot
/// annealing path for callers that never look at it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PerturbationRecord {
  #[serde(rename = "rotation")]
  Rotation { r#macro: String },
  #[serde(rename = "swap")]
  Swap { macro_a: String, macro_b: String },
  #[serde(rename = "deleteAndInsert")]
  DeleteAndInsert {
    deleted_macro: String,
    target_macro: String,
  },
}

/// Couples a B*-tree with a per-node macro assignment and rotation state.
/// Owns the pack-to-coordinates procedure and the resulting area and
/// wirelength.
#[derive(Debug, Clone)]
pub struct Floorplan {
  tree: BStarTree,
  macro_by_node: Vec<usize>,
  rotated: Vec<bool>,
  bbox: Vec<(Point, Point)>,
  width: f64,
  height: f64,
  wirelength: f64,
  is_drawing: bool,
  last_perturbation: Option<PerturbationRecord>,
}

impl Floorplan {
  pub fn new(num_macros: usize, is_drawing: bool) -> Self {
    Floorplan {
      tree: BStarTree::new(num_macros),
      macro_by_node: (0..num_macros).collect(),
      rotated: vec![false; num_macros],
      bbox: vec![(Point::new(0.0, 0.0), Point::new(0.0, 0.0)); num_macros],
      width: 0.0,
      height: 0.0,
      wirelength: 0.0,
      is_drawing,
      last_perturbation: None,
    }
  }

  pub fn num_macros(&self) -> usize {
    self.macro_by_node.len()
  }

  pub fn width(&self) -> f64 {
    self.width
  }

  pub fn height(&self) -> f64 {
    self.height
  }

  pub fn area(&self) -> f64 {
    self.width * self.height
  }

  pub fn wirelength(&self) -> f64 {
    self.wirelength
  }

  pub fn macro_bounding_box(&self, macro_id: usize) -> (Point, Point) {
    self.bbox[macro_id]
  }

  pub fn last_perturbation(&self) -> Option<&PerturbationRecord> {
    self.last_perturbation.as_ref()
  }

  /// Apply one of the three perturbation operators, chosen uniformly at
  /// random. `Pack` must be called again before cost is valid.
  pub fn perturb(&mut self, database: &Database, rng: &mut impl Rng) {
    let num_nodes = self.tree.num_nodes();
    self.last_perturbation = None;

    if num_nodes <= 1 {
      // Swap and delete-and-insert both need a second, distinct node to
      // act on; with a single macro the only move available is rotation,
      // and only when that macro is actually rotatable.
      if database.macro(self.macro_by_node[0]).rotatable {
        self.perturb_rotate(database, rng);
      }
      return;
    }

    match rng.gen_range(0..3) {
      0 => self.perturb_rotate(database, rng),
      1 => self.perturb_swap(database, rng, num_nodes),
      _ => self.perturb_delete_and_insert(database, rng, num_nodes),
    }
  }

  fn perturb_rotate(&mut self, database: &Database, rng: &mut impl Rng) {
    let num_macros = self.macro_by_node.len();
    let macro_id = loop {
      let candidate = rng.gen_range(0..num_macros);
      if database.macro(candidate).rotatable {
        break candidate;
      }
    };
    self.rotated[macro_id] = !self.rotated[macro_id];

    if self.is_drawing {
      self.last_perturbation = Some(PerturbationRecord::Rotation {
        r#macro: database.macro(macro_id).name.clone(),
      });
    }
  }

  fn perturb_swap(&mut self, database: &Database, rng: &mut impl Rng, num_nodes: usize) {
    let node_a = rng.gen_range(0..num_nodes);
    let node_b = loop {
      let candidate = rng.gen_range(0..num_nodes);
      if candidate != node_a {
        break candidate;
      }
    };
    self.macro_by_node.swap(node_a, node_b);

    if self.is_drawing {
      // Recorded after the swap: names the macros now occupying the two
      // nodes, matching the other perturbation records' convention.
      self.last_perturbation = Some(PerturbationRecord::Swap {
        macro_a: database.macro(self.macro_by_node[node_a]).name.clone(),
        macro_b: database.macro(self.macro_by_node[node_b]).name.clone(),
      });
    }
  }

  fn perturb_delete_and_insert(&mut self, database: &Database, rng: &mut impl Rng, num_nodes: usize) {
    let node_a = rng.gen_range(0..num_nodes);
    let node_b = loop {
      let candidate = rng.gen_range(0..num_nodes);
      if candidate != node_a {
        break candidate;
      }
    };
    let positions = (rng.gen::<u32>(), rng.gen::<u32>());
    self.tree.delete_and_insert(node_a, node_b, positions);

    if self.is_drawing {
      let deleted_macro = database.macro(self.macro_by_node[node_a]).name.clone();
      let target_macro = database.macro(self.macro_by_node[node_b]).name.clone();
      self.last_perturbation = Some(PerturbationRecord::DeleteAndInsert {
        deleted_macro,
        target_macro,
      });
    }
  }

  /// Compute coordinates for every macro by a pre-order traversal of the
  /// B*-tree, placing each macro on the contour according to the spec's
  /// left-child/right-child semantics. Deterministic given tree, macro
  /// assignment, rotations, and macro dimensions.
  pub fn pack(&mut self, database: &Database) {
    self.tree.unvisit_all();
    let mut contour = Contour::new();

    let root_id = self.tree.root_id();
    let root_macro_id = self.macro_by_node[root_id];
    let (w, h) = database.macro(root_macro_id).dims(self.rotated[root_macro_id]);
    self.bbox[root_macro_id] = contour.update(0.0, w, h);

    let mut stack = vec![root_id];
    while let Some(&current_node_id) = stack.last() {
      let current_macro_id = self.macro_by_node[current_node_id];
      let current_bbox = self.bbox[current_macro_id];
      let left = self.tree.left_child(current_node_id);
      let right = self.tree.right_child(current_node_id);

      if let Some(l) = left.filter(|&l| !self.tree.is_visited(l)) {
        stack.push(l);
        let macro_id = self.macro_by_node[l];
        let (w, h) = database.macro(macro_id).dims(self.rotated[macro_id]);
        self.bbox[macro_id] = contour.update(current_bbox.1.x, w, h);
      } else if let Some(r) = right.filter(|&r| !self.tree.is_visited(r)) {
        stack.push(r);
        let macro_id = self.macro_by_node[r];
        let (w, h) = database.macro(macro_id).dims(self.rotated[macro_id]);
        self.bbox[macro_id] = contour.update(current_bbox.0.x, w, h);
      } else {
        stack.pop();
        self.tree.visit(current_node_id);
      }
    }

    self.width = contour.max_x();
    self.height = contour.max_y();

    let bbox = &self.bbox;
    self.wirelength = (0..database.num_nets())
      .map(|i| {
        database.net(i).hpwl(|macro_id| {
          let (ll, ur) = bbox[macro_id];
          Point::new((ll.x + ur.x) / 2.0, (ll.y + ur.y) / 2.0)
        })
      })
      .sum();
  }

  /// Whether the current placement fits inside `(outline_width, outline_height)`.
  pub fn fits_outline(&self, outline_width: f64, outline_height: f64) -> bool {
    self.width <= outline_width && self.height <= outline_height
  }
}
