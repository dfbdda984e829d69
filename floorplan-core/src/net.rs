use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A net connecting zero or more macros (by id) and zero or more fixed
/// terminals (by absolute coordinate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
  pub macro_ids: Vec<usize>,
  pub terminal_coords: Vec<Point>,
}

impl Net {
  pub fn new(macro_ids: Vec<usize>, terminal_coords: Vec<Point>) -> Self {
    Net {
      macro_ids,
      terminal_coords,
    }
  }

  /// Half-perimeter wirelength over this net's pin set.
  ///
  /// `macro_center` maps a macro id to the center of its current bounding
  /// box. Nets with at most one pin contribute zero wirelength.
  pub fn hpwl(&self, macro_center: impl Fn(usize) -> Point) -> f64 {
    let pin_count = self.macro_ids.len() + self.terminal_coords.len();
    if pin_count <= 1 {
      return 0.0;
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let mut consider = |p: Point| {
      min_x = min_x.min(p.x);
      max_x = max_x.max(p.x);
      min_y = min_y.min(p.y);
      max_y = max_y.max(p.y);
    };

    for &macro_id in &self.macro_ids {
      consider(macro_center(macro_id));
    }
    for &p in &self.terminal_coords {
      consider(p);
    }

    (max_x - min_x) + (max_y - min_y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_pin_net_has_zero_wirelength() {
    let net = Net::new(vec![0], vec![]);
    assert_eq!(net.hpwl(|_| Point::new(1.0, 1.0)), 0.0);
  }

  #[test]
  fn empty_net_has_zero_wirelength() {
    let net = Net::new(vec![], vec![]);
    assert_eq!(net.hpwl(|_| Point::new(0.0, 0.0)), 0.0);
  }

  #[test]
  fn two_macro_net_matches_bbox_perimeter() {
    // centers (2.5, 1.5) and (6.5, 2.5): HPWL = 4 + 1 = 5, per spec scenario 3.
    let net = Net::new(vec![0, 1], vec![]);
    let centers = [Point::new(2.5, 1.5), Point::new(6.5, 2.5)];
    assert_eq!(net.hpwl(|id| centers[id]), 5.0);
  }

  #[test]
  fn mixes_macros_and_terminals() {
    let net = Net::new(vec![0], vec![Point::new(10.0, 10.0)]);
    assert_eq!(net.hpwl(|_| Point::new(0.0, 0.0)), 20.0);
  }
}
