use crate::point::Point;

/// A single horizontal run of the skyline: the contour is `y_top` high
/// across `[x_start, x_end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
  x_start: f64,
  x_end: f64,
  y_top: f64,
}

/// Skyline of macros packed left-to-right, bottom-up.
///
/// Segments cover `[0, max_x)` contiguously, sorted by `x_start`, with no
/// gaps or overlaps and no zero-width segments. Starts empty
/// (`max_x = max_y = 0`).
#[derive(Debug, Clone, Default)]
pub struct Contour {
  segments: Vec<Segment>,
  max_x: f64,
  max_y: f64,
}

impl Contour {
  pub fn new() -> Self {
    Contour::default()
  }

  pub fn max_x(&self) -> f64 {
    self.max_x
  }

  pub fn max_y(&self) -> f64 {
    self.max_y
  }

  /// Place a macro whose left edge is at `x_start` on top of the current
  /// contour, returning its resulting `(lower_left, upper_right)`.
  pub fn update(&mut self, x_start: f64, width: f64, height: f64) -> (Point, Point) {
    debug_assert!(x_start >= 0.0, "x_start must be non-negative");
    debug_assert!(width > 0.0, "width must be positive");
    debug_assert!(height > 0.0, "height must be positive");

    let x_end = x_start + width;

    let y_base = self
      .segments
      .iter()
      .filter(|seg| seg.x_start < x_end && seg.x_end > x_start)
      .map(|seg| seg.y_top)
      .fold(0.0_f64, f64::max);
    let y_top = y_base + height;

    let mut rebuilt: Vec<Segment> = Vec::with_capacity(self.segments.len() + 2);
    for seg in &self.segments {
      if seg.x_end <= x_start || seg.x_start >= x_end {
        rebuilt.push(*seg);
        continue;
      }
      if seg.x_start < x_start {
        rebuilt.push(Segment {
          x_start: seg.x_start,
          x_end: x_start,
          y_top: seg.y_top,
        });
      }
      if seg.x_end > x_end {
        rebuilt.push(Segment {
          x_start: x_end,
          x_end: seg.x_end,
          y_top: seg.y_top,
        });
      }
    }
    if x_start > self.max_x {
      // Placement left a gap past the previous frontier; fill it at
      // ground level (not the new macro's height) so coverage stays
      // contiguous from 0 and a later `update` over that region still
      // sees y_base == 0 there.
      rebuilt.push(Segment {
        x_start: self.max_x,
        x_end: x_start,
        y_top: 0.0,
      });
    }
    rebuilt.push(Segment {
      x_start,
      x_end,
      y_top,
    });
    rebuilt.sort_by(|a, b| a.x_start.partial_cmp(&b.x_start).unwrap());
    self.segments = rebuilt;

    self.max_x = self.max_x.max(x_end);
    self.max_y = self.max_y.max(y_top);

    (Point::new(x_start, y_base), Point::new(x_end, y_top))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_empty() {
    let c = Contour::new();
    assert_eq!(c.max_x(), 0.0);
    assert_eq!(c.max_y(), 0.0);
  }

  /// Matches the concrete scenario in spec.md section 8, traced also in
  /// `original_source/test/contour_test.cpp`.
  #[test]
  fn matches_reference_update_sequence() {
    let mut c = Contour::new();

    c.update(0.0, 1.0, 1.0);
    assert_eq!((c.max_x(), c.max_y()), (1.0, 1.0));

    c.update(1.0, 2.0, 3.0);
    assert_eq!((c.max_x(), c.max_y()), (3.0, 3.0));

    c.update(3.0, 4.0, 5.0);
    assert_eq!((c.max_x(), c.max_y()), (7.0, 5.0));

    c.update(1.0, 7.0, 2.0);
    assert_eq!((c.max_x(), c.max_y()), (8.0, 7.0));

    c.update(8.0, 2.0, 1.0);
    assert_eq!((c.max_x(), c.max_y()), (10.0, 7.0));

    c.update(10.0, 4.0, 7.0);
    assert_eq!((c.max_x(), c.max_y()), (14.0, 7.0));

    c.update(8.0, 2.0, 6.0);
    assert_eq!((c.max_x(), c.max_y()), (14.0, 7.0));
  }

  #[test]
  fn returned_lower_left_matches_prior_frontier() {
    let mut c = Contour::new();
    c.update(0.0, 5.0, 3.0);
    let (ll, ur) = c.update(5.0, 3.0, 5.0);
    assert_eq!(ll, Point::new(5.0, 0.0));
    assert_eq!(ur, Point::new(8.0, 5.0));
  }

  #[test]
  fn stacks_directly_on_top_of_overlapping_segment() {
    let mut c = Contour::new();
    c.update(0.0, 4.0, 2.0);
    let (ll, ur) = c.update(1.0, 1.0, 1.0);
    assert_eq!(ll, Point::new(1.0, 2.0));
    assert_eq!(ur, Point::new(2.0, 3.0));
  }

  #[test]
  fn gap_past_the_frontier_is_filled_at_ground_level() {
    let mut c = Contour::new();
    c.update(0.0, 1.0, 1.0);
    // Jump ahead, leaving [1, 10) unplaced; that gap must read back at
    // y_base == 0, not at the new macro's height.
    c.update(10.0, 2.0, 5.0);
    let (ll, _) = c.update(3.0, 2.0, 1.0);
    assert_eq!(ll, Point::new(3.0, 0.0));
  }

  #[test]
  fn coverage_is_contiguous_with_no_overlaps() {
    let mut c = Contour::new();
    c.update(0.0, 1.0, 1.0);
    c.update(1.0, 2.0, 3.0);
    c.update(3.0, 4.0, 5.0);

    let mut x = 0.0_f64;
    for seg in &c.segments {
      assert_eq!(seg.x_start, x);
      assert!(seg.x_end > seg.x_start);
      x = seg.x_end;
    }
    assert_eq!(x, c.max_x());
  }
}
