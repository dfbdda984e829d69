use serde::{Deserialize, Serialize};

/// An immutable 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub fn new(x: f64, y: f64) -> Self {
    Point { x, y }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn constructs_with_given_coordinates() {
    let p = Point::new(1.5, -2.0);
    assert_eq!(p.x, 1.5);
    assert_eq!(p.y, -2.0);
  }
}
