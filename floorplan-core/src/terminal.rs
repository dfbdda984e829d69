use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A fixed-position I/O terminal. Never moves once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
  pub name: String,
  pub coords: Point,
}

impl Terminal {
  pub fn new(name: impl Into<String>, coords: Point) -> Self {
    Terminal {
      name: name.into(),
      coords,
    }
  }
}
