use serde::{Deserialize, Serialize};

/// A rectangular hard macro, possibly rotatable by 90 degrees.
///
/// `rotatable` is decided once, at load time, by the parser (see
/// `crate::parser`): false if the macro would overflow the outline in
/// both orientations (kept for uniform handling) or fits in only one
/// orientation; true otherwise. `width`/`height` here are always the
/// macro's *as-stored* dimensions — rotation state is tracked separately
/// per placement by `Floorplan`, not on this value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macro {
  pub name: String,
  pub width: f64,
  pub height: f64,
  pub rotatable: bool,
}

impl Macro {
  pub fn new(name: impl Into<String>, width: f64, height: f64, rotatable: bool) -> Self {
    Macro {
      name: name.into(),
      width,
      height,
      rotatable,
    }
  }

  /// Dimensions as they would appear if rotated 90 degrees.
  pub fn rotated_dims(&self) -> (f64, f64) {
    (self.height, self.width)
  }

  /// `(width, height)` as stored, or swapped if `rotated` is true.
  pub fn dims(&self, rotated: bool) -> (f64, f64) {
    if rotated {
      self.rotated_dims()
    } else {
      (self.width, self.height)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dims_swaps_when_rotated() {
    let m = Macro::new("m0", 5.0, 3.0, true);
    assert_eq!(m.dims(false), (5.0, 3.0));
    assert_eq!(m.dims(true), (3.0, 5.0));
  }

  #[test]
  fn serde_tokens_round_trip() {
    use serde_test::Token;

    let m = Macro::new("m0", 5.0, 3.0, true);
    serde_test::assert_tokens(
      &m,
      &[
        Token::Struct { name: "Macro", len: 4 },
        Token::Str("name"),
        Token::Str("m0"),
        Token::Str("width"),
        Token::F64(5.0),
        Token::Str("height"),
        Token::F64(3.0),
        Token::Str("rotatable"),
        Token::Bool(true),
        Token::StructEnd,
      ],
    );
  }
}
