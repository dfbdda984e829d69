use std::collections::HashMap;

use crate::macro_rect::Macro;
use crate::net::Net;
use crate::terminal::Terminal;

/// Read-only view of the parsed problem instance. Built once by
/// [`crate::parser`] and never mutated afterward; the annealing core only
/// ever reads through this view.
#[derive(Debug, Clone)]
pub struct Database {
  macros: Vec<Macro>,
  terminals: Vec<Terminal>,
  nets: Vec<Net>,
  outline_width: f64,
  outline_height: f64,
  macro_id_by_name: HashMap<String, usize>,
  terminal_id_by_name: HashMap<String, usize>,
}

impl Database {
  pub fn new(macros: Vec<Macro>, terminals: Vec<Terminal>, nets: Vec<Net>, outline_width: f64, outline_height: f64) -> Self {
    let macro_id_by_name = macros
      .iter()
      .enumerate()
      .map(|(id, m)| (m.name.clone(), id))
      .collect();
    let terminal_id_by_name = terminals
      .iter()
      .enumerate()
      .map(|(id, t)| (t.name.clone(), id))
      .collect();
    Database {
      macros,
      terminals,
      nets,
      outline_width,
      outline_height,
      macro_id_by_name,
      terminal_id_by_name,
    }
  }

  pub fn num_macros(&self) -> usize {
    self.macros.len()
  }

  pub fn macro(&self, macro_id: usize) -> &Macro {
    &self.macros[macro_id]
  }

  pub fn num_terminals(&self) -> usize {
    self.terminals.len()
  }

  pub fn terminal(&self, terminal_id: usize) -> &Terminal {
    &self.terminals[terminal_id]
  }

  pub fn num_nets(&self) -> usize {
    self.nets.len()
  }

  pub fn net(&self, net_id: usize) -> &Net {
    &self.nets[net_id]
  }

  pub fn outline_width(&self) -> f64 {
    self.outline_width
  }

  pub fn outline_height(&self) -> f64 {
    self.outline_height
  }

  pub fn is_macro(&self, name: &str) -> bool {
    self.macro_id_by_name.contains_key(name)
  }

  pub fn is_terminal(&self, name: &str) -> bool {
    self.terminal_id_by_name.contains_key(name)
  }

  pub fn macro_id_by_name(&self, name: &str) -> Option<usize> {
    self.macro_id_by_name.get(name).copied()
  }

  pub fn terminal_id_by_name(&self, name: &str) -> Option<usize> {
    self.terminal_id_by_name.get(name).copied()
  }

  /// Total area of all macros, unrotated or rotated (area is rotation-invariant).
  pub fn total_macro_area(&self) -> f64 {
    self.macros.iter().map(|m| m.width * m.height).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn looks_up_macros_and_terminals_by_name() {
    let db = Database::new(
      vec![Macro::new("A", 1.0, 1.0, true)],
      vec![Terminal::new("T", crate::point::Point::new(0.0, 0.0))],
      vec![],
      10.0,
      10.0,
    );
    assert_eq!(db.macro_id_by_name("A"), Some(0));
    assert_eq!(db.terminal_id_by_name("T"), Some(0));
    assert!(db.is_macro("A"));
    assert!(!db.is_macro("T"));
    assert!(db.is_terminal("T"));
  }
}
