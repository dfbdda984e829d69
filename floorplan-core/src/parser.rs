use thiserror::Error;

use crate::database::Database;
use crate::macro_rect::Macro;
use crate::net::Net;
use crate::point::Point;
use crate::terminal::Terminal;

/// Errors raised while turning block/net text into a [`Database`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
  /// Missing header line, a non-numeric token where a number was
  /// expected, or fewer macro/terminal/net records than declared.
  #[error("malformed input: {reason}")]
  InputMalformed { reason: String },

  /// A net references a name that is neither a macro nor a terminal.
  #[error("net references unknown pin name `{name}`")]
  UnknownPinName { name: String },

  /// No orientation of this macro fits inside the outline.
  #[error("macro `{name}` does not fit the outline in either orientation")]
  InfeasibleInstance { name: String },
}

fn tokens(line: &str) -> Vec<&str> {
  line.split_whitespace().collect()
}

fn key(token: &str) -> &str {
  token.trim_end_matches(':')
}

fn parse_f64(token: &str, reason: &str) -> Result<f64, ParseError> {
  token.parse().map_err(|_| ParseError::InputMalformed {
    reason: format!("expected a number for {reason}, got `{token}`"),
  })
}

fn parse_usize(token: &str, reason: &str) -> Result<usize, ParseError> {
  token.parse().map_err(|_| ParseError::InputMalformed {
    reason: format!("expected a non-negative integer for {reason}, got `{token}`"),
  })
}

/// Derive stored dimensions and rotatability for a macro, per spec section
/// 6 / `original_source/src/database.cpp`'s `ParseBlocks`: if the macro
/// doesn't fit as given but does fit rotated, swap its dimensions and mark
/// it non-rotatable; if it fits as given but rotating it would not, leave
/// it as-is and mark it non-rotatable; otherwise it's rotatable.
fn derive_rotatability(mut width: f64, mut height: f64, outline_width: f64, outline_height: f64) -> (f64, f64, bool) {
  if width > outline_width || height > outline_height {
    std::mem::swap(&mut width, &mut height);
    (width, height, false)
  } else if width > outline_height || height > outline_width {
    (width, height, false)
  } else {
    (width, height, true)
  }
}

/// Parse the block-input text: `Outline:`, `NumBlocks:`, `NumTerminals:`,
/// followed by that many macro and terminal records.
fn parse_blocks(block_input: &str) -> Result<(Vec<Macro>, Vec<Terminal>, f64, f64), ParseError> {
  let mut outline: Option<(f64, f64)> = None;
  let mut num_macros: Option<usize> = None;
  let mut num_terminals: Option<usize> = None;
  let mut macros = Vec::new();
  let mut terminals = Vec::new();

  for line in block_input.lines() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }
    let toks = tokens(line);
    match key(toks[0]) {
      "Outline" => {
        if toks.len() < 3 {
          return Err(ParseError::InputMalformed {
            reason: "Outline line needs width and height".to_string(),
          });
        }
        outline = Some((parse_f64(toks[1], "outline width")?, parse_f64(toks[2], "outline height")?));
      }
      "NumBlocks" => {
        num_macros = Some(parse_usize(
          toks.get(1).ok_or_else(|| ParseError::InputMalformed {
            reason: "NumBlocks is missing its value".to_string(),
          })?,
          "NumBlocks",
        )?);
      }
      "NumTerminals" => {
        num_terminals = Some(parse_usize(
          toks.get(1).ok_or_else(|| ParseError::InputMalformed {
            reason: "NumTerminals is missing its value".to_string(),
          })?,
          "NumTerminals",
        )?);
      }
      _ => {
        let (outline_width, outline_height) = outline.ok_or_else(|| ParseError::InputMalformed {
          reason: "macro/terminal record appeared before Outline".to_string(),
        })?;
        let expected_macros = num_macros.ok_or_else(|| ParseError::InputMalformed {
          reason: "macro record appeared before NumBlocks".to_string(),
        })?;

        if macros.len() < expected_macros {
          if toks.len() < 3 {
            return Err(ParseError::InputMalformed {
              reason: format!("macro record `{}` needs a width and height", toks[0]),
            });
          }
          let name = toks[0].to_string();
          let width = parse_f64(toks[1], "macro width")?;
          let height = parse_f64(toks[2], "macro height")?;
          let (width, height, rotatable) = derive_rotatability(width, height, outline_width, outline_height);
          if width > outline_width || height > outline_height {
            return Err(ParseError::InfeasibleInstance { name });
          }
          macros.push(Macro::new(name, width, height, rotatable));
        } else if terminals.len() < num_terminals.unwrap_or(0) {
          if toks.len() < 4 {
            return Err(ParseError::InputMalformed {
              reason: format!("terminal record `{}` needs `terminal <x> <y>`", toks[0]),
            });
          }
          let name = toks[0].to_string();
          let x = parse_f64(toks[2], "terminal x")?;
          let y = parse_f64(toks[3], "terminal y")?;
          terminals.push(Terminal::new(name, Point::new(x, y)));
        } else {
          return Err(ParseError::InputMalformed {
            reason: format!("unexpected extra record `{}`", toks[0]),
          });
        }
      }
    }
  }

  let (outline_width, outline_height) = outline.ok_or_else(|| ParseError::InputMalformed {
    reason: "missing Outline line".to_string(),
  })?;
  if macros.len() != num_macros.unwrap_or(0) {
    return Err(ParseError::InputMalformed {
      reason: format!("declared {} blocks but found {}", num_macros.unwrap_or(0), macros.len()),
    });
  }
  if terminals.len() != num_terminals.unwrap_or(0) {
    return Err(ParseError::InputMalformed {
      reason: format!(
        "declared {} terminals but found {}",
        num_terminals.unwrap_or(0),
        terminals.len()
      ),
    });
  }

  Ok((macros, terminals, outline_width, outline_height))
}

/// Parse the net-input text: `NumNets:` followed by that many
/// `NetDegree: <k>` blocks, each followed by `k` pin names.
fn parse_nets(net_input: &str, database_macros: &[Macro], database_terminals: &[Terminal]) -> Result<Vec<Net>, ParseError> {
  let macro_id = |name: &str| database_macros.iter().position(|m| m.name == name);
  let terminal_id = |name: &str| database_terminals.iter().position(|t| t.name == name);

  let mut num_nets: Option<usize> = None;
  let mut nets = Vec::new();

  let mut lines = net_input.lines().map(str::trim).filter(|l| !l.is_empty());
  while let Some(line) = lines.next() {
    let toks = tokens(line);
    match key(toks[0]) {
      "NumNets" => {
        num_nets = Some(parse_usize(
          toks.get(1).ok_or_else(|| ParseError::InputMalformed {
            reason: "NumNets is missing its value".to_string(),
          })?,
          "NumNets",
        )?);
      }
      "NetDegree" => {
        let degree = parse_usize(
          toks.get(1).ok_or_else(|| ParseError::InputMalformed {
            reason: "NetDegree is missing its value".to_string(),
          })?,
          "NetDegree",
        )?;
        let mut net_macro_ids = Vec::new();
        let mut net_terminal_coords = Vec::new();
        for _ in 0..degree {
          let pin_line = lines.next().ok_or_else(|| ParseError::InputMalformed {
            reason: "NetDegree declared more pins than the file contains".to_string(),
          })?;
          let name = tokens(pin_line)[0];
          if let Some(id) = terminal_id(name) {
            net_terminal_coords.push(database_terminals[id].coords);
          } else if let Some(id) = macro_id(name) {
            net_macro_ids.push(id);
          } else {
            return Err(ParseError::UnknownPinName { name: name.to_string() });
          }
        }
        nets.push(Net::new(net_macro_ids, net_terminal_coords));
      }
      _ => {
        return Err(ParseError::InputMalformed {
          reason: format!("unexpected line `{line}` in net input"),
        });
      }
    }
  }

  if nets.len() != num_nets.unwrap_or(0) {
    return Err(ParseError::InputMalformed {
      reason: format!("declared {} nets but found {}", num_nets.unwrap_or(0), nets.len()),
    });
  }

  Ok(nets)
}

/// Parse both the block and net input text into a complete [`Database`].
pub fn parse_database(block_input: &str, net_input: &str) -> Result<Database, ParseError> {
  let (macros, terminals, outline_width, outline_height) = parse_blocks(block_input)?;
  let nets = parse_nets(net_input, &macros, &terminals)?;
  Ok(Database::new(macros, terminals, nets, outline_width, outline_height))
}
