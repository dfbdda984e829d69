use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use floorplan_core::annealer::{self, AnnealerConfig};
use floorplan_core::{parser as core_parser, Database, Floorplan, Point};
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Pack a fixed-outline floorplan by simulated annealing and emit the
/// resulting placement as visualization JSON.
#[derive(Debug, Parser)]
#[command(name = "floorplan-cli", version, about)]
struct Args {
  /// Path to the block input file (`Outline:`, `NumBlocks:`, macro/terminal records).
  block_file: PathBuf,
  /// Path to the net input file (`NumNets:`, `NetDegree:`, pin-name lists).
  net_file: PathBuf,

  /// Initial annealing temperature.
  #[arg(long, default_value_t = 1000.0)]
  t0: f64,
  /// Geometric cooling ratio, applied each temperature step.
  #[arg(long, default_value_t = 0.95)]
  cooling_rate: f64,
  /// Perturb-and-evaluate attempts per temperature step.
  #[arg(long, default_value_t = 200)]
  iterations: u32,
  /// Stop once temperature falls at or below this value.
  #[arg(long, default_value_t = 0.01)]
  min_temperature: f64,
  /// Stop early after this many consecutive non-improving temperature steps.
  #[arg(long, default_value_t = 30)]
  max_no_improve: u32,
  /// Cost weight on placement area.
  #[arg(long, default_value_t = 1.0)]
  alpha: f64,
  /// Cost weight on total wirelength.
  #[arg(long, default_value_t = 1.0)]
  beta: f64,
  /// Cost weight on the outline-overflow penalty.
  #[arg(long, default_value_t = 1000.0)]
  gamma: f64,
  /// RNG seed, for reproducible runs.
  #[arg(long, default_value_t = 0)]
  seed: u64,
  /// Record the perturbation that produced the final placement.
  #[arg(long)]
  drawing: bool,
  /// Write the result JSON here instead of stdout.
  #[arg(long)]
  output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PointOut {
  x: f64,
  y: f64,
}

impl From<Point> for PointOut {
  fn from(p: Point) -> Self {
    PointOut { x: p.x, y: p.y }
  }
}

#[derive(Debug, Serialize)]
struct MacroOut {
  name: String,
  #[serde(rename = "lowerLeft")]
  lower_left: PointOut,
  #[serde(rename = "upperRight")]
  upper_right: PointOut,
}

#[derive(Debug, Serialize)]
struct VisualizationOutput {
  macros: Vec<MacroOut>,
  width: f64,
  height: f64,
  area: f64,
  wirelength: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  perturbation: Option<floorplan_core::PerturbationRecord>,
}

impl VisualizationOutput {
  fn from_floorplan(fp: &Floorplan, database: &Database) -> Self {
    let macros = (0..database.num_macros())
      .map(|id| {
        let (lower_left, upper_right) = fp.macro_bounding_box(id);
        MacroOut {
          name: database.macro(id).name.clone(),
          lower_left: lower_left.into(),
          upper_right: upper_right.into(),
        }
      })
      .collect();
    VisualizationOutput {
      macros,
      width: fp.width(),
      height: fp.height(),
      area: fp.area(),
      wirelength: fp.wirelength(),
      perturbation: fp.last_perturbation().cloned(),
    }
  }
}

const EXIT_PARSE_FAILURE: u8 = 1;
const EXIT_NO_FEASIBLE_SOLUTION: u8 = 2;

fn main() -> ExitCode {
  env_logger::init();
  let args = Args::parse();

  let block_text = match std::fs::read_to_string(&args.block_file) {
    Ok(text) => text,
    Err(e) => {
      error!("failed to read block file {:?}: {e}", args.block_file);
      return ExitCode::from(EXIT_PARSE_FAILURE);
    }
  };
  let net_text = match std::fs::read_to_string(&args.net_file) {
    Ok(text) => text,
    Err(e) => {
      error!("failed to read net file {:?}: {e}", args.net_file);
      return ExitCode::from(EXIT_PARSE_FAILURE);
    }
  };

  let database = match core_parser::parse_database(&block_text, &net_text) {
    Ok(db) => db,
    Err(e) => {
      error!("{e}");
      return ExitCode::from(EXIT_PARSE_FAILURE);
    }
  };
  info!(
    "parsed {} macros, {} terminals, {} nets",
    database.num_macros(),
    database.num_terminals(),
    database.num_nets()
  );

  let config = AnnealerConfig::builder()
    .t0(args.t0)
    .cooling_rate(args.cooling_rate)
    .iterations_per_temperature(args.iterations)
    .min_temperature(args.min_temperature)
    .max_no_improve(args.max_no_improve)
    .alpha(args.alpha)
    .beta(args.beta)
    .gamma(args.gamma)
    .drawing(args.drawing)
    .build();

  let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
  let stop = AtomicBool::new(false);
  let floorplan = match annealer::run(&database, &config, &mut rng, &stop) {
    Ok(fp) => fp,
    Err(e) => {
      error!("{e}");
      return ExitCode::from(EXIT_NO_FEASIBLE_SOLUTION);
    }
  };
  info!("best placement: {}x{}, wirelength {:.3}", floorplan.width(), floorplan.height(), floorplan.wirelength());

  let output = VisualizationOutput::from_floorplan(&floorplan, &database);
  let json = serde_json::to_string_pretty(&output).expect("visualization output is always serializable");
  match args.output {
    Some(path) => {
      if let Err(e) = std::fs::write(&path, json) {
        error!("failed to write output file {path:?}: {e}");
        return ExitCode::from(EXIT_PARSE_FAILURE);
      }
    }
    None => println!("{json}"),
  }

  ExitCode::SUCCESS
}
