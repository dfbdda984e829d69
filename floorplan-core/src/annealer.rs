use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::database::Database;
use crate::floorplan::Floorplan;

/// Errors returned by the annealing driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnealerError {
  /// The schedule ran to completion (or was stopped) without ever
  /// producing a placement that fit the outline.
  #[error("no feasible solution found within the annealing schedule")]
  NoFeasibleSolution,
}

/// Tunable parameters of the simulated-annealing driver.
///
/// Built with the same `TypedBuilder` shape as `QueryOptions`: every field
/// defaults, so a caller can override only the knobs they care about.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct AnnealerConfig {
  /// Initial temperature `T_0`.
  #[builder(default = 1000.0)]
  pub t0: f64,
  /// Geometric cooling ratio `r`, applied as `T_{k+1} = r * T_k`.
  #[builder(default = 0.95)]
  pub cooling_rate: f64,
  /// Perturb-and-evaluate attempts per temperature step.
  #[builder(default = 200)]
  pub iterations_per_temperature: u32,
  /// Stop once temperature falls at or below this value.
  #[builder(default = 0.01)]
  pub min_temperature: f64,
  /// Stop early after this many consecutive temperature steps with no
  /// improvement to the best feasible solution found so far.
  #[builder(default = 30)]
  pub max_no_improve: u32,
  /// Weight on placement area in the cost function.
  #[builder(default = 1.0)]
  pub alpha: f64,
  /// Weight on total wirelength in the cost function.
  #[builder(default = 1.0)]
  pub beta: f64,
  /// Weight on the outline-overflow penalty in the cost function.
  #[builder(default = 1000.0)]
  pub gamma: f64,
  /// Whether floorplans produced by this run record `PerturbationRecord`s.
  #[builder(default = false)]
  pub drawing: bool,
}

/// `c(F) = alpha * area(F) + beta * wirelength(F) + gamma * penalty(F)`,
/// where `penalty` is zero when `F` fits the outline and grows with the
/// square of the overflow on each axis otherwise.
fn cost(fp: &Floorplan, database: &Database, config: &AnnealerConfig) -> f64 {
  let overflow_x = (fp.width() - database.outline_width()).max(0.0);
  let overflow_y = (fp.height() - database.outline_height()).max(0.0);
  let penalty = overflow_x * overflow_x + overflow_y * overflow_y;
  config.alpha * fp.area() + config.beta * fp.wirelength() + config.gamma * penalty
}

/// Drives the perturb/pack/accept-or-reject loop under a geometric cooling
/// schedule, returning the best feasible (outline-fitting) floorplan seen.
///
/// `stop` is checked once per temperature step so a caller can cancel a
/// long-running search cooperatively; it is not polled inside the inner
/// iteration loop, since `Perturb` + `Pack` together are the bounded unit
/// of work the schedule is built around.
pub fn run(database: &Database, config: &AnnealerConfig, rng: &mut impl Rng, stop: &AtomicBool) -> Result<Floorplan, AnnealerError> {
  let mut current = Floorplan::new(database.num_macros(), config.drawing);
  current.pack(database);
  let mut current_cost = cost(&current, database, config);

  let mut best: Option<Floorplan> = None;
  let mut best_cost = f64::INFINITY;
  if current.fits_outline(database.outline_width(), database.outline_height()) {
    best = Some(current.clone());
    best_cost = current_cost;
  }

  let mut temperature = config.t0;
  let mut no_improve_streak = 0u32;

  while temperature > config.min_temperature {
    if stop.load(Ordering::Relaxed) {
      info!("annealing stopped early by caller at T={temperature:.4}");
      break;
    }

    let mut improved_this_round = false;
    for _ in 0..config.iterations_per_temperature {
      let mut candidate = current.clone();
      candidate.perturb(database, rng);
      candidate.pack(database);
      let candidate_cost = cost(&candidate, database, config);

      let delta = candidate_cost - current_cost;
      let accept = delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();
      if !accept {
        continue;
      }

      current_cost = candidate_cost;
      current = candidate;

      if current.fits_outline(database.outline_width(), database.outline_height()) && current_cost < best_cost {
        best_cost = current_cost;
        best = Some(current.clone());
        improved_this_round = true;
      }
    }

    debug!("T={temperature:.4} current_cost={current_cost:.4} best_cost={best_cost:.4}");
    no_improve_streak = if improved_this_round { 0 } else { no_improve_streak + 1 };
    if no_improve_streak >= config.max_no_improve {
      info!("annealing stopped: no improvement for {no_improve_streak} consecutive temperature steps");
      break;
    }
    temperature *= config.cooling_rate;
  }

  best.ok_or(AnnealerError::NoFeasibleSolution)
}

/// Runs `seeds.len()` independent annealing searches in parallel, one
/// `std::thread` per seed, and returns the best feasible result across all
/// of them. The database is shared read-only via `Arc`; each worker owns
/// its own RNG and `Floorplan` state, so there is no contention beyond the
/// initial clone of the `Arc`.
pub fn run_multi_start(database: Arc<Database>, config: AnnealerConfig, seeds: &[u64], stop: &Arc<AtomicBool>) -> Result<Floorplan, AnnealerError> {
  let handles: Vec<_> = seeds
    .iter()
    .map(|&seed| {
      let database = Arc::clone(&database);
      let config = config.clone();
      let stop = Arc::clone(stop);
      std::thread::spawn(move || {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        run(&database, &config, &mut rng, &stop)
      })
    })
    .collect();

  let results: Vec<Floorplan> = handles
    .into_iter()
    .filter_map(|handle| handle.join().expect("annealing worker thread panicked").ok())
    .collect();

  results
    .into_iter()
    .min_by(|a, b| cost(a, &database, &config).partial_cmp(&cost(b, &database, &config)).unwrap())
    .ok_or(AnnealerError::NoFeasibleSolution)
}
