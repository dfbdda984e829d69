use std::sync::atomic::AtomicBool;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use floorplan_core::annealer::{self, AnnealerConfig};
use floorplan_core::{Database, Floorplan, Macro, Net};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn grid_database(num_macros: usize) -> Database {
  let macros: Vec<Macro> = (0..num_macros)
    .map(|i| Macro::new(format!("m{i}"), 3.0 + (i as f64 % 4.0), 2.0 + (i as f64 % 3.0), true))
    .collect();
  let nets: Vec<Net> = (0..num_macros.saturating_sub(1)).map(|i| Net::new(vec![i, i + 1], vec![])).collect();
  Database::new(macros, vec![], nets, 200.0, 200.0)
}

fn bench_pack(c: &mut Criterion) {
  let mut group = c.benchmark_group("pack");
  for &size in &[10usize, 50, 200] {
    let db = grid_database(size);
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &n| {
      b.iter(|| {
        let mut fp = Floorplan::new(n, false);
        fp.pack(&db);
        std::hint::black_box(fp.area());
      })
    });
  }
  group.finish();
}

fn bench_anneal(c: &mut Criterion) {
  let mut group = c.benchmark_group("anneal");
  let db = grid_database(30);
  let config = AnnealerConfig::builder()
    .t0(200.0)
    .cooling_rate(0.9)
    .iterations_per_temperature(50)
    .min_temperature(5.0)
    .max_no_improve(5)
    .build();
  group.bench_function("short_run", |b| {
    b.iter(|| {
      let mut rng = ChaCha8Rng::seed_from_u64(11);
      let stop = AtomicBool::new(false);
      let result = annealer::run(&db, &config, &mut rng, &stop);
      std::hint::black_box(result.is_ok());
    })
  });
  group.finish();
}

criterion_group!(benches, bench_pack, bench_anneal);
criterion_main!(benches);
