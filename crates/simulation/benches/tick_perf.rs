//! Benchmark: measure step() cost under various world conditions.
//!
//! Each benchmark uses `iter_batched` to re-seed the world before every
//! iteration so we measure an *active* population, not a world that has
//! starved or settled.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use simulation::genome;
use simulation::{Cell, Config, Direction, Genome, Setup, Simulator};

fn simulator() -> Simulator {
    Simulator::new(Config::default()).expect("worker pool")
}

/// Empty world — baseline cost of scanning 45K cells with nothing to do.
fn bench_step_empty(c: &mut Criterion) {
    c.bench_function("step_empty_300x150", |b| {
        let mut sim = simulator();
        b.iter(|| {
            sim.step();
            black_box(&sim);
        });
    });
}

/// Food rain — the whole top band actively falling.
fn bench_step_food_rain(c: &mut Criterion) {
    c.bench_function("step_food_rain_300x150", |b| {
        b.iter_batched(
            || {
                let mut sim = simulator();
                for x in 0..300 {
                    for y in 0..30 {
                        sim.put(x, y, &Cell::food(10)).unwrap();
                    }
                }
                sim
            },
            |mut sim| {
                sim.step();
                black_box(&sim);
            },
            BatchSize::SmallInput,
        );
    });
}

/// Photosynthesizing founders — the default reset population.
fn bench_step_founders(c: &mut Criterion) {
    c.bench_function("step_founders_300x150", |b| {
        b.iter_batched(
            || {
                let mut sim = simulator();
                sim.reset(&Setup { start_nodes: 2000, ..Setup::with_seed(42) });
                sim
            },
            |mut sim| {
                sim.step();
                black_box(&sim);
            },
            BatchSize::SmallInput,
        );
    });
}

/// Mixed population: movers, eaters, breeders, and falling food — the
/// instruction mix a mature world settles into.
fn bench_step_mixed_active(c: &mut Criterion) {
    c.bench_function("step_mixed_active_300x150", |b| {
        b.iter_batched(
            || {
                let mut sim = simulator();
                let mover = Genome::from_prefix(&[genome::MOVE_FORWARD, genome::TURN_CW]);
                let hunter = Genome::from_prefix(&[genome::EAT_FORWARD, genome::TURN_CCW]);
                let breeder = Genome::from_prefix(&[
                    genome::PHOTOSYNTHESIZE,
                    genome::REPRODUCE_FORWARD,
                ]);
                for x in 0..300 {
                    for y in 0..150 {
                        match (x * 7 + y * 13) % 6 {
                            0 => sim.put(x, y, &Cell::food(10)).unwrap(),
                            1 => sim
                                .put(x, y, &Cell::active(80, Direction::East, mover))
                                .unwrap(),
                            2 => sim
                                .put(x, y, &Cell::active(80, Direction::South, hunter))
                                .unwrap(),
                            3 => sim
                                .put(x, y, &Cell::active(120, Direction::West, breeder))
                                .unwrap(),
                            _ => {}
                        }
                    }
                }
                sim
            },
            |mut sim| {
                sim.step();
                black_box(&sim);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_step_empty,
    bench_step_food_rain,
    bench_step_founders,
    bench_step_mixed_active,
);
criterion_main!(benches);
