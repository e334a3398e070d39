//! Evolutionary cellular-automaton engine.
//!
//! A rectangular grid of empty space, falling food, and genome-driven
//! agents advances in synchronous ticks. Every cell is updated in
//! parallel from a snapshot of the previous tick, so a step is a pure
//! double-buffered transform; contention for a target cell is settled by
//! snapshot-only arbitration rather than locks. The packed cell buffer
//! ([`codec`]) is the contract consumed by external viewers.

pub mod api;
pub mod cell;
pub mod codec;
pub mod config;
pub mod environment;
pub mod error;
pub mod genome;
mod kinds;
pub mod rng;

use std::mem;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use api::Snapshot;
pub use cell::{Cell, Diet, Direction, Kind};
use codec::{pack, unpack, PackedCell, AIR};
pub use config::Config;
pub use error::SimError;
pub use genome::Genome;
use rng::RngGrid;

/// World seeding parameters for [`Simulator::reset`].
#[derive(Clone, Debug)]
pub struct Setup {
    /// Seed for placement and for the per-cell random streams. Identical
    /// seeds replay identical worlds.
    pub seed: u64,
    /// How many agents to scatter across the sunlit band.
    pub start_nodes: u32,
    pub start_energy: u8,
    pub genome: Genome,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            seed: rand::random(),
            start_nodes: 64,
            start_energy: 100,
            genome: Genome::filled(genome::PHOTOSYNTHESIZE),
        }
    }
}

impl Setup {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Setup { seed, ..Setup::default() }
    }
}

/// Double-buffered cell grid plus the per-cell random states. `next`
/// always holds the current tick's state; `prev` is the snapshot the
/// kernel reads while producing the next one.
#[derive(Debug)]
struct World {
    width: u32,
    height: u32,
    prev: Vec<PackedCell>,
    next: Vec<PackedCell>,
    rng: RngGrid,
    tick: u64,
}

impl World {
    fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        World {
            width,
            height,
            prev: vec![AIR; len],
            next: vec![AIR; len],
            rng: RngGrid::new(len),
            tick: 0,
        }
    }

    /// Column-major index; callers guarantee the coordinates are in range.
    fn index(&self, x: i32, y: i32) -> usize {
        (x * self.height as i32 + y) as usize
    }

    fn reset(&mut self, config: &Config, setup: &Setup) {
        self.next.fill(AIR);
        self.tick = 0;

        let mut seeder = StdRng::seed_from_u64(setup.seed);
        self.rng.reseed(&mut seeder);

        // Scatter the founders over the sunlit band by shuffling the band's
        // positions, so placement never retries over occupied cells.
        let band = config.sunlit_rows();
        let mut positions: Vec<(u32, u32)> = (0..self.width)
            .flat_map(|x| (0..band).map(move |y| (x, y)))
            .collect();
        positions.shuffle(&mut seeder);

        let mut placed = 0u32;
        for &(x, y) in positions.iter().take(setup.start_nodes as usize) {
            let direction = Direction::from_bits(seeder.gen_range(0..4));
            let founder = Cell::active(setup.start_energy, direction, setup.genome);
            self.next[(x * self.height + y) as usize] = pack(&founder);
            placed += 1;
        }
        self.prev.copy_from_slice(&self.next);
        info!("world reset: seed {}, {placed} agents in rows 0..{band}", setup.seed);
    }

    /// One synchronous tick. The previous buffer is the only thing the
    /// parallel phase reads; each task writes its own slot and collects at
    /// most one remote write, applied after the barrier.
    fn step(&mut self, config: &Config) {
        mem::swap(&mut self.prev, &mut self.next);
        let snapshot = Snapshot::new(&self.prev, self.width, self.height);
        let height = self.height as i32;

        let remote: Vec<(usize, PackedCell)> = self
            .next
            .par_iter_mut()
            .zip(self.rng.states.par_iter_mut())
            .enumerate()
            .filter_map(|(i, (slot, rng_state))| {
                let (x, y) = (i as i32 / height, i as i32 % height);
                let outcome = kinds::update_cell(&snapshot, config, x, y, rng_state);
                *slot = outcome.here;
                outcome.remote
            })
            .collect();

        // Arbitration keeps remote targets disjoint, so this is a plain
        // sweep; collection order is the cell-index order either way.
        for (index, value) in remote {
            self.next[index] = value;
        }
        self.tick += 1;
    }
}

/// The simulation engine behind the viewer/inspector boundary: reset,
/// step, single-cell reads, packed snapshot exposure, config updates.
#[derive(Debug)]
pub struct Simulator {
    config: Config,
    world: World,
    pool: rayon::ThreadPool,
}

impl Simulator {
    /// Build a simulator for `config`. Fails with
    /// [`SimError::BackendUnavailable`] when the worker pool cannot start.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .build()
            .map_err(|e| SimError::BackendUnavailable(e.to_string()))?;
        debug!("step kernel on {} worker threads", pool.current_num_threads());
        let world = World::new(config.width, config.height);
        Ok(Simulator { config, world, pool })
    }

    /// Clear the world and seed `setup.start_nodes` agents in the sunlit
    /// band. Both buffers start identical and the tick counter restarts.
    pub fn reset(&mut self, setup: &Setup) {
        self.world.reset(&self.config, setup);
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) {
        let Simulator { config, world, pool } = self;
        pool.install(|| world.step(config));
    }

    /// Decoded read of a single cell.
    pub fn get(&self, x: i32, y: i32) -> Result<Cell, SimError> {
        self.bounds(x, y)?;
        Ok(unpack(&self.world.next[self.world.index(x, y)]))
    }

    /// Paint a single cell into the current state. Seeding seam for tests
    /// and editors; the next step picks the cell up like any other.
    pub fn put(&mut self, x: i32, y: i32, cell: &Cell) -> Result<(), SimError> {
        self.bounds(x, y)?;
        let index = self.world.index(x, y);
        self.world.next[index] = pack(cell);
        Ok(())
    }

    /// The packed current-tick buffer: column-major `width * height`
    /// records of [`codec::CELL_WORDS`] little-endian words each.
    #[must_use]
    pub fn snapshot(&self) -> &[u32] {
        bytemuck::cast_slice(&self.world.next)
    }

    /// Update one config field by name between steps.
    pub fn set_config(&mut self, name: &str, value: u32) -> Result<(), SimError> {
        self.config.set(name, value)?;
        debug!("config update: {name} = {value}");
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.world.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.world.height
    }

    /// Number of living agents, counted by parallel reduction over the
    /// current buffer.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let world = &self.world;
        self.pool
            .install(|| world.next.par_iter().filter(|c| c.kind() == Kind::Active).count())
    }

    fn bounds(&self, x: i32, y: i32) -> Result<(), SimError> {
        if x < 0 || y < 0 || x >= self.world.width as i32 || y >= self.world.height as i32 {
            return Err(SimError::OutOfRange {
                x,
                y,
                width: self.world.width,
                height: self.world.height,
            });
        }
        Ok(())
    }
}
