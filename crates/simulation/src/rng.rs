//! Per-cell xorshift32 streams.
//!
//! Every grid position owns one u32 of state, so parallel cell updates
//! never contend on a shared generator and a world replays identically
//! for a given reset seed.

use rand::Rng;

/// Advance one xorshift32 state and return the new value.
#[inline]
pub fn next_u32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Draw from `low..high`. `high` must be greater than `low`.
#[inline]
pub fn next_range(state: &mut u32, low: u32, high: u32) -> u32 {
    debug_assert!(low < high);
    low + next_u32(state) % (high - low)
}

/// One xorshift32 state per grid cell.
#[derive(Debug)]
pub struct RngGrid {
    pub states: Vec<u32>,
}

impl RngGrid {
    #[must_use]
    pub fn new(len: usize) -> Self {
        RngGrid { states: vec![1; len] }
    }

    /// Refill every slot from `source`. Xorshift is stuck at zero, so zero
    /// draws are re-rolled.
    pub fn reseed<R: Rng>(&mut self, source: &mut R) {
        for state in &mut self.states {
            *state = loop {
                let value = source.gen::<u32>();
                if value != 0 {
                    break value;
                }
            };
        }
    }
}
