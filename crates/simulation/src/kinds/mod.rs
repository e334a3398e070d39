//! Per-kind update handlers dispatched from the step kernel.
//!
//! A handler sees only the previous tick's snapshot and returns an
//! [`Outcome`]: the new value of its own cell plus at most one remote
//! write (a move target, a spawned child, or a corpse left at a move
//! target). The arbitration rules in [`crate::api`] keep remote targets
//! disjoint, so the kernel can apply them without coordination.

mod active;
mod food;

use crate::api::Snapshot;
use crate::cell::Kind;
use crate::codec::{PackedCell, AIR, WALL};
use crate::config::Config;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Outcome {
    /// New value of the cell's own position.
    pub here: PackedCell,
    /// Optional write to one other position (always snapshot-AIR, so its
    /// owner task emits nothing that conflicts).
    pub remote: Option<(usize, PackedCell)>,
}

impl Outcome {
    pub(crate) fn own(here: PackedCell) -> Self {
        Outcome { here, remote: None }
    }
}

/// Compute one cell's next value. Air and Wall re-emit their sentinel,
/// which also scrubs any stray payload bits from the record.
pub(crate) fn update_cell(
    snapshot: &Snapshot,
    config: &Config,
    x: i32,
    y: i32,
    rng_state: &mut u32,
) -> Outcome {
    match snapshot.get(x, y).kind() {
        Kind::Air => Outcome::own(AIR),
        Kind::Wall => Outcome::own(WALL),
        Kind::Food => food::update_food(snapshot, x, y),
        Kind::Active => active::update_active(snapshot, config, x, y, rng_state),
    }
}
