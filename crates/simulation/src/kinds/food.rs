//! Food: falls south one row per tick, decays on the world floor.

use crate::api::Snapshot;
use crate::cell::Cell;
use crate::codec::{pack, AIR};
use crate::kinds::Outcome;

pub(crate) fn update_food(snapshot: &Snapshot, x: i32, y: i32) -> Outcome {
    if snapshot.eaten(x, y) {
        return Outcome::own(AIR);
    }
    if y == snapshot.height - 1 {
        // Settled on the floor: decays back to empty space.
        return Outcome::own(AIR);
    }
    let energy = snapshot.get(x, y).energy();
    if snapshot.can_move(u32::from(energy), (x, y), (x, y + 1)) {
        Outcome {
            here: AIR,
            remote: Some((snapshot.index(x, y + 1), pack(&Cell::food(energy)))),
        }
    } else {
        Outcome::own(pack(&Cell::food(energy)))
    }
}
