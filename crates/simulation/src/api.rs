//! Read view over the previous tick's buffer, plus the contention rules.
//!
//! Every cell task reasons about its neighbours from this snapshot alone,
//! so all contenders for a target reach the same verdict without locks:
//! X wraps around the world, out-of-range Y reads return the Wall
//! sentinel.

use crate::cell::{Direction, Kind};
use crate::codec::{PackedCell, WALL};
use crate::genome;

#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    cells: &'a [PackedCell],
    pub width: i32,
    pub height: i32,
}

impl<'a> Snapshot<'a> {
    #[must_use]
    pub fn new(cells: &'a [PackedCell], width: u32, height: u32) -> Self {
        debug_assert_eq!(cells.len(), (width * height) as usize);
        Snapshot { cells, width: width as i32, height: height as i32 }
    }

    /// Column-major index with X wrapped. `y` must be in range.
    #[must_use]
    pub fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!((0..self.height).contains(&y));
        (x.rem_euclid(self.width) * self.height + y) as usize
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> PackedCell {
        if (0..self.height).contains(&y) {
            self.cells[self.index(x, y)]
        } else {
            WALL
        }
    }

    /// Movement arbitration. True iff `to` is empty and the actor outranks
    /// every other contender for it: an adjacent agent whose current gene
    /// is MOVE_FORWARD aimed at `to`, or food directly above `to`, blocks
    /// the move unless the actor's energy is strictly greater. Ties lose
    /// on both sides, which is what keeps parallel writes disjoint.
    #[must_use]
    pub fn can_move(&self, actor_energy: u32, from: (i32, i32), to: (i32, i32)) -> bool {
        if self.get(to.0, to.1).kind() != Kind::Air {
            return false;
        }
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            let (nx, ny) = (to.0 + dx, to.1 + dy);
            if (0..self.height).contains(&ny) && self.index(nx, ny) == self.index(from.0, from.1) {
                continue;
            }
            let neighbour = self.get(nx, ny);
            let contends = match neighbour.kind() {
                Kind::Active => {
                    neighbour.current_gene_code() == genome::MOVE_FORWARD
                        && neighbour.direction() == dir.opposite()
                }
                Kind::Food => dir == Direction::North,
                Kind::Air | Kind::Wall => false,
            };
            if contends && actor_energy <= u32::from(neighbour.energy()) {
                return false;
            }
        }
        true
    }

    /// True iff some adjacent agent's current gene is EAT_FORWARD and it
    /// faces this cell. The eaten cell erases itself; the eater credits
    /// the energy at its own position, so the two writes never collide.
    #[must_use]
    pub fn eaten(&self, x: i32, y: i32) -> bool {
        Direction::ALL.into_iter().any(|dir| {
            let (dx, dy) = dir.offset();
            let neighbour = self.get(x + dx, y + dy);
            neighbour.kind() == Kind::Active
                && neighbour.current_gene_code() == genome::EAT_FORWARD
                && neighbour.direction() == dir.opposite()
        })
    }
}
