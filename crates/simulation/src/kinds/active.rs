//! Active cells: execute one gene of the genome VM, then apply the
//! per-tick bookkeeping (gene advance, upkeep, mineral intake, aging,
//! movement, death).

use crate::api::Snapshot;
use crate::cell::{Cell, Kind};
use crate::codec::{self, AIR};
use crate::config::Config;
use crate::environment;
use crate::genome;
use crate::kinds::Outcome;
use crate::rng;

pub(crate) fn update_active(
    snapshot: &Snapshot,
    config: &Config,
    x: i32,
    y: i32,
    rng_state: &mut u32,
) -> Outcome {
    // A consumed agent never gets to act; the eater credits the energy at
    // its own position.
    if snapshot.eaten(x, y) {
        return Outcome::own(AIR);
    }

    let mut cell = codec::unpack(&snapshot.get(x, y));
    let genes = cell.genome;
    let ip = u16::from(cell.current_gene);
    let arg = |k: u16| genes.at(ip + k);

    let mut energy = i64::from(cell.energy);
    let mut advance: u8 = 1;
    let mut destination = (x, y);
    let mut spawn: Option<(usize, codec::PackedCell)> = None;

    let code = genes.at(ip);
    match code {
        // Bytes below the opcode range are relative jumps; zero falls
        // through to the next gene.
        0..=63 => {
            if code != 0 {
                advance = code;
            }
        }
        genome::MOVE_FORWARD => {
            let (dx, dy) = cell.direction.offset();
            let to = (x + dx, y + dy);
            if snapshot.can_move(u32::from(cell.energy), (x, y), to) {
                destination = to;
            }
        }
        genome::TURN_CCW => cell.direction = cell.direction.ccw(),
        genome::TURN_CW => cell.direction = cell.direction.cw(),
        genome::EAT_FORWARD => {
            let (dx, dy) = cell.direction.offset();
            let target = snapshot.get(x + dx, y + dy);
            if target.kind() >= Kind::Food {
                energy += i64::from(target.energy());
                cell.diet.bump_eat();
                advance = arg(1);
            } else {
                advance = arg(2);
            }
        }
        genome::REPRODUCE_FORWARD | genome::REPRODUCE_BACKWARD => {
            let heading = if code == genome::REPRODUCE_FORWARD {
                cell.direction
            } else {
                cell.direction.opposite()
            };
            let (dx, dy) = heading.offset();
            let child_pos = (x + dx, y + dy);
            let half = (energy - i64::from(config.reproduction_cost)) / 2;
            if half <= 0 || !snapshot.can_move(u32::from(cell.energy), (x, y), child_pos) {
                advance = arg(3);
            } else {
                let mut child_genome = cell.genome;
                let mut child_color = cell.color;
                if rng::next_range(rng_state, 0, 100) < config.mutation_rate {
                    let slot = rng::next_range(rng_state, 0, genome::GENOME_LEN as u32) as u8;
                    let gene = rng::next_range(rng_state, 0, u32::from(genome::NUM_GENE_CODES)) as u8;
                    child_genome.set(slot, gene);
                    child_color = child_color.wrapping_add(1);
                }
                let mut child = Cell::active(
                    half.min(i64::from(config.node_max_energy)) as u8,
                    cell.direction,
                    child_genome,
                );
                child.color = child_color;
                child.current_gene = arg(1) % genome::GENOME_LEN as u8;
                spawn = Some((snapshot.index(child_pos.0, child_pos.1), codec::pack(&child)));
                energy -= half;
                advance = arg(2);
            }
        }
        genome::PHOTOSYNTHESIZE => {
            let sun = environment::sun_at(config, y);
            if sun > 0 {
                energy += i64::from(sun);
                cell.diet.bump_photo();
            }
        }
        genome::CHECK_FORWARD => {
            let (dx, dy) = cell.direction.offset();
            let target = snapshot.get(x + dx, y + dy);
            advance = match target.kind() {
                Kind::Active => {
                    if genes.related(&target.genome(), config.relative_threshold) {
                        arg(1)
                    } else {
                        arg(2)
                    }
                }
                Kind::Food => arg(3),
                Kind::Air => arg(4),
                Kind::Wall => arg(5),
            };
        }
        genome::CHECK_ENERGY => {
            // Greater and lesser outcomes currently land on the same slot.
            advance = if energy > i64::from(arg(1)) { arg(2) } else { arg(2) };
        }
        genome::CONVERT_MINERALS => {
            if cell.minerals > 0 {
                energy += i64::from(cell.minerals) * i64::from(config.mineral_energy);
                cell.minerals = 0;
                cell.diet.bump_mineral();
            }
        }
        // Codes past the instruction table are inert.
        _ => {}
    }

    // Bookkeeping, in fixed order: gene advance, upkeep, mineral intake,
    // aging. Mineral intake reads the row the tick started on.
    cell.current_gene =
        ((u16::from(cell.current_gene) + u16::from(advance)) % genome::GENOME_LEN as u16) as u8;
    energy = (energy - 1).min(i64::from(config.node_max_energy));
    let minerals = u32::from(cell.minerals) + environment::mineral_at(config, y);
    cell.minerals = minerals.min(u32::from(config.node_max_minerals)) as u8;
    cell.age += 1;

    let moved = destination != (x, y);
    debug_assert!(!(moved && spawn.is_some()));

    if energy <= 0 || cell.age > config.node_max_age {
        let corpse = codec::pack(&Cell::food(config.food_energy));
        return if moved {
            Outcome {
                here: AIR,
                remote: Some((snapshot.index(destination.0, destination.1), corpse)),
            }
        } else {
            Outcome::own(corpse)
        };
    }

    cell.energy = energy as u8;
    let packed = codec::pack(&cell);
    if moved {
        Outcome {
            here: AIR,
            remote: Some((snapshot.index(destination.0, destination.1), packed)),
        }
    } else {
        Outcome { here: packed, remote: spawn }
    }
}
