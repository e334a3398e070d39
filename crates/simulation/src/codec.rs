//! Packed wire format: one cell is a fixed record of 18 little-endian u32
//! words. This layout is the renderer/inspector contract.
//!
//! - word 0: bits 0–2 kind, 3–5 direction, 6–7 diet.eat, 8–15 age low,
//!   16–23 energy, 24–27 minerals, 28–29 diet.photo, 30–31 diet.mineral
//! - word 1: bits 0–7 color, 24–29 current gene, 30 age bit 8
//! - words 2–17: genome, four genes per word

use bytemuck::{Pod, Zeroable};

use crate::cell::{Cell, Diet, Direction, Kind};
use crate::genome::{Genome, GENOME_LEN};

/// Words per packed cell record.
pub const CELL_WORDS: usize = 18;

const KIND_SHIFT: u32 = 0;
const KIND_MASK: u32 = 0b111;
const DIR_SHIFT: u32 = 3;
const DIR_MASK: u32 = 0b111;
const DIET_EAT_SHIFT: u32 = 6;
const AGE_LOW_SHIFT: u32 = 8;
const AGE_LOW_MASK: u32 = 0xff;
const ENERGY_SHIFT: u32 = 16;
const ENERGY_MASK: u32 = 0xff;
const MINERALS_SHIFT: u32 = 24;
const MINERALS_MASK: u32 = 0b1111;
const DIET_PHOTO_SHIFT: u32 = 28;
const DIET_MINERAL_SHIFT: u32 = 30;
const DIET_MASK: u32 = 0b11;

const COLOR_SHIFT: u32 = 0;
const COLOR_MASK: u32 = 0xff;
const CURRENT_GENE_SHIFT: u32 = 24;
const CURRENT_GENE_MASK: u32 = 0b11_1111;
const AGE_HIGH_SHIFT: u32 = 30;

const GENOME_WORDS: usize = GENOME_LEN / 4;

/// One cell in snapshot-buffer form. `Pod` so whole buffers can be viewed
/// as `&[u32]` without copying.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable, Debug)]
pub struct PackedCell(pub [u32; CELL_WORDS]);

/// Empty space. All-zero by contract.
pub const AIR: PackedCell = PackedCell([0; CELL_WORDS]);

/// Boundary sentinel returned for out-of-range reads.
pub const WALL: PackedCell = {
    let mut words = [0; CELL_WORDS];
    words[0] = Kind::Wall as u32;
    PackedCell(words)
};

impl PackedCell {
    #[must_use]
    pub fn kind(&self) -> Kind {
        Kind::from_bits((self.0[0] >> KIND_SHIFT) & KIND_MASK)
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_bits((self.0[0] >> DIR_SHIFT) & DIR_MASK)
    }

    #[must_use]
    pub fn age(&self) -> u16 {
        let low = (self.0[0] >> AGE_LOW_SHIFT) & AGE_LOW_MASK;
        let high = (self.0[1] >> AGE_HIGH_SHIFT) & 1;
        (high << 8 | low) as u16
    }

    #[must_use]
    pub fn energy(&self) -> u8 {
        ((self.0[0] >> ENERGY_SHIFT) & ENERGY_MASK) as u8
    }

    #[must_use]
    pub fn minerals(&self) -> u8 {
        ((self.0[0] >> MINERALS_SHIFT) & MINERALS_MASK) as u8
    }

    #[must_use]
    pub fn diet(&self) -> Diet {
        Diet {
            eat: ((self.0[0] >> DIET_EAT_SHIFT) & DIET_MASK) as u8,
            photo: ((self.0[0] >> DIET_PHOTO_SHIFT) & DIET_MASK) as u8,
            mineral: ((self.0[0] >> DIET_MINERAL_SHIFT) & DIET_MASK) as u8,
        }
    }

    #[must_use]
    pub fn color(&self) -> u8 {
        ((self.0[1] >> COLOR_SHIFT) & COLOR_MASK) as u8
    }

    #[must_use]
    pub fn current_gene(&self) -> u8 {
        ((self.0[1] >> CURRENT_GENE_SHIFT) & CURRENT_GENE_MASK) as u8
    }

    /// Genome byte at `at`, wrapping. Four genes per word, little-endian.
    #[must_use]
    pub fn gene(&self, at: u16) -> u8 {
        let at = usize::from(at) % GENOME_LEN;
        let word = self.0[2 + at / 4];
        (word >> ((at % 4) * 8)) as u8
    }

    /// The gene byte the instruction pointer rests on. Arbitration peeks
    /// at this without unpacking the whole record.
    #[must_use]
    pub fn current_gene_code(&self) -> u8 {
        self.gene(u16::from(self.current_gene()))
    }

    #[must_use]
    pub fn genome(&self) -> Genome {
        let mut genes = [0; GENOME_LEN];
        for (i, chunk) in genes.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&self.0[2 + i].to_le_bytes());
        }
        Genome(genes)
    }
}

/// Encode a cell. Fields that do not apply to the kind are packed as zero,
/// so `pack(Cell::air())` is the all-zero record.
#[must_use]
pub fn pack(cell: &Cell) -> PackedCell {
    match cell.kind {
        Kind::Air => AIR,
        Kind::Wall => WALL,
        Kind::Food => {
            let mut words = [0; CELL_WORDS];
            words[0] = Kind::Food as u32 | (u32::from(cell.energy) & ENERGY_MASK) << ENERGY_SHIFT;
            PackedCell(words)
        }
        Kind::Active => {
            debug_assert!(cell.age <= 511, "age overflows its 9-bit field");
            debug_assert!(cell.current_gene < 64, "instruction pointer out of range");
            let mut words = [0; CELL_WORDS];
            let age = u32::from(cell.age);
            words[0] = Kind::Active as u32
                | (cell.direction as u32 & DIR_MASK) << DIR_SHIFT
                | (u32::from(cell.diet.eat) & DIET_MASK) << DIET_EAT_SHIFT
                | (age & AGE_LOW_MASK) << AGE_LOW_SHIFT
                | u32::from(cell.energy) << ENERGY_SHIFT
                | (u32::from(cell.minerals) & MINERALS_MASK) << MINERALS_SHIFT
                | (u32::from(cell.diet.photo) & DIET_MASK) << DIET_PHOTO_SHIFT
                | (u32::from(cell.diet.mineral) & DIET_MASK) << DIET_MINERAL_SHIFT;
            words[1] = u32::from(cell.color) << COLOR_SHIFT
                | (u32::from(cell.current_gene) & CURRENT_GENE_MASK) << CURRENT_GENE_SHIFT
                | (age >> 8 & 1) << AGE_HIGH_SHIFT;
            for (i, chunk) in cell.genome.0.chunks_exact(4).enumerate() {
                words[2 + i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            PackedCell(words)
        }
    }
}

/// Decode a record. Fields that do not apply to the kind come back as
/// their defaults regardless of stray bits.
#[must_use]
pub fn unpack(packed: &PackedCell) -> Cell {
    match packed.kind() {
        Kind::Air => Cell::air(),
        Kind::Wall => Cell::wall(),
        Kind::Food => Cell::food(packed.energy()),
        Kind::Active => Cell {
            kind: Kind::Active,
            direction: packed.direction(),
            age: packed.age(),
            energy: packed.energy(),
            minerals: packed.minerals(),
            diet: packed.diet(),
            color: packed.color(),
            current_gene: packed.current_gene(),
            genome: packed.genome(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_genome() -> impl Strategy<Value = Genome> {
        proptest::collection::vec(any::<u8>(), GENOME_LEN).prop_map(|bytes| {
            let mut genes = [0; GENOME_LEN];
            genes.copy_from_slice(&bytes);
            Genome(genes)
        })
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::East),
            Just(Direction::North),
            Just(Direction::West),
            Just(Direction::South),
        ]
    }

    fn arb_active() -> impl Strategy<Value = Cell> {
        (
            arb_direction(),
            0u16..512,
            any::<u8>(),
            0u8..16,
            (0u8..4, 0u8..4, 0u8..4),
            any::<u8>(),
            0u8..64,
            arb_genome(),
        )
            .prop_map(
                |(direction, age, energy, minerals, (eat, photo, mineral), color, current_gene, genome)| {
                    Cell {
                        kind: Kind::Active,
                        direction,
                        age,
                        energy,
                        minerals,
                        diet: Diet { eat, photo, mineral },
                        color,
                        current_gene,
                        genome,
                    }
                },
            )
    }

    #[test]
    fn air_packs_to_all_zero() {
        assert_eq!(pack(&Cell::air()).0, [0; CELL_WORDS]);
        assert_eq!(AIR.kind(), Kind::Air);
    }

    #[test]
    fn wall_sentinel_has_kind_only() {
        let wall = pack(&Cell::wall());
        assert_eq!(wall, WALL);
        assert_eq!(wall.0[0], 1);
        assert!(wall.0[1..].iter().all(|&w| w == 0));
    }

    #[test]
    fn food_round_trip_keeps_energy_only() {
        let packed = pack(&Cell::food(200));
        assert_eq!(packed.kind(), Kind::Food);
        assert_eq!(packed.energy(), 200);
        assert_eq!(unpack(&packed), Cell::food(200));
    }

    #[test]
    fn nine_bit_age_splits_across_words() {
        let mut cell = Cell::active(10, Direction::East, Genome::zeroed());
        cell.age = 300;
        let packed = pack(&cell);
        assert_eq!((packed.0[0] >> AGE_LOW_SHIFT) & AGE_LOW_MASK, 300 & 0xff);
        assert_eq!((packed.0[1] >> AGE_HIGH_SHIFT) & 1, 1);
        assert_eq!(packed.age(), 300);
    }

    #[test]
    fn genome_bytes_pack_little_endian() {
        let mut cell = Cell::active(0, Direction::East, Genome::zeroed());
        cell.genome.set(0, 0x11);
        cell.genome.set(1, 0x22);
        cell.genome.set(2, 0x33);
        cell.genome.set(3, 0x44);
        cell.genome.set(63, 0x99);
        let packed = pack(&cell);
        assert_eq!(packed.0[2], 0x4433_2211);
        assert_eq!(packed.0[17] >> 24, 0x99);
        assert_eq!(packed.gene(0), 0x11);
        assert_eq!(packed.gene(3), 0x44);
        assert_eq!(packed.gene(63), 0x99);
    }

    #[test]
    fn current_gene_code_reads_through_pointer() {
        let mut cell = Cell::active(0, Direction::East, Genome::filled(7));
        cell.genome.set(5, 42);
        cell.current_gene = 5;
        assert_eq!(pack(&cell).current_gene_code(), 42);
    }

    #[test]
    fn packed_buffers_cast_to_words() {
        let cells = [AIR, WALL];
        let words: &[u32] = bytemuck::cast_slice(&cells);
        assert_eq!(words.len(), 2 * CELL_WORDS);
        assert_eq!(words[0], 0);
        assert_eq!(words[CELL_WORDS], 1);
    }

    proptest! {
        #[test]
        fn prop_active_round_trip(cell in arb_active()) {
            let packed = pack(&cell);
            prop_assert_eq!(unpack(&packed), cell);
        }

        #[test]
        fn prop_accessors_agree_with_unpack(cell in arb_active()) {
            let packed = pack(&cell);
            prop_assert_eq!(packed.kind(), cell.kind);
            prop_assert_eq!(packed.direction(), cell.direction);
            prop_assert_eq!(packed.age(), cell.age);
            prop_assert_eq!(packed.energy(), cell.energy);
            prop_assert_eq!(packed.minerals(), cell.minerals);
            prop_assert_eq!(packed.diet(), cell.diet);
            prop_assert_eq!(packed.color(), cell.color);
            prop_assert_eq!(packed.current_gene(), cell.current_gene);
            prop_assert_eq!(packed.genome(), cell.genome);
        }

        #[test]
        fn prop_food_energy_survives(energy in any::<u8>()) {
            prop_assert_eq!(unpack(&pack(&Cell::food(energy))), Cell::food(energy));
        }
    }
}
