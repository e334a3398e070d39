//! Simulation configuration: the tuning block the kernel reads each tick.

use crate::error::SimError;

/// World tuning parameters. `width`/`height` are fixed when the simulator
/// is built; every other field can be updated between steps by name via
/// [`Config::set`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    /// Death-by-age threshold, at most 511 (the age field is 9 bits).
    pub node_max_age: u16,
    /// Energy cap, at most 255.
    pub node_max_energy: u8,
    /// Mineral cap, at most 15.
    pub node_max_minerals: u8,
    /// Energy produced per stored mineral on CONVERT_MINERALS.
    pub mineral_energy: u32,
    pub sun_amount: u32,
    pub sun_level_height: u32,
    pub mineral_amount: u32,
    pub mineral_level_height: u32,
    /// Max differing genome bytes for two cells to count as relatives.
    pub relative_threshold: u32,
    /// Subtracted from parent energy before the parent/child split.
    pub reproduction_cost: u32,
    /// Chance of one mutated gene per reproduction, integer percent 0..=100.
    pub mutation_rate: u32,
    /// Energy of the food a dead agent turns into.
    pub food_energy: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 300,
            height: 150,
            node_max_age: 511,
            node_max_energy: 255,
            node_max_minerals: 15,
            mineral_energy: 4,
            sun_amount: 5,
            sun_level_height: 10,
            mineral_amount: 5,
            mineral_level_height: 10,
            relative_threshold: 2,
            reproduction_cost: 10,
            mutation_rate: 25,
            food_energy: 10,
        }
    }
}

impl Config {
    /// Rows `0..sunlit_rows()` receive sunlight; reset seeds agents there.
    #[must_use]
    pub fn sunlit_rows(&self) -> u32 {
        (self.sun_amount * self.sun_level_height).min(self.height)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::rejected("WORLD_SIZE", "dimensions must be non-zero"));
        }
        if self.node_max_age > 511 {
            return Err(SimError::rejected("NODE_MAX_AGE", "must be at most 511"));
        }
        if self.node_max_age == 0 {
            return Err(SimError::rejected("NODE_MAX_AGE", "must be positive"));
        }
        if self.node_max_energy == 0 {
            return Err(SimError::rejected("NODE_MAX_ENERGY", "must be positive"));
        }
        if self.sun_level_height == 0 {
            return Err(SimError::rejected("SUN_LEVEL_HEIGHT", "must be positive"));
        }
        if self.mineral_level_height == 0 {
            return Err(SimError::rejected("MINERAL_LEVEL_HEIGHT", "must be positive"));
        }
        if self.relative_threshold > 64 {
            return Err(SimError::rejected("RELATIVE_THRESHOLD", "must be at most 64"));
        }
        if self.mutation_rate > 100 {
            return Err(SimError::rejected("MUTATION_RATE", "must be a percentage 0..=100"));
        }
        if self.food_energy == 0 {
            return Err(SimError::rejected("FOOD_ENERGY", "must be positive"));
        }
        Ok(())
    }

    /// Update one field by its external name. The change is validated as a
    /// whole so a rejected update leaves the config untouched.
    pub fn set(&mut self, name: &str, value: u32) -> Result<(), SimError> {
        let mut updated = self.clone();
        match name {
            "NODE_MAX_AGE" => updated.node_max_age = narrowed(name, value, 511)? as u16,
            "NODE_MAX_ENERGY" => updated.node_max_energy = narrowed(name, value, 255)? as u8,
            "NODE_MAX_MINERALS" => updated.node_max_minerals = narrowed(name, value, 15)? as u8,
            "MINERAL_ENERGY" => updated.mineral_energy = value,
            "SUN_AMOUNT" => updated.sun_amount = value,
            "SUN_LEVEL_HEIGHT" => updated.sun_level_height = value,
            "MINERAL_AMOUNT" => updated.mineral_amount = value,
            "MINERAL_LEVEL_HEIGHT" => updated.mineral_level_height = value,
            "RELATIVE_THRESHOLD" => updated.relative_threshold = value,
            "REPRODUCTION_COST" => updated.reproduction_cost = value,
            "MUTATION_RATE" => updated.mutation_rate = value,
            "FOOD_ENERGY" => updated.food_energy = narrowed(name, value, 255)? as u8,
            "WORLD_SIZE" => {
                return Err(SimError::rejected(
                    name,
                    "dimensions are fixed at construction; build a new simulator",
                ));
            }
            _ => return Err(SimError::rejected(name, "unknown field")),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn narrowed(name: &str, value: u32, max: u32) -> Result<u32, SimError> {
    if value > max {
        return Err(SimError::rejected(name, format!("must be at most {max}")));
    }
    Ok(value)
}
