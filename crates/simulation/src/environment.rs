//! Sunlight and mineral fields as functions of row.

use crate::config::Config;

/// Sunlight reaching row `y`. Strongest at the top row, fading by one
/// level every `sun_level_height` rows.
#[must_use]
pub fn sun_at(config: &Config, y: i32) -> u32 {
    config.sun_amount.saturating_sub(y as u32 / config.sun_level_height)
}

/// Mineral deposit rate at row `y`. Strongest at the bottom row, fading
/// by one level every `mineral_level_height` rows above it.
#[must_use]
pub fn mineral_at(config: &Config, y: i32) -> u32 {
    config
        .mineral_amount
        .saturating_sub((config.height - 1 - y as u32) / config.mineral_level_height)
}
