/*!
 * Level Mapping Tables
 * Step functions from rate metrics to discrete levels
 *
 * Bands are checked top-down with a strict `>`; the first band whose
 * floor the value exceeds wins, otherwise the table's fallback applies.
 *
 * The low percussive bands (8, 16) and the low speed bands are ambient
 * placeholder levels consumed by the external sound bank, not loudness.
 * They are kept exactly as they are.
 */

use crate::core::types::Level;

/// One threshold band: values strictly above `floor` map to `level`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub floor: f64,
    pub level: Level,
}

const fn band(floor: f64, level: Level) -> Band {
    Band { floor, level }
}

/// Ordered band table with a fallback level
#[derive(Debug, Clone, Copy)]
pub struct LevelTable {
    bands: &'static [Band],
    fallback: Level,
}

impl LevelTable {
    pub const fn new(bands: &'static [Band], fallback: Level) -> Self {
        Self { bands, fallback }
    }

    #[inline]
    pub fn lookup(&self, value: f64) -> Level {
        self.bands
            .iter()
            .find(|b| value > b.floor)
            .map(|b| b.level)
            .unwrap_or(self.fallback)
    }

    pub fn bands(&self) -> &'static [Band] {
        self.bands
    }
}

/// Drums, bytes/sec
pub const PERCUSSIVE_TABLE: LevelTable = LevelTable::new(
    &[
        band(150.0, 4),
        band(120.0, 3),
        band(70.0, 2),
        band(30.0, 1),
        band(15.0, 8),
        band(5.0, 16),
    ],
    0,
);

/// Bass/melody, bytes/sec
pub const MELODIC_TABLE: LevelTable = LevelTable::new(
    &[
        band(150.0, 8),
        band(130.0, 7),
        band(100.0, 6),
        band(80.0, 5),
        band(40.0, 4),
        band(30.0, 3),
        band(10.0, 2),
        band(5.0, 1),
    ],
    0,
);

/// Secondary speed parameter, packets/sec
pub const SPEED_TABLE: LevelTable = LevelTable::new(
    &[
        band(6.0, 4),
        band(3.0, 3),
        band(2.0, 2),
        band(1.0, 1),
        band(0.5, 8),
    ],
    16,
);

#[inline]
pub fn map_percussive_level(bps: f64) -> Level {
    PERCUSSIVE_TABLE.lookup(bps)
}

#[inline]
pub fn map_melodic_level(bps: f64) -> Level {
    MELODIC_TABLE.lookup(bps)
}

#[inline]
pub fn map_speed_level(pps: f64) -> Level {
    SPEED_TABLE.lookup(pps)
}
