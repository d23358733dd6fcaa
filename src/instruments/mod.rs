/*!
 * Instruments Module
 * Rate-to-level tables, smoothing transitions and the instrument catalog
 */

pub mod catalog;
pub mod mapping;
pub mod smoothing;

// Re-export public API
pub use catalog::{InstrumentCatalog, InstrumentClass, InstrumentDefinition};
pub use mapping::{
    map_melodic_level, map_percussive_level, map_speed_level, Band, LevelTable, MELODIC_TABLE,
    PERCUSSIVE_TABLE, SPEED_TABLE,
};
pub use smoothing::{melodic_transition, percussive_transition, step_toward, ACTIVE_BAND_MAX};
