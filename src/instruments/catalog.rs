/*!
 * Instrument Catalog
 * Fixed slot -> instrument table, read-only after startup
 */

use super::mapping::{map_melodic_level, map_percussive_level};
use super::smoothing::{melodic_transition, percussive_transition, step_toward};
use crate::activity::ActivityRecord;
use crate::core::errors::ConfigError;
use crate::core::types::{Level, SlotId};
use crate::emit::ControlMessage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;

/// Instrument class - selects mapping, smoothing and message shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentClass {
    /// Drums: percussive thresholds, attack/release smoothing, level only
    Percussive,
    /// Bass/melody: melodic thresholds, immediate jump, level + speed
    Melodic,
    /// Sustained chords: melodic thresholds, one-step smoothing, level + speed
    Chord,
}

impl InstrumentClass {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "percussive" | "drum" | "drums" => Ok(Self::Percussive),
            "melodic" | "melody" => Ok(Self::Melodic),
            "chord" | "chords" => Ok(Self::Chord),
            _ => Err(format!(
                "Invalid instrument class '{}'. Valid: percussive, melodic, chord",
                s
            )),
        }
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percussive => "percussive",
            Self::Melodic => "melodic",
            Self::Chord => "chord",
        }
    }

    /// Target level for a bytes/sec rate; 0 means evict
    #[inline]
    pub fn map_level(&self, bps: f64) -> Level {
        match self {
            Self::Percussive => map_percussive_level(bps),
            Self::Melodic | Self::Chord => map_melodic_level(bps),
        }
    }

    /// Apply this class's smoothing transition in place
    #[inline]
    pub fn adjust_level(&self, record: &mut ActivityRecord, target: Level) {
        record.current_level = match self {
            Self::Percussive => percussive_transition(record.current_level, target),
            Self::Melodic => melodic_transition(record.current_level, target),
            Self::Chord => step_toward(record.current_level, target),
        };
    }

    /// Whether messages carry the secondary speed argument
    #[inline]
    pub const fn uses_speed(&self) -> bool {
        !matches!(self, Self::Percussive)
    }

    /// Build the control message for one emission
    pub fn emit(&self, level: Level, speed: Level, name: &str) -> ControlMessage {
        if self.uses_speed() {
            ControlMessage::instrument(name, &[level, speed])
        } else {
            ControlMessage::instrument(name, &[level])
        }
    }
}

impl Serialize for InstrumentClass {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InstrumentClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDefinition {
    pub name: String,
    pub class: InstrumentClass,
}

impl InstrumentDefinition {
    pub fn new(name: impl Into<String>, class: InstrumentClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

/// Slot-indexed instrument table
#[derive(Debug, Clone)]
pub struct InstrumentCatalog {
    instruments: Vec<InstrumentDefinition>,
}

impl InstrumentCatalog {
    /// Build from definitions; slot `i` binds to `definitions[i]`
    pub fn new(definitions: Vec<InstrumentDefinition>) -> Result<Self, ConfigError> {
        if definitions.is_empty() {
            return Err(ConfigError::invalid(
                "instruments",
                "at least one instrument is required",
            ));
        }
        let mut seen = HashSet::new();
        for def in &definitions {
            if def.name.is_empty() {
                return Err(ConfigError::invalid("instruments", "empty instrument name"));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(ConfigError::invalid(
                    "instruments",
                    format!("duplicate instrument name '{}'", def.name),
                ));
            }
        }
        Ok(Self {
            instruments: definitions,
        })
    }

    /// Load a JSON array of definitions
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let table_error = |reason: String| ConfigError::InstrumentTable {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| table_error(e.to_string()))?;
        let definitions: Vec<InstrumentDefinition> =
            serde_json::from_str(&raw).map_err(|e| table_error(e.to_string()))?;
        Self::new(definitions)
    }

    #[inline]
    pub fn get(&self, slot: SlotId) -> Option<&InstrumentDefinition> {
        self.instruments.get(slot)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &InstrumentDefinition)> {
        self.instruments.iter().enumerate()
    }
}

impl Default for InstrumentCatalog {
    /// Drum kit on the first three slots, then bass, melody and a chord pad
    fn default() -> Self {
        use InstrumentClass::*;
        Self {
            instruments: vec![
                InstrumentDefinition::new("kick", Percussive),
                InstrumentDefinition::new("snare", Percussive),
                InstrumentDefinition::new("hh", Percussive),
                InstrumentDefinition::new("bass", Melodic),
                InstrumentDefinition::new("melody", Melodic),
                InstrumentDefinition::new("pad", Chord),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_default_catalog_layout() {
        let catalog = InstrumentCatalog::default();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get(0).unwrap().name, "kick");
        assert_eq!(catalog.get(3).unwrap().class, InstrumentClass::Melodic);
        assert!(catalog.get(6).is_none());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = InstrumentCatalog::new(vec![
            InstrumentDefinition::new("kick", InstrumentClass::Percussive),
            InstrumentDefinition::new("kick", InstrumentClass::Melodic),
        ]);
        assert!(result.is_err());
        assert!(InstrumentCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_class_json_roundtrip() {
        let json = r#"[{"name":"kick","class":"percussive"},{"name":"pad","class":"Chord"}]"#;
        let defs: Vec<InstrumentDefinition> = serde_json::from_str(json).unwrap();
        assert_eq!(defs[1].class, InstrumentClass::Chord);
        assert_eq!(
            serde_json::to_string(&defs[0]).unwrap(),
            r#"{"name":"kick","class":"percussive"}"#
        );
    }

    #[test]
    fn test_chord_steps_one_unit() {
        let mut record = ActivityRecord::new(5, 0, Instant::now());
        InstrumentClass::Chord.adjust_level(&mut record, 6);
        assert_eq!(record.current_level, 1);
        InstrumentClass::Chord.adjust_level(&mut record, 6);
        assert_eq!(record.current_level, 2);
    }

    #[test]
    fn test_message_arity() {
        let drum = InstrumentClass::Percussive.emit(3, 16, "kick");
        assert_eq!(drum.args, vec![3]);
        let bass = InstrumentClass::Melodic.emit(8, 4, "bass");
        assert_eq!(bass.address, "/instrument/bass");
        assert_eq!(bass.args, vec![8, 4]);
    }
}
