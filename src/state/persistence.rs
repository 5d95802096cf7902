use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::document::SchematicError;
use crate::element::PlacedComponent;
use crate::util::time;
use crate::viewport::Viewport;

/// Format version written into every snapshot
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur during state persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize scene: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid saved scene: {0}")]
    InvalidState(#[from] SchematicError),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A single-slot string store: browser local storage, eframe storage, or memory
pub trait SlotStorage {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&mut self, key: &str, value: String);
    /// Makes previous writes durable
    fn flush(&mut self) {}
}

impl SlotStorage for dyn eframe::Storage + '_ {
    fn get_string(&self, key: &str) -> Option<String> {
        eframe::Storage::get_string(self, key)
    }

    fn set_string(&mut self, key: &str, value: String) {
        eframe::Storage::set_string(self, key, value);
    }

    fn flush(&mut self) {
        eframe::Storage::flush(self);
    }
}

/// Volatile storage, used in tests and when eframe has no storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.slots.insert(key.to_owned(), value);
    }
}

/// The whole scene as written to the storage slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: u32,
    /// Seconds since the UNIX epoch
    pub timestamp: u64,
    pub viewport: Viewport,
    /// Bottom to top
    pub components: Vec<PlacedComponent>,
}

impl SceneSnapshot {
    pub fn new(components: Vec<PlacedComponent>, viewport: Viewport) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            timestamp: time::timestamp_secs(),
            viewport,
            components,
        }
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                snapshot.version, SNAPSHOT_VERSION
            );
        }
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Rejects a viewport or component the editor could never have produced
    pub fn validate(&self) -> Result<(), SchematicError> {
        if !self.viewport.is_valid() {
            return Err(SchematicError::InvalidViewport {
                scale: self.viewport.scale,
                offset: self.viewport.offset,
            });
        }
        for comp in &self.components {
            comp.validate()
                .map_err(|reason| SchematicError::InvalidComponent { id: comp.id(), reason })?;
        }
        Ok(())
    }
}

/// What a load found in the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { components: usize },
    /// Nothing was ever saved; the scene is unchanged
    NothingSaved,
}

/// Writes `snapshot` to `key`, replacing what was there
pub fn save_snapshot(
    storage: &mut (impl SlotStorage + ?Sized),
    key: &str,
    snapshot: &SceneSnapshot,
) -> PersistenceResult<()> {
    let json = snapshot.to_json()?;
    storage.set_string(key, json);
    storage.flush();
    Ok(())
}

/// Reads the snapshot in `key`, if any
pub fn load_snapshot(
    storage: &(impl SlotStorage + ?Sized),
    key: &str,
) -> PersistenceResult<Option<SceneSnapshot>> {
    storage
        .get_string(key)
        .map(|json| SceneSnapshot::from_json(&json))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ComponentKind;
    use egui::{Pos2, Vec2};

    #[test]
    fn test_missing_slot_is_none() {
        let storage = MemoryStorage::new();
        assert!(load_snapshot(&storage, "wellSchematic").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_slot() {
        let mut storage = MemoryStorage::new();
        let first = SceneSnapshot::new(
            vec![PlacedComponent::new(ComponentKind::Rig, Pos2::ZERO)],
            Viewport::default(),
        );
        let second = SceneSnapshot::new(Vec::new(), Viewport::new(2.0, Vec2::new(1.0, 1.0)));

        save_snapshot(&mut storage, "slot", &first).unwrap();
        save_snapshot(&mut storage, "slot", &second).unwrap();

        let loaded = load_snapshot(&storage, "slot").unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[test]
    fn test_unusable_viewport_is_rejected() {
        let json = SceneSnapshot::new(Vec::new(), Viewport::new(0.0, Vec2::ZERO))
            .to_json()
            .unwrap();
        assert!(matches!(
            SceneSnapshot::from_json(&json),
            Err(PersistenceError::InvalidState(SchematicError::InvalidViewport { .. }))
        ));
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set_string("slot", "{ not json".to_owned());
        assert!(matches!(
            load_snapshot(&storage, "slot"),
            Err(PersistenceError::SerializationError(_))
        ));
    }
}
