//! In-memory save repository for tests and headless scenarios.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::Result;
use crate::repository::{SaveGame, SaveRepository};

/// Keeps saves in a mutex-guarded map; nothing touches disk.
#[derive(Default)]
pub struct MemorySaveRepository {
    slots: Mutex<BTreeMap<String, SaveGame>>,
}

impl MemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for MemorySaveRepository {
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()> {
        self.slots
            .lock()
            .expect("repository mutex poisoned")
            .insert(slot.to_string(), save.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveGame>> {
        Ok(self
            .slots
            .lock()
            .expect("repository mutex poisoned")
            .get(slot)
            .cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .lock()
            .expect("repository mutex poisoned")
            .contains_key(slot)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        self.slots
            .lock()
            .expect("repository mutex poisoned")
            .remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(self
            .slots
            .lock()
            .expect("repository mutex poisoned")
            .keys()
            .cloned()
            .collect())
    }
}
