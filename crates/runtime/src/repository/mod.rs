//! Repository contracts for saving and loading complete runs.
//!
//! A save captures the whole `GameState` (entities, floors, message log,
//! RNG mid-stream), so reloading reproduces future behavior byte for byte
//! under the same inputs.

mod file;
mod memory;

pub use file::FileSaveRepository;
pub use memory::MemorySaveRepository;

use barrow_core::GameState;

use crate::Result;

/// Current save format version. Older saves load with defaults for new
/// fields and a logged warning; newer saves are rejected.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// A complete serialized run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub state: GameState,
}

impl SaveGame {
    pub fn new(state: GameState) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            state,
        }
    }
}

/// Human-readable sidecar written next to binary saves.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveSummary {
    pub version: u32,
    pub slot: String,
    pub turn: u64,
    pub dungeon_level: u32,
}

/// Persistence contract for full-run saves.
pub trait SaveRepository {
    /// Save a run under a named slot, replacing any previous save there.
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()>;

    /// Load a slot. `Ok(None)` when the slot is empty.
    fn load(&self, slot: &str) -> Result<Option<SaveGame>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    fn list_slots(&self) -> Result<Vec<String>>;
}
