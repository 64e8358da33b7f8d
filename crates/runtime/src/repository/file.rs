//! File-backed save repository.
//!
//! Saves are bincode blobs written through a temp file and an atomic
//! rename, with a JSON summary sidecar for launchers that want to list
//! slots without deserializing whole worlds.

use std::fs;
use std::path::{Path, PathBuf};

use crate::repository::{SAVE_FORMAT_VERSION, SaveGame, SaveRepository, SaveSummary};
use crate::{Result, RuntimeError};

/// Stores each slot as `{slot}.sav` (bincode) plus `{slot}.json` (summary).
pub struct FileSaveRepository {
    base_dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn save_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{slot}.sav"))
    }

    fn summary_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{slot}.json"))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, save: &SaveGame) -> Result<()> {
        let path = self.save_path(slot);
        let temp_path = path.with_extension("sav.tmp");

        let bytes = bincode::serialize(save)
            .map_err(|e| RuntimeError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        let summary = SaveSummary {
            version: save.version,
            slot: slot.to_string(),
            turn: save.state.turn,
            dungeon_level: save.state.dungeon_level,
        };
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| RuntimeError::Serialization(e.to_string()))?;
        fs::write(self.summary_path(slot), json)?;

        tracing::debug!(
            target: "barrow_runtime::repository",
            slot,
            turn = save.state.turn,
            "saved game to {}",
            path.display()
        );
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<SaveGame>> {
        let path = self.save_path(slot);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let save: SaveGame = bincode::deserialize(&bytes)
            .map_err(|e| RuntimeError::Serialization(e.to_string()))?;

        if save.version < SAVE_FORMAT_VERSION {
            // Legacy snapshot: serde defaults already filled the gaps.
            tracing::warn!(
                target: "barrow_runtime::repository",
                slot,
                found = save.version,
                current = SAVE_FORMAT_VERSION,
                "loading legacy save format"
            );
        } else if save.version > SAVE_FORMAT_VERSION {
            return Err(RuntimeError::Serialization(format!(
                "save format {} is newer than supported {}",
                save.version, SAVE_FORMAT_VERSION
            )));
        }

        tracing::debug!(target: "barrow_runtime::repository", slot, "loaded game");
        Ok(Some(save))
    }

    fn exists(&self, slot: &str) -> bool {
        self.save_path(slot).exists()
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.save_path(slot);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        let summary = self.summary_path(slot);
        if summary.exists() {
            fs::remove_file(&summary)?;
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("sav")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                slots.push(stem.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }
}
