//! Session orchestration and persistence for the barrow engine.
//!
//! The runtime is the layer between the pure core and the outside world:
//! it owns a [`GameSession`] (state + content + config), drives player
//! intents through the engine's player-action/enemy-phase cycle, handles
//! stairs transitions through the floor-state manager, and saves/loads
//! complete world snapshots through repository traits. Everything runs
//! synchronously on the calling thread.

mod error;
pub mod repository;
mod session;
mod worldgen;

pub use error::RuntimeError;
pub use repository::{
    FileSaveRepository, MemorySaveRepository, SAVE_FORMAT_VERSION, SaveGame, SaveRepository,
    SaveSummary,
};
pub use session::GameSession;
pub use worldgen::{FloorPlan, door_entity, generate_floor};

/// Runtime-wide result alias.
pub type Result<T> = std::result::Result<T, RuntimeError>;
