//! Data-driven content definitions and loaders.
//!
//! This crate houses the static game content and the loaders that parse it
//! from data files:
//! - Monster catalog (RON)
//! - Item catalog (RON)
//! - Spell catalog (RON)
//! - Engine configuration (TOML)
//!
//! Content is consumed by the engine through `barrow_core::ContentOracle`
//! and never appears in game state; the world refers back to it only by
//! string id. All loaders use barrow-core types directly with serde.

mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::ContentRegistry;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ItemLoader, MonsterLoader, SpellLoader};
