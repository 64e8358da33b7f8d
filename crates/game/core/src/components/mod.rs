//! Typed components attached to entities.
//!
//! The component set is closed: each entity carries at most one of each
//! kind, stored as typed optional slots on [`crate::state::Entity`] and
//! queried through accessors rather than dynamic lookup.

mod boss;
mod corpse;
mod door;
mod fighter;
mod hazard;
mod inventory;
mod portal;
mod speed;
mod status;

pub use boss::{Boss, DialogueBank, DialogueMoment};
pub use corpse::{Corpse, CorpseState};
pub use door::Door;
pub use fighter::Fighter;
pub use hazard::Hazard;
pub use inventory::{EquipProfile, EquipSlot, Equipment, Inventory, Item};
pub use portal::Portal;
pub use speed::SpeedBonusTracker;
pub use status::{
    AddOutcome, EffectKind, PERMANENT, StatusEffect, StatusEffects, TurnEndOutcome,
    TurnStartOutcome,
};
