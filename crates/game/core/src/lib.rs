//! Deterministic core simulation engine for a turn-based tactical
//! roguelike.
//!
//! `barrow-core` defines the canonical rules: entities and their typed
//! components, the status-effect and corpse lifecycles, the two-axis
//! combat resolver, the AI variants, the enemy-phase scheduler, dungeon
//! connectivity, and per-floor persistence. All state mutation flows
//! through [`engine::GameEngine`]; the renderer and input layers see only
//! read-only state plus the `results` records every operation returns.
//! Under a fixed seed, identical input sequences produce identical worlds.

pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod faction;
pub mod floors;
pub mod map;
pub mod messages;
pub mod rng;
pub mod spells;
pub mod state;

pub use ai::{AiKind, AiState, NecroProfile, raise_corpse};
pub use combat::{
    AttackOptions, DamageModifiers, DamageType, DiceExpr, attack_with_tempo, finalize_death,
    hit_chance, resolve_attack,
};
pub use components::{
    AddOutcome, Boss, Corpse, CorpseState, DialogueBank, DialogueMoment, Door, EffectKind,
    EquipProfile, EquipSlot, Equipment, Fighter, Hazard, Inventory, Item, PERMANENT, Portal,
    SpeedBonusTracker, StatusEffect, StatusEffects,
};
pub use config::GameConfig;
pub use content::{
    BossProfile, ContentOracle, ItemDefinition, MonsterDefinition, spawn_bone_pile, spawn_item,
    spawn_monster,
};
pub use engine::{GameEngine, PlayerIntent, ResultEvent, TurnCtx};
pub use error::{EngineError, ErrorSeverity};
pub use faction::{Faction, are_hostile, target_priority};
pub use floors::{FloorState, FloorStateManager, FloorVisitRecord};
pub use map::{FovMap, GameMap, Rect, TileFlags, compute_fov, connect_rooms, line_of_sight};
pub use messages::{Message, MessageLog};
pub use rng::GameRng;
pub use spells::{
    SpellCategory, SpellDefinition, SpellTarget, SpellTargeting, cast_at_nearest_hostile,
    cast_spell,
};
pub use state::{Color, EntitiesState, Entity, EntityId, GameState, GameStatus, Position, RenderOrder};
