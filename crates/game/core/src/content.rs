//! Static content definitions and the registry oracle.
//!
//! Definitions are immutable data loaded once at startup (the content crate
//! parses them from RON); the engine only reads them through
//! [`ContentOracle`]. Factories stamp entities out of definitions; nothing
//! in the world state points back into the registry except by string id.

use std::collections::BTreeSet;

use crate::ai::{AiKind, AiState, NecroProfile};
use crate::combat::{DamageModifiers, DamageType, DiceExpr};
use crate::components::{
    Boss, DialogueBank, EquipProfile, Equipment, Fighter, Inventory, Item, SpeedBonusTracker,
    StatusEffects,
};
use crate::faction::Faction;
use crate::spells::SpellDefinition;
use crate::state::{Color, Entity, EntityId, Position, RenderOrder};

/// Boss block inside a monster definition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BossProfile {
    pub enrage_threshold: f32,
    pub damage_multiplier: f32,
    #[serde(default)]
    pub dialogue: DialogueBank,
}

/// Static monster definition keyed by string id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonsterDefinition {
    pub id: String,
    pub name: String,
    pub glyph: char,
    pub color: Color,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub damage: DiceExpr,
    #[serde(default = "defaults::accuracy")]
    pub accuracy: i32,
    #[serde(default = "defaults::evasion")]
    pub evasion: i32,
    #[serde(default = "defaults::armor_class")]
    pub armor_class: i32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "defaults::faction")]
    pub faction: Faction,
    #[serde(default)]
    pub ai: AiKind,
    #[serde(default)]
    pub speed_bonus_ratio: f64,
    #[serde(default)]
    pub can_seek_items: bool,
    #[serde(default)]
    pub can_use_items: bool,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// AC bonus per 4-adjacent same-faction skeleton ally.
    #[serde(default)]
    pub shieldwall_ac_per_adjacent: i32,
    /// Entity definition spawned on death ("bone_pile").
    #[serde(default)]
    pub death_spawns: Option<String>,
    #[serde(default)]
    pub natural_damage_type: DamageType,
    #[serde(default)]
    pub regeneration_amount: i32,
    /// Raise budget for the corpse this monster leaves.
    #[serde(default = "defaults::max_raises")]
    pub max_raises: u32,
    #[serde(default)]
    pub resistances: DamageModifiers,
    #[serde(default)]
    pub damage_type_modifiers: DamageModifiers,
    #[serde(default)]
    pub status_immunities: BTreeSet<String>,
    #[serde(default)]
    pub necromancer: Option<NecroProfile>,
    #[serde(default)]
    pub boss_profile: Option<BossProfile>,
    #[serde(default = "defaults::inventory_capacity")]
    pub inventory_capacity: usize,
    /// Item-seeking radius for `can_seek_items` monsters.
    #[serde(default = "defaults::seek_distance")]
    pub seek_distance: f64,
}

/// Static item definition keyed by string id.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub glyph: char,
    pub color: Color,
    /// Spell executed when used (scrolls/potions).
    #[serde(default)]
    pub use_spell: Option<String>,
    #[serde(default)]
    pub equip: Option<EquipProfile>,
    #[serde(default)]
    pub key_tag: Option<String>,
    #[serde(default)]
    pub offensive: bool,
    #[serde(default)]
    pub beneficial: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

mod defaults {
    use crate::faction::Faction;

    pub fn accuracy() -> i32 {
        2
    }
    pub fn evasion() -> i32 {
        1
    }
    pub fn armor_class() -> i32 {
        10
    }
    pub fn faction() -> Faction {
        Faction::Neutral
    }
    pub fn max_raises() -> u32 {
        1
    }
    pub fn inventory_capacity() -> usize {
        4
    }
    pub fn seek_distance() -> f64 {
        6.0
    }
}

/// Read-only view over the loaded content registries.
pub trait ContentOracle {
    fn monster(&self, id: &str) -> Option<&MonsterDefinition>;
    fn item(&self, id: &str) -> Option<&ItemDefinition>;
    fn spell(&self, id: &str) -> Option<&SpellDefinition>;
}

/// Stamp a monster entity out of its definition.
pub fn spawn_monster(def: &MonsterDefinition, id: EntityId, position: Position) -> Entity {
    let mut fighter = Fighter::new(def.hp, def.defense, def.power, def.damage);
    fighter.accuracy = def.accuracy;
    fighter.evasion = def.evasion;
    fighter.armor_class = def.armor_class;
    fighter.xp = def.xp;
    fighter.natural_damage_type = def.natural_damage_type;
    fighter.regeneration = def.regeneration_amount;
    fighter.shieldwall_ac_per_adjacent = def.shieldwall_ac_per_adjacent;
    fighter.resistances = def.resistances.clone();
    fighter.damage_type_modifiers = def.damage_type_modifiers.clone();

    let mut ai = AiState::for_kind(def.ai);
    if let Some(profile) = &def.necromancer {
        ai.set_necro_profile(profile.clone());
    }

    let mut entity = Entity::new(id, def.name.clone(), def.glyph, def.color, position)
        .blocking()
        .with_faction(def.faction)
        .with_fighter(fighter)
        .with_ai(ai)
        .with_statuses(StatusEffects::with_immunities(
            def.status_immunities.iter().cloned().collect(),
        ));
    entity.tags = def.tags.clone();
    entity.definition_id = Some(def.id.clone());

    if def.speed_bonus_ratio > 0.0 {
        entity.speed_bonus = Some(SpeedBonusTracker::new(def.speed_bonus_ratio));
    }
    if def.can_seek_items || def.can_use_items {
        entity.inventory = Some(Inventory::new(def.inventory_capacity));
        entity.equipment = Some(Equipment::new());
        if def.can_seek_items {
            entity.tags.insert("can_seek_items".to_string());
        }
        if def.can_use_items {
            entity.tags.insert("can_use_items".to_string());
        }
    }
    if let Some(profile) = &def.boss_profile {
        entity.boss = Some(Boss::new(
            profile.enrage_threshold,
            profile.damage_multiplier,
            profile.dialogue.clone(),
        ));
    }

    entity
}

/// Stamp an item entity out of its definition.
pub fn spawn_item(def: &ItemDefinition, id: EntityId, position: Position) -> Entity {
    let mut item = Item::new(def.id.clone());
    item.use_spell = def.use_spell.clone();
    item.equip = def.equip.clone();
    item.key_tag = def.key_tag.clone();
    item.offensive = def.offensive;
    item.beneficial = def.beneficial;

    let mut entity = Entity::new(id, def.name.clone(), def.glyph, def.color, position)
        .with_render_order(RenderOrder::Item);
    entity.tags = def.tags.clone();
    entity.definition_id = Some(def.id.clone());
    entity.item = Some(item);
    entity
}

/// Stamp a bone-pile entity (skeleton remains, bone-necromancer fuel).
pub fn spawn_bone_pile(id: EntityId, position: Position) -> Entity {
    Entity::new(id, "bone pile", '%', Color::BONE, position)
        .with_render_order(RenderOrder::Item)
        .with_tag("is_bone_pile")
}
