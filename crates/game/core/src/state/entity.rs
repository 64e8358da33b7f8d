//! Entity: stable identity plus a typed component record.
//!
//! The entity is the unit of ownership; destroying it destroys its
//! components. The component set is closed, one slot per kind, queried
//! directly rather than through dynamic type lookup. Entities are created
//! by content factories and mutated only through engine operations.

use std::collections::BTreeSet;

use crate::ai::AiState;
use crate::components::{
    Boss, Corpse, Door, Equipment, Fighter, Hazard, Inventory, Item, Portal, SpeedBonusTracker,
    StatusEffects,
};
use crate::faction::Faction;
use crate::state::{Color, EntityId, Position, RenderOrder};

/// A world object: actor, corpse, item, door, portal, or hazard tile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub glyph: char,
    pub color: Color,
    /// Grid position; `None` while held in an inventory or equipment slot.
    pub position: Option<Position>,
    /// Collides with other blockers when true.
    pub blocks: bool,
    pub render_order: RenderOrder,
    pub faction: Faction,
    /// Free-form definition tags ("is_bone_pile", "is_special", ...).
    pub tags: BTreeSet<String>,
    /// Content-registry id this entity was stamped from, when it was.
    pub definition_id: Option<String>,

    // ---- typed component slots (at most one of each kind) ----
    pub fighter: Option<Fighter>,
    pub ai: Option<AiState>,
    pub inventory: Option<Inventory>,
    pub equipment: Option<Equipment>,
    pub statuses: Option<StatusEffects>,
    pub corpse: Option<Corpse>,
    pub door: Option<Door>,
    pub portal: Option<Portal>,
    pub boss: Option<Boss>,
    pub speed_bonus: Option<SpeedBonusTracker>,
    pub item: Option<Item>,
    pub hazard: Option<Hazard>,
}

impl Entity {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        glyph: char,
        color: Color,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            glyph,
            color,
            position: Some(position),
            blocks: false,
            render_order: RenderOrder::Actor,
            faction: Faction::Neutral,
            tags: BTreeSet::new(),
            definition_id: None,
            fighter: None,
            ai: None,
            inventory: None,
            equipment: None,
            statuses: None,
            corpse: None,
            door: None,
            portal: None,
            boss: None,
            speed_bonus: None,
            item: None,
            hazard: None,
        }
    }

    // ---- builder helpers used by factories ----

    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_render_order(mut self, order: RenderOrder) -> Self {
        self.render_order = order;
        self
    }

    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self
    }

    pub fn with_ai(mut self, ai: AiState) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_statuses(mut self, statuses: StatusEffects) -> Self {
        self.statuses = Some(statuses);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    // ---- queries ----

    pub fn pos(&self) -> Option<Position> {
        self.position
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().is_some_and(Fighter::is_alive)
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.statuses.as_ref().is_some_and(|s| s.has(name))
    }

    /// Chebyshev distance to another placed entity, if both are placed.
    pub fn distance_to(&self, other: &Entity) -> Option<i32> {
        Some(self.position?.chebyshev(other.position?))
    }

    /// Melee reach: main-hand weapon reach when wielded, otherwise 1.
    ///
    /// Needs the entities list to resolve the wielded item.
    pub fn weapon_reach(&self, lookup: impl Fn(EntityId) -> Option<i32>) -> i32 {
        self.equipment
            .as_ref()
            .and_then(|eq| eq.get(crate::components::EquipSlot::MainHand))
            .and_then(&lookup)
            .filter(|&r| r > 0)
            .unwrap_or(1)
    }
}
