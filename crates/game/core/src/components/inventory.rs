//! Items, inventories, and equipment slots.
//!
//! Items are entities; an item is in exactly one of: the world (has a
//! position), an inventory (position cleared), or an equipment slot
//! (removed from the inventory list so it cannot be double-dropped on
//! death).

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::state::EntityId;

/// Equipment slots.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Feet,
}

/// How an item behaves when worn or wielded.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EquipProfile {
    pub slot: EquipSlot,
    pub power_bonus: i32,
    pub defense_bonus: i32,
    pub max_hp_bonus: i32,
    /// Melee reach granted while wielded (main hand only matters).
    pub reach: i32,
}

impl EquipProfile {
    pub fn weapon(power_bonus: i32) -> Self {
        Self {
            slot: EquipSlot::MainHand,
            power_bonus,
            defense_bonus: 0,
            max_hp_bonus: 0,
            reach: 1,
        }
    }

    pub fn armor(slot: EquipSlot, defense_bonus: i32) -> Self {
        Self {
            slot,
            power_bonus: 0,
            defense_bonus,
            max_hp_bonus: 0,
            reach: 0,
        }
    }
}

/// Item component attached to item entities.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Content-registry id of the item definition.
    pub definition_id: String,
    /// Spell executed when the item is used (scrolls, potions).
    pub use_spell: Option<String>,
    /// Present when the item can be equipped.
    pub equip: Option<EquipProfile>,
    /// Present when the item opens matching locks.
    pub key_tag: Option<String>,
    /// Offensive items are preferred by monsters when the player is close.
    pub offensive: bool,
    /// Beneficial items retarget to the player on a wrong-target misfire.
    pub beneficial: bool,
}

impl Item {
    pub fn new(definition_id: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            use_spell: None,
            equip: None,
            key_tag: None,
            offensive: false,
            beneficial: false,
        }
    }
}

/// Ordered item list with a capacity.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Inventory {
    pub items: Vec<EntityId>,
    pub capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains(&id)
    }

    /// Add an item id; returns false when full.
    pub fn add(&mut self, id: EntityId) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(id);
        true
    }

    /// Remove an item id; returns true if it was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|&i| i != id);
        self.items.len() != before
    }
}

/// Slot map from equipment slot to the equipped item entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Equipment {
    pub slots: BTreeMap<EquipSlot, EntityId>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<EntityId> {
        self.slots.get(&slot).copied()
    }

    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Equip an item into a slot, returning the previously equipped item.
    pub fn equip(&mut self, slot: EquipSlot, item: EntityId) -> Option<EntityId> {
        self.slots.insert(slot, item)
    }

    /// Remove the item from a slot.
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<EntityId> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, EntityId)> + '_ {
        self.slots.iter().map(|(&s, &e)| (s, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_respects_capacity() {
        let mut inv = Inventory::new(2);
        assert!(inv.add(EntityId(1)));
        assert!(inv.add(EntityId(2)));
        assert!(!inv.add(EntityId(3)));
        assert!(inv.remove(EntityId(1)));
        assert!(inv.add(EntityId(3)));
    }

    #[test]
    fn equip_returns_displaced_item() {
        let mut eq = Equipment::new();
        assert_eq!(eq.equip(EquipSlot::MainHand, EntityId(4)), None);
        assert_eq!(eq.equip(EquipSlot::MainHand, EntityId(5)), Some(EntityId(4)));
        assert_eq!(eq.unequip(EquipSlot::MainHand), Some(EntityId(5)));
        assert!(eq.is_empty(EquipSlot::MainHand));
    }
}
