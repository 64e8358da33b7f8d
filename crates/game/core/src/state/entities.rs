//! Aggregate container for every entity on the active floor.

use crate::state::{Entity, EntityId, Position};

/// All entities currently simulated, in insertion order.
///
/// Lookup is by stable id; iteration order for the scheduler is sorted by
/// id so a phase visits actors deterministically regardless of spawn
/// history.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntitiesState {
    entities: Vec<Entity>,
}

impl EntitiesState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Entity) {
        debug_assert!(
            self.get(entity.id).is_none(),
            "duplicate entity id {}",
            entity.id
        );
        self.entities.push(entity);
    }

    /// Remove an entity from the active list, returning it.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Returns the player entity.
    ///
    /// # Panics
    ///
    /// Panics if the player is missing; its presence is a state invariant.
    pub fn player(&self) -> &Entity {
        self.get(EntityId::PLAYER)
            .expect("player must exist in EntitiesState")
    }

    /// Returns the player entity mutably.
    ///
    /// # Panics
    ///
    /// Panics if the player is missing; its presence is a state invariant.
    pub fn player_mut(&mut self) -> &mut Entity {
        self.get_mut(EntityId::PLAYER)
            .expect("player must exist in EntitiesState")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids in ascending order; the scheduler's stable iteration order.
    pub fn ids_sorted(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    /// The blocking entity standing on a tile, if any.
    pub fn blocking_at(&self, position: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.blocks && e.position == Some(position))
    }

    /// All entities on a tile, in id order.
    pub fn at(&self, position: Position) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|e| e.position == Some(position))
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Whether a tile can be stepped onto (map walkable is checked by the
    /// caller; this only consults entities, including closed doors).
    pub fn tile_blocked_by_entity(&self, position: Position) -> bool {
        self.entities.iter().any(|e| {
            e.position == Some(position)
                && (e.blocks || e.door.as_ref().is_some_and(|d| d.blocks_movement()))
        })
    }

    /// Split borrow: a mutable reference to `a` and a shared one to `b`.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &Entity)> {
        assert_ne!(a, b, "pair_mut requires distinct entities");
        let a_idx = self.entities.iter().position(|e| e.id == a)?;
        let b_idx = self.entities.iter().position(|e| e.id == b)?;
        if a_idx < b_idx {
            let (left, right) = self.entities.split_at_mut(b_idx);
            Some((&mut left[a_idx], &right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(a_idx);
            Some((&mut right[0], &left[b_idx]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Color;

    fn entity(id: u32, pos: Position) -> Entity {
        Entity::new(EntityId(id), format!("e{id}"), 'x', Color::WHITE, pos)
    }

    #[test]
    fn lookup_and_removal() {
        let mut es = EntitiesState::new();
        es.push(entity(0, Position::new(1, 1)));
        es.push(entity(5, Position::new(2, 2)));
        assert!(es.get(EntityId(5)).is_some());
        let removed = es.remove(EntityId(5)).unwrap();
        assert_eq!(removed.id, EntityId(5));
        assert!(es.get(EntityId(5)).is_none());
    }

    #[test]
    fn ids_sorted_is_stable_order() {
        let mut es = EntitiesState::new();
        es.push(entity(7, Position::ORIGIN));
        es.push(entity(0, Position::ORIGIN));
        es.push(entity(3, Position::ORIGIN));
        assert_eq!(es.ids_sorted(), vec![EntityId(0), EntityId(3), EntityId(7)]);
    }

    #[test]
    fn blocking_lookup_ignores_nonblockers() {
        let mut es = EntitiesState::new();
        let p = Position::new(4, 4);
        es.push(entity(1, p));
        assert!(es.blocking_at(p).is_none());
        es.push(entity(2, p).blocking());
        assert_eq!(es.blocking_at(p).unwrap().id, EntityId(2));
    }

    #[test]
    fn pair_mut_splits_borrows_both_ways() {
        let mut es = EntitiesState::new();
        es.push(entity(1, Position::ORIGIN));
        es.push(entity(2, Position::ORIGIN));
        {
            let (a, b) = es.pair_mut(EntityId(1), EntityId(2)).unwrap();
            a.name = "first".into();
            assert_eq!(b.id, EntityId(2));
        }
        let (a, b) = es.pair_mut(EntityId(2), EntityId(1)).unwrap();
        a.name = "second".into();
        assert_eq!(b.name, "first");
    }
}
