//! Per-floor state persistence across level transitions.
//!
//! Leaving a floor snapshots every entity (except the traveling player);
//! returning rebuilds the floor from the snapshot, subject to the
//! despawn-far rule and the anti-farming respawn caps. Door state is
//! additionally tracked by position so regenerated geometry can restore it.

use std::collections::BTreeMap;

use crate::components::Door;
use crate::config::FloorConfig;
use crate::map::GameMap;
use crate::state::{EntitiesState, Entity, EntityId, Position};

/// Visit bookkeeping for one floor.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FloorVisitRecord {
    /// 1 on the first visit, incremented on each return.
    pub visit_number: u32,
    pub last_visited_turn: u64,
    /// Respawns granted per entity type on the current visit.
    pub spawned_count: BTreeMap<String, u32>,
}

impl Default for FloorVisitRecord {
    fn default() -> Self {
        Self {
            visit_number: 1,
            last_visited_turn: 0,
            spawned_count: BTreeMap::new(),
        }
    }
}

/// Persistent state for a single floor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloorState {
    pub level_number: u32,
    /// Tile geometry as it stood on departure.
    pub map: Option<GameMap>,
    /// Entity snapshots taken on departure (player excluded).
    pub entities: Vec<Entity>,
    /// Door state keyed by position.
    pub door_states: BTreeMap<Position, Door>,
    pub visited: bool,
    pub visit_record: FloorVisitRecord,
    /// Where the player most recently arrived on this floor.
    pub stairs_entry_point: Option<Position>,
    /// Per-type spawn counts on first generation, the respawn-cap baseline.
    pub original_spawn_counts: BTreeMap<String, u32>,
}

/// Manages saved floor states across stairs transitions.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FloorStateManager {
    floors: BTreeMap<u32, FloorState>,
}

impl FloorStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_visited(&self, level: u32) -> bool {
        self.floors.get(&level).is_some_and(|f| f.visited)
    }

    pub fn floor(&self, level: u32) -> Option<&FloorState> {
        self.floors.get(&level)
    }

    /// Snapshot a floor before leaving it.
    ///
    /// The player is not snapshotted; they travel with the stairs. Door
    /// states are additionally keyed by position.
    pub fn save_floor_state(
        &mut self,
        level: u32,
        entities: &EntitiesState,
        map: &GameMap,
        stairs_entry: Option<Position>,
        turn: u64,
    ) {
        let snapshots: Vec<Entity> = entities
            .iter()
            .filter(|e| e.id != EntityId::PLAYER)
            .cloned()
            .collect();

        let mut door_states = BTreeMap::new();
        for entity in &snapshots {
            if let (Some(pos), Some(door)) = (entity.position, entity.door.as_ref()) {
                door_states.insert(pos, door.clone());
            }
        }

        let mut original_spawn_counts = BTreeMap::new();
        for entity in &snapshots {
            if entity.fighter.is_some()
                && let Some(id) = entity.definition_id.as_deref()
            {
                *original_spawn_counts.entry(id.to_string()).or_insert(0) += 1;
            }
        }

        let state = self.floors.entry(level).or_insert_with(|| FloorState {
            level_number: level,
            map: None,
            entities: Vec::new(),
            door_states: BTreeMap::new(),
            visited: false,
            visit_record: FloorVisitRecord::default(),
            stairs_entry_point: None,
            original_spawn_counts: BTreeMap::new(),
        });

        tracing::info!(
            target: "barrow_core::floors",
            level,
            entities = snapshots.len(),
            "saving floor state"
        );

        state.visited = true;
        state.map = Some(map.clone());
        state.entities = snapshots;
        state.door_states = door_states;
        state.stairs_entry_point = stairs_entry;
        state.visit_record.last_visited_turn = turn;
        if state.original_spawn_counts.is_empty() {
            state.original_spawn_counts = original_spawn_counts;
        }
    }

    /// Rebuild a previously visited floor's entity set.
    ///
    /// Increments the visit number, applies the despawn-far rule against
    /// the saved entry point, restores door state by position, and resets
    /// the per-visit respawn tally. Returns `None` for unvisited floors.
    pub fn load_floor_state(&mut self, level: u32, config: &FloorConfig) -> Option<Vec<Entity>> {
        let state = self.floors.get_mut(&level)?;
        if !state.visited {
            return None;
        }

        state.visit_record.visit_number += 1;
        state.visit_record.spawned_count.clear();

        let mut rebuilt: Vec<Entity> = Vec::new();
        let mut despawned = 0usize;
        for entity in &state.entities {
            if !keep_on_reentry(entity, state.stairs_entry_point, config.despawn_radius) {
                despawned += 1;
                continue;
            }
            let mut entity = entity.clone();
            // Door state restores by position, surviving map regeneration.
            if let Some(pos) = entity.position
                && let Some(door) = entity.door.as_mut()
                && let Some(saved) = state.door_states.get(&pos)
            {
                *door = saved.clone();
            }
            rebuilt.push(entity);
        }

        tracing::info!(
            target: "barrow_core::floors",
            level,
            visit = state.visit_record.visit_number,
            restored = rebuilt.len(),
            despawned,
            "loading floor state"
        );

        Some(rebuilt)
    }

    /// Whether another respawn of `entity_type` is allowed on this visit.
    ///
    /// First visits are uncapped. Later visits allow at most
    /// `ceil(original_count * respawn_cap)` per type.
    pub fn allow_respawn(&self, level: u32, entity_type: &str, config: &FloorConfig) -> bool {
        let Some(state) = self.floors.get(&level) else {
            return true;
        };
        if state.visit_record.visit_number <= 1 {
            return true;
        }
        let original = state
            .original_spawn_counts
            .get(entity_type)
            .copied()
            .unwrap_or(0);
        let cap = ((f64::from(original)) * config.respawn_cap).ceil() as u32;
        let spawned = state
            .visit_record
            .spawned_count
            .get(entity_type)
            .copied()
            .unwrap_or(0);
        spawned < cap
    }

    /// Record a granted respawn.
    pub fn register_respawn(&mut self, level: u32, entity_type: &str) {
        if let Some(state) = self.floors.get_mut(&level) {
            *state
                .visit_record
                .spawned_count
                .entry(entity_type.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Deny upward traversal of more than `restrict_return_levels` levels.
    /// Zero disables the restriction; descending is always allowed.
    pub fn can_return_to_level(current: u32, target: u32, restrict_return_levels: u32) -> bool {
        if target >= current {
            return true;
        }
        let levels_back = current - target;
        if restrict_return_levels > 0 && levels_back > restrict_return_levels {
            tracing::warn!(
                target: "barrow_core::floors",
                levels_back,
                max = restrict_return_levels,
                "blocked upward stairs"
            );
            return false;
        }
        true
    }
}

/// Despawn-far rule: fighters beyond the Manhattan radius from the stairs
/// entry are dropped, unless tagged special. Items, doors, portals, and
/// corpses always survive.
fn keep_on_reentry(entity: &Entity, entry: Option<Position>, despawn_radius: i32) -> bool {
    if entity.has_tag("is_special") || entity.fighter.is_none() {
        return true;
    }
    let (Some(entry), Some(pos)) = (entry, entity.position) else {
        return true;
    };
    pos.manhattan(entry) <= despawn_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DiceExpr;
    use crate::components::Fighter;
    use crate::state::Color;

    fn monster(id: u32, pos: Position, def: &str) -> Entity {
        let mut e = Entity::new(EntityId(id), def, 'm', Color::WHITE, pos)
            .blocking()
            .with_fighter(Fighter::new(10, 0, 2, DiceExpr::new(1, 6)));
        e.definition_id = Some(def.to_string());
        e
    }

    fn test_map() -> GameMap {
        GameMap::new(10, 10, 1)
    }

    fn world(entities: Vec<Entity>) -> EntitiesState {
        let mut es = EntitiesState::new();
        es.push(Entity::new(EntityId::PLAYER, "player", '@', Color::WHITE, Position::ORIGIN));
        for e in entities {
            es.push(e);
        }
        es
    }

    #[test]
    fn round_trip_preserves_entities() {
        let mut manager = FloorStateManager::new();
        let config = FloorConfig::default();
        let entities = world(vec![
            monster(1, Position::new(3, 3), "orc"),
            monster(2, Position::new(5, 5), "orc"),
        ]);

        manager.save_floor_state(1, &entities, &test_map(), Some(Position::new(4, 4)), 10);
        let rebuilt = manager.load_floor_state(1, &config).unwrap();
        assert_eq!(rebuilt.len(), 2);
        // Player never snapshots.
        assert!(rebuilt.iter().all(|e| e.id != EntityId::PLAYER));
    }

    #[test]
    fn despawn_far_drops_distant_fighters_only() {
        let mut manager = FloorStateManager::new();
        let config = FloorConfig::default();
        let mut far_item = Entity::new(
            EntityId(3),
            "sword",
            '/',
            Color::WHITE,
            Position::new(90, 90),
        );
        far_item.item = Some(crate::components::Item::new("sword"));
        let entities = world(vec![
            monster(1, Position::new(4, 4), "orc"),
            monster(2, Position::new(80, 80), "orc"),
            far_item,
        ]);

        manager.save_floor_state(1, &entities, &test_map(), Some(Position::new(4, 4)), 0);
        let rebuilt = manager.load_floor_state(1, &config).unwrap();
        let names: Vec<&str> = rebuilt.iter().map(|e| e.name.as_str()).collect();
        // Near monster and far item survive; far monster despawns.
        assert_eq!(rebuilt.len(), 2);
        assert!(names.contains(&"sword"));
    }

    #[test]
    fn special_fighters_survive_despawn() {
        let mut manager = FloorStateManager::new();
        let config = FloorConfig::default();
        let keeper = monster(1, Position::new(99, 99), "shopkeeper").with_tag("is_special");
        let entities = world(vec![keeper]);
        manager.save_floor_state(1, &entities, &test_map(), Some(Position::ORIGIN), 0);
        let rebuilt = manager.load_floor_state(1, &config).unwrap();
        assert_eq!(rebuilt.len(), 1);
    }

    #[test]
    fn respawn_cap_kicks_in_on_second_visit() {
        let mut manager = FloorStateManager::new();
        let config = FloorConfig::default();
        let entities = world(vec![
            monster(1, Position::new(1, 1), "orc"),
            monster(2, Position::new(2, 2), "orc"),
            monster(3, Position::new(3, 3), "orc"),
            monster(4, Position::new(4, 4), "orc"),
        ]);

        manager.save_floor_state(1, &entities, &test_map(), None, 0);
        // First visit: uncapped.
        assert!(manager.allow_respawn(1, "orc", &config));

        manager.load_floor_state(1, &config).unwrap();
        // Second visit: ceil(4 * 0.5) = 2 respawns allowed.
        assert!(manager.allow_respawn(1, "orc", &config));
        manager.register_respawn(1, "orc");
        assert!(manager.allow_respawn(1, "orc", &config));
        manager.register_respawn(1, "orc");
        assert!(!manager.allow_respawn(1, "orc", &config));
        // Types never seen originally are capped out entirely.
        assert!(!manager.allow_respawn(1, "troll", &config));
    }

    #[test]
    fn stairs_restriction_binds_upward_only() {
        assert!(FloorStateManager::can_return_to_level(3, 5, 2));
        assert!(FloorStateManager::can_return_to_level(5, 3, 2));
        assert!(!FloorStateManager::can_return_to_level(5, 2, 2));
        assert!(FloorStateManager::can_return_to_level(5, 1, 0));
    }
}
