//! Game session: content + config + the single mutable world.
//!
//! The session is what a frontend holds. It feeds player intents through
//! the engine (player action, then the enemy phase), intercepts stairs
//! intents to run floor transitions, and exposes the spawn helpers tests
//! and scenario drivers use to populate floors.

use barrow_content::ContentRegistry;
use barrow_core::{
    Color, ContentOracle, DiceExpr, Entity, EntityId, Fighter, FloorStateManager, GameConfig,
    GameEngine, GameState, GameStatus, Message, PlayerIntent, Position, RenderOrder, ResultEvent,
    SpeedBonusTracker, StatusEffects, spawn_item, spawn_monster,
};

use crate::worldgen::{door_entity, generate_floor};
use crate::{Result, RuntimeError};

/// Default floor dimensions.
const FLOOR_WIDTH: i32 = 60;
const FLOOR_HEIGHT: i32 = 40;
const MAX_ROOMS: usize = 8;

/// A running game: world state plus the static registries that stamp it.
pub struct GameSession {
    pub state: GameState,
    pub content: ContentRegistry,
    pub config: GameConfig,
}

impl GameSession {
    /// Start a new run on a generated first floor.
    pub fn new_game(seed: u64, content: ContentRegistry, config: GameConfig) -> Self {
        let mut rng = barrow_core::GameRng::seeded(seed);
        let plan = generate_floor(1, FLOOR_WIDTH, FLOOR_HEIGHT, MAX_ROOMS, &config, &mut rng);

        let mut state = GameState::new(seed, plan.map);
        // Continue the stream the generator consumed.
        state.rng = rng;
        state.stairs_entry = plan.entry;

        let player_id = state.allocate_id();
        debug_assert_eq!(player_id, EntityId::PLAYER);
        state.entities.push(player_entity(player_id, plan.entry));

        for (pos, door) in plan.doors {
            let id = state.allocate_id();
            state.entities.push(door_entity(id, pos, door));
        }

        state.log.push(Message::new(
            "You descend into the barrow. The air is cold and still.",
            Color::CYAN,
        ));

        Self {
            state,
            content,
            config,
        }
    }

    pub fn player(&self) -> &Entity {
        self.state.entities.player()
    }

    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::PlayerDead
    }

    /// Spawn a monster from the registry.
    pub fn spawn_monster_at(&mut self, monster_id: &str, position: Position) -> Result<EntityId> {
        let def = self
            .content
            .monster(monster_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownContent(monster_id.to_string()))?;
        let id = self.state.allocate_id();
        self.state.entities.push(spawn_monster(&def, id, position));
        Ok(id)
    }

    /// Spawn an item from the registry.
    pub fn spawn_item_at(&mut self, item_id: &str, position: Position) -> Result<EntityId> {
        let def = self
            .content
            .item(item_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownContent(item_id.to_string()))?;
        let id = self.state.allocate_id();
        self.state.entities.push(spawn_item(&def, id, position));
        Ok(id)
    }

    /// Respawn a monster on a revisited floor, honoring the anti-farming
    /// cap. Returns `None` when the cap (or the tile) refuses.
    pub fn try_respawn(&mut self, monster_id: &str, position: Position) -> Result<Option<EntityId>> {
        let level = self.state.dungeon_level;
        if !self
            .state
            .floors
            .allow_respawn(level, monster_id, &self.config.floors)
        {
            tracing::debug!(
                target: "barrow_runtime::session",
                monster = monster_id,
                level,
                "respawn capped"
            );
            return Ok(None);
        }
        if self.state.entities.blocking_at(position).is_some() {
            return Ok(None);
        }
        let id = self.spawn_monster_at(monster_id, position)?;
        self.state.floors.register_respawn(level, monster_id);
        Ok(Some(id))
    }

    /// Resolve one player intent: the player acts, then the enemy phase
    /// runs. Stairs intents become floor transitions instead.
    pub fn handle(&mut self, intent: PlayerIntent) -> Result<Vec<ResultEvent>> {
        match intent {
            PlayerIntent::Descend => self.change_floor(self.state.dungeon_level + 1),
            PlayerIntent::Ascend => {
                let current = self.state.dungeon_level;
                let target = current
                    .checked_sub(1)
                    .filter(|&t| t >= 1)
                    .ok_or(RuntimeError::StairsDenied("already on the first floor"))?;
                self.change_floor(target)
            }
            other => {
                if self.is_over() {
                    return Ok(Vec::new());
                }
                let mut results = {
                    let mut engine =
                        GameEngine::new(&mut self.state, &self.content, &self.config);
                    let fov = engine.compute_player_fov();
                    engine.player_action(other, &fov)
                };
                if self.state.status == GameStatus::Playing {
                    let mut engine =
                        GameEngine::new(&mut self.state, &self.content, &self.config);
                    let fov = engine.compute_player_fov();
                    results.extend(engine.enemy_phase(&fov));
                }
                Ok(results)
            }
        }
    }

    /// Stairs transition: snapshot the current floor, then build or
    /// restore the destination and move the player onto it.
    fn change_floor(&mut self, target: u32) -> Result<Vec<ResultEvent>> {
        let current = self.state.dungeon_level;
        if target < current
            && !FloorStateManager::can_return_to_level(
                current,
                target,
                self.config.floors.restrict_return_levels,
            )
        {
            return Err(RuntimeError::StairsDenied(
                "the way back has collapsed behind you",
            ));
        }

        // Snapshot the floor being left.
        let entry = self.state.stairs_entry;
        self.state.floors.save_floor_state(
            current,
            &self.state.entities,
            &self.state.map,
            Some(entry),
            self.state.turn,
        );

        // Strip everything but the player.
        let ids: Vec<EntityId> = self
            .state
            .entities
            .ids_sorted()
            .into_iter()
            .filter(|&id| id != EntityId::PLAYER)
            .collect();
        for id in ids {
            self.state.entities.remove(id);
        }

        let mut results = Vec::new();
        if self.state.floors.has_visited(target) {
            // Restore: saved geometry plus the filtered entity set.
            let rebuilt = self
                .state
                .floors
                .load_floor_state(target, &self.config.floors)
                .unwrap_or_default();
            if let Some(map) = self
                .state
                .floors
                .floor(target)
                .and_then(|f| f.map.clone())
            {
                self.state.map = map;
            }
            let entry = self
                .state
                .floors
                .floor(target)
                .and_then(|f| f.stairs_entry_point)
                .unwrap_or_default();
            for entity in rebuilt {
                self.state.entities.push(entity);
            }
            self.state.entities.player_mut().position = Some(entry);
            self.state.stairs_entry = entry;
        } else {
            // Fresh floor.
            let plan = generate_floor(
                target,
                FLOOR_WIDTH,
                FLOOR_HEIGHT,
                MAX_ROOMS,
                &self.config,
                &mut self.state.rng,
            );
            self.state.map = plan.map;
            for (pos, door) in plan.doors {
                let id = self.state.allocate_id();
                self.state.entities.push(door_entity(id, pos, door));
            }
            self.state.entities.player_mut().position = Some(plan.entry);
            self.state.stairs_entry = plan.entry;
        }

        self.state.dungeon_level = target;
        let text = if target > current {
            format!("You descend to level {target}.")
        } else {
            format!("You climb back up to level {target}.")
        };
        let message = Message::new(text, Color::CYAN);
        self.state.log.push(message.clone());
        results.push(ResultEvent::Message(message));
        Ok(results)
    }
}

/// The player entity: a capable fighter with pockets and a momentum
/// tracker.
fn player_entity(id: EntityId, position: Position) -> Entity {
    let mut fighter = Fighter::new(30, 2, 5, DiceExpr::new(1, 6));
    fighter.accuracy = 2;
    fighter.evasion = 1;
    fighter.armor_class = 12;
    let mut entity = Entity::new(id, "Player", '@', Color::WHITE, position)
        .blocking()
        .with_faction(barrow_core::Faction::Player)
        .with_fighter(fighter)
        .with_statuses(StatusEffects::new());
    entity.render_order = RenderOrder::Actor;
    entity.inventory = Some(barrow_core::Inventory::new(16));
    entity.equipment = Some(barrow_core::Equipment::new());
    entity.speed_bonus = Some(SpeedBonusTracker::new(0.25));
    entity
}
