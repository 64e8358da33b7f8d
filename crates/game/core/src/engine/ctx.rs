//! Split-borrow view over the game state handed to AI and spell code.

use crate::config::GameConfig;
use crate::content::ContentOracle;
use crate::map::{FovMap, GameMap};
use crate::rng::GameRng;
use crate::state::{EntitiesState, EntityId, Position};

/// Mutable working context for one actor's turn or one spell resolution.
///
/// The engine constructs this by splitting `GameState` borrows; AI variants
/// and the spell executor never see the whole state, which keeps hook
/// reentrancy impossible by construction.
pub struct TurnCtx<'a> {
    pub entities: &'a mut EntitiesState,
    pub map: &'a GameMap,
    /// The player's FOV for this turn, the default visibility proxy.
    pub fov: &'a FovMap,
    pub rng: &'a mut GameRng,
    pub config: &'a GameConfig,
    pub content: &'a dyn ContentOracle,
    /// Current global turn number.
    pub turn: u64,
    next_entity_id: &'a mut u32,
}

impl<'a> TurnCtx<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entities: &'a mut EntitiesState,
        map: &'a GameMap,
        fov: &'a FovMap,
        rng: &'a mut GameRng,
        config: &'a GameConfig,
        content: &'a dyn ContentOracle,
        turn: u64,
        next_entity_id: &'a mut u32,
    ) -> Self {
        Self {
            entities,
            map,
            fov,
            rng,
            config,
            content,
            turn,
            next_entity_id,
        }
    }

    /// Allocate a fresh entity id.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(*self.next_entity_id);
        *self.next_entity_id += 1;
        id
    }

    /// Whether a tile is enterable: inside the map, not a wall, and not
    /// occupied by a blocking entity or a blocking door.
    pub fn walkable(&self, position: Position) -> bool {
        self.map.in_bounds(position)
            && !self.map.is_blocked(position)
            && !self.entities.tile_blocked_by_entity(position)
    }
}
