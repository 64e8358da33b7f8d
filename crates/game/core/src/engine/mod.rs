//! Turn orchestration and action execution.
//!
//! [`GameEngine`] is the authoritative mutator for `GameState`: the player
//! action processor and the enemy-phase scheduler both live on it, and all
//! state changes flow through the `results` records they return. The
//! renderer and input layer only ever see those records plus read-only
//! state.

mod ctx;
mod player;
mod results;
mod turns;

pub use ctx::TurnCtx;
pub use player::PlayerIntent;
pub use results::{ResultEvent, contains_death, messages};

use crate::config::GameConfig;
use crate::content::ContentOracle;
use crate::map::{FovMap, compute_fov};
use crate::state::{GameState, GameStatus};

/// Game engine borrowing the single mutable world.
pub struct GameEngine<'a> {
    pub(crate) state: &'a mut GameState,
    pub(crate) content: &'a dyn ContentOracle,
    pub(crate) config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    pub fn new(
        state: &'a mut GameState,
        content: &'a dyn ContentOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            state,
            content,
            config,
        }
    }

    /// Compute the player's FOV for this turn, marking explored tiles.
    pub fn compute_player_fov(&mut self) -> FovMap {
        let origin = self
            .state
            .entities
            .player()
            .position
            .unwrap_or_default();
        compute_fov(&mut self.state.map, origin, self.config.fov_radius)
    }

    /// Append all message records to the log, in order, and update the
    /// game-over flag when a death notice names the player.
    pub(crate) fn publish(&mut self, results: &[ResultEvent]) {
        for record in results {
            match record {
                ResultEvent::Message(message) => self.state.log.push(message.clone()),
                ResultEvent::Dead(id) if id.is_player() => {
                    self.state.status = GameStatus::PlayerDead;
                }
                _ => {}
            }
        }
    }

    /// Split-borrow working context for AI and spell code.
    pub(crate) fn turn_ctx<'b>(&'b mut self, fov: &'b FovMap) -> TurnCtx<'b> {
        let GameState {
            entities,
            map,
            rng,
            turn,
            next_entity_id,
            ..
        } = self.state;
        TurnCtx::new(
            entities,
            map,
            fov,
            rng,
            self.config,
            self.content,
            *turn,
            next_entity_id,
        )
    }
}
