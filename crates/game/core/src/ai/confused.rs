//! Confused monster: wraps a previous AI and staggers at random until the
//! confusion runs out.

use crate::ai::{ConfusedAi, helpers};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId};

pub(super) enum Outcome {
    Acted(Vec<ResultEvent>),
    /// The wrapper should restore the previous AI.
    Recovered(Vec<ResultEvent>),
}

pub(super) fn take_turn(ai: &mut ConfusedAi, actor: EntityId, ctx: &mut TurnCtx<'_>) -> Outcome {
    if ai.turns_remaining <= 0 {
        let name = ctx
            .entities
            .get(actor)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        return Outcome::Recovered(vec![ResultEvent::message(
            format!("{name} is no longer confused!"),
            Color::RED,
        )]);
    }

    ai.turns_remaining -= 1;
    let mut results = helpers::random_wander(ctx, actor);
    if results.is_empty()
        && let Some(entity) = ctx.entities.get(actor)
    {
        results.push(ResultEvent::message(
            format!("{} stumbles about in confusion.", entity.name),
            Color::VIOLET,
        ));
    }
    Outcome::Acted(results)
}
