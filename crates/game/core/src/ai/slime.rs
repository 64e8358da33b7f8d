//! Slime AI: distance-based vision and faction-priority target selection.
//!
//! Slimes sense by proximity rather than sight, which lets them act
//! off-screen and brawl with other monsters through the hostile-all
//! faction matrix.

use crate::ai::{SlimeAi, helpers};
use crate::combat::{AttackOptions, attack_with_tempo};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::EntityId;

pub(super) fn take_turn(
    ai: &mut SlimeAi,
    actor: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let Some(own_pos) = ctx.entities.get(actor).and_then(|e| e.position) else {
        return Vec::new();
    };
    if ctx.fov.is_visible(own_pos) {
        ai.base.aware_of_player = true;
    }

    let Some(target) =
        helpers::nearest_hostile(ctx, actor, helpers::Vision::Radius(ai.vision_radius))
    else {
        return Vec::new();
    };
    let Some(target_pos) = ctx.entities.get(target).and_then(|e| e.position) else {
        return Vec::new();
    };

    if own_pos.chebyshev(target_pos) <= 1 {
        return attack_with_tempo(ctx, actor, target, AttackOptions::MONSTER);
    }
    if let Some(struggle) = helpers::immobilized(ctx, actor) {
        return vec![struggle];
    }
    helpers::move_toward(ctx, actor, target_pos)
}
