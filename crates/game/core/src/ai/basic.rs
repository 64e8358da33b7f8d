//! Basic monster AI: the chase-and-attack baseline every other hostile
//! variant builds on.

use crate::ai::{BasicAi, helpers, items};
use crate::combat::{AttackOptions, attack_with_tempo};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId};

pub(super) fn take_turn(
    ai: &mut BasicAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if !prelude(ai, actor, ctx) {
        return Vec::new();
    }
    act(ai, actor, target, ctx)
}

/// Shared aggro/awareness gate. Returns false when the actor idles.
///
/// Acts iff a taunt is in play, the actor is latched into combat, or the
/// player can see it.
pub(super) fn prelude(ai: &mut BasicAi, actor: EntityId, ctx: &TurnCtx<'_>) -> bool {
    let Some(entity) = ctx.entities.get(actor) else {
        return false;
    };
    let Some(pos) = entity.position else {
        return false;
    };

    let visible = ctx.fov.is_visible(pos);
    if visible {
        ai.aware_of_player = true;
    }

    let taunt_active = ctx
        .entities
        .iter()
        .any(|e| e.is_alive() && e.has_status("taunted"));

    taunt_active || ai.in_combat || visible
}

/// The decision body, shared with variants that fall back to basic
/// behavior after their specials fail to fire.
pub(super) fn act(
    ai: &mut BasicAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    // Re-check hard stops for direct invocations outside the scheduler.
    if let Some(entity) = ctx.entities.get(actor) {
        if entity.has_status("paralysis") {
            return vec![ResultEvent::message(
                format!("{} is paralyzed!", entity.name),
                Color::VIOLET,
            )];
        }
        if entity.has_status("fear") {
            return flee(actor, target, ctx);
        }
    }

    let Some(target) = helpers::effective_target(ctx, actor, target) else {
        return Vec::new();
    };

    // Opportunistic item usage.
    if let Some(results) = items::try_use_item(ctx, actor, target) {
        return results;
    }

    // Opportunistic item seeking, until first blood.
    if !ai.in_combat
        && let Some(results) = items::try_item_seeking(ctx, actor, EntityId::PLAYER)
    {
        return results;
    }

    let (Some(own_pos), Some(target_pos)) = (
        ctx.entities.get(actor).and_then(|e| e.position),
        ctx.entities.get(target).and_then(|e| e.position),
    ) else {
        return Vec::new();
    };

    let distance = own_pos.chebyshev(target_pos);
    let reach = helpers::weapon_reach(ctx, actor);

    if distance > reach {
        // Out of reach: close in, unless stuck in glue.
        if let Some(struggle) = helpers::immobilized(ctx, actor) {
            return vec![struggle];
        }
        return helpers::move_toward(ctx, actor, target_pos);
    }

    attack_with_tempo(ctx, actor, target, AttackOptions::MONSTER)
}

/// Fear: run from the threat instead of deciding anything.
pub(super) fn flee(actor: EntityId, threat: EntityId, ctx: &mut TurnCtx<'_>) -> Vec<ResultEvent> {
    let name = ctx
        .entities
        .get(actor)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    let Some(threat_pos) = ctx.entities.get(threat).and_then(|e| e.position) else {
        return Vec::new();
    };
    if helpers::immobilized(ctx, actor).is_some() {
        return vec![ResultEvent::message(
            format!("{name} cowers, rooted in place!"),
            Color::VIOLET,
        )];
    }
    let mut results = vec![ResultEvent::message(
        format!("{name} flees in terror!"),
        Color::VIOLET,
    )];
    results.extend(helpers::flee_from(ctx, actor, threat_pos));
    results
}
