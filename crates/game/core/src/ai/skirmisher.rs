//! Skirmisher: anti-kiting pressure via the pouncing leap and fast
//! pressure follow-up attacks.

use crate::ai::{SkirmisherAi, basic, helpers};
use crate::combat::{AttackOptions, attack_with_tempo, resolve_attack};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId};

/// Leap window in Chebyshev distance.
const LEAP_MIN: i32 = 3;
const LEAP_MAX: i32 = 6;
const LEAP_COOLDOWN: u32 = 3;

pub(super) fn take_turn(
    ai: &mut SkirmisherAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if ai.leap_cooldown_remaining > 0 {
        ai.leap_cooldown_remaining -= 1;
    }

    if !basic::prelude(&mut ai.base, actor, ctx) {
        return Vec::new();
    }
    if let Some(entity) = ctx.entities.get(actor) {
        if entity.has_status("paralysis") {
            return vec![ResultEvent::message(
                format!("{} is paralyzed!", entity.name),
                Color::VIOLET,
            )];
        }
        if entity.has_status("fear") {
            return basic::flee(actor, target, ctx);
        }
    }

    let Some(target) = helpers::effective_target(ctx, actor, target) else {
        return Vec::new();
    };

    // Pouncing leap: close the gap in one bound.
    if let Some(results) = try_pouncing_leap(ai, actor, target, ctx) {
        return results;
    }

    let (Some(own_pos), Some(target_pos)) = (
        ctx.entities.get(actor).and_then(|e| e.position),
        ctx.entities.get(target).and_then(|e| e.position),
    ) else {
        return Vec::new();
    };
    let reach = helpers::weapon_reach(ctx, actor);

    if own_pos.chebyshev(target_pos) > reach {
        if let Some(struggle) = helpers::immobilized(ctx, actor) {
            return vec![struggle];
        }
        return helpers::move_toward(ctx, actor, target_pos);
    }

    // Adjacent: main attack, then the fast-pressure follow-up on top of any
    // ratchet bonus.
    let mut results = attack_with_tempo(ctx, actor, target, AttackOptions::MONSTER);
    let target_alive = ctx.entities.get(target).is_some_and(|e| e.is_alive());
    if target_alive && ctx.rng.chance(ctx.config.combat.fast_pressure_chance) {
        let name = ctx
            .entities
            .get(actor)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        results.push(ResultEvent::message(
            format!("{name} presses the attack!"),
            Color::ORANGE,
        ));
        results.extend(resolve_attack(ctx, actor, target, AttackOptions::MONSTER));
    }
    results
}

/// Two quick steps straight toward the player, stopping early on blockage.
/// Entanglement (glue) grounds the leap; success starts the cooldown.
fn try_pouncing_leap(
    ai: &mut SkirmisherAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Option<Vec<ResultEvent>> {
    if ai.leap_cooldown_remaining > 0 {
        return None;
    }
    let entity = ctx.entities.get(actor)?;
    let own_pos = entity.position?;
    if entity.has_status("glue") {
        return None;
    }
    if !ctx.fov.is_visible(own_pos) {
        return None;
    }
    let target_pos = ctx.entities.get(target).and_then(|e| e.position)?;
    let distance = own_pos.chebyshev(target_pos);
    if !(LEAP_MIN..=LEAP_MAX).contains(&distance) {
        return None;
    }

    let mut results = Vec::new();
    let mut moved = false;
    for _ in 0..2 {
        let current = ctx.entities.get(actor).and_then(|e| e.position)?;
        let (dx, dy) = current.step_toward(target_pos);
        if (dx, dy) == (0, 0) {
            break;
        }
        match helpers::try_step(ctx, actor, dx, dy) {
            Some(step_results) => {
                moved = true;
                results.extend(step_results);
            }
            None => break,
        }
    }

    if !moved {
        return None;
    }
    ai.leap_cooldown_remaining = LEAP_COOLDOWN;
    let name = ctx
        .entities
        .get(actor)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    results.insert(
        0,
        ResultEvent::message(format!("{name} leaps forward!"), Color::ORANGE),
    );
    Some(results)
}
