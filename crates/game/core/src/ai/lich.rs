//! Lich: arch-necromancer with the two-turn Soul Bolt telegraph.
//!
//! Turn one applies the charging status and announces the channel; turn two
//! fires for a fraction of the target's max HP, unless line of sight or
//! range broke, in which case the charge cancels with no cooldown. The
//! lich's passives (Command the Dead, Death Siphon) are consumed by the
//! combat resolver and death finalizer, not here.

use crate::ai::{LichAi, necromancer};
use crate::combat::{apply_damage, finalize_death};
use crate::components::{EffectKind, PERMANENT, StatusEffect};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId};

pub(super) fn take_turn(
    ai: &mut LichAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if ai.soul_bolt_cooldown_remaining > 0 {
        ai.soul_bolt_cooldown_remaining -= 1;
    }

    let is_charging = ctx
        .entities
        .get(actor)
        .is_some_and(|e| e.has_status("charging_soul_bolt"));

    if is_charging {
        return resolve_or_cancel(ai, actor, target, ctx);
    }

    if ai.soul_bolt_cooldown_remaining == 0 && target_in_bolt_window(ai, actor, target, ctx) {
        return start_charge(actor, ctx);
    }

    // Otherwise run the raise economy.
    necromancer::take_turn(&mut ai.necro, actor, target, ctx)
}

/// Range plus line-of-sight window for the Soul Bolt. The player's FOV is
/// the symmetric visibility proxy: if the player can see the lich, the
/// lich can draw its bead.
fn target_in_bolt_window(
    ai: &LichAi,
    actor: EntityId,
    target: EntityId,
    ctx: &TurnCtx<'_>,
) -> bool {
    let (Some(own_pos), Some(target_pos)) = (
        ctx.entities.get(actor).and_then(|e| e.position),
        ctx.entities.get(target).and_then(|e| e.position),
    ) else {
        return false;
    };
    own_pos.euclidean(target_pos) <= f64::from(ai.soul_bolt_range) && ctx.fov.is_visible(own_pos)
}

fn start_charge(actor: EntityId, ctx: &mut TurnCtx<'_>) -> Vec<ResultEvent> {
    let Some(entity) = ctx.entities.get_mut(actor) else {
        return Vec::new();
    };
    let name = entity.name.clone();
    entity
        .statuses
        .get_or_insert_default()
        .add(StatusEffect::new(EffectKind::ChargingSoulBolt, PERMANENT));
    vec![ResultEvent::message(
        format!("{name} begins channelling dark energy!"),
        Color::VIOLET,
    )]
}

fn resolve_or_cancel(
    ai: &mut LichAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();

    if !target_in_bolt_window(ai, actor, target, ctx) {
        // Window broke during the charge: cancel, no cooldown.
        if let Some(entity) = ctx.entities.get_mut(actor) {
            let name = entity.name.clone();
            if let Some(statuses) = entity.statuses.as_mut() {
                statuses.remove("charging_soul_bolt");
            }
            results.push(ResultEvent::message(
                format!("The dark energy around {name} gutters out."),
                Color::GREY,
            ));
        }
        return results;
    }

    let lich_name = ctx
        .entities
        .get(actor)
        .map(|e| e.name.clone())
        .unwrap_or_default();

    let (target_name, base_damage, warded) = {
        let Some(entity) = ctx.entities.get(target) else {
            return results;
        };
        let Some(fighter) = entity.fighter.as_ref() else {
            return results;
        };
        let base = (ctx.config.combat.soul_bolt_pct * f64::from(fighter.max_hp)).ceil() as i32;
        (entity.name.clone(), base, entity.has_status("soul_ward"))
    };

    let upfront = if warded {
        results.push(ResultEvent::message(
            format!("{lich_name} unleashes a Soul Bolt!"),
            Color::VIOLET,
        ));
        results.push(ResultEvent::message(
            "The Soul Ward absorbs most of the blast!",
            Color::CYAN,
        ));
        (f64::from(base_damage) * (1.0 - ctx.config.combat.soul_ward_reduction)).ceil() as i32
    } else {
        results.push(ResultEvent::message(
            format!("{lich_name} unleashes a devastating Soul Bolt!"),
            Color::VIOLET,
        ));
        base_damage
    };

    let hp = {
        let entity = ctx.entities.get_mut(target).expect("target exists");
        let fighter = entity.fighter.as_mut().expect("target fighter exists");
        apply_damage(fighter, upfront)
    };
    results.push(ResultEvent::message(
        format!("{target_name} takes {upfront} soul damage!"),
        Color::RED,
    ));
    results.push(ResultEvent::Damage {
        target,
        amount: upfront,
        kind: crate::combat::DamageType::Necrotic,
    });

    // The prevented portion smolders on as Soul Burn.
    if warded && hp > 0 {
        let prevented = base_damage - upfront;
        if prevented > 0 {
            let per_turn = (prevented + 2) / 3;
            if let Some(entity) = ctx.entities.get_mut(target) {
                entity
                    .statuses
                    .get_or_insert_default()
                    .add(StatusEffect::new(EffectKind::SoulBurn { per_turn }, 3));
                results.push(ResultEvent::message(
                    format!("{target_name}'s soul smolders!"),
                    Color::VIOLET,
                ));
            }
        }
    }

    if hp <= 0 {
        results.extend(finalize_death(ctx, target, Some(actor)));
    }

    if let Some(entity) = ctx.entities.get_mut(actor)
        && let Some(statuses) = entity.statuses.as_mut()
    {
        statuses.remove("charging_soul_bolt");
    }
    ai.soul_bolt_cooldown_remaining = ai.soul_bolt_cooldown_turns;

    results
}
