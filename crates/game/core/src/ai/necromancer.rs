//! Necromancer family: config-driven corpse economies.
//!
//! All variants share one turn shape: tick the cooldown, execute the
//! profile action when a valid target is in range, otherwise seek a target
//! while respecting the danger radius from the player, otherwise retreat,
//! otherwise fall back to basic behavior. The subclasses differ only in
//! what counts as a target and what the action does.

use crate::ai::{NecroAction, NecromancerAi, basic, helpers};
use crate::combat::{apply_damage, apply_modifier, finalize_death};
use crate::content::spawn_monster;
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::{Color, EntityId, Position};

pub(super) fn take_turn(
    ai: &mut NecromancerAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if ai.cooldown_remaining > 0 {
        ai.cooldown_remaining -= 1;
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

    let Some(player_target) = helpers::effective_target(ctx, actor, target) else {
        return Vec::new();
    };
    let (Some(own_pos), Some(player_pos)) = (
        ctx.entities.get(actor).and_then(|e| e.position),
        ctx.entities.get(player_target).and_then(|e| e.position),
    ) else {
        return Vec::new();
    };

    // 1. Off cooldown with a target in range: act.
    if ai.cooldown_remaining == 0
        && let Some(action_target) = find_action_target(ai, ctx, own_pos, ai.profile.action_range)
    {
        let results = execute_action(ai, actor, action_target, ctx);
        if !results.is_empty() {
            ai.cooldown_remaining = ai.profile.action_cooldown_turns;
            return results;
        }
    }

    // 2. A target exists beyond reach: take a safe approach step toward it.
    if let Some(action_target) = find_action_target(ai, ctx, own_pos, i32::MAX)
        && let Some(goal) = ctx.entities.get(action_target).and_then(|e| e.position)
    {
        if own_pos.euclidean(goal) > f64::from(ai.profile.action_range)
            && let Some(results) = safe_approach(ai, actor, goal, player_pos, ctx)
        {
            return results;
        }
        // In range but on cooldown: hold near the fuel.
        if ai.cooldown_remaining > 0 {
            return hang_back(ai, actor, own_pos, player_pos, ctx);
        }
    }

    // 3. No fuel anywhere: keep the preferred distance band to the player.
    hang_back(ai, actor, own_pos, player_pos, ctx)
}

/// Maintain the preferred distance band: retreat when pressed, hold inside
/// the band, close in (as basic AI) when the player is far.
fn hang_back(
    ai: &mut NecromancerAi,
    actor: EntityId,
    own_pos: Position,
    player_pos: Position,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let distance = own_pos.euclidean(player_pos);
    if distance <= ai.profile.danger_radius || distance < f64::from(ai.profile.preferred_distance_min)
    {
        if let Some(results) = retreat(actor, player_pos, ctx) {
            return results;
        }
        // Cornered: fight like any other monster.
        return basic::act(&mut ai.base, actor, EntityId::PLAYER, ctx);
    }
    if distance <= f64::from(ai.profile.preferred_distance_max) {
        return Vec::new();
    }
    basic::act(&mut ai.base, actor, EntityId::PLAYER, ctx)
}

/// Locate the nearest valid action target for this variant within `range`.
fn find_action_target(
    ai: &NecromancerAi,
    ctx: &TurnCtx<'_>,
    own_pos: Position,
    range: i32,
) -> Option<EntityId> {
    let in_range = |p: Position| {
        range == i32::MAX || own_pos.euclidean(p) <= f64::from(range)
    };
    ctx.entities
        .iter()
        .filter(|e| {
            let Some(p) = e.position else {
                return false;
            };
            if !in_range(p) {
                return false;
            }
            match ai.action {
                NecroAction::PlagueRaise => e.corpse.as_ref().is_some_and(|c| c.can_raise()),
                NecroAction::BoneRaise => e.has_tag("is_bone_pile"),
                NecroAction::Explode => e.corpse.as_ref().is_some_and(|c| c.can_explode()),
            }
        })
        .filter_map(|e| e.position.map(|p| (e.id, own_pos.euclidean(p))))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
        .map(|(id, _)| id)
}

fn execute_action(
    ai: &mut NecromancerAi,
    actor: EntityId,
    action_target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    match ai.action {
        NecroAction::PlagueRaise => plague_raise(ai, actor, action_target, ctx),
        NecroAction::BoneRaise => bone_raise(ai, actor, action_target, ctx),
        NecroAction::Explode => explode(ai, actor, action_target, ctx),
    }
}

fn plague_raise(
    ai: &mut NecromancerAi,
    actor: EntityId,
    corpse: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let monster_id = ai
        .profile
        .summon_monster_id
        .clone()
        .unwrap_or_else(|| "zombie".to_string());

    ai.metrics.raise_attempts += 1;
    let (mut results, minion) = raise_corpse(ctx, corpse, actor, &monster_id);
    let Some(minion) = minion else {
        return results;
    };
    ai.metrics.raise_successes += 1;
    *ai.metrics.minion_types.entry(monster_id).or_insert(0) += 1;

    // Post-modify: the risen carry the plague.
    if let Some(entity) = ctx.entities.get_mut(minion) {
        entity.tags.insert("plague_carrier".to_string());
        entity.tags.insert("plague_attack".to_string());
        results.push(ResultEvent::message(
            format!("{} shudders upright, reeking of plague!", entity.name),
            Color::SICKLY_GREEN,
        ));
    }
    results
}

fn bone_raise(
    ai: &mut NecromancerAi,
    actor: EntityId,
    pile: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let Some(pos) = ctx.entities.get(pile).and_then(|e| e.position) else {
        return results;
    };
    if ctx.entities.blocking_at(pos).is_some() {
        return results;
    }
    let monster_id = ai
        .profile
        .summon_monster_id
        .clone()
        .unwrap_or_else(|| "bone_thrall".to_string());
    let Some(def) = ctx.content.monster(&monster_id).cloned() else {
        tracing::warn!(target: "barrow_core::ai", monster = %monster_id, "unknown thrall id");
        return results;
    };
    let spawner_faction = ctx
        .entities
        .get(actor)
        .map(|e| e.faction)
        .unwrap_or(crate::faction::Faction::Undead);

    ai.metrics.raise_attempts += 1;

    // The pile is consumed into the thrall.
    ctx.entities.remove(pile);
    let id = ctx.allocate_id();
    let mut minion = spawn_monster(&def, id, pos);
    minion.faction = spawner_faction;
    minion.tags.insert("raised_minion".to_string());
    let name = minion.name.clone();
    ctx.entities.push(minion);

    ai.metrics.raise_successes += 1;
    *ai.metrics.minion_types.entry(monster_id).or_insert(0) += 1;

    results.push(ResultEvent::message(
        format!("Bones clatter together into a {name}!"),
        Color::BONE,
    ));
    results.push(ResultEvent::Spawned(id));
    results
}

fn explode(
    ai: &mut NecromancerAi,
    actor: EntityId,
    corpse: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let Some(pos) = ctx.entities.get(corpse).and_then(|e| e.position) else {
        return results;
    };

    // Deterministic damage: reproducible across runs for the same tile.
    let span = (ai.profile.explosion_damage_max - ai.profile.explosion_damage_min + 1).max(1);
    let amount = ai.profile.explosion_damage_min + (pos.x * 1000 + pos.y).rem_euclid(span);
    let kind = ai.profile.explosion_damage_type;
    let radius = f64::from(ai.profile.explosion_radius);

    if let Some(entity) = ctx.entities.get_mut(corpse)
        && let Some(c) = entity.corpse.as_mut()
    {
        c.mark_consumed();
    }

    results.push(ResultEvent::message(
        "The corpse detonates in a burst of necrotic energy!",
        Color::SICKLY_GREEN,
    ));
    ai.metrics.explosions += 1;

    let victims: Vec<EntityId> = ctx
        .entities
        .iter()
        .filter(|e| e.id != corpse && e.fighter.is_some() && e.is_alive())
        .filter(|e| e.position.is_some_and(|p| p.euclidean(pos) <= radius))
        .map(|e| e.id)
        .collect();

    for victim in victims {
        let (name, dealt, hp) = {
            let Some(entity) = ctx.entities.get_mut(victim) else {
                continue;
            };
            let name = entity.name.clone();
            let Some(fighter) = entity.fighter.as_mut() else {
                continue;
            };
            let dealt = apply_modifier(amount, kind, &fighter.resistances);
            let hp = apply_damage(fighter, dealt);
            (name, dealt, hp)
        };
        crate::combat::mark_attacked(ctx, victim);
        results.push(ResultEvent::message(
            format!("{name} is scorched for {dealt} damage!"),
            Color::ORANGE,
        ));
        results.push(ResultEvent::Damage {
            target: victim,
            amount: dealt,
            kind,
        });
        if hp <= 0 {
            results.extend(finalize_death(ctx, victim, Some(actor)));
        }
    }

    // The spent fuel is gone.
    ctx.entities.remove(corpse);
    results.push(ResultEvent::Consumed(true));
    results
}

/// Shared raise-dead pipeline, used by necromancers, the lich, and the
/// player's raise scroll alike.
///
/// Fails (with a message and `Consumed(false)`) when the corpse is not
/// raisable or its tile is blocked. On success the corpse entity leaves the
/// world and the minion joins it, acting from the next enemy phase.
pub fn raise_corpse(
    ctx: &mut TurnCtx<'_>,
    corpse: EntityId,
    spawner: EntityId,
    monster_id: &str,
) -> (Vec<ResultEvent>, Option<EntityId>) {
    let mut results = Vec::new();

    let Some(corpse_entity) = ctx.entities.get(corpse) else {
        return (results, None);
    };
    let Some(pos) = corpse_entity.position else {
        return (results, None);
    };
    let raisable = corpse_entity.corpse.as_ref().is_some_and(|c| c.can_raise());
    if !raisable || ctx.entities.blocking_at(pos).is_some() {
        results.push(ResultEvent::message(
            "The corpse refuses to stir.",
            Color::GREY,
        ));
        results.push(ResultEvent::Consumed(false));
        return (results, None);
    }
    let lineage = corpse_entity
        .corpse
        .as_ref()
        .map(|c| c.corpse_id.clone())
        .unwrap_or_default();

    let Some(def) = ctx.content.monster(monster_id).cloned() else {
        tracing::warn!(target: "barrow_core::ai", monster = %monster_id, "unknown raise target id");
        results.push(ResultEvent::message(
            "The corpse refuses to stir.",
            Color::GREY,
        ));
        results.push(ResultEvent::Consumed(false));
        return (results, None);
    };
    let spawner_faction = ctx
        .entities
        .get(spawner)
        .map(|e| e.faction)
        .unwrap_or(crate::faction::Faction::Undead);

    if let Some(entity) = ctx.entities.get_mut(corpse)
        && let Some(c) = entity.corpse.as_mut()
    {
        c.record_raise();
    }

    tracing::debug!(
        target: "barrow_core::ai",
        corpse = %lineage,
        minion = %monster_id,
        "raising corpse"
    );

    // The corpse is consumed into the minion.
    ctx.entities.remove(corpse);
    let id = ctx.allocate_id();
    let mut minion = spawn_monster(&def, id, pos);
    minion.faction = spawner_faction;
    minion.tags.insert("raised_minion".to_string());
    let name = minion.name.clone();
    ctx.entities.push(minion);

    results.push(ResultEvent::message(
        format!("A {name} claws its way out of the corpse!"),
        Color::VIOLET,
    ));
    results.push(ResultEvent::Spawned(id));
    results.push(ResultEvent::Consumed(true));
    (results, Some(id))
}

/// A cardinal/ordinal step toward `goal` whose landing tile stays strictly
/// outside the danger radius from the player.
fn safe_approach(
    ai: &mut NecromancerAi,
    actor: EntityId,
    goal: Position,
    player_pos: Position,
    ctx: &mut TurnCtx<'_>,
) -> Option<Vec<ResultEvent>> {
    let own_pos = ctx.entities.get(actor).and_then(|e| e.position)?;
    if own_pos == goal {
        return None;
    }
    if helpers::immobilized(ctx, actor).is_some() {
        return None;
    }
    let (dx, dy) = own_pos.step_toward(goal);
    for (sx, sy) in [(dx, dy), (dx, 0), (0, dy)] {
        if (sx, sy) == (0, 0) {
            continue;
        }
        let to = own_pos.offset(sx, sy);
        if ctx.walkable(to) && to.euclidean(player_pos) > ai.profile.danger_radius {
            ai.metrics.seek_moves += 1;
            return Some(helpers::move_entity(ctx, actor, to));
        }
    }
    ai.metrics.unsafe_move_blocks += 1;
    None
}

/// One step directly away from the player.
fn retreat(actor: EntityId, player_pos: Position, ctx: &mut TurnCtx<'_>) -> Option<Vec<ResultEvent>> {
    let own_pos = ctx.entities.get(actor).and_then(|e| e.position)?;
    if helpers::immobilized(ctx, actor).is_some() {
        return None;
    }
    let (dx, dy) = player_pos.step_toward(own_pos);
    for (sx, sy) in [(dx, dy), (dx, 0), (0, dy)] {
        if (sx, sy) == (0, 0) {
            continue;
        }
        let to = own_pos.offset(sx, sy);
        if ctx.walkable(to) {
            return Some(helpers::move_entity(ctx, actor, to));
        }
    }
    None
}
