//! Mindless zombie AI: sticky short-sighted targeting with a taste for
//! monster-vs-monster chaos.
//!
//! Zombies ignore factions for aggro: anything living inside their short
//! sight radius is food. The lock holds until the target dies or leaves
//! sight; in melee range there is a 50% chance per turn to switch to any
//! other currently-adjacent living entity.

use crate::ai::{ZombieAi, helpers};
use crate::combat::{AttackOptions, attack_with_tempo};
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::EntityId;

pub(super) fn take_turn(
    ai: &mut ZombieAi,
    actor: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    let Some(entity) = ctx.entities.get(actor) else {
        return Vec::new();
    };
    let Some(own_pos) = entity.position else {
        return Vec::new();
    };
    if ctx.fov.is_visible(own_pos) {
        ai.base.aware_of_player = true;
    }

    let sight = f64::from(ai.sight_radius);

    // Drop the lock when the target died or shambled out of sight.
    if let Some(locked) = ai.locked_target {
        let valid = ctx.entities.get(locked).is_some_and(|e| {
            e.is_alive() && e.position.is_some_and(|p| own_pos.euclidean(p) <= sight)
        });
        if !valid {
            ai.locked_target = None;
        }
    }

    // Acquire: nearest living thing in sight, the zombie has no friends.
    if ai.locked_target.is_none() {
        ai.locked_target = ctx
            .entities
            .iter()
            .filter(|e| e.id != actor && e.is_alive() && !e.has_status("invisibility"))
            .filter_map(|e| {
                let p = e.position?;
                let d = own_pos.euclidean(p);
                (d <= sight).then_some((e.id, d, p))
            })
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap()
                    .then((a.2.y, a.2.x).cmp(&(b.2.y, b.2.x)))
            })
            .map(|(id, ..)| id);
    }

    let Some(mut target) = ai.locked_target else {
        // Nothing smells alive: shamble at random.
        return helpers::random_wander(ctx, actor);
    };

    let adjacent = ctx
        .entities
        .get(target)
        .and_then(|e| e.position)
        .is_some_and(|p| own_pos.chebyshev(p) <= 1);

    // In melee: 50% chance to lunge at some other adjacent living thing.
    if adjacent && ctx.rng.chance(0.5) {
        let others: Vec<EntityId> = ctx
            .entities
            .iter()
            .filter(|e| e.id != actor && e.id != target && e.is_alive())
            .filter(|e| e.position.is_some_and(|p| own_pos.chebyshev(p) <= 1))
            .map(|e| e.id)
            .collect();
        if let Some(idx) = ctx.rng.pick_index(others.len()) {
            target = others[idx];
            ai.locked_target = Some(target);
        }
    }

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
