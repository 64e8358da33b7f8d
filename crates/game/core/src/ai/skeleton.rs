//! Skeleton AI: basic combat plus shield-wall formation movement.
//!
//! Skeletons gain AC per 4-adjacent skeleton ally, so before combat range
//! they prefer steps that keep or grow their adjacency count while still
//! approaching the target. Candidate steps are scored as
//! `10 * adjacent_allies - manhattan_to_target`, and the formation step is
//! only taken when it beats plain pathfinding on adjacency.

use crate::ai::{SkeletonAi, basic, helpers};
use crate::combat::{AttackOptions, attack_with_tempo};
use crate::engine::{ResultEvent, TurnCtx};
use crate::faction::Faction;
use crate::state::{EntityId, Position};

pub(super) fn take_turn(
    ai: &mut SkeletonAi,
    actor: EntityId,
    target: EntityId,
    ctx: &mut TurnCtx<'_>,
) -> Vec<ResultEvent> {
    if !basic::prelude(&mut ai.base, actor, ctx) {
        return Vec::new();
    }
    if let Some(entity) = ctx.entities.get(actor) {
        if entity.has_status("paralysis") {
            return vec![ResultEvent::message(
                format!("{} is paralyzed!", entity.name),
                crate::state::Color::VIOLET,
            )];
        }
        if entity.has_status("fear") {
            return basic::flee(actor, target, ctx);
        }
    }

    let Some(target) = helpers::effective_target(ctx, actor, target) else {
        return Vec::new();
    };
    let (Some(own_pos), Some(target_pos)) = (
        ctx.entities.get(actor).and_then(|e| e.position),
        ctx.entities.get(target).and_then(|e| e.position),
    ) else {
        return Vec::new();
    };

    let reach = helpers::weapon_reach(ctx, actor);
    if own_pos.chebyshev(target_pos) <= reach {
        return attack_with_tempo(ctx, actor, target, AttackOptions::MONSTER);
    }

    if let Some(struggle) = helpers::immobilized(ctx, actor) {
        return vec![struggle];
    }

    // Formation step: keep the wall together while closing in.
    let current_allies = adjacent_allies(ctx, actor, own_pos);
    let mut best: Option<(i32, Position)> = None;
    for step in own_pos.neighbors8() {
        if !ctx.walkable(step) {
            continue;
        }
        let allies = adjacent_allies(ctx, actor, step);
        let score = 10 * allies - step.manhattan(target_pos);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, step));
        }
    }

    if let Some((_, step)) = best {
        let step_allies = adjacent_allies(ctx, actor, step);
        let approaches = step.manhattan(target_pos) < own_pos.manhattan(target_pos);
        // Override pathfinding only when formation improves, or holds while
        // still approaching.
        if step_allies > current_allies || (step_allies == current_allies && approaches) {
            return helpers::move_entity(ctx, actor, step);
        }
    }

    helpers::move_toward(ctx, actor, target_pos)
}

/// Count living skeleton allies on the four orthogonal neighbors of `p`.
fn adjacent_allies(ctx: &TurnCtx<'_>, actor: EntityId, p: Position) -> i32 {
    p.neighbors4()
        .iter()
        .filter(|&&n| {
            ctx.entities.iter().any(|e| {
                e.id != actor
                    && e.position == Some(n)
                    && e.faction == Faction::Undead
                    && e.is_alive()
                    && e.ai.as_ref().is_some_and(|ai| ai.is_skeleton())
            })
        })
        .count() as i32
}
