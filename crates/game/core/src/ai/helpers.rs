//! Shared AI behavior: targeting prelude, movement, pathfinding, portals.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::engine::{ResultEvent, TurnCtx};
use crate::faction::{are_hostile, target_priority};
use crate::state::{Color, EntityId, Position};

/// How a variant perceives the world when scanning for targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vision {
    /// The player's FOV, the shared visibility proxy.
    PlayerFov,
    /// Own distance-based senses (slime, zombie).
    Radius(i32),
}

/// The shared targeting prelude: taunt override, enrage override, then the
/// scheduler default, with an invisibility fallback at the end.
pub fn effective_target(
    ctx: &TurnCtx<'_>,
    actor: EntityId,
    default_target: EntityId,
) -> Option<EntityId> {
    let actor_entity = ctx.entities.get(actor)?;

    // Taunt: any living taunted entity pulls all hostile attention.
    let taunted = ctx
        .entities
        .iter()
        .filter(|e| e.is_alive() && e.has_status("taunted"))
        .map(|e| e.id)
        .min();
    if let Some(taunted) = taunted {
        if taunted != actor {
            return Some(taunted);
        }
        // The actor itself is taunted: lash out at the nearest hostile it
        // can perceive.
        return nearest_hostile(ctx, actor, Vision::Radius(ctx.config.fov_radius));
    }

    // Enrage override: hunt the named faction.
    if let Some(statuses) = actor_entity.statuses.as_ref()
        && let Some(effect) = statuses.get("enraged")
        && let crate::components::EffectKind::EnragedAgainstFaction { faction } = effect.kind
    {
        let enraged_target = ctx
            .entities
            .iter()
            .filter(|e| e.id != actor && e.is_alive() && e.faction == faction)
            .filter_map(|e| {
                let pos = e.position?;
                let own = actor_entity.position?;
                Some((e.id, own.euclidean(pos)))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
            .map(|(id, _)| id);
        if enraged_target.is_some() {
            return enraged_target;
        }
    }

    // Default, unless it slipped out of sight under an invisibility veil.
    let target_entity = ctx.entities.get(default_target)?;
    if target_entity.has_status("invisibility") {
        return nearest_hostile(ctx, actor, Vision::PlayerFov);
    }
    Some(default_target)
}

/// Nearest hostile candidate by faction priority, distance, then `(y, x)`.
pub fn nearest_hostile(ctx: &TurnCtx<'_>, actor: EntityId, vision: Vision) -> Option<EntityId> {
    let actor_entity = ctx.entities.get(actor)?;
    let own_pos = actor_entity.position?;
    let own_faction = actor_entity.faction;

    ctx.entities
        .iter()
        .filter(|e| e.id != actor && e.is_alive() && !e.has_status("invisibility"))
        .filter(|e| are_hostile(own_faction, e.faction))
        .filter_map(|e| {
            let pos = e.position?;
            let seen = match vision {
                Vision::PlayerFov => ctx.fov.is_visible(pos),
                Vision::Radius(r) => own_pos.euclidean(pos) <= f64::from(r),
            };
            seen.then(|| {
                let priority = target_priority(own_faction, e.faction);
                (e.id, priority, own_pos.euclidean(pos), pos)
            })
        })
        .min_by(|a, b| {
            Reverse(a.1)
                .cmp(&Reverse(b.1))
                .then(a.2.partial_cmp(&b.2).unwrap())
                .then((a.3.y, a.3.x).cmp(&(b.3.y, b.3.x)))
        })
        .map(|(id, ..)| id)
}

/// Immobilization check. Returns the struggle message when glued.
pub fn immobilized(ctx: &TurnCtx<'_>, actor: EntityId) -> Option<ResultEvent> {
    let entity = ctx.entities.get(actor)?;
    entity.has_status("glue").then(|| {
        ResultEvent::message(
            format!("{} struggles against the glue!", entity.name),
            Color::SICKLY_GREEN,
        )
    })
}

/// Place an entity on a tile, riding any portal found there.
///
/// Returns the events for the move (and the teleport, when one fires).
pub fn move_entity(ctx: &mut TurnCtx<'_>, actor: EntityId, to: Position) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let Some(entity) = ctx.entities.get_mut(actor) else {
        return results;
    };
    entity.position = Some(to);
    results.push(ResultEvent::Moved { entity: actor, to });

    // Monsters with pocket space scoop up whatever they step on; the
    // player picks up deliberately.
    if !actor.is_player() {
        let has_space = ctx
            .entities
            .get(actor)
            .and_then(|e| e.inventory.as_ref())
            .is_some_and(|inv| !inv.is_full());
        let item_id = has_space
            .then(|| {
                ctx.entities
                    .iter()
                    .find(|e| e.position == Some(to) && e.item.is_some())
                    .map(|e| e.id)
            })
            .flatten();
        if let Some(item_id) = item_id {
            results.extend(super::items::pickup_item(ctx, actor, item_id));
        }
    }

    // Portal transit.
    let eligible = {
        let entity = ctx.entities.get(actor).expect("mover exists");
        actor.is_player() || entity.ai.as_ref().is_some_and(|ai| ai.portal_usable())
    };
    if !eligible {
        return results;
    }

    let portal_here = ctx
        .entities
        .iter()
        .find(|e| e.position == Some(to) && e.portal.is_some())
        .map(|e| (e.id, e.portal.clone().expect("portal component")));
    let Some((_, portal)) = portal_here else {
        return results;
    };
    let Some(linked) = portal.linked else {
        return results;
    };

    // Carrying the paired endpoint forbids the jump.
    let carries_pair = ctx
        .entities
        .get(actor)
        .and_then(|e| e.inventory.as_ref())
        .is_some_and(|inv| inv.contains(linked));
    if carries_pair {
        return results;
    }

    let Some(exit) = ctx.entities.get(linked).and_then(|e| e.position) else {
        return results;
    };
    if ctx.entities.blocking_at(exit).is_some() {
        return results;
    }

    let name = ctx
        .entities
        .get(actor)
        .map(|e| e.name.clone())
        .unwrap_or_default();
    if let Some(entity) = ctx.entities.get_mut(actor) {
        entity.position = Some(exit);
    }
    results.push(ResultEvent::Teleported(actor));
    results.push(ResultEvent::message(
        format!("{name} is pulled through the portal!"),
        Color::BLUE,
    ));
    results
}

/// Attempt a single step. Returns `None` when the destination is not
/// enterable.
pub fn try_step(ctx: &mut TurnCtx<'_>, actor: EntityId, dx: i32, dy: i32) -> Option<Vec<ResultEvent>> {
    let from = ctx.entities.get(actor)?.position?;
    let to = from.offset(dx, dy);
    if !ctx.walkable(to) {
        return None;
    }
    Some(move_entity(ctx, actor, to))
}

/// One A* step toward `dest` over walkable tiles, with blocking entities
/// masked as walls (the destination tile itself is exempt so adjacent
/// goals resolve). Falls back to a naive sign-step when no path exists.
pub fn move_toward(ctx: &mut TurnCtx<'_>, actor: EntityId, dest: Position) -> Vec<ResultEvent> {
    let Some(from) = ctx.entities.get(actor).and_then(|e| e.position) else {
        return Vec::new();
    };

    if let Some(next) = astar_next_step(ctx, from, dest)
        && ctx.walkable(next)
    {
        return move_entity(ctx, actor, next);
    }

    // Fallback: greedy step on either axis.
    let (dx, dy) = from.step_toward(dest);
    for (sx, sy) in [(dx, dy), (dx, 0), (0, dy)] {
        if (sx, sy) != (0, 0)
            && let Some(results) = try_step(ctx, actor, sx, sy)
        {
            return results;
        }
    }
    Vec::new()
}

/// Uniform random step into the 3x3 neighborhood (staying put allowed).
pub fn random_wander(ctx: &mut TurnCtx<'_>, actor: EntityId) -> Vec<ResultEvent> {
    let dx = ctx.rng.range_i32(-1, 1);
    let dy = ctx.rng.range_i32(-1, 1);
    if dx == 0 && dy == 0 {
        return Vec::new();
    }
    try_step(ctx, actor, dx, dy).unwrap_or_default()
}

/// Step directly away from a threat, trying the diagonal first.
pub fn flee_from(ctx: &mut TurnCtx<'_>, actor: EntityId, threat: Position) -> Vec<ResultEvent> {
    let Some(from) = ctx.entities.get(actor).and_then(|e| e.position) else {
        return Vec::new();
    };
    let (dx, dy) = threat.step_toward(from);
    for (sx, sy) in [(dx, dy), (dx, 0), (0, dy)] {
        if (sx, sy) != (0, 0)
            && let Some(results) = try_step(ctx, actor, sx, sy)
        {
            return results;
        }
    }
    Vec::new()
}

/// Melee reach for an actor: wielded weapon reach or 1.
pub fn weapon_reach(ctx: &TurnCtx<'_>, actor: EntityId) -> i32 {
    let Some(entity) = ctx.entities.get(actor) else {
        return 1;
    };
    entity.weapon_reach(|item_id| {
        ctx.entities
            .get(item_id)
            .and_then(|e| e.item.as_ref())
            .and_then(|i| i.equip.as_ref())
            .map(|p| p.reach)
    })
}

/// Bounded A* over the tile grid; returns the first step of the path.
fn astar_next_step(ctx: &TurnCtx<'_>, from: Position, dest: Position) -> Option<Position> {
    const MAX_EXPANSIONS: usize = 2048;

    if from == dest {
        return None;
    }

    let passable = |p: Position| -> bool {
        if p == dest {
            return ctx.map.in_bounds(p) && !ctx.map.is_blocked(p);
        }
        ctx.map.in_bounds(p)
            && !ctx.map.is_blocked(p)
            && !ctx.entities.tile_blocked_by_entity(p)
    };

    let mut open: BinaryHeap<Reverse<(i32, i32, Position)>> = BinaryHeap::new();
    let mut g_score: BTreeMap<Position, i32> = BTreeMap::new();
    let mut came_from: BTreeMap<Position, Position> = BTreeMap::new();

    g_score.insert(from, 0);
    open.push(Reverse((from.chebyshev(dest), 0, from)));

    let mut expanded = 0;
    while let Some(Reverse((_f, g, current))) = open.pop() {
        if current == dest {
            // Walk back to the step after `from`.
            let mut step = dest;
            while came_from.get(&step) != Some(&from) {
                step = *came_from.get(&step)?;
            }
            return Some(step);
        }
        if g_score.get(&current).is_some_and(|&best| g > best) {
            continue;
        }
        expanded += 1;
        if expanded > MAX_EXPANSIONS {
            break;
        }

        for next in current.neighbors8() {
            if !passable(next) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&next).is_none_or(|&best| tentative < best) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                open.push(Reverse((tentative + next.chebyshev(dest), tentative, next)));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::content::ContentOracle;
    use crate::map::{GameMap, Rect, compute_fov};
    use crate::rng::GameRng;
    use crate::state::{Color, EntitiesState, Entity};

    struct EmptyContent;
    impl ContentOracle for EmptyContent {
        fn monster(&self, _id: &str) -> Option<&crate::content::MonsterDefinition> {
            None
        }
        fn item(&self, _id: &str) -> Option<&crate::content::ItemDefinition> {
            None
        }
        fn spell(&self, _id: &str) -> Option<&crate::spells::SpellDefinition> {
            None
        }
    }

    #[test]
    fn astar_first_step_approaches_goal() {
        let mut map = GameMap::new(20, 20, 1);
        map.carve_room(Rect::new(0, 0, 19, 19));
        let fov = compute_fov(&mut map, Position::new(5, 5), 10);
        let mut entities = EntitiesState::new();
        entities.push(Entity::new(EntityId(0), "walker", '@', Color::WHITE, Position::new(5, 5)));
        let mut rng = GameRng::seeded(1);
        let config = GameConfig::default();
        let content = EmptyContent;
        let mut next_id = 1;
        let ctx = TurnCtx::new(
            &mut entities,
            &map,
            &fov,
            &mut rng,
            &config,
            &content,
            0,
            &mut next_id,
        );
        let step = astar_next_step(&ctx, Position::new(5, 5), Position::new(9, 9)).unwrap();
        assert_eq!(Position::new(5, 5).chebyshev(step), 1);
    }
}
