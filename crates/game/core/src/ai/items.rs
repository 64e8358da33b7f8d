//! Monster item usage, item seeking, and pickup.
//!
//! Usage eligibility comes from the monster's static definition (the
//! `can_use_items` tag stamped by the factory). Usage misfires with a
//! configurable rate across three modes: fizzle, wrong target, and
//! equipment damage.

use crate::engine::{ResultEvent, TurnCtx};
use crate::spells::{SpellTarget, cast_spell};
use crate::state::{Color, EntityId};

/// Distance inside which an offensive item is considered appropriate.
const OFFENSIVE_RANGE: f64 = 6.0;

/// Attempt a per-turn item use. Returns `Some` when the turn was consumed.
pub fn try_use_item(
    ctx: &mut TurnCtx<'_>,
    actor: EntityId,
    target: EntityId,
) -> Option<Vec<ResultEvent>> {
    let entity = ctx.entities.get(actor)?;
    if !entity.has_tag("can_use_items") {
        return None;
    }
    let actor_pos = entity.position?;
    let inventory = entity.inventory.as_ref()?.items.clone();
    if inventory.is_empty() || !ctx.rng.chance(ctx.config.monster_item_use_chance) {
        return None;
    }

    let target_pos = ctx.entities.get(target).and_then(|e| e.position)?;
    let player_close = actor_pos.euclidean(target_pos) <= OFFENSIVE_RANGE;

    // Pick the first usable item appropriate to the situation.
    let usable: Vec<(EntityId, String, bool, bool)> = inventory
        .iter()
        .filter_map(|&item_id| {
            let item_entity = ctx.entities.get(item_id)?;
            let item = item_entity.item.as_ref()?;
            let spell_id = item.use_spell.clone()?;
            Some((item_id, spell_id, item.offensive, item.beneficial))
        })
        .collect();
    let &(item_id, ref spell_id, offensive, beneficial) = usable
        .iter()
        .find(|(_, _, offensive, _)| *offensive == player_close)
        .or_else(|| usable.first())?;

    let spell = ctx.content.spell(spell_id)?.clone();
    let item_name = ctx.entities.get(item_id).map(|e| e.name.clone())?;
    let actor_name = ctx.entities.get(actor).map(|e| e.name.clone())?;

    let mut results = vec![ResultEvent::message(
        format!("{actor_name} uses {item_name}!"),
        Color::YELLOW,
    )];

    if ctx.rng.chance(ctx.config.monster_item_failure_rate) {
        results.extend(misfire(ctx, actor, target, &spell, offensive, beneficial));
        consume_item(ctx, actor, item_id);
        return Some(results);
    }

    let spell_target = if offensive {
        SpellTarget::Entity(target)
    } else {
        SpellTarget::Caster
    };
    let cast = cast_spell(ctx, actor, &spell, spell_target);
    let consumed = !cast
        .iter()
        .any(|r| matches!(r, ResultEvent::Consumed(false)));
    results.extend(cast);
    if consumed {
        consume_item(ctx, actor, item_id);
    }
    Some(results)
}

/// The three misfire modes, selected uniformly.
fn misfire(
    ctx: &mut TurnCtx<'_>,
    actor: EntityId,
    target: EntityId,
    spell: &crate::spells::SpellDefinition,
    offensive: bool,
    beneficial: bool,
) -> Vec<ResultEvent> {
    match ctx.rng.pick_index(3) {
        Some(0) => {
            // Fizzle.
            vec![ResultEvent::message(
                "The magic sputters and dies.",
                Color::GREY,
            )]
        }
        Some(1) => {
            // Wrong target: beneficial magic lands on the player, harmful
            // magic lands on the user.
            let mut results = vec![ResultEvent::message(
                "The magic twists toward the wrong target!",
                Color::VIOLET,
            )];
            let spell_target = if beneficial && !offensive {
                SpellTarget::Entity(target)
            } else {
                SpellTarget::Entity(actor)
            };
            results.extend(cast_spell(ctx, actor, spell, spell_target));
            results
        }
        _ => {
            // Equipment damage: blunt one equipped item's bonuses.
            let mut results = vec![ResultEvent::message(
                "The backlash scorches the wielder's gear!",
                Color::ORANGE,
            )];
            results.extend(damage_equipment(ctx, actor));
            results
        }
    }
}

fn damage_equipment(ctx: &mut TurnCtx<'_>, actor: EntityId) -> Vec<ResultEvent> {
    let equipped: Vec<EntityId> = ctx
        .entities
        .get(actor)
        .and_then(|e| e.equipment.as_ref())
        .map(|eq| eq.iter().map(|(_, id)| id).collect())
        .unwrap_or_default();
    let Some(idx) = ctx.rng.pick_index(equipped.len()) else {
        return Vec::new();
    };
    let item_id = equipped[idx];
    let Some(entity) = ctx.entities.get_mut(item_id) else {
        return Vec::new();
    };
    let name = entity.name.clone();
    let Some(profile) = entity.item.as_mut().and_then(|i| i.equip.as_mut()) else {
        return Vec::new();
    };
    if profile.power_bonus > 0 && (profile.defense_bonus == 0 || ctx.rng.chance(0.5)) {
        profile.power_bonus -= 1;
    } else if profile.defense_bonus > 0 {
        profile.defense_bonus -= 1;
    }
    vec![ResultEvent::message(
        format!("The {name} is damaged."),
        Color::ORANGE,
    )]
}

fn consume_item(ctx: &mut TurnCtx<'_>, actor: EntityId, item_id: EntityId) {
    if let Some(entity) = ctx.entities.get_mut(actor)
        && let Some(inventory) = entity.inventory.as_mut()
    {
        inventory.remove(item_id);
    }
    ctx.entities.remove(item_id);
}

/// Opportunistic item seeking (pre-combat only, disabled while taunted).
///
/// Seeks the nearest item whose distance is inside the definition's seek
/// radius and strictly closer than the actor's distance to the player.
/// Returns `Some` when the turn was consumed by a move or pickup.
pub fn try_item_seeking(
    ctx: &mut TurnCtx<'_>,
    actor: EntityId,
    player: EntityId,
) -> Option<Vec<ResultEvent>> {
    let entity = ctx.entities.get(actor)?;
    if !entity.has_tag("can_seek_items") || entity.has_status("taunted") {
        return None;
    }
    let inventory = entity.inventory.as_ref()?;
    if inventory.is_full() {
        return None;
    }
    let actor_pos = entity.position?;
    let seek_distance = entity
        .definition_id
        .as_deref()
        .and_then(|id| ctx.content.monster(id))
        .map_or(6.0, |def| def.seek_distance);
    let player_distance = ctx
        .entities
        .get(player)
        .and_then(|e| e.position)
        .map_or(f64::INFINITY, |p| actor_pos.euclidean(p));

    let best = ctx
        .entities
        .iter()
        .filter(|e| e.item.is_some() && e.position.is_some())
        .filter_map(|e| {
            let d = actor_pos.euclidean(e.position?);
            (d <= seek_distance && d < player_distance).then_some((e.id, d))
        })
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))?;

    let (item_id, distance) = best;
    if distance == 0.0 {
        return Some(pickup_item(ctx, actor, item_id));
    }
    let item_pos = ctx.entities.get(item_id).and_then(|e| e.position)?;
    let results = super::helpers::move_toward(ctx, actor, item_pos);
    if results.is_empty() {
        return None;
    }
    Some(results)
}

/// Pick an item off the actor's tile into its inventory, auto-equipping
/// equippables into empty slots.
pub fn pickup_item(ctx: &mut TurnCtx<'_>, actor: EntityId, item_id: EntityId) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let Some(item_entity) = ctx.entities.get(item_id) else {
        return results;
    };
    let item_name = item_entity.name.clone();
    let profile = item_entity.item.as_ref().and_then(|i| i.equip.clone());

    let Some(entity) = ctx.entities.get_mut(actor) else {
        return results;
    };
    let actor_name = entity.name.clone();
    let Some(inventory) = entity.inventory.as_mut() else {
        return results;
    };
    if !inventory.add(item_id) {
        return results;
    }

    results.push(ResultEvent::PickedUp {
        entity: actor,
        item: item_id,
    });
    results.push(ResultEvent::message(
        format!("{actor_name} picks up the {item_name}."),
        Color::CYAN,
    ));

    // Auto-equip into an empty slot; equipped items leave the inventory
    // list so they are not double-dropped on death.
    if let Some(profile) = profile {
        let can_equip = entity
            .equipment
            .as_ref()
            .is_some_and(|eq| eq.is_empty(profile.slot));
        if can_equip {
            entity
                .inventory
                .as_mut()
                .expect("inventory exists")
                .remove(item_id);
            entity
                .equipment
                .as_mut()
                .expect("equipment exists")
                .equip(profile.slot, item_id);
            if let Some(fighter) = entity.fighter.as_mut() {
                fighter.power += profile.power_bonus;
                fighter.defense += profile.defense_bonus;
                fighter.max_hp += profile.max_hp_bonus;
                fighter.hp += profile.max_hp_bonus;
            }
            results.push(ResultEvent::Equipped {
                entity: actor,
                item: item_id,
            });
        }
    }

    // The item leaves the world while held.
    if let Some(item_entity) = ctx.entities.get_mut(item_id) {
        item_entity.position = None;
    }
    results
}
