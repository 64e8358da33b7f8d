//! Death finalization.
//!
//! Every lethal pipeline (melee, spells, DOT ticks, explosions) funnels
//! through [`finalize_death`] so the corpse automaton, loot drops, XP, and
//! death-side effects behave identically no matter what killed the victim.

use crate::components::{Corpse, DialogueMoment};
use crate::content::spawn_bone_pile;
use crate::engine::{ResultEvent, TurnCtx};
use crate::faction::Faction;
use crate::state::{Color, EntityId, Position, RenderOrder};

/// Finalize a death: messages, drops, in-place corpse transform, XP, and
/// side effects. Idempotent per entity: a victim that is already a corpse
/// (or despawned) produces no further events.
pub fn finalize_death(
    ctx: &mut TurnCtx<'_>,
    victim: EntityId,
    killer: Option<EntityId>,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();

    let Some(entity) = ctx.entities.get(victim) else {
        return results;
    };
    if entity.corpse.is_some() || entity.fighter.is_none() {
        return results;
    }
    let Some(position) = entity.position else {
        return results;
    };
    let name = entity.name.clone();
    let faction = entity.faction;
    let was_raised_minion = entity.has_tag("raised_minion");
    let definition_id = entity.definition_id.clone();
    let xp_award = entity.fighter.as_ref().map_or(0, |f| f.xp);

    tracing::debug!(
        target: "barrow_core::combat",
        victim = %victim,
        name = %name,
        "finalizing death"
    );

    // The player's death ends the run; the scheduler reads the zeroed HP.
    if victim.is_player() {
        results.push(ResultEvent::message("You died!", Color::DARK_RED));
        results.push(ResultEvent::Dead(victim));
        let entity = ctx.entities.get_mut(victim).expect("player exists");
        entity.glyph = '%';
        entity.color = Color::DARK_RED;
        entity.render_order = RenderOrder::Corpse;
        return results;
    }

    // Boss last words come before the plain death notice.
    if let Some(entity) = ctx.entities.get_mut(victim)
        && let Some(boss) = entity.boss.as_mut()
    {
        boss.defeated = true;
        boss.is_enraged = false;
        if let Some(line) = boss.take_line(DialogueMoment::Death, ctx.rng) {
            results.push(ResultEvent::message(format!("{name}: \"{line}\""), Color::YELLOW));
        }
    }

    results.push(ResultEvent::message(format!("{name} dies!"), Color::ORANGE));
    results.push(ResultEvent::Dead(victim));

    drop_possessions(ctx, victim, position);

    // In-place transform into a corpse entity: same id, new face.
    let (max_raises, death_spawns) = definition_id
        .as_deref()
        .and_then(|id| ctx.content.monster(id))
        .map_or((1, None), |def| (def.max_raises, def.death_spawns.clone()));

    let corpse_id = format!("corpse_{}_{}_{}", position.x, position.y, ctx.turn);
    {
        let entity = ctx.entities.get_mut(victim).expect("victim exists");
        entity.name = format!("remains of {name}");
        entity.glyph = '%';
        entity.color = Color::DARK_RED;
        entity.blocks = false;
        entity.render_order = RenderOrder::Corpse;
        let mut corpse = Corpse::new(
            definition_id.clone().unwrap_or_else(|| name.clone()),
            corpse_id,
            ctx.turn,
        )
        .with_max_raises(max_raises);
        if was_raised_minion {
            corpse.mark_spent();
        }
        entity.corpse = Some(corpse);
        entity.fighter = None;
        entity.ai = None;
        entity.speed_bonus = None;
        entity.boss = None;
        if let Some(statuses) = entity.statuses.as_mut() {
            statuses.clear();
        }
    }

    // XP goes to whoever landed the kill, if they track it.
    if let Some(killer) = killer
        && xp_award > 0
        && let Some(entity) = ctx.entities.get_mut(killer)
        && let Some(fighter) = entity.fighter.as_mut()
    {
        fighter.xp += xp_award;
        results.push(ResultEvent::XpGained {
            entity: killer,
            amount: xp_award,
        });
        if killer.is_player() {
            results.push(ResultEvent::message(
                format!("You gain {xp_award} experience."),
                Color::CYAN,
            ));
        }
    }

    // Death spawns: skeletons leave bone piles, etc.
    if let Some(spawn) = death_spawns {
        if spawn == "bone_pile" {
            let id = ctx.allocate_id();
            ctx.entities.push(spawn_bone_pile(id, position));
            results.push(ResultEvent::Spawned(id));
        } else if let Some(def) = ctx.content.monster(&spawn).cloned() {
            let id = ctx.allocate_id();
            ctx.entities
                .push(crate::content::spawn_monster(&def, id, position));
            results.push(ResultEvent::Spawned(id));
        }
    }

    // Death Siphon: a nearby allied lich feeds on a fallen undead.
    if faction == Faction::Undead {
        results.extend(death_siphon(ctx, position));
    }

    results
}

/// Drop equipment slots and inventory contents onto the death tile.
fn drop_possessions(ctx: &mut TurnCtx<'_>, victim: EntityId, position: Position) {
    let mut dropped: Vec<EntityId> = Vec::new();
    if let Some(entity) = ctx.entities.get_mut(victim) {
        if let Some(equipment) = entity.equipment.as_mut() {
            dropped.extend(equipment.iter().map(|(_, id)| id));
            equipment.slots.clear();
        }
        if let Some(inventory) = entity.inventory.as_mut() {
            dropped.append(&mut inventory.items);
        }
        entity.equipment = None;
        entity.inventory = None;
    }
    for item in dropped {
        if let Some(entity) = ctx.entities.get_mut(item) {
            entity.position = Some(position);
        }
    }
}

/// Heal every allied lich whose aura covers the death tile.
fn death_siphon(ctx: &mut TurnCtx<'_>, position: Position) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let radius = f64::from(ctx.config.combat.lich_aura_radius);
    let heal = ctx.config.combat.death_siphon_heal;

    let lich_ids: Vec<EntityId> = ctx
        .entities
        .iter()
        .filter(|e| {
            e.faction == Faction::Undead
                && e.is_alive()
                && e.ai.as_ref().is_some_and(|ai| ai.is_lich())
                && e.position.is_some_and(|p| p.euclidean(position) <= radius)
        })
        .map(|e| e.id)
        .collect();

    for id in lich_ids {
        if let Some(entity) = ctx.entities.get_mut(id)
            && let Some(fighter) = entity.fighter.as_mut()
        {
            let healed = fighter.heal(heal);
            if healed > 0 {
                results.push(ResultEvent::message(
                    format!("{} siphons the fading soul.", entity.name),
                    Color::VIOLET,
                ));
            }
        }
    }
    results
}
