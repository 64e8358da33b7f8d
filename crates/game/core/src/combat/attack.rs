//! Attack resolution: the two-axis combat model.
//!
//! Axis one (hit/dodge): accuracy versus evasion decides whether the swing
//! connects. Axis two (tempo): the speed-bonus ratchet decides whether a
//! connecting attacker earns an extra swing. Independently of both, the
//! d20 attack roll against AC decides damage quality (crit, fumble,
//! deflection). Surprise attacks against unaware monsters bypass every
//! gate and force a critical.

use crate::combat::damage::{apply_damage, apply_modifier, melee_damage};
use crate::combat::hit;
use crate::components::{AddOutcome, DialogueMoment, EffectKind, StatusEffect};
use crate::engine::{ResultEvent, TurnCtx};
use crate::faction::Faction;
use crate::state::{Color, EntityId, Position};

use super::death::finalize_death;

/// How this attack entered the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOptions {
    /// Bonus attacks earned from the ratchet are never surprises and never
    /// roll the ratchet again.
    pub is_bonus_attack: bool,
    /// Only the player's primary attacks may surprise.
    pub allow_surprise: bool,
}

impl AttackOptions {
    pub const PRIMARY: Self = Self {
        is_bonus_attack: false,
        allow_surprise: true,
    };

    pub const MONSTER: Self = Self {
        is_bonus_attack: false,
        allow_surprise: false,
    };

    const BONUS: Self = Self {
        is_bonus_attack: true,
        allow_surprise: false,
    };
}

/// Resolve a full attack action: the primary attack, then at most one
/// ratchet bonus attack against the same target.
pub fn attack_with_tempo(
    ctx: &mut TurnCtx<'_>,
    attacker: EntityId,
    defender: EntityId,
    opts: AttackOptions,
) -> Vec<ResultEvent> {
    let mut results = resolve_attack(ctx, attacker, defender, opts);

    // Tempo axis: roll the ratchet once per attack action, gated on the
    // attacker being strictly faster than the target.
    let attacker_ratio = ctx
        .entities
        .get(attacker)
        .and_then(|e| e.speed_bonus.as_ref())
        .map_or(0.0, |t| t.speed_bonus_ratio);
    let defender_ratio = ctx
        .entities
        .get(defender)
        .and_then(|e| e.speed_bonus.as_ref())
        .map_or(0.0, |t| t.speed_bonus_ratio);

    if attacker_ratio <= defender_ratio {
        return results;
    }

    let granted = {
        let Some(entity) = ctx.entities.get_mut(attacker) else {
            return results;
        };
        let Some(tracker) = entity.speed_bonus.as_mut() else {
            return results;
        };
        tracker.roll_for_bonus_attack(ctx.rng)
    };

    if granted {
        let target_alive = ctx.entities.get(defender).is_some_and(|e| e.is_alive());
        if target_alive {
            results.extend(resolve_attack(ctx, attacker, defender, AttackOptions::BONUS));
        }
        // Target already down: the roll is consumed silently.
    }

    results
}

/// Everything the pipeline needs to know about the attacker, captured up
/// front so later phases can mutate freely.
struct AttackerView {
    name: String,
    position: Position,
    accuracy: i32,
    power_roll: i32,
    power: i32,
    damage_type: crate::combat::DamageType,
    outgoing_mods: crate::combat::DamageModifiers,
    boss_multiplier: f32,
    faction: Faction,
    plague_carrier: bool,
}

/// Resolve a single attack (no tempo follow-up).
pub fn resolve_attack(
    ctx: &mut TurnCtx<'_>,
    attacker: EntityId,
    defender: EntityId,
    opts: AttackOptions,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();

    // Attacking breaks invisibility before anything resolves.
    if let Some(entity) = ctx.entities.get_mut(attacker)
        && let Some(statuses) = entity.statuses.as_mut()
        && statuses.remove("invisibility")
    {
        results.push(ResultEvent::message(
            format!("{} fades into view.", entity.name),
            Color::VIOLET,
        ));
    }

    let Some(view) = capture_attacker(ctx, attacker) else {
        return results;
    };
    let Some(defender_ref) = ctx.entities.get(defender) else {
        return results;
    };
    if !defender_ref.is_alive() || defender_ref.position.is_none() {
        return results;
    }
    let defender_name = defender_ref.name.clone();
    let defender_evasion = defender_ref.fighter.as_ref().map_or(1, |f| f.evasion);

    // Surprise: primary player attack against an unaware monster.
    let is_surprise = opts.allow_surprise
        && !opts.is_bonus_attack
        && defender_ref.ai.as_ref().is_some_and(|ai| !ai.is_aware());

    // Being attacked always wakes the target and latches combat.
    mark_attacked(ctx, defender);

    // ---- axis one: hit/dodge ----
    let connects = is_surprise
        || hit::roll_to_hit(ctx.rng, view.accuracy, defender_evasion, &ctx.config.hit);
    if !connects {
        results.push(ResultEvent::message(
            format!("{} misses {}.", view.name, defender_name),
            Color::GREY,
        ));
        return results;
    }

    // ---- d20 attack roll: damage quality ----
    let mut is_critical = false;
    if is_surprise {
        is_critical = true;
    } else {
        let d20 = ctx.rng.roll_die(20) as i32;
        let attack_bonus = lich_command_bonus(ctx, attacker, &view);
        let effective_ac = defender_effective_ac(ctx, defender);

        if d20 == 20 {
            is_critical = true;
        } else if d20 == 1 {
            results.push(ResultEvent::message(
                format!("{} fumbles the attack on {}.", view.name, defender_name),
                Color::GREY,
            ));
            return results;
        } else if d20 + attack_bonus < effective_ac {
            results.push(ResultEvent::message(
                format!("{}'s blow glances off {}.", view.name, defender_name),
                Color::GREY,
            ));
            return results;
        }
    }

    // ---- damage ----
    let defender_fighter = ctx
        .entities
        .get(defender)
        .and_then(|e| e.fighter.clone())
        .expect("defender fighter checked above");

    let mut amount = melee_damage(
        view.power_roll,
        view.power,
        defender_fighter.defense,
        is_critical,
        ctx.config.combat.crit_multiplier,
        ctx.config.combat.minimum_damage,
    );
    amount = (amount as f32 * view.boss_multiplier).round() as i32;
    amount = apply_modifier(amount, view.damage_type, &view.outgoing_mods);
    amount = apply_modifier(amount, view.damage_type, &defender_fighter.resistances);

    let text = if is_surprise {
        format!(
            "{} catches {} off guard for {} damage!",
            view.name, defender_name, amount
        )
    } else if is_critical {
        format!(
            "{} critically hits {} for {} damage!",
            view.name, defender_name, amount
        )
    } else {
        format!("{} hits {} for {} damage.", view.name, defender_name, amount)
    };
    results.push(ResultEvent::message(
        text,
        if defender.is_player() { Color::RED } else { Color::WHITE },
    ));
    results.push(ResultEvent::Damage {
        target: defender,
        amount,
        kind: view.damage_type,
    });

    let new_hp = {
        let entity = ctx.entities.get_mut(defender).expect("defender exists");
        let fighter = entity.fighter.as_mut().expect("defender fighter exists");
        apply_damage(fighter, amount)
    };

    // Plague carriers infect on any connecting melee attack.
    if view.plague_carrier && new_hp > 0 {
        infect(ctx, defender, &mut results);
    }

    // Boss barks when hit.
    if new_hp > 0 {
        boss_hit_bark(ctx, defender, &mut results);
    }

    if new_hp <= 0 {
        results.extend(finalize_death(ctx, defender, Some(attacker)));
    }

    results
}

fn capture_attacker(ctx: &mut TurnCtx<'_>, attacker: EntityId) -> Option<AttackerView> {
    let entity = ctx.entities.get(attacker)?;
    let position = entity.position?;
    let fighter = entity.fighter.as_ref()?;
    if !fighter.is_alive() {
        return None;
    }
    let dice = fighter.damage;
    let mut view = AttackerView {
        name: entity.name.clone(),
        position,
        accuracy: fighter.accuracy,
        power_roll: 0,
        power: fighter.power,
        damage_type: fighter.natural_damage_type,
        outgoing_mods: fighter.damage_type_modifiers.clone(),
        boss_multiplier: entity.boss.as_ref().map_or(1.0, |b| b.outgoing_multiplier()),
        faction: entity.faction,
        plague_carrier: entity.has_tag("plague_carrier") || entity.has_status("plague"),
    };
    view.power_roll = dice.roll(ctx.rng);
    Some(view)
}

/// +1 to-hit for allied undead standing inside a lich's aura.
fn lich_command_bonus(ctx: &TurnCtx<'_>, attacker: EntityId, view: &AttackerView) -> i32 {
    if view.faction != Faction::Undead {
        return 0;
    }
    let radius = f64::from(ctx.config.combat.lich_aura_radius);
    let commanded = ctx.entities.iter().any(|e| {
        e.id != attacker
            && e.faction == Faction::Undead
            && e.is_alive()
            && e.ai.as_ref().is_some_and(|ai| ai.is_lich())
            && e.position
                .is_some_and(|p| p.euclidean(view.position) <= radius)
    });
    if commanded {
        ctx.config.combat.lich_command_bonus
    } else {
        0
    }
}

/// Defender AC with the skeleton shield wall refreshed for this roll.
fn defender_effective_ac(ctx: &TurnCtx<'_>, defender: EntityId) -> i32 {
    let Some(entity) = ctx.entities.get(defender) else {
        return 10;
    };
    let Some(fighter) = entity.fighter.as_ref() else {
        return 10;
    };
    let mut ac = fighter.armor_class;
    if fighter.shieldwall_ac_per_adjacent > 0
        && let Some(pos) = entity.position
    {
        let allies = pos
            .neighbors4()
            .iter()
            .filter(|&&n| {
                ctx.entities.iter().any(|e| {
                    e.position == Some(n)
                        && e.faction == entity.faction
                        && e.is_alive()
                        && e.ai.as_ref().is_some_and(|ai| ai.is_skeleton())
                })
            })
            .count() as i32;
        ac += fighter.shieldwall_ac_per_adjacent * allies;
    }
    ac
}

/// Being attacked (by anything, through any pipeline) wakes a monster and
/// latches it into combat.
pub(crate) fn mark_attacked(ctx: &mut TurnCtx<'_>, defender: EntityId) {
    if let Some(entity) = ctx.entities.get_mut(defender)
        && let Some(ai) = entity.ai.as_mut()
    {
        ai.set_aware();
        ai.set_in_combat();
    }
}

fn infect(ctx: &mut TurnCtx<'_>, defender: EntityId, results: &mut Vec<ResultEvent>) {
    if let Some(entity) = ctx.entities.get_mut(defender) {
        let name = entity.name.clone();
        let statuses = entity.statuses.get_or_insert_default();
        if !statuses.has("plague")
            && statuses.add(StatusEffect::new(EffectKind::Plague { per_turn: 2 }, 5))
                == AddOutcome::Applied
        {
            results.push(ResultEvent::message(
                format!("{name} is wracked by plague!"),
                Color::SICKLY_GREEN,
            ));
        }
    }
}

fn boss_hit_bark(ctx: &mut TurnCtx<'_>, defender: EntityId, results: &mut Vec<ResultEvent>) {
    if let Some(entity) = ctx.entities.get_mut(defender)
        && let Some(boss) = entity.boss.as_mut()
        && let Some(line) = boss.take_line(DialogueMoment::Hit, ctx.rng)
    {
        let name = entity.name.clone();
        results.push(ResultEvent::message(format!("{name}: \"{line}\""), Color::YELLOW));
    }
}
