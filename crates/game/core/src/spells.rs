//! Declarative spell records and the single executor.
//!
//! A spell is pure data; one executor consumes any record plus a caster and
//! a target and produces the same `results` shape as attacks. Spells are
//! loaded by the content crate and never mutated at runtime.

use strum::{Display, EnumString};

use crate::combat::{DamageType, DiceExpr, apply_damage, apply_modifier, finalize_death};
use crate::components::{EffectKind, Hazard, StatusEffect};
use crate::engine::{ResultEvent, TurnCtx};
use crate::faction::are_hostile;
use crate::map::line_of_sight;
use crate::state::{Color, Entity, EntityId, Position, RenderOrder};

/// Broad spell categories.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, serde::Serialize, serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpellCategory {
    Offensive,
    Healing,
    Utility,
    Buff,
}

/// What a spell may be aimed at.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, serde::Serialize, serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpellTargeting {
    Caster,
    SingleEnemy,
    SingleAny,
    Aoe,
    Cone,
    Location,
}

/// Status effect attached by a spell.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpellEffectSpec {
    pub name: String,
    pub duration: i32,
    #[serde(default)]
    pub strength: i32,
}

/// Hazard field left behind by a spell.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HazardSpec {
    pub kind: DamageType,
    pub radius: i32,
    pub duration: i32,
    pub damage_per_turn: i32,
}

/// Declarative spell record.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpellDefinition {
    pub id: String,
    pub name: String,
    pub category: SpellCategory,
    pub targeting: SpellTargeting,
    #[serde(default)]
    pub damage: Option<DiceExpr>,
    #[serde(default)]
    pub damage_type: DamageType,
    /// AoE radius, when targeting is `Aoe`.
    #[serde(default)]
    pub radius: i32,
    /// Cone length, when targeting is `Cone`.
    #[serde(default)]
    pub cone_range: i32,
    /// Cone width in degrees, when targeting is `Cone`.
    #[serde(default)]
    pub cone_width_deg: f32,
    #[serde(default)]
    pub effect: Option<SpellEffectSpec>,
    #[serde(default)]
    pub hazard: Option<HazardSpec>,
    pub range: i32,
    #[serde(default = "default_true")]
    pub requires_los: bool,
    /// Template with `{caster}` and `{target}` placeholders.
    pub message: String,
}

fn default_true() -> bool {
    true
}

/// Aim point for one cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SpellTarget {
    Caster,
    Entity(EntityId),
    Location(Position),
}

/// Execute a spell. Precondition failures (out of range, no LOS, no valid
/// target) are reported through `results` with `Consumed(false)` so the
/// triggering item is not wasted.
pub fn cast_spell(
    ctx: &mut TurnCtx<'_>,
    caster: EntityId,
    spell: &SpellDefinition,
    target: SpellTarget,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let Some(caster_entity) = ctx.entities.get(caster) else {
        return results;
    };
    let Some(caster_pos) = caster_entity.position else {
        return results;
    };
    let caster_name = caster_entity.name.clone();
    let caster_mods = caster_entity
        .fighter
        .as_ref()
        .map(|f| f.damage_type_modifiers.clone())
        .unwrap_or_default();

    // Resolve the aim point.
    let aim: Position = match target {
        SpellTarget::Caster => caster_pos,
        SpellTarget::Entity(id) => match ctx.entities.get(id).and_then(|e| e.position) {
            Some(p) => p,
            None => {
                results.push(ResultEvent::plain("No valid target."));
                results.push(ResultEvent::Consumed(false));
                return results;
            }
        },
        SpellTarget::Location(p) => p,
    };

    if caster_pos.euclidean(aim) > f64::from(spell.range) {
        results.push(ResultEvent::message(
            format!("The {} is out of range.", spell.name),
            Color::GREY,
        ));
        results.push(ResultEvent::Consumed(false));
        return results;
    }
    if spell.requires_los && !line_of_sight(ctx.map, caster_pos, aim) {
        results.push(ResultEvent::message(
            format!("{caster_name} cannot see the target."),
            Color::GREY,
        ));
        results.push(ResultEvent::Consumed(false));
        return results;
    }

    // Collect affected entities by targeting mode.
    let affected: Vec<EntityId> = match spell.targeting {
        SpellTargeting::Caster => vec![caster],
        SpellTargeting::SingleEnemy | SpellTargeting::SingleAny => match target {
            SpellTarget::Entity(id) => vec![id],
            SpellTarget::Caster => vec![caster],
            SpellTarget::Location(p) => ctx
                .entities
                .iter()
                .filter(|e| e.position == Some(p) && e.fighter.is_some())
                .map(|e| e.id)
                .take(1)
                .collect(),
        },
        SpellTargeting::Aoe => entities_in_radius(ctx, aim, f64::from(spell.radius)),
        SpellTargeting::Cone => entities_in_cone(
            ctx,
            caster_pos,
            aim,
            f64::from(spell.cone_range),
            f64::from(spell.cone_width_deg),
        ),
        SpellTargeting::Location => Vec::new(),
    };

    if affected.is_empty() && spell.hazard.is_none() {
        results.push(ResultEvent::plain("No valid target."));
        results.push(ResultEvent::Consumed(false));
        return results;
    }

    // Announce the cast once, on the first concrete target (or the caster).
    let announce_target = affected
        .first()
        .and_then(|&id| ctx.entities.get(id))
        .map_or_else(|| caster_name.clone(), |e| e.name.clone());
    results.push(ResultEvent::message(
        spell
            .message
            .replace("{caster}", &caster_name)
            .replace("{target}", &announce_target),
        Color::CYAN,
    ));

    for id in affected {
        match spell.category {
            SpellCategory::Healing => {
                let Some(amount) = spell.damage.map(|d| d.roll(ctx.rng)) else {
                    continue;
                };
                if let Some(entity) = ctx.entities.get_mut(id)
                    && let Some(fighter) = entity.fighter.as_mut()
                {
                    let healed = fighter.heal(amount);
                    let name = entity.name.clone();
                    if healed > 0 {
                        results.push(ResultEvent::message(
                            format!("{name} recovers {healed} hit points."),
                            Color::GREEN,
                        ));
                    } else {
                        results.push(ResultEvent::message(
                            format!("{name} is already at full health."),
                            Color::GREY,
                        ));
                        results.push(ResultEvent::Consumed(false));
                    }
                }
            }
            SpellCategory::Offensive => {
                if let Some(dice) = spell.damage {
                    results.extend(spell_damage(ctx, caster, id, dice, spell.damage_type, &caster_mods));
                }
            }
            SpellCategory::Utility | SpellCategory::Buff => {}
        }

        if let Some(spec) = &spell.effect {
            results.extend(apply_spell_effect(ctx, id, spec));
        }
    }

    // Hazard field around the aim point.
    if let Some(hazard) = &spell.hazard {
        for dy in -hazard.radius..=hazard.radius {
            for dx in -hazard.radius..=hazard.radius {
                let p = aim.offset(dx, dy);
                if aim.euclidean(p) > f64::from(hazard.radius) {
                    continue;
                }
                if !ctx.map.in_bounds(p) || ctx.map.is_blocked(p) {
                    continue;
                }
                let id = ctx.allocate_id();
                let mut entity = Entity::new(id, format!("{} field", spell.name), '^', Color::ORANGE, p)
                    .with_render_order(RenderOrder::Prop)
                    .with_tag("hazard");
                entity.hazard = Some(Hazard::new(
                    hazard.kind,
                    hazard.damage_per_turn,
                    hazard.duration,
                ));
                ctx.entities.push(entity);
                results.push(ResultEvent::Spawned(id));
            }
        }
    }

    results.push(ResultEvent::Consumed(true));
    results
}

/// Damage one spell target through the shared pipelines.
fn spell_damage(
    ctx: &mut TurnCtx<'_>,
    caster: EntityId,
    target: EntityId,
    dice: DiceExpr,
    kind: DamageType,
    caster_mods: &crate::combat::DamageModifiers,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();
    let rolled = apply_modifier(dice.roll(ctx.rng), kind, caster_mods);

    let (name, amount, hp) = {
        let Some(entity) = ctx.entities.get_mut(target) else {
            return results;
        };
        let name = entity.name.clone();
        let Some(fighter) = entity.fighter.as_mut() else {
            return results;
        };
        let amount = apply_modifier(rolled, kind, &fighter.resistances);
        let hp = apply_damage(fighter, amount);
        (name, amount, hp)
    };
    crate::combat::mark_attacked(ctx, target);

    results.push(ResultEvent::message(
        format!("{name} takes {amount} {kind} damage."),
        Color::ORANGE,
    ));
    results.push(ResultEvent::Damage {
        target,
        amount,
        kind,
    });
    if hp <= 0 {
        results.extend(finalize_death(ctx, target, Some(caster)));
    }
    results
}

fn apply_spell_effect(
    ctx: &mut TurnCtx<'_>,
    target: EntityId,
    spec: &SpellEffectSpec,
) -> Vec<ResultEvent> {
    let mut results = Vec::new();

    // Confusion is not a status: it wraps the victim's AI in place.
    if spec.name == "confusion" {
        let Some(entity) = ctx.entities.get_mut(target) else {
            return results;
        };
        let name = entity.name.clone();
        let immune = entity
            .statuses
            .as_ref()
            .is_some_and(|s| s.immunities.contains("confusion"));
        match entity.ai.take() {
            Some(previous) if !immune => {
                entity.ai = Some(crate::ai::AiState::Confused(crate::ai::ConfusedAi {
                    previous: Box::new(previous),
                    turns_remaining: spec.duration,
                }));
                results.push(ResultEvent::message(
                    format!("The eyes of {name} look vacant as it starts to stumble around!"),
                    Color::VIOLET,
                ));
            }
            taken => {
                entity.ai = taken;
                results.push(ResultEvent::message(
                    format!("{name} is unaffected."),
                    Color::GREY,
                ));
            }
        }
        return results;
    }

    let Some(kind) = effect_from_spec(spec) else {
        tracing::warn!(target: "barrow_core::spells", effect = %spec.name, "unknown spell effect");
        return results;
    };
    let Some(entity) = ctx.entities.get_mut(target) else {
        return results;
    };
    let name = entity.name.clone();
    let statuses = entity.statuses.get_or_insert_default();
    match statuses.add(StatusEffect::new(kind, spec.duration)) {
        crate::components::AddOutcome::Immune => {
            results.push(ResultEvent::message(
                format!("{name} is unaffected."),
                Color::GREY,
            ));
        }
        crate::components::AddOutcome::Rejected => {}
        _ => {
            results.push(ResultEvent::message(
                format!("{name} is affected by {}.", spec.name),
                Color::VIOLET,
            ));
        }
    }
    results
}

/// Map a content effect name onto the closed effect set.
fn effect_from_spec(spec: &SpellEffectSpec) -> Option<EffectKind> {
    let kind = match spec.name.as_str() {
        "invisibility" => EffectKind::Invisibility,
        "paralysis" => EffectKind::Paralysis,
        "fear" => EffectKind::Fear,
        "glue" | "immobilized" => EffectKind::Glue,
        "slow" => EffectKind::Slow {
            every: spec.strength.max(2) as u32,
            counter: 0,
        },
        "taunted" => EffectKind::Taunted,
        "soul_ward" => EffectKind::SoulWard,
        "soul_burn" => EffectKind::SoulBurn {
            per_turn: spec.strength.max(1),
        },
        "plague" => EffectKind::Plague {
            per_turn: spec.strength.max(1),
        },
        _ => return None,
    };
    Some(kind)
}

fn entities_in_radius(ctx: &TurnCtx<'_>, center: Position, radius: f64) -> Vec<EntityId> {
    let mut ids: Vec<EntityId> = ctx
        .entities
        .iter()
        .filter(|e| e.fighter.is_some() && e.is_alive())
        .filter(|e| e.position.is_some_and(|p| p.euclidean(center) <= radius))
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    ids
}

fn entities_in_cone(
    ctx: &TurnCtx<'_>,
    origin: Position,
    toward: Position,
    range: f64,
    width_deg: f64,
) -> Vec<EntityId> {
    if origin == toward {
        return Vec::new();
    }
    let axis = (f64::from(toward.x - origin.x)).atan2(f64::from(toward.y - origin.y));
    let half_width = width_deg.to_radians() / 2.0;

    let mut ids: Vec<EntityId> = ctx
        .entities
        .iter()
        .filter(|e| e.fighter.is_some() && e.is_alive())
        .filter(|e| {
            let Some(p) = e.position else {
                return false;
            };
            if p == origin {
                return false;
            }
            let dist = origin.euclidean(p);
            if dist > range {
                return false;
            }
            let angle = (f64::from(p.x - origin.x)).atan2(f64::from(p.y - origin.y));
            let mut delta = (angle - axis).abs();
            if delta > std::f64::consts::PI {
                delta = 2.0 * std::f64::consts::PI - delta;
            }
            delta <= half_width
        })
        .map(|e| e.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// Cast toward the nearest hostile within range: the auto-targeting used by
/// offensive scrolls. Fizzles (consuming the scroll) when nothing is in
/// range.
pub fn cast_at_nearest_hostile(
    ctx: &mut TurnCtx<'_>,
    caster: EntityId,
    spell: &SpellDefinition,
) -> Vec<ResultEvent> {
    let Some(caster_entity) = ctx.entities.get(caster) else {
        return Vec::new();
    };
    let Some(caster_pos) = caster_entity.position else {
        return Vec::new();
    };
    let faction = caster_entity.faction;

    let nearest = ctx
        .entities
        .iter()
        .filter(|e| e.id != caster && e.is_alive() && are_hostile(faction, e.faction))
        .filter_map(|e| e.position.map(|p| (e.id, caster_pos.euclidean(p))))
        .filter(|(_, d)| *d <= f64::from(spell.range))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)))
        .map(|(id, _)| id);

    match nearest {
        Some(id) => cast_spell(ctx, caster, spell, SpellTarget::Entity(id)),
        None => vec![
            ResultEvent::plain("The magic finds no target and dissipates."),
            ResultEvent::Consumed(true),
        ],
    }
}
