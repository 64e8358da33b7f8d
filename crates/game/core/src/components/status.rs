//! Status effect manager.
//!
//! Effects are named, expirable conditions with lifecycle hooks. The
//! manager enforces one active effect per name, applies refresh/replace
//! policy on duplicate insertion, and rejects effects the owner is immune
//! to. Hooks never mutate other entities directly; they return plain data
//! (skip flags, damage ticks, expirations) that the scheduler feeds through
//! the normal pipelines, so a DOT death finalizes exactly like a combat
//! death.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::combat::DamageType;
use crate::config::GameConfig;
use crate::faction::Faction;

/// Duration marker for effects that last until removed.
pub const PERMANENT: i32 = -1;

/// Closed set of status conditions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EffectKind {
    /// Cannot be targeted; breaks when the owner attacks.
    Invisibility,
    /// Skip the turn entirely.
    Paralysis,
    /// Forced flee behavior instead of the AI decision.
    Fear,
    /// No movement; attacking while adjacent still allowed.
    Glue,
    /// Skip every `every`th turn.
    Slow { every: u32, counter: u32 },
    /// All hostile AIs redirect their targeting to the owner.
    Taunted,
    /// Target selection is overridden toward the named faction.
    EnragedAgainstFaction { faction: Faction },
    /// Lich telegraph; resolves or cancels next turn.
    ChargingSoulBolt,
    /// Absorbs most of a Soul Bolt, converting the rest to Soul Burn.
    SoulWard,
    /// Necrotic damage over time.
    SoulBurn { per_turn: i32 },
    /// Poison damage over time; spreads on melee from carriers.
    Plague { per_turn: i32 },
}

impl EffectKind {
    /// Stable name used for lookup, immunities, and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invisibility => "invisibility",
            Self::Paralysis => "paralysis",
            Self::Fear => "fear",
            Self::Glue => "glue",
            Self::Slow { .. } => "slow",
            Self::Taunted => "taunted",
            Self::EnragedAgainstFaction { .. } => "enraged",
            Self::ChargingSoulBolt => "charging_soul_bolt",
            Self::SoulWard => "soul_ward",
            Self::SoulBurn { .. } => "soul_burn",
            Self::Plague { .. } => "plague",
        }
    }

    /// Per-turn damage tick, if this effect is a DOT.
    fn dot(&self) -> Option<(DamageType, i32)> {
        match self {
            Self::SoulBurn { per_turn } => Some((DamageType::Necrotic, *per_turn)),
            Self::Plague { per_turn } => Some((DamageType::Poison, *per_turn)),
            _ => None,
        }
    }

    /// Whether a duplicate insertion replaces the old instance (calling its
    /// removal path) instead of just refreshing the duration. Effects that
    /// carry strength replace; the rest refresh.
    fn replaces_on_duplicate(&self) -> bool {
        matches!(
            self,
            Self::SoulBurn { .. } | Self::Plague { .. } | Self::EnragedAgainstFaction { .. }
        )
    }
}

/// A named effect instance with a remaining duration in turns.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Turns remaining; [`PERMANENT`] means until removed.
    pub duration: i32,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration: i32) -> Self {
        Self { kind, duration }
    }

    pub fn permanent(kind: EffectKind) -> Self {
        Self::new(kind, PERMANENT)
    }
}

/// Outcome of an insertion attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Effect applied fresh.
    Applied,
    /// Same-named effect had its duration refreshed.
    Refreshed,
    /// Same-named effect was replaced by the new instance.
    Replaced,
    /// Owner is immune; nothing changed.
    Immune,
    /// Storage full; nothing changed.
    Rejected,
}

/// Result of the turn-start pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnStartOutcome {
    /// Some effect demands the whole turn be skipped (slow cadence).
    pub skip_turn: bool,
    /// Names of the effects that caused the skip, for messaging.
    pub skip_sources: Vec<&'static str>,
}

/// Result of the turn-end pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnEndOutcome {
    /// Damage ticks to run through the damage pipeline, in effect order.
    pub dot: Vec<(DamageType, i32, &'static str)>,
    /// Names of effects that expired this turn.
    pub expired: Vec<&'static str>,
}

/// Per-entity collection of active status effects.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
    /// Effect names this entity can never receive.
    pub immunities: BTreeSet<String>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_immunities(immunities: BTreeSet<String>) -> Self {
        Self {
            effects: ArrayVec::new(),
            immunities,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.kind.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Insert an effect, honoring immunities and the per-name policy.
    pub fn add(&mut self, effect: StatusEffect) -> AddOutcome {
        let name = effect.kind.name();
        if self.immunities.contains(name) {
            return AddOutcome::Immune;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind.name() == name) {
            if effect.kind.replaces_on_duplicate() {
                *existing = effect;
                return AddOutcome::Replaced;
            }
            // Refresh: keep the stronger remaining duration.
            existing.duration = if existing.duration == PERMANENT || effect.duration == PERMANENT {
                PERMANENT
            } else {
                existing.duration.max(effect.duration)
            };
            return AddOutcome::Refreshed;
        }

        if self.effects.try_push(effect).is_err() {
            return AddOutcome::Rejected;
        }
        AddOutcome::Applied
    }

    /// Remove an effect by name. Returns true if one was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind.name() != name);
        self.effects.len() != before
    }

    /// Clear everything (used when a fighter is dismantled on death).
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Turn-start hooks. Advances slow counters and reports skip demands.
    pub fn process_turn_start(&mut self) -> TurnStartOutcome {
        let mut outcome = TurnStartOutcome::default();
        for effect in self.effects.iter_mut() {
            if let EffectKind::Slow { every, counter } = &mut effect.kind {
                *counter += 1;
                if *every > 0 && *counter % *every == 0 {
                    outcome.skip_turn = true;
                    outcome.skip_sources.push("slow");
                }
            }
        }
        outcome
    }

    /// Turn-end hooks: collect DOT ticks, then decrement durations and drop
    /// expired effects. Removal happens after iteration, never during.
    pub fn process_turn_end(&mut self) -> TurnEndOutcome {
        let mut outcome = TurnEndOutcome::default();
        for effect in self.effects.iter() {
            if let Some((kind, amount)) = effect.kind.dot() {
                outcome.dot.push((kind, amount, effect.kind.name()));
            }
        }
        for effect in self.effects.iter_mut() {
            if effect.duration > 0 {
                effect.duration -= 1;
            }
        }
        for effect in self.effects.iter() {
            if effect.duration == 0 {
                outcome.expired.push(effect.kind.name());
            }
        }
        self.effects.retain(|e| e.duration != 0);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_effect_per_name() {
        let mut s = StatusEffects::new();
        assert_eq!(s.add(StatusEffect::new(EffectKind::Paralysis, 2)), AddOutcome::Applied);
        assert_eq!(s.add(StatusEffect::new(EffectKind::Paralysis, 5)), AddOutcome::Refreshed);
        assert_eq!(s.iter().count(), 1);
        assert_eq!(s.get("paralysis").unwrap().duration, 5);
    }

    #[test]
    fn refresh_keeps_longer_duration() {
        let mut s = StatusEffects::new();
        s.add(StatusEffect::new(EffectKind::Fear, 6));
        s.add(StatusEffect::new(EffectKind::Fear, 2));
        assert_eq!(s.get("fear").unwrap().duration, 6);
    }

    #[test]
    fn dot_replaces_rather_than_refreshes() {
        let mut s = StatusEffects::new();
        s.add(StatusEffect::new(EffectKind::Plague { per_turn: 2 }, 4));
        assert_eq!(
            s.add(StatusEffect::new(EffectKind::Plague { per_turn: 5 }, 3)),
            AddOutcome::Replaced
        );
        match s.get("plague").unwrap().kind {
            EffectKind::Plague { per_turn } => assert_eq!(per_turn, 5),
            _ => unreachable!(),
        }
    }

    #[test]
    fn immunity_rejects_by_name() {
        let mut immunities = BTreeSet::new();
        immunities.insert("paralysis".to_string());
        let mut s = StatusEffects::with_immunities(immunities);
        assert_eq!(s.add(StatusEffect::new(EffectKind::Paralysis, 3)), AddOutcome::Immune);
        assert!(!s.has("paralysis"));
    }

    #[test]
    fn durations_expire_at_turn_end() {
        let mut s = StatusEffects::new();
        s.add(StatusEffect::new(EffectKind::Glue, 2));
        s.add(StatusEffect::permanent(EffectKind::Taunted));

        let end = s.process_turn_end();
        assert!(end.expired.is_empty());
        let end = s.process_turn_end();
        assert_eq!(end.expired, vec!["glue"]);
        assert!(!s.has("glue"));
        assert!(s.has("taunted"));
    }

    #[test]
    fn dot_ticks_are_reported() {
        let mut s = StatusEffects::new();
        s.add(StatusEffect::new(EffectKind::SoulBurn { per_turn: 3 }, 2));
        let end = s.process_turn_end();
        assert_eq!(end.dot, vec![(DamageType::Necrotic, 3, "soul_burn")]);
    }

    #[test]
    fn slow_skips_on_cadence() {
        let mut s = StatusEffects::new();
        s.add(StatusEffect::new(EffectKind::Slow { every: 2, counter: 0 }, PERMANENT));
        assert!(!s.process_turn_start().skip_turn);
        assert!(s.process_turn_start().skip_turn);
        assert!(!s.process_turn_start().skip_turn);
        assert!(s.process_turn_start().skip_turn);
    }
}
