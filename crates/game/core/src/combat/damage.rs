//! Damage types and damage computation.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::components::Fighter;

/// Damage channel for resistances and outgoing-damage modifiers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    Necrotic,
    Arcane,
}

impl Default for DamageType {
    fn default() -> Self {
        Self::Physical
    }
}

/// Map from damage type to multiplier. `1.0` when absent.
pub type DamageModifiers = BTreeMap<DamageType, f32>;

/// Scale `amount` by the multiplier registered for `kind`, if any.
///
/// Used for both a defender's resistances (incoming) and an attacker's
/// damage-type modifiers (outgoing). The result is floored but never drops
/// a positive amount below 1 unless the multiplier is zero or negative.
pub fn apply_modifier(amount: i32, kind: DamageType, modifiers: &DamageModifiers) -> i32 {
    match modifiers.get(&kind) {
        None => amount,
        Some(&mult) => {
            if mult <= 0.0 {
                0
            } else {
                let scaled = (amount as f32 * mult).floor() as i32;
                if amount > 0 { scaled.max(1) } else { scaled }
            }
        }
    }
}

/// Compute the damage a connecting melee attack deals before resistances.
///
/// # Formula
///
/// ```text
/// base = dice_roll + power - defense     (minimum per config)
/// if critical: base *= crit_multiplier
/// ```
///
/// The dice roll is passed in so surprise/critical recomputation cannot
/// consume extra RNG draws.
pub fn melee_damage(
    dice_roll: i32,
    power: i32,
    defense: i32,
    is_critical: bool,
    crit_multiplier: i32,
    minimum: i32,
) -> i32 {
    let base = (dice_roll + power - defense).max(minimum);
    if is_critical { base * crit_multiplier } else { base }
}

/// Apply damage to a fighter, clamping HP at zero. Returns the new HP.
pub fn apply_damage(fighter: &mut Fighter, amount: i32) -> i32 {
    fighter.hp = (fighter.hp - amount.max(0)).max(0);
    fighter.hp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_defaults_to_identity() {
        let mods = DamageModifiers::new();
        assert_eq!(apply_modifier(7, DamageType::Fire, &mods), 7);
    }

    #[test]
    fn resistance_halves_and_floors() {
        let mut mods = DamageModifiers::new();
        mods.insert(DamageType::Fire, 0.5);
        assert_eq!(apply_modifier(7, DamageType::Fire, &mods), 3);
        // A positive hit never rounds to zero from a positive multiplier.
        assert_eq!(apply_modifier(1, DamageType::Fire, &mods), 1);
    }

    #[test]
    fn immunity_zeroes_damage() {
        let mut mods = DamageModifiers::new();
        mods.insert(DamageType::Poison, 0.0);
        assert_eq!(apply_modifier(12, DamageType::Poison, &mods), 0);
    }
}
