//! Hazard tile component.

use crate::combat::DamageType;

/// A damaging tile left behind by a spell (fire patch, miasma cloud).
///
/// Hazards tick at the end of each enemy phase, damaging whoever stands on
/// them, and despawn when their duration runs out.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Hazard {
    pub kind: DamageType,
    pub damage_per_turn: i32,
    pub turns_remaining: i32,
}

impl Hazard {
    pub fn new(kind: DamageType, damage_per_turn: i32, turns_remaining: i32) -> Self {
        Self {
            kind,
            damage_per_turn,
            turns_remaining,
        }
    }
}
