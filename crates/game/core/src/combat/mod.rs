//! Combat resolution.
//!
//! Split across four files the way the mechanics split: `hit` (accuracy vs
//! evasion), `dice`/`damage` (dice expressions, damage math, typed
//! modifiers), `attack` (the full two-axis pipeline with surprise and
//! tempo), and `death` (finalization shared by every lethal path).

mod attack;
mod damage;
mod death;
mod dice;
mod hit;

pub use attack::{AttackOptions, attack_with_tempo, resolve_attack};
pub(crate) use attack::mark_attacked;
pub use damage::{DamageModifiers, DamageType, apply_damage, apply_modifier, melee_damage};
pub use death::finalize_death;
pub use dice::{DiceExpr, ParseDiceError};
pub use hit::{hit_chance, roll_to_hit};
