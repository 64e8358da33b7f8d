//! Speed-bonus tracker: the ratcheting bonus-attack mechanic.
//!
//! Sustained attacking builds momentum. Each attack increments a counter;
//! the chance of a bonus attack is `counter * ratio`. Hitting 100% grants a
//! guaranteed bonus and resets the counter; an early RNG success grants a
//! bonus but leaves the counter alone, so the attacker keeps building
//! toward the guaranteed one. Breaking momentum (moving, quaffing,
//! reading, leaving combat) resets the counter manually.
//!
//! This tracker is the only source of bonus attacks in combat.

use crate::rng::GameRng;

/// Per-attacker momentum ratchet.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpeedBonusTracker {
    /// Speed bonus as a ratio (0.25 = +25% speed). Never negative.
    pub speed_bonus_ratio: f64,
    /// Attacks made in the current ratchet cycle.
    pub attack_counter: u32,
}

impl SpeedBonusTracker {
    pub fn new(speed_bonus_ratio: f64) -> Self {
        Self {
            speed_bonus_ratio: speed_bonus_ratio.max(0.0),
            attack_counter: 0,
        }
    }

    /// Roll for a bonus attack opportunity. Call once per attack made.
    ///
    /// At ratio 0 the tracker never grants and never increments. At
    /// ratio >= 1 the very first attack is a guaranteed bonus.
    pub fn roll_for_bonus_attack(&mut self, rng: &mut GameRng) -> bool {
        if self.speed_bonus_ratio <= 0.0 {
            return false;
        }

        self.attack_counter += 1;
        let chance = f64::from(self.attack_counter) * self.speed_bonus_ratio;

        if chance >= 1.0 {
            // Guaranteed bonus; the cycle restarts.
            self.attack_counter = 0;
            return true;
        }

        // Early bonus: counter deliberately not reset.
        rng.chance(chance)
    }

    /// Reset the ratchet when momentum breaks.
    pub fn reset(&mut self) {
        self.attack_counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RNG wrapper that makes `chance` always fail by consuming real draws
    /// is unnecessary here: chance(p) with p <= 0 never succeeds, so we use
    /// seeds whose draws land above the tested thresholds where needed and
    /// assert the structural properties directly.
    #[test]
    fn zero_ratio_never_grants_never_increments() {
        let mut rng = GameRng::seeded(1);
        let mut tracker = SpeedBonusTracker::new(0.0);
        for _ in 0..50 {
            assert!(!tracker.roll_for_bonus_attack(&mut rng));
            assert_eq!(tracker.attack_counter, 0);
        }
    }

    #[test]
    fn ratio_one_guarantees_first_attack() {
        let mut rng = GameRng::seeded(1);
        let mut tracker = SpeedBonusTracker::new(1.0);
        for _ in 0..10 {
            assert!(tracker.roll_for_bonus_attack(&mut rng));
            assert_eq!(tracker.attack_counter, 0);
        }
    }

    #[test]
    fn guaranteed_bonus_within_ceiling_of_inverse_ratio() {
        // With r = 0.25 the fourth attack reaches chance 1.0 regardless of
        // how the early rolls went, provided none of them granted early.
        let mut rng = GameRng::seeded(1);
        let mut tracker = SpeedBonusTracker::new(0.25);
        let mut granted_within = 0;
        for attack in 1..=4 {
            if tracker.roll_for_bonus_attack(&mut rng) {
                granted_within = attack;
                break;
            }
        }
        assert!(granted_within >= 1 && granted_within <= 4);
    }

    #[test]
    fn early_bonus_does_not_reset_counter() {
        // Find a seed whose first unit draw is tiny so the 25% roll on the
        // first attack succeeds; the counter must stay at 1.
        let mut seed = 0u64;
        loop {
            let mut probe = GameRng::seeded(seed);
            if probe.unit() < 0.25 {
                break;
            }
            seed += 1;
        }
        let mut rng = GameRng::seeded(seed);
        let mut tracker = SpeedBonusTracker::new(0.25);
        assert!(tracker.roll_for_bonus_attack(&mut rng));
        assert_eq!(tracker.attack_counter, 1);
    }

    #[test]
    fn no_early_luck_means_guaranteed_on_fourth() {
        // Find a seed whose first three draws all miss 25/50/75%.
        let mut seed = 0u64;
        loop {
            let mut probe = GameRng::seeded(seed);
            if probe.unit() >= 0.25 && probe.unit() >= 0.50 && probe.unit() >= 0.75 {
                break;
            }
            seed += 1;
        }
        let mut rng = GameRng::seeded(seed);
        let mut tracker = SpeedBonusTracker::new(0.25);
        assert!(!tracker.roll_for_bonus_attack(&mut rng));
        assert!(!tracker.roll_for_bonus_attack(&mut rng));
        assert!(!tracker.roll_for_bonus_attack(&mut rng));
        // Fourth attack: chance 1.0, no RNG draw, counter resets.
        assert!(tracker.roll_for_bonus_attack(&mut rng));
        assert_eq!(tracker.attack_counter, 0);
    }

    #[test]
    fn manual_reset_clears_momentum() {
        let mut rng = GameRng::seeded(2);
        let mut tracker = SpeedBonusTracker::new(0.1);
        tracker.roll_for_bonus_attack(&mut rng);
        tracker.roll_for_bonus_attack(&mut rng);
        assert!(tracker.attack_counter > 0);
        tracker.reset();
        assert_eq!(tracker.attack_counter, 0);
    }
}
