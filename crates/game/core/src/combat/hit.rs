//! Hit chance and accuracy calculations.
//!
//! Hit/dodge is one of the two independent combat axes: accuracy versus
//! evasion decides whether an attack connects at all, before the d20
//! attack roll decides damage quality. Speed (the ratchet) decides how
//! often you swing; accuracy decides how often you connect.

use crate::config::HitModelConfig;
use crate::rng::GameRng;

/// Compute the probability of hitting based on accuracy vs evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = base_hit + (accuracy - evasion) * step
/// clamped to [min_hit, max_hit]
/// ```
///
/// With defaults: base 75%, each stat point worth 5%, floor 5%, ceiling 95%.
pub fn hit_chance(accuracy: i32, evasion: i32, cfg: &HitModelConfig) -> f64 {
    let raw = cfg.base_hit + f64::from(accuracy - evasion) * cfg.step;
    raw.clamp(cfg.min_hit, cfg.max_hit)
}

/// Roll to determine if an attack hits.
///
/// The comparison is strict: a draw exactly equal to the chance misses.
pub fn roll_to_hit(rng: &mut GameRng, accuracy: i32, evasion: i32, cfg: &HitModelConfig) -> bool {
    rng.chance(hit_chance(accuracy, evasion, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_stats_give_base_chance() {
        let cfg = HitModelConfig::default();
        for stat in -10..=10 {
            assert!((hit_chance(stat, stat, &cfg) - cfg.base_hit).abs() < 1e-12);
        }
    }

    #[test]
    fn chance_is_clamped() {
        let cfg = HitModelConfig::default();
        for acc in -50..=50 {
            for eva in -50..=50 {
                let c = hit_chance(acc, eva, &cfg);
                assert!(c >= cfg.min_hit && c <= cfg.max_hit);
            }
        }
        assert!((hit_chance(100, 0, &cfg) - cfg.max_hit).abs() < 1e-12);
        assert!((hit_chance(0, 100, &cfg) - cfg.min_hit).abs() < 1e-12);
    }

    #[test]
    fn player_vs_orc_is_eighty_percent() {
        let cfg = HitModelConfig::default();
        assert!((hit_chance(2, 1, &cfg) - 0.80).abs() < 1e-12);
    }

    #[test]
    fn each_point_is_one_step() {
        let cfg = HitModelConfig::default();
        let base = hit_chance(2, 2, &cfg);
        assert!((hit_chance(3, 2, &cfg) - (base + cfg.step)).abs() < 1e-12);
        assert!((hit_chance(2, 3, &cfg) - (base - cfg.step)).abs() < 1e-12);
    }
}
