//! Deterministic random number generation.
//!
//! The engine owns exactly one [`GameRng`], stored inside `GameState` and
//! serialized with it, so a reloaded save continues the random sequence from
//! exactly where it stopped. Every roll site (hit checks, damage dice,
//! ratchet rolls, AI choices, corridor styles, respawn decisions) draws from
//! this generator; nothing else in the engine is allowed to produce
//! randomness.

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state, with a per-instance stream.
/// Small state, fast, and statistically solid, which is all a turn-discrete
/// simulation needs.
///
/// # Determinism
///
/// Given the same seed, the generator produces the same sequence. The full
/// state round-trips through serde, so save/load preserves the stream
/// position.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameRng {
    state: u64,
    inc: u64,
}

impl GameRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// Default stream increment.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self {
            state: 0,
            inc: Self::INCREMENT,
        };
        // Standard PCG seeding: one step, add seed, one more step.
        rng.step();
        rng.state = rng.state.wrapping_add(seed);
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(self.inc);
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Next raw 32-bit value.
    pub fn next_u32(&mut self) -> u32 {
        let prev = self.state;
        self.step();
        Self::output(prev)
    }

    /// Uniform draw in `[0.0, 1.0)`.
    pub fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Returns true with probability `p`.
    ///
    /// The comparison is strict: a draw exactly equal to `p` fails, matching
    /// the hit model's strict-inequality contract.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Roll a die with `sides` sides (1..=sides).
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        (self.next_u32() % sides) + 1
    }

    /// Uniform integer in `[min, max]` inclusive.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as u32;
        min + (self.next_u32() % span) as i32
    }

    /// Uniform index into a slice. Returns `None` for an empty slice.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u32() as usize) % len)
    }

    /// Sample `count` distinct indices from `0..len` without replacement.
    ///
    /// Partial Fisher-Yates over an index vector; order of the sample is
    /// itself random, which loop-edge selection relies on.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let count = count.min(len);
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = i + (self.next_u32() as usize) % (len - i);
            indices.swap(i, j);
        }
        indices.truncate(count);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::seeded(0xBA220);
        let mut b = GameRng::seeded(0xBA220);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn serde_round_trip_resumes_stream() {
        let mut rng = GameRng::seeded(7);
        for _ in 0..17 {
            rng.next_u32();
        }
        let bytes = bincode::serialize(&rng).unwrap();
        let mut restored: GameRng = bincode::deserialize(&bytes).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u32(), restored.next_u32());
        }
    }

    #[test]
    fn unit_is_half_open() {
        let mut rng = GameRng::seeded(42);
        for _ in 0..10_000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn sample_indices_are_distinct() {
        let mut rng = GameRng::seeded(3);
        let sample = rng.sample_indices(10, 6);
        assert_eq!(sample.len(), 6);
        let mut sorted = sample.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 6);
    }
}
