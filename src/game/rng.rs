use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two random decisions a round makes: how long to wait before
/// the cue and whether the cue is a trap.
pub trait RandomSource {
    /// Uniform pick from `range` (end exclusive).
    fn cue_delay_ms(&mut self, range: Range<u32>) -> u32;
    /// True with the given probability.
    fn roll(&mut self, probability: f64) -> bool;
}

/// `StdRng`-backed source. Deterministic when built from a fixed seed.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seed from browser entropy, falling back to `fallback_seed` if the
    /// platform refuses.
    #[cfg(feature = "rng")]
    pub fn from_entropy_or(fallback_seed: u64) -> Self {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => Self::from_seed(u64::from_le_bytes(buf)),
            Err(err) => {
                log::warn!("entropy unavailable ({}), seeding from clock", err);
                Self::from_seed(fallback_seed)
            }
        }
    }

    #[cfg(not(feature = "rng"))]
    pub fn from_entropy_or(fallback_seed: u64) -> Self {
        Self::from_seed(fallback_seed)
    }
}

impl RandomSource for SeededRandom {
    fn cue_delay_ms(&mut self, range: Range<u32>) -> u32 {
        if range.is_empty() {
            return range.start;
        }
        self.rng.gen_range(range)
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}
