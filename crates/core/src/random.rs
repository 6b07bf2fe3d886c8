use rand::SeedableRng;
use rand::rngs::StdRng;

/// A randomness abstraction for deterministic shuffles and tie-breaks in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum RandomSource {
    #[default]
    Default,
    Seeded(u64),
}

impl RandomSource {
    /// Returns a source seeded from the thread-local generator.
    #[must_use]
    pub fn default_source() -> Self {
        Self::Default
    }

    /// Returns a source that replays the same stream on every call.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(seed)
    }

    /// Returns a fresh generator according to the source.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self {
            RandomSource::Default => StdRng::from_rng(&mut rand::rng()),
            RandomSource::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }

    /// Returns true if this source is seeded.
    #[must_use]
    pub fn is_seeded(&self) -> bool {
        matches!(self, RandomSource::Seeded(_))
    }
}

/// Deterministic seed for tests and examples.
pub const FIXED_TEST_SEED: u64 = 0x5eed_cafe;

/// Returns a `RandomSource` seeded with the deterministic test seed.
#[must_use]
pub fn fixed_random() -> RandomSource {
    RandomSource::seeded(FIXED_TEST_SEED)
}
