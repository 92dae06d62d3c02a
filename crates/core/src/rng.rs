//! RNG module - seeded randomness for spawn placement
//!
//! The engine never reaches for a global or thread-local RNG: every random
//! choice goes through a generator injected into the session. [`GameRng`] is
//! the default, a ChaCha8 stream keyed by a `u64` seed, so a seed fully
//! determines the spawn sequence of a game.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic spawn RNG
#[derive(Debug, Clone)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this RNG was created with (for replaying a game)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind to the start of the seeded stream
    pub fn reset(&mut self) {
        self.inner = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
