//! Injectable randomness for the `rotate` angle pick.

use crate::foundation::math::Rng64;

/// Source of uniformly distributed indices.
pub trait AngleSource: Send {
    /// Pick an index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Thread-local OS-seeded randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadAngles;

impl AngleSource for ThreadAngles {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}

/// Reproducible picks from a seed.
#[derive(Clone, Copy, Debug)]
pub struct SeededAngles(Rng64);

impl SeededAngles {
    pub fn new(seed: u64) -> Self {
        Self(Rng64::new(seed))
    }
}

impl AngleSource for SeededAngles {
    fn pick(&mut self, len: usize) -> usize {
        self.0.next_index(len)
    }
}

/// Always picks the same index (clamped to the range).
#[derive(Clone, Copy, Debug)]
pub struct FixedAngle(pub usize);

impl AngleSource for FixedAngle {
    fn pick(&mut self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}
