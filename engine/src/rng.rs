//! Deterministic randomness.
//!
//! All generation draws from a [`RandomSource`] passed in explicitly. With the
//! default [`Lcg`] the whole engine is a pure function of the seed and the
//! call sequence, so a replay reproduces every board bit for bit.

/// A stream of uniform fractions in `[0, 1)`.
///
/// Not reentrant: draws must happen in a fixed order for replays to match.
pub trait RandomSource {
    fn next_fraction(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_fraction() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_fraction(&mut self) -> f64 {
        (**self).next_fraction()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_fraction(&mut self) -> f64 {
        (**self).next_fraction()
    }
}

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// 32-bit linear congruential generator:
/// `s = (1664525 * s + 1013904223) mod 2^32`, yielding `s / 2^32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub const DEFAULT_SEED: u32 = 12_345;

    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// A seed drawn from the thread RNG. Log it if the game should be
    /// reproducible later.
    #[must_use]
    pub fn entropy_seed() -> u32 {
        rand::random::<u32>()
    }

    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl RandomSource for Lcg {
    fn next_fraction(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / LCG_MODULUS
    }
}

/// Replays a fixed list of fractions, cycling when exhausted.
///
/// Lets tests and diagnostics drive generation down a chosen branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRng {
    /// Values are clamped into `[0, 1)`. An empty script always yields 0.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_fraction(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
