//! Random stream: Mersenne Twister uniforms and Box-Muller normals.
//!
//! [`RandomStream`] wraps an MT19937-64 Mersenne Twister and layers the two
//! transforms the path simulator needs on top of it:
//!
//! 1. uniform pairs strictly inside (0, 1), and
//! 2. standard-normal pairs via the Box-Muller transform, optionally
//!    correlated with coefficient rho.
//!
//! # Open-interval guarantee
//!
//! Box-Muller evaluates `ln(u1)`, so a uniform draw of exactly 0 would be
//! undefined. The mapping here uses the 53 high bits of each 64-bit draw with
//! a half-ulp offset, `(bits + 0.5) / 2^53`, whose range is
//! `[2^-54, 1 - 2^-54]`. Neither endpoint of (0, 1) is reachable, so the
//! domain error is prevented by construction rather than handled reactively.
//!
//! # Determinism
//!
//! Two streams created with the same seed produce identical sequences. Each
//! stream owns its generator state exclusively; the scheduler never shares a
//! stream between concurrent workers.

use rand_mt::Mt19937GenRand64;
use std::f64::consts::TAU;

/// 2^53 as f64, the divisor of the open-interval uniform mapping.
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

/// A seeded pseudo-random stream of uniform and normal pairs.
///
/// # Examples
///
/// ```
/// use heston_engine::rng::RandomStream;
///
/// let mut a = RandomStream::with_seed(42);
/// let mut b = RandomStream::with_seed(42);
///
/// // Same seed produces identical sequences
/// assert_eq!(a.next_uniform_pair(), b.next_uniform_pair());
/// assert_eq!(a.next_normal_pair(), b.next_normal_pair());
/// ```
#[derive(Debug)]
pub struct RandomStream {
    /// The underlying MT19937-64 generator.
    rng: Mt19937GenRand64,
    /// The seed used at construction (kept for logging and reseeding).
    seed: u64,
}

impl RandomStream {
    /// Creates a stream seeded with the given value.
    #[inline]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
            seed,
        }
    }

    /// Returns the construction seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next uniform deviate in the open interval (0, 1).
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        ((self.rng.next_u64() >> 11) as f64 + 0.5) / TWO_POW_53
    }

    /// Next pair of independent uniforms, each in (0, 1).
    #[inline]
    pub fn next_uniform_pair(&mut self) -> (f64, f64) {
        let u1 = self.next_uniform();
        let u2 = self.next_uniform();
        (u1, u2)
    }

    /// Next pair of independent standard normals via Box-Muller:
    ///
    /// ```text
    /// z1 = sqrt(-2 ln u1) * cos(2 pi u2)
    /// z2 = sqrt(-2 ln u1) * sin(2 pi u2)
    /// ```
    #[inline]
    pub fn next_normal_pair(&mut self) -> (f64, f64) {
        let (u1, u2) = self.next_uniform_pair();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = TAU * u2;
        (radius * angle.cos(), radius * angle.sin())
    }

    /// Next correlated standard-normal pair `(z_s, z_v)` with
    /// `corr(z_s, z_v) = rho`:
    ///
    /// ```text
    /// z_s = z1
    /// z_v = rho * z1 + sqrt(1 - rho^2) * z2
    /// ```
    ///
    /// The pair drives one price/variance path step and is consumed
    /// immediately, never persisted.
    #[inline]
    pub fn next_correlated_pair(&mut self, rho: f64) -> (f64, f64) {
        let (z1, z2) = self.next_normal_pair();
        (z1, rho * z1 + (1.0 - rho * rho).sqrt() * z2)
    }
}
