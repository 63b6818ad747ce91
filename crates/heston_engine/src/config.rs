//! Engine configuration: kernel selection and simulation sizing.
//!
//! The four sizing knobs mirror the fan-out structure of the scheduler:
//!
//! - `num_rngs` (R): concurrent random streams; trades implementation cost
//!   for generator throughput.
//! - `sims_per_rng`: paths each stream feeds within one group; trades
//!   per-worker buffering for reduced generator pressure.
//! - `num_groups`: sequential rounds; trades wall-clock time for total
//!   sample count N = R x sims_per_rng x num_groups, which controls the
//!   Monte Carlo estimator variance (proportional to 1/N).
//! - `n_steps` (M): time steps per path.
//!
//! All four are ordinary runtime fields; nothing is fixed at build time.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum total path count allowed (R x sims_per_rng x num_groups).
pub const MAX_TOTAL_PATHS: usize = 100_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 10_000;

/// Configuration errors: reported at startup, fatal, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Kernel name not recognised.
    #[error("unknown kernel '{0}': expected 'europeanVanilla' or 'europeanBarrier'")]
    UnknownKernel(String),

    /// Generator count must be >= 1.
    #[error("invalid generator count {0}: must be >= 1")]
    InvalidRngCount(usize),

    /// Per-generator batch size must be >= 1.
    #[error("invalid per-generator batch size {0}: must be >= 1")]
    InvalidBatchSize(usize),

    /// Simulation group count must be >= 1.
    #[error("invalid simulation group count {0}: must be >= 1")]
    InvalidGroupCount(usize),

    /// Step count outside [1, MAX_STEPS].
    #[error("invalid step count {0}: must be in range [1, {MAX_STEPS}]")]
    InvalidStepCount(usize),

    /// Total path count exceeds the sanity bound.
    #[error("total path count {requested} exceeds maximum {max}")]
    TooManyPaths {
        /// Requested R x sims_per_rng x num_groups product.
        requested: usize,
        /// The configured maximum.
        max: usize,
    },

    /// Kernel and contract disagree (e.g. barrier kernel with a vanilla
    /// contract).
    #[error("kernel '{kernel}' does not match the supplied contract")]
    KernelContractMismatch {
        /// The configured kernel name.
        kernel: &'static str,
    },
}

/// Payoff kernel selected by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum KernelKind {
    /// Terminal-price-only payoff.
    EuropeanVanilla,
    /// Payoff gated by a barrier breach.
    EuropeanBarrier,
}

impl KernelKind {
    /// The external kernel name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            KernelKind::EuropeanVanilla => "europeanVanilla",
            KernelKind::EuropeanBarrier => "europeanBarrier",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "europeanVanilla" => Ok(KernelKind::EuropeanVanilla),
            "europeanBarrier" => Ok(KernelKind::EuropeanBarrier),
            other => Err(ConfigError::UnknownKernel(other.to_string())),
        }
    }
}

/// Immutable engine configuration.
///
/// Use [`EngineConfig::builder`] to construct instances; validation happens
/// at build time.
///
/// # Examples
///
/// ```
/// use heston_engine::config::{EngineConfig, KernelKind};
///
/// let config = EngineConfig::builder()
///     .kernel(KernelKind::EuropeanVanilla)
///     .num_rngs(4)
///     .sims_per_rng(64)
///     .num_groups(2)
///     .n_steps(100)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.total_paths(), 512);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    kernel: KernelKind,
    num_rngs: usize,
    sims_per_rng: usize,
    num_groups: usize,
    n_steps: usize,
    seed: u64,
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the selected kernel.
    #[inline]
    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    /// Returns the number of concurrent random streams (R).
    #[inline]
    pub fn num_rngs(&self) -> usize {
        self.num_rngs
    }

    /// Returns the paths each stream feeds within one group.
    #[inline]
    pub fn sims_per_rng(&self) -> usize {
        self.sims_per_rng
    }

    /// Returns the number of sequential simulation groups.
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Returns the number of time steps per path (M).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the base RNG seed; stream `i` is seeded `seed + i`.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Total path count N = R x sims_per_rng x num_groups.
    #[inline]
    pub fn total_paths(&self) -> usize {
        self.num_rngs * self.sims_per_rng * self.num_groups
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rngs == 0 {
            return Err(ConfigError::InvalidRngCount(self.num_rngs));
        }
        if self.sims_per_rng == 0 {
            return Err(ConfigError::InvalidBatchSize(self.sims_per_rng));
        }
        if self.num_groups == 0 {
            return Err(ConfigError::InvalidGroupCount(self.num_groups));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        let total = self
            .num_rngs
            .checked_mul(self.sims_per_rng)
            .and_then(|n| n.checked_mul(self.num_groups))
            .unwrap_or(usize::MAX);
        if total > MAX_TOTAL_PATHS {
            return Err(ConfigError::TooManyPaths {
                requested: total,
                max: MAX_TOTAL_PATHS,
            });
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
///
/// Sizing defaults give a quick 512-path run (4 streams x 64 paths x
/// 2 groups) with 100 time steps.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfigBuilder {
    kernel: KernelKind,
    num_rngs: usize,
    sims_per_rng: usize,
    num_groups: usize,
    n_steps: usize,
    seed: u64,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self {
            kernel: KernelKind::EuropeanVanilla,
            num_rngs: 4,
            sims_per_rng: 64,
            num_groups: 2,
            n_steps: 100,
            seed: 0,
        }
    }
}

impl EngineConfigBuilder {
    /// Sets the pricing kernel.
    #[inline]
    pub fn kernel(mut self, kernel: KernelKind) -> Self {
        self.kernel = kernel;
        self
    }

    /// Sets the number of concurrent random streams.
    #[inline]
    pub fn num_rngs(mut self, num_rngs: usize) -> Self {
        self.num_rngs = num_rngs;
        self
    }

    /// Sets the per-stream batch size within one group.
    #[inline]
    pub fn sims_per_rng(mut self, sims_per_rng: usize) -> Self {
        self.sims_per_rng = sims_per_rng;
        self
    }

    /// Sets the number of sequential simulation groups.
    #[inline]
    pub fn num_groups(mut self, num_groups: usize) -> Self {
        self.num_groups = num_groups;
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = n_steps;
        self
    }

    /// Sets the base RNG seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            kernel: self.kernel,
            num_rngs: self.num_rngs,
            sims_per_rng: self.sims_per_rng,
            num_groups: self.num_groups,
            n_steps: self.n_steps,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_parse() {
        assert_eq!(
            "europeanVanilla".parse::<KernelKind>().unwrap(),
            KernelKind::EuropeanVanilla
        );
        assert_eq!(
            "europeanBarrier".parse::<KernelKind>().unwrap(),
            KernelKind::EuropeanBarrier
        );
    }

    #[test]
    fn test_kernel_parse_unknown() {
        let err = "asianLookback".parse::<KernelKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownKernel("asianLookback".to_string()));
        assert!(err.to_string().contains("asianLookback"));
    }

    #[test]
    fn test_kernel_name_round_trip() {
        for kernel in [KernelKind::EuropeanVanilla, KernelKind::EuropeanBarrier] {
            assert_eq!(kernel.name().parse::<KernelKind>().unwrap(), kernel);
        }
    }

    #[test]
    fn test_default_builder_is_512_paths() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config.total_paths(), 512);
        assert_eq!(config.n_steps(), 100);
        assert_eq!(config.seed(), 0);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = EngineConfig::builder()
            .kernel(KernelKind::EuropeanBarrier)
            .num_rngs(8)
            .sims_per_rng(32)
            .num_groups(10)
            .n_steps(252)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(config.kernel(), KernelKind::EuropeanBarrier);
        assert_eq!(config.total_paths(), 2560);
        assert_eq!(config.n_steps(), 252);
    }

    #[test]
    fn test_zero_rngs_rejected() {
        let result = EngineConfig::builder().num_rngs(0).build();
        assert_eq!(result, Err(ConfigError::InvalidRngCount(0)));
    }

    #[test]
    fn test_zero_batch_rejected() {
        let result = EngineConfig::builder().sims_per_rng(0).build();
        assert_eq!(result, Err(ConfigError::InvalidBatchSize(0)));
    }

    #[test]
    fn test_zero_groups_rejected() {
        let result = EngineConfig::builder().num_groups(0).build();
        assert_eq!(result, Err(ConfigError::InvalidGroupCount(0)));
    }

    #[test]
    fn test_step_count_bounds() {
        assert!(EngineConfig::builder().n_steps(0).build().is_err());
        assert!(EngineConfig::builder().n_steps(MAX_STEPS + 1).build().is_err());
        assert!(EngineConfig::builder().n_steps(MAX_STEPS).build().is_ok());
    }

    #[test]
    fn test_too_many_paths_rejected() {
        let result = EngineConfig::builder()
            .num_rngs(1_000)
            .sims_per_rng(1_000)
            .num_groups(1_000)
            .build();
        assert!(matches!(result, Err(ConfigError::TooManyPaths { .. })));
    }
}
