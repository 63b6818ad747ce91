//! Heston model parameters.
//!
//! The Heston model describes the joint evolution of an asset price and its
//! instantaneous variance:
//!
//! ```text
//! dS = r * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + xi * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//!
//! where:
//! - S = asset price
//! - V = instantaneous variance
//! - r = risk-free rate
//! - kappa = mean-reversion speed
//! - theta = long-run variance
//! - xi = volatility of volatility (vol-of-vol)
//! - rho = correlation between the price and variance Brownian drivers
//!
//! ## Feller condition
//!
//! A sufficient condition for the variance process to stay strictly positive:
//! ```text
//! 2 * kappa * theta > xi^2
//! ```
//! The discretised simulator does not require it (negative variance is
//! clipped by the full-truncation scheme), so violation is reported through
//! [`HestonParams::satisfies_feller`] rather than as an error.

use thiserror::Error;

/// Heston parameter validation errors.
///
/// All variants are configuration errors: reported once at construction,
/// fatal, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Spot price must be strictly positive.
    #[error("invalid spot price: S0 = {0} (must be positive)")]
    InvalidSpot(f64),

    /// Initial variance must be strictly positive.
    #[error("invalid initial variance: v0 = {0} (must be positive)")]
    InvalidV0(f64),

    /// Long-run variance must be non-negative.
    #[error("invalid long-run variance: theta = {0} (must be non-negative)")]
    InvalidTheta(f64),

    /// Mean-reversion speed must be non-negative.
    #[error("invalid mean-reversion speed: kappa = {0} (must be non-negative)")]
    InvalidKappa(f64),

    /// Vol-of-vol must be non-negative.
    #[error("invalid vol-of-vol: xi = {0} (must be non-negative)")]
    InvalidXi(f64),

    /// Correlation must lie in [-1, 1].
    #[error("invalid correlation: rho = {0} (must be in [-1, 1])")]
    InvalidRho(f64),

    /// Risk-free rate must be finite.
    #[error("invalid risk-free rate: r = {0} (must be finite)")]
    InvalidRate(f64),

    /// Maturity must be strictly positive.
    #[error("invalid maturity: T = {0} (must be positive)")]
    InvalidMaturity(f64),
}

/// Heston model parameters.
///
/// Immutable, process-wide configuration for one simulation run. Constructed
/// once with [`HestonParams::new`], which validates every field; the engine
/// treats a constructed value as trusted input.
///
/// # Examples
///
/// ```
/// use heston_models::HestonParams;
///
/// let params = HestonParams::new(
///     100.0,  // spot
///     0.04,   // initial variance
///     0.04,   // long-run variance
///     2.0,    // mean-reversion speed
///     0.3,    // vol-of-vol
///     -0.7,   // correlation
///     0.05,   // risk-free rate
///     1.0,    // maturity
/// );
/// assert!(params.is_ok());
/// assert!(params.unwrap().satisfies_feller());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    /// Spot price (S0).
    pub spot: f64,
    /// Initial variance (v0).
    pub v0: f64,
    /// Long-run variance (theta).
    pub theta: f64,
    /// Mean-reversion speed (kappa).
    pub kappa: f64,
    /// Volatility of volatility (xi).
    pub xi: f64,
    /// Correlation between price and variance drivers (rho).
    pub rho: f64,
    /// Risk-free rate (r).
    pub rate: f64,
    /// Time to maturity in years (T).
    pub maturity: f64,
}

impl HestonParams {
    /// Creates a new parameter set, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`HestonError`] naming the first offending field. Bounds:
    /// `spot > 0`, `v0 > 0`, `theta >= 0`, `kappa >= 0`, `xi >= 0`,
    /// `rho in [-1, 1]`, `rate` finite, `maturity > 0`. Non-finite values
    /// are rejected everywhere.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: f64,
        v0: f64,
        theta: f64,
        kappa: f64,
        xi: f64,
        rho: f64,
        rate: f64,
        maturity: f64,
    ) -> Result<Self, HestonError> {
        let params = Self {
            spot,
            v0,
            theta,
            kappa,
            xi,
            rho,
            rate,
            maturity,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameter set.
    pub fn validate(&self) -> Result<(), HestonError> {
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(HestonError::InvalidSpot(self.spot));
        }
        if !(self.v0 > 0.0 && self.v0.is_finite()) {
            return Err(HestonError::InvalidV0(self.v0));
        }
        if !(self.theta >= 0.0 && self.theta.is_finite()) {
            return Err(HestonError::InvalidTheta(self.theta));
        }
        if !(self.kappa >= 0.0 && self.kappa.is_finite()) {
            return Err(HestonError::InvalidKappa(self.kappa));
        }
        if !(self.xi >= 0.0 && self.xi.is_finite()) {
            return Err(HestonError::InvalidXi(self.xi));
        }
        if !((-1.0..=1.0).contains(&self.rho) && self.rho.is_finite()) {
            return Err(HestonError::InvalidRho(self.rho));
        }
        if !self.rate.is_finite() {
            return Err(HestonError::InvalidRate(self.rate));
        }
        if !(self.maturity > 0.0 && self.maturity.is_finite()) {
            return Err(HestonError::InvalidMaturity(self.maturity));
        }
        Ok(())
    }

    /// Returns `true` when the Feller condition `2 * kappa * theta > xi^2`
    /// holds.
    #[inline]
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.kappa * self.theta > self.xi * self.xi
    }

    /// Discount factor `exp(-r * T)` for this parameter set.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_params() -> HestonParams {
        HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap()
    }

    #[test]
    fn test_valid_params() {
        let p = reference_params();
        assert_eq!(p.spot, 100.0);
        assert_eq!(p.rho, -0.7);
    }

    #[test]
    fn test_invalid_spot() {
        let result = HestonParams::new(-100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0);
        assert_eq!(result, Err(HestonError::InvalidSpot(-100.0)));
    }

    #[test]
    fn test_invalid_v0() {
        let result = HestonParams::new(100.0, 0.0, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0);
        assert_eq!(result, Err(HestonError::InvalidV0(0.0)));
    }

    #[test]
    fn test_invalid_rho() {
        let result = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -1.5, 0.05, 1.0);
        assert_eq!(result, Err(HestonError::InvalidRho(-1.5)));
    }

    #[test]
    fn test_rho_boundaries_allowed() {
        assert!(HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -1.0, 0.05, 1.0).is_ok());
        assert!(HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, 1.0, 0.05, 1.0).is_ok());
    }

    #[test]
    fn test_zero_vol_of_vol_allowed() {
        // xi = 0 degenerates to deterministic variance; still a valid model
        assert!(HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.0, -0.7, 0.05, 1.0).is_ok());
    }

    #[test]
    fn test_invalid_maturity() {
        let result = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 0.0);
        assert_eq!(result, Err(HestonError::InvalidMaturity(0.0)));
    }

    #[test]
    fn test_nan_rejected() {
        let result = HestonParams::new(f64::NAN, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_feller_condition() {
        // 2 * 2.0 * 0.04 = 0.16 > 0.3^2 = 0.09
        assert!(reference_params().satisfies_feller());

        // 2 * 0.5 * 0.04 = 0.04 < 0.6^2 = 0.36
        let violating = HestonParams::new(100.0, 0.04, 0.04, 0.5, 0.6, -0.7, 0.05, 1.0).unwrap();
        assert!(!violating.satisfies_feller());
    }

    #[test]
    fn test_discount_factor() {
        let p = reference_params();
        assert_relative_eq!(p.discount_factor(), (-0.05_f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_error_display_names_field() {
        let err = HestonError::InvalidRho(2.0);
        assert!(err.to_string().contains("rho"));
    }
}
