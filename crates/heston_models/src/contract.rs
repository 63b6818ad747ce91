//! Option contract description.
//!
//! A contract is the strike plus the payoff kind: plain vanilla, or barrier
//! with a direction (up/down) and a knock polarity (in/out):
//!
//! - **Up-and-Out**: payoff deactivated once the price touches the barrier
//!   from below.
//! - **Up-and-In**: payoff activated only if the price touches the barrier
//!   from below.
//! - **Down-and-Out** / **Down-and-In**: same with the barrier approached
//!   from above.
//!
//! The breach test is evaluated by the path simulator at every time step;
//! the contract only decides what a terminal price and a latched breach flag
//! are worth.

use thiserror::Error;

/// Contract validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    /// Strike must be strictly positive.
    #[error("invalid strike: K = {0} (must be positive)")]
    InvalidStrike(f64),

    /// Barrier level must be strictly positive.
    #[error("invalid barrier level: B = {0} (must be positive)")]
    InvalidBarrierLevel(f64),
}

/// Which side of the spot the barrier sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarrierDirection {
    /// Breached when the price rises to or above the level.
    Up,
    /// Breached when the price falls to or below the level.
    Down,
}

/// Knock polarity of a barrier contract.
///
/// Defaults to knock-out, which is the more common convention and the
/// recommended default where documentation is silent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KnockStyle {
    /// Breach activates the payoff.
    In,
    /// Breach deactivates the payoff.
    #[default]
    Out,
}

/// Barrier specification: level, direction, and knock polarity.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierSpec {
    /// Barrier level.
    pub level: f64,
    /// Up or down barrier.
    pub direction: BarrierDirection,
    /// Knock-in or knock-out.
    pub style: KnockStyle,
}

impl BarrierSpec {
    /// Creates a validated barrier specification.
    pub fn new(
        level: f64,
        direction: BarrierDirection,
        style: KnockStyle,
    ) -> Result<Self, ContractError> {
        if !(level > 0.0 && level.is_finite()) {
            return Err(ContractError::InvalidBarrierLevel(level));
        }
        Ok(Self {
            level,
            direction,
            style,
        })
    }

    /// Creates an up-and-out barrier.
    pub fn up_out(level: f64) -> Result<Self, ContractError> {
        Self::new(level, BarrierDirection::Up, KnockStyle::Out)
    }

    /// Creates an up-and-in barrier.
    pub fn up_in(level: f64) -> Result<Self, ContractError> {
        Self::new(level, BarrierDirection::Up, KnockStyle::In)
    }

    /// Creates a down-and-out barrier.
    pub fn down_out(level: f64) -> Result<Self, ContractError> {
        Self::new(level, BarrierDirection::Down, KnockStyle::Out)
    }

    /// Creates a down-and-in barrier.
    pub fn down_in(level: f64) -> Result<Self, ContractError> {
        Self::new(level, BarrierDirection::Down, KnockStyle::In)
    }

    /// Returns `true` if the given price breaches the barrier.
    ///
    /// Touching the level counts as a breach in both directions.
    #[inline]
    pub fn is_breached(&self, price: f64) -> bool {
        match self.direction {
            BarrierDirection::Up => price >= self.level,
            BarrierDirection::Down => price <= self.level,
        }
    }

    /// Returns `true` for knock-in polarity.
    #[inline]
    pub fn is_knock_in(&self) -> bool {
        self.style == KnockStyle::In
    }
}

/// Payoff kind selected by the kernel name.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PayoffKind {
    /// Payoff depends only on the terminal price.
    Vanilla,
    /// Payoff additionally gated by a barrier breach.
    Barrier(BarrierSpec),
}

/// A European option contract: strike plus payoff kind.
///
/// Call and put are always evaluated together (the engine estimates both
/// prices from the same paths), so the contract does not carry a call/put
/// flag.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Strike price (K).
    pub strike: f64,
    /// Vanilla or barrier payoff.
    pub kind: PayoffKind,
}

impl OptionContract {
    /// Creates a vanilla contract.
    pub fn vanilla(strike: f64) -> Result<Self, ContractError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(ContractError::InvalidStrike(strike));
        }
        Ok(Self {
            strike,
            kind: PayoffKind::Vanilla,
        })
    }

    /// Creates a barrier contract.
    pub fn barrier(strike: f64, spec: BarrierSpec) -> Result<Self, ContractError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(ContractError::InvalidStrike(strike));
        }
        Ok(Self {
            strike,
            kind: PayoffKind::Barrier(spec),
        })
    }

    /// Returns the barrier specification, if any.
    #[inline]
    pub fn barrier_spec(&self) -> Option<BarrierSpec> {
        match self.kind {
            PayoffKind::Vanilla => None,
            PayoffKind::Barrier(spec) => Some(spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barrier_direction_up_breach() {
        let spec = BarrierSpec::up_out(110.0).unwrap();
        assert!(!spec.is_breached(109.9));
        assert!(spec.is_breached(110.0));
        assert!(spec.is_breached(150.0));
    }

    #[test]
    fn test_barrier_direction_down_breach() {
        let spec = BarrierSpec::down_out(90.0).unwrap();
        assert!(!spec.is_breached(90.1));
        assert!(spec.is_breached(90.0));
        assert!(spec.is_breached(50.0));
    }

    #[test]
    fn test_knock_style_default_is_out() {
        assert_eq!(KnockStyle::default(), KnockStyle::Out);
    }

    #[test]
    fn test_barrier_constructors() {
        assert!(BarrierSpec::up_in(110.0).unwrap().is_knock_in());
        assert!(!BarrierSpec::up_out(110.0).unwrap().is_knock_in());
        assert_eq!(
            BarrierSpec::down_in(90.0).unwrap().direction,
            BarrierDirection::Down
        );
    }

    #[test]
    fn test_invalid_barrier_level() {
        assert_eq!(
            BarrierSpec::up_out(0.0),
            Err(ContractError::InvalidBarrierLevel(0.0))
        );
        assert!(BarrierSpec::up_out(f64::INFINITY).is_err());
    }

    #[test]
    fn test_vanilla_contract() {
        let contract = OptionContract::vanilla(100.0).unwrap();
        assert_eq!(contract.kind, PayoffKind::Vanilla);
        assert!(contract.barrier_spec().is_none());
    }

    #[test]
    fn test_barrier_contract() {
        let spec = BarrierSpec::up_out(120.0).unwrap();
        let contract = OptionContract::barrier(100.0, spec).unwrap();
        assert_eq!(contract.barrier_spec(), Some(spec));
    }

    #[test]
    fn test_invalid_strike() {
        assert_eq!(
            OptionContract::vanilla(-1.0),
            Err(ContractError::InvalidStrike(-1.0))
        );
    }
}
