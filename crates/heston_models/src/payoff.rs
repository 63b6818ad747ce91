//! Payoff evaluation.
//!
//! Converts a terminal path outcome (final price plus barrier breach flag)
//! into undiscounted call and put payoffs. Discounting by `exp(-r*T)` is
//! applied exactly once during aggregation, never per path.

use crate::contract::{OptionContract, PayoffKind};

/// Call and put payoffs for one completed path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffPair {
    /// Undiscounted call payoff, always >= 0.
    pub call: f64,
    /// Undiscounted put payoff, always >= 0.
    pub put: f64,
}

impl PayoffPair {
    /// The zero payoff (knocked-out or never knocked-in path).
    pub const ZERO: Self = Self {
        call: 0.0,
        put: 0.0,
    };
}

/// Intrinsic call payoff `max(S_T - K, 0)`.
#[inline]
pub fn call_payoff(terminal: f64, strike: f64) -> f64 {
    (terminal - strike).max(0.0)
}

/// Intrinsic put payoff `max(K - S_T, 0)`.
#[inline]
pub fn put_payoff(terminal: f64, strike: f64) -> f64 {
    (strike - terminal).max(0.0)
}

impl OptionContract {
    /// Evaluates the contract for one path.
    ///
    /// `barrier_breached` is the flag latched by the path simulator; it is
    /// ignored for vanilla contracts. For barrier contracts the gating is:
    ///
    /// - knock-out: both payoffs forced to zero when breached;
    /// - knock-in: both payoffs forced to zero when NOT breached.
    #[inline]
    pub fn evaluate(&self, terminal: f64, barrier_breached: bool) -> PayoffPair {
        let intrinsic = PayoffPair {
            call: call_payoff(terminal, self.strike),
            put: put_payoff(terminal, self.strike),
        };

        match self.kind {
            PayoffKind::Vanilla => intrinsic,
            PayoffKind::Barrier(spec) => {
                let active = if spec.is_knock_in() {
                    barrier_breached
                } else {
                    !barrier_breached
                };
                if active {
                    intrinsic
                } else {
                    PayoffPair::ZERO
                }
            }
        }
    }
}
