//! Path state and the full-truncation Euler path simulator.
//!
//! One simulated path carries O(1) state: the current price, the current
//! variance, and a latched barrier-breach flag. No path history is retained;
//! memory cost per path is independent of the step count.
//!
//! # Discretisation
//!
//! Full-truncation Euler-Maruyama, the standard scheme for Heston Monte
//! Carlo: the variance is clipped to zero before it enters the drift and
//! diffusion terms, preventing undefined square roots when the discretised
//! variance goes negative.
//!
//! ```text
//! dt     = T / M
//! v+     = max(v, 0)
//! v_next = v + kappa (theta - v+) dt + xi sqrt(v+ dt) z_v
//! s_next = s * exp((r - 0.5 v+) dt + sqrt(v+ dt) z_s)
//! ```
//!
//! # Barrier latching
//!
//! The barrier condition is checked against the initial price and again
//! after every step; once breached the flag stays set. All M steps execute
//! regardless of the flag, so the work per path is fixed and the payoff
//! decision is deferred entirely to the evaluator.

use crate::rng::RandomStream;
use heston_models::{BarrierSpec, HestonParams};

/// Mutable state of one simulation path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathState {
    /// Current asset price.
    pub price: f64,
    /// Current instantaneous variance (may go negative between steps;
    /// clipped before use).
    pub variance: f64,
    /// Latched barrier-breach flag; never cleared once set.
    pub barrier_breached: bool,
}

/// Terminal outcome of one simulated path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathOutcome {
    /// Price after the final step.
    pub terminal_price: f64,
    /// Whether the barrier was breached at any observation.
    pub barrier_breached: bool,
}

/// Drives a [`PathState`] through M full-truncation Euler steps.
///
/// The simulator is immutable and shared by all workers; every per-path
/// mutation lives in the [`PathState`] and the caller's [`RandomStream`].
#[derive(Clone, Copy, Debug)]
pub struct PathSimulator {
    spot: f64,
    v0: f64,
    kappa: f64,
    theta: f64,
    xi: f64,
    rho: f64,
    rate: f64,
    dt: f64,
    n_steps: usize,
    barrier: Option<BarrierSpec>,
}

impl PathSimulator {
    /// Creates a simulator for the given model, optional barrier, and step
    /// count. `n_steps` must be >= 1 (enforced by the engine configuration).
    pub fn new(params: &HestonParams, barrier: Option<BarrierSpec>, n_steps: usize) -> Self {
        Self {
            spot: params.spot,
            v0: params.v0,
            kappa: params.kappa,
            theta: params.theta,
            xi: params.xi,
            rho: params.rho,
            rate: params.rate,
            dt: params.maturity / n_steps as f64,
            n_steps,
            barrier,
        }
    }

    /// Returns the time-step size `T / M`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Creates the initial state `(S0, V0)`, latching the barrier if the
    /// spot itself already breaches it (a barrier at S0 knocks immediately).
    #[inline]
    pub fn initial_state(&self) -> PathState {
        let breached = self
            .barrier
            .map(|spec| spec.is_breached(self.spot))
            .unwrap_or(false);
        PathState {
            price: self.spot,
            variance: self.v0,
            barrier_breached: breached,
        }
    }

    /// Advances the state by one step using the supplied correlated
    /// increments, then re-checks the barrier.
    #[inline]
    pub fn step(&self, state: &mut PathState, z_s: f64, z_v: f64) {
        let v_plus = state.variance.max(0.0);
        let vol_dt = (v_plus * self.dt).sqrt();

        state.variance += self.kappa * (self.theta - v_plus) * self.dt + self.xi * vol_dt * z_v;
        state.price *= ((self.rate - 0.5 * v_plus) * self.dt + vol_dt * z_s).exp();

        if let Some(spec) = self.barrier {
            if spec.is_breached(state.price) {
                state.barrier_breached = true;
            }
        }
    }

    /// Simulates one full path, consuming one correlated pair per step from
    /// the stream.
    pub fn simulate(&self, stream: &mut RandomStream) -> PathOutcome {
        let mut state = self.initial_state();
        for _ in 0..self.n_steps {
            let (z_s, z_v) = stream.next_correlated_pair(self.rho);
            self.step(&mut state, z_s, z_v);
        }
        PathOutcome {
            terminal_price: state.price,
            barrier_breached: state.barrier_breached,
        }
    }
}
