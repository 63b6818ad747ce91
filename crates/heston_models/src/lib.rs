//! Model-side types for the heston-mc pricing engine.
//!
//! This crate holds the immutable inputs of a simulation run:
//!
//! - [`HestonParams`]: the Heston stochastic-volatility model parameters,
//!   validated at construction time.
//! - [`OptionContract`]: the instrument being priced, a strike plus either a
//!   vanilla payoff or a barrier payoff with direction and knock polarity.
//! - Payoff evaluation ([`payoff`]): terminal price and breach flag in,
//!   undiscounted call/put payoffs out.
//!
//! Nothing in this crate is mutated during a simulation; the engine crate
//! owns all run-time state.

pub mod contract;
pub mod params;
pub mod payoff;

pub use contract::{BarrierDirection, BarrierSpec, ContractError, KnockStyle, OptionContract, PayoffKind};
pub use params::{HestonError, HestonParams};
pub use payoff::PayoffPair;
