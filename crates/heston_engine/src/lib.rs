//! Monte Carlo pricing engine for Heston vanilla and barrier options.
//!
//! The engine simulates correlated price/variance paths under the Heston
//! stochastic-volatility model with a full-truncation Euler scheme, prices
//! call and put legs from the same paths, and reports standard errors next
//! to every estimate.
//!
//! # Architecture
//!
//! ```text
//! scheduler::SimulationEngine
//! ├── config::EngineConfig        kernel, sizing, seed (validated builder)
//! ├── rng::RandomStream           MT19937-64 + Box-Muller, one per slot
//! ├── path::PathSimulator         full-truncation Euler steps, barrier latch
//! └── aggregate
//!     ├── PayoffAccumulator       per-slot running sums, slot-order merge
//!     ├── ResultAggregator        discounting, means, standard errors
//!     └── ExpectedPrices          optional verification comparison
//! ```
//!
//! A run fans `num_rngs` persistent random streams out across the rayon
//! pool for `num_groups` sequential rounds, `sims_per_rng` paths per stream
//! per round. Results are bitwise reproducible for a given configuration
//! and seed, independent of thread scheduling.

pub mod aggregate;
pub mod config;
pub mod path;
pub mod rng;
pub mod scheduler;

pub use aggregate::{
    ExpectedPrices, PayoffAccumulator, PriceCheck, PricingResult, ResultAggregator,
    VerificationReport, DEFAULT_TOLERANCE,
};
pub use config::{ConfigError, EngineConfig, EngineConfigBuilder, KernelKind};
pub use path::{PathOutcome, PathSimulator, PathState};
pub use rng::RandomStream;
pub use scheduler::SimulationEngine;
