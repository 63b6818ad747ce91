//! Simulation scheduler: sequential groups of parallel generator slots.
//!
//! The engine owns one [`RandomStream`] per generator slot, seeded
//! `base_seed + slot`. A run executes `num_groups` sequential rounds; within
//! a round every slot advances independently on the rayon pool, simulating
//! `sims_per_rng` paths and folding their payoffs into a private
//! [`PayoffAccumulator`]. Streams persist across rounds, so slot `i` draws
//! one uninterrupted Mersenne Twister sequence for the whole run.
//!
//! # Determinism
//!
//! Rayon may execute slots in any order, but each slot mutates only its own
//! stream and accumulator, and `par_iter_mut` preserves slot indexing. The
//! per-round partials are merged sequentially in slot order, so two runs
//! with the same configuration produce bitwise-identical results regardless
//! of thread scheduling.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregate::{PayoffAccumulator, PricingResult, ResultAggregator};
use crate::config::{ConfigError, EngineConfig, KernelKind};
use crate::path::PathSimulator;
use crate::rng::RandomStream;
use heston_models::{HestonParams, OptionContract, PayoffKind};

/// Monte Carlo pricing engine for one (model, contract) pair.
///
/// # Examples
///
/// ```
/// use heston_engine::config::{EngineConfig, KernelKind};
/// use heston_engine::scheduler::SimulationEngine;
/// use heston_models::{HestonParams, OptionContract};
///
/// let params = HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap();
/// let contract = OptionContract::vanilla(100.0).unwrap();
/// let config = EngineConfig::builder()
///     .kernel(KernelKind::EuropeanVanilla)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut engine = SimulationEngine::new(config, params, contract).unwrap();
/// let result = engine.run();
/// assert_eq!(result.n_paths, 512);
/// assert!(result.call_price > 0.0);
/// ```
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    contract: OptionContract,
    simulator: PathSimulator,
    aggregator: ResultAggregator,
    streams: Vec<RandomStream>,
}

impl SimulationEngine {
    /// Creates an engine, checking that the kernel matches the contract:
    /// `europeanVanilla` requires a vanilla contract, `europeanBarrier` a
    /// barrier one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KernelContractMismatch`] when they disagree.
    pub fn new(
        config: EngineConfig,
        params: HestonParams,
        contract: OptionContract,
    ) -> Result<Self, ConfigError> {
        let kernel_matches = match (config.kernel(), contract.kind) {
            (KernelKind::EuropeanVanilla, PayoffKind::Vanilla) => true,
            (KernelKind::EuropeanBarrier, PayoffKind::Barrier(_)) => true,
            _ => false,
        };
        if !kernel_matches {
            return Err(ConfigError::KernelContractMismatch {
                kernel: config.kernel().name(),
            });
        }

        let simulator = PathSimulator::new(&params, contract.barrier_spec(), config.n_steps());
        let aggregator = ResultAggregator::new(params.rate, params.maturity);
        let streams = Self::seed_streams(&config);

        Ok(Self {
            config,
            contract,
            simulator,
            aggregator,
            streams,
        })
    }

    fn seed_streams(config: &EngineConfig) -> Vec<RandomStream> {
        (0..config.num_rngs() as u64)
            .map(|slot| RandomStream::with_seed(config.seed().wrapping_add(slot)))
            .collect()
    }

    /// Returns the engine configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Reseeds every stream to its initial state, so the next [`run`]
    /// reproduces the first one exactly.
    ///
    /// [`run`]: SimulationEngine::run
    pub fn reset(&mut self) {
        self.streams = Self::seed_streams(&self.config);
    }

    /// Executes the full simulation and returns the discounted prices.
    ///
    /// Runs `num_groups` rounds; each round fans `num_rngs` slots out across
    /// the rayon pool and merges their partial accumulators in slot order.
    pub fn run(&mut self) -> PricingResult {
        info!(
            kernel = self.config.kernel().name(),
            total_paths = self.config.total_paths(),
            n_steps = self.config.n_steps(),
            num_rngs = self.config.num_rngs(),
            num_groups = self.config.num_groups(),
            seed = self.config.seed(),
            "starting simulation run"
        );

        let simulator = self.simulator;
        let contract = self.contract;
        let sims_per_rng = self.config.sims_per_rng();

        let mut total = PayoffAccumulator::default();
        for group in 0..self.config.num_groups() {
            let partials: Vec<PayoffAccumulator> = self
                .streams
                .par_iter_mut()
                .map(|stream| {
                    let mut acc = PayoffAccumulator::default();
                    for _ in 0..sims_per_rng {
                        let outcome = simulator.simulate(stream);
                        acc.record(
                            contract.evaluate(outcome.terminal_price, outcome.barrier_breached),
                        );
                    }
                    acc
                })
                .collect();

            // Slot-order merge keeps the summation order deterministic
            for partial in partials {
                total.merge(partial);
            }
            debug!(group, paths_done = total.n_paths(), "group complete");
        }

        let result = self.aggregator.finalize(&total);
        info!(
            call_price = result.call_price,
            put_price = result.put_price,
            call_std_error = result.call_std_error,
            put_std_error = result.put_std_error,
            n_paths = result.n_paths,
            "simulation run complete"
        );
        result
    }
}
