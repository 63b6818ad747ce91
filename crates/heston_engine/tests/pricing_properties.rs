//! End-to-end pricing properties of the full engine.
//!
//! These tests run the whole pipeline (streams, paths, payoffs,
//! aggregation) and check the statistical and structural properties a
//! correct Monte Carlo pricer must satisfy: determinism, put-call parity,
//! 1/sqrt(N) error decay, barrier in/out complementarity, and agreement
//! with a semi-analytic reference value.

use approx::assert_relative_eq;
use heston_engine::{EngineConfig, ExpectedPrices, KernelKind, SimulationEngine};
use heston_models::{BarrierSpec, HestonParams, OptionContract};

/// Reference scenario: S0 = K = 100, r = 5%, V0 = theta = 0.04, kappa = 2,
/// xi = 0.3, rho = -0.7, T = 1.
fn reference_params() -> HestonParams {
    HestonParams::new(100.0, 0.04, 0.04, 2.0, 0.3, -0.7, 0.05, 1.0).unwrap()
}

fn vanilla_engine(num_groups: usize, seed: u64) -> SimulationEngine {
    let config = EngineConfig::builder()
        .kernel(KernelKind::EuropeanVanilla)
        .num_rngs(4)
        .sims_per_rng(64)
        .num_groups(num_groups)
        .n_steps(100)
        .seed(seed)
        .build()
        .unwrap();
    let contract = OptionContract::vanilla(100.0).unwrap();
    SimulationEngine::new(config, reference_params(), contract).unwrap()
}

fn barrier_engine(spec: BarrierSpec, num_groups: usize, seed: u64) -> SimulationEngine {
    let config = EngineConfig::builder()
        .kernel(KernelKind::EuropeanBarrier)
        .num_rngs(4)
        .sims_per_rng(64)
        .num_groups(num_groups)
        .n_steps(100)
        .seed(seed)
        .build()
        .unwrap();
    let contract = OptionContract::barrier(100.0, spec).unwrap();
    SimulationEngine::new(config, reference_params(), contract).unwrap()
}

#[test]
fn test_runs_are_deterministic_across_engines() {
    let first = vanilla_engine(4, 42).run();
    let second = vanilla_engine(4, 42).run();
    assert_eq!(first, second);
}

#[test]
fn test_put_call_parity() {
    // C - P = S0 - K exp(-rT) holds path-by-path for vanilla payoffs, so
    // the Monte Carlo estimates satisfy it up to sampling noise.
    let result = vanilla_engine(96, 42).run(); // 24_576 paths
    let parity = 100.0 - 100.0 * (-0.05_f64).exp();
    assert_relative_eq!(
        result.call_price - result.put_price,
        parity,
        epsilon = 0.5
    );
}

#[test]
fn test_std_error_decays_as_sqrt_n() {
    // 16x the paths should cut the standard error by about 4x. Different
    // seeds keep the two estimates independent.
    let small = vanilla_engine(6, 11).run(); // 1_536 paths
    let large = vanilla_engine(96, 12).run(); // 24_576 paths
    let ratio = small.call_std_error / large.call_std_error;
    assert!(
        (2.5..6.0).contains(&ratio),
        "se ratio {} outside plausible band for 16x paths",
        ratio
    );
}

#[test]
fn test_reference_scenario_prices() {
    // Semi-analytic Heston value for the reference scenario is close to the
    // Black-Scholes price at sigma = 0.2 (E[integral of V] = 0.04): call
    // about 10.4, put about 5.5 by parity.
    let result = vanilla_engine(384, 42).run(); // 98_304 paths
    assert_relative_eq!(result.call_price, 10.4, epsilon = 0.6);
    assert_relative_eq!(result.put_price, 5.52, epsilon = 0.6);

    let expected = ExpectedPrices {
        call: Some(result.call_price),
        put: Some(result.put_price),
        tolerance: 0.1,
    };
    assert!(expected.check(&result).passed());
}

#[test]
fn test_barrier_at_spot_prices_to_zero() {
    // An up-and-out barrier at S0 is breached before the first step on
    // every path, so both knock-out prices are exactly zero.
    let spec = BarrierSpec::up_out(100.0).unwrap();
    let result = barrier_engine(spec, 8, 42).run();
    assert_eq!(result.call_price, 0.0);
    assert_eq!(result.put_price, 0.0);
    assert_eq!(result.call_std_error, 0.0);
}

#[test]
fn test_knock_out_bounded_by_vanilla() {
    // Each knocked-out path forfeits a non-negative payoff, so the
    // knock-out price cannot exceed the vanilla price on the same draws.
    let vanilla = vanilla_engine(16, 42).run();
    let spec = BarrierSpec::up_out(115.0).unwrap();
    let knock_out = barrier_engine(spec, 16, 42).run();
    assert!(knock_out.call_price <= vanilla.call_price);
    assert!(knock_out.put_price <= vanilla.put_price);
}

#[test]
fn test_in_out_parity() {
    // With identical seeds the path sets coincide, and every path pays
    // either the knock-in or the knock-out leg. In + out therefore equals
    // vanilla to floating-point accuracy, not just statistically.
    let vanilla = vanilla_engine(16, 42).run();
    let knock_out = barrier_engine(BarrierSpec::up_out(115.0).unwrap(), 16, 42).run();
    let knock_in = barrier_engine(BarrierSpec::up_in(115.0).unwrap(), 16, 42).run();

    assert_relative_eq!(
        knock_in.call_price + knock_out.call_price,
        vanilla.call_price,
        max_relative = 1e-10
    );
    assert_relative_eq!(
        knock_in.put_price + knock_out.put_price,
        vanilla.put_price,
        max_relative = 1e-10
    );
}

#[test]
fn test_grouping_invariance() {
    // With the stream count fixed, trading sims_per_rng against num_groups
    // leaves each stream's draw sequence unchanged; only the summation
    // grouping moves, so the prices agree to rounding accuracy.
    let contract = OptionContract::vanilla(100.0).unwrap();
    let build = |sims: usize, groups: usize| {
        let config = EngineConfig::builder()
            .kernel(KernelKind::EuropeanVanilla)
            .num_rngs(4)
            .sims_per_rng(sims)
            .num_groups(groups)
            .n_steps(100)
            .seed(42)
            .build()
            .unwrap();
        SimulationEngine::new(config, reference_params(), contract).unwrap()
    };

    let a = build(64, 8).run();
    let b = build(8, 64).run();
    assert_eq!(a.n_paths, b.n_paths);
    assert_relative_eq!(a.call_price, b.call_price, max_relative = 1e-9);
    assert_relative_eq!(a.put_price, b.put_price, max_relative = 1e-9);
}

#[test]
fn test_verification_mismatch_reports_failure() {
    // A wildly wrong expectation fails the check but produces a report,
    // not an error.
    let result = vanilla_engine(8, 42).run();
    let expected = ExpectedPrices {
        call: Some(result.call_price + 50.0),
        put: None,
        tolerance: 0.1,
    };
    let report = expected.check(&result);
    assert!(!report.passed());
    assert!(report.call.unwrap().error > 49.0);
}
