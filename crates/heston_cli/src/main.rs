//! hestonmc - Heston Monte Carlo option pricer
//!
//! Prices European vanilla and barrier options under the Heston
//! stochastic-volatility model and prints call/put estimates with standard
//! errors, as a table or as JSON.
//!
//! # Examples
//!
//! ```text
//! hestonmc europeanVanilla -n 100000 --seed 42
//! hestonmc europeanBarrier --barrier-level 120 --barrier-direction up
//! hestonmc europeanVanilla --expected-call 10.45 --tolerance 0.2
//! ```

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;

pub use error::{CliError, Result};

use heston_engine::{
    EngineConfig, ExpectedPrices, KernelKind, PricingResult, SimulationEngine, VerificationReport,
    DEFAULT_TOLERANCE,
};
use heston_models::{BarrierDirection, BarrierSpec, HestonParams, KnockStyle, OptionContract};

/// Heston Monte Carlo option pricer
#[derive(Parser)]
#[command(name = "hestonmc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pricing kernel (europeanVanilla or europeanBarrier)
    kernel: KernelKind,

    /// Total number of Monte Carlo paths (rounded up to whole groups)
    #[arg(short = 'n', long = "paths", default_value_t = 512)]
    paths: usize,

    /// Number of concurrent random streams
    #[arg(long, default_value_t = 4)]
    rngs: usize,

    /// Paths per stream within one simulation group
    #[arg(long, default_value_t = 64)]
    sims_per_rng: usize,

    /// Number of time steps per path
    #[arg(short = 'm', long = "steps", default_value_t = 100)]
    steps: usize,

    /// Base RNG seed (stream i is seeded seed + i)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Initial asset price (S0)
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Strike price (K)
    #[arg(long, default_value_t = 100.0)]
    strike: f64,

    /// Risk-free rate (r)
    #[arg(long, default_value_t = 0.05)]
    rate: f64,

    /// Initial variance (V0)
    #[arg(long, default_value_t = 0.04)]
    v0: f64,

    /// Long-run variance (theta)
    #[arg(long, default_value_t = 0.04)]
    theta: f64,

    /// Mean-reversion speed (kappa)
    #[arg(long, default_value_t = 2.0)]
    kappa: f64,

    /// Volatility of variance (xi)
    #[arg(long, default_value_t = 0.3)]
    xi: f64,

    /// Price/variance correlation (rho)
    #[arg(long, default_value_t = -0.7, allow_negative_numbers = true)]
    rho: f64,

    /// Time to maturity in years (T)
    #[arg(long, default_value_t = 1.0)]
    maturity: f64,

    /// Barrier level (required by the europeanBarrier kernel)
    #[arg(long)]
    barrier_level: Option<f64>,

    /// Barrier direction
    #[arg(long, value_enum, default_value_t = DirectionArg::Up)]
    barrier_direction: DirectionArg,

    /// Barrier knock style
    #[arg(long, value_enum, default_value_t = StyleArg::Out)]
    barrier_style: StyleArg,

    /// Expected call price for verification
    #[arg(long)]
    expected_call: Option<f64>,

    /// Expected put price for verification
    #[arg(long)]
    expected_put: Option<f64>,

    /// Absolute tolerance for verification
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for BarrierDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => BarrierDirection::Up,
            DirectionArg::Down => BarrierDirection::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleArg {
    In,
    Out,
}

impl From<StyleArg> for KnockStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::In => KnockStyle::In,
            StyleArg::Out => KnockStyle::Out,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let params = HestonParams::new(
        cli.spot,
        cli.v0,
        cli.theta,
        cli.kappa,
        cli.xi,
        cli.rho,
        cli.rate,
        cli.maturity,
    )?;
    if !params.satisfies_feller() {
        warn!("Feller condition 2*kappa*theta > xi^2 not satisfied; variance paths will touch zero frequently");
    }

    let contract = build_contract(&cli)?;
    let config = build_config(&cli)?;

    if config.total_paths() != cli.paths {
        info!(
            requested = cli.paths,
            effective = config.total_paths(),
            "path count rounded up to a whole number of groups"
        );
    }

    let mut engine = SimulationEngine::new(config, params, contract)?;
    let result = engine.run();

    let verification = expected_prices(&cli).map(|expected| expected.check(&result));

    match cli.format {
        OutputFormat::Table => print_table(&cli, &config, &result, verification.as_ref()),
        OutputFormat::Json => print_json(&cli, &result, verification.as_ref())?,
    }

    Ok(())
}

fn build_contract(cli: &Cli) -> Result<OptionContract> {
    match cli.kernel {
        KernelKind::EuropeanVanilla => Ok(OptionContract::vanilla(cli.strike)?),
        KernelKind::EuropeanBarrier => {
            let level = cli
                .barrier_level
                .ok_or(CliError::MissingArgument("--barrier-level"))?;
            let spec = BarrierSpec::new(
                level,
                cli.barrier_direction.into(),
                cli.barrier_style.into(),
            )?;
            Ok(OptionContract::barrier(cli.strike, spec)?)
        }
    }
}

/// Derives the group count from the requested total, rounding up so the
/// effective path count is never below the request.
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let per_group = cli.rngs.checked_mul(cli.sims_per_rng).unwrap_or(usize::MAX);
    let num_groups = if per_group == 0 {
        // Let the builder produce the precise error for the zero field
        1
    } else {
        cli.paths.div_ceil(per_group).max(1)
    };
    Ok(EngineConfig::builder()
        .kernel(cli.kernel)
        .num_rngs(cli.rngs)
        .sims_per_rng(cli.sims_per_rng)
        .num_groups(num_groups)
        .n_steps(cli.steps)
        .seed(cli.seed)
        .build()?)
}

fn expected_prices(cli: &Cli) -> Option<ExpectedPrices> {
    if cli.expected_call.is_none() && cli.expected_put.is_none() {
        return None;
    }
    Some(ExpectedPrices {
        call: cli.expected_call,
        put: cli.expected_put,
        tolerance: cli.tolerance,
    })
}

fn print_table(
    cli: &Cli,
    config: &EngineConfig,
    result: &PricingResult,
    verification: Option<&VerificationReport>,
) {
    println!();
    println!("Kernel:    {}", cli.kernel);
    println!(
        "Paths:     {} ({} rngs x {} sims x {} groups, {} steps, seed {})",
        config.total_paths(),
        config.num_rngs(),
        config.sims_per_rng(),
        config.num_groups(),
        config.n_steps(),
        config.seed()
    );
    println!();
    println!("┌──────┬────────────┬────────────┐");
    println!("│      │ Price      │ Std Error  │");
    println!("├──────┼────────────┼────────────┤");
    println!(
        "│ Call │ {:>10.6} │ {:>10.6} │",
        result.call_price, result.call_std_error
    );
    println!(
        "│ Put  │ {:>10.6} │ {:>10.6} │",
        result.put_price, result.put_std_error
    );
    println!("└──────┴────────────┴────────────┘");

    if let Some(report) = verification {
        println!();
        if let Some(check) = report.call {
            println!(
                "Call check: expected {:.6}, computed {:.6}, error {:.6} -> {}",
                check.expected,
                check.computed,
                check.error,
                if check.passed { "PASS" } else { "FAIL" }
            );
        }
        if let Some(check) = report.put {
            println!(
                "Put check:  expected {:.6}, computed {:.6}, error {:.6} -> {}",
                check.expected,
                check.computed,
                check.error,
                if check.passed { "PASS" } else { "FAIL" }
            );
        }
    }
}

fn print_json(
    cli: &Cli,
    result: &PricingResult,
    verification: Option<&VerificationReport>,
) -> Result<()> {
    let output = serde_json::json!({
        "kernel": cli.kernel,
        "result": result,
        "verification": verification,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
