//! Payoff accumulation and result aggregation.
//!
//! [`PayoffAccumulator`] carries running sums of call/put payoffs (and their
//! squares, for standard errors) across completed paths. Accumulation is
//! plain addition: associative and commutative, so partial accumulators from
//! parallel workers can be merged in any grouping without changing the
//! result beyond floating-point rounding order.
//!
//! [`ResultAggregator`] reduces a finished accumulator into discounted mean
//! call/put prices, applying `exp(-r*T)` exactly once. The optional
//! verification comparison lives here too; a mismatch is a reported
//! pass/fail value, never an error, since it may reflect insufficient sample
//! count rather than a defect.

use heston_models::PayoffPair;
use serde::Serialize;

/// Default absolute tolerance for verification comparisons.
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Running sums of call/put payoffs across completed paths.
///
/// Owned per worker during a round and merged in slot order afterwards;
/// mutated additively only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffAccumulator {
    call_sum: f64,
    put_sum: f64,
    call_sq_sum: f64,
    put_sq_sum: f64,
    n_paths: u64,
}

impl PayoffAccumulator {
    /// Records one path's payoffs.
    #[inline]
    pub fn record(&mut self, payoff: PayoffPair) {
        self.call_sum += payoff.call;
        self.put_sum += payoff.put;
        self.call_sq_sum += payoff.call * payoff.call;
        self.put_sq_sum += payoff.put * payoff.put;
        self.n_paths += 1;
    }

    /// Merges another accumulator into this one.
    #[inline]
    pub fn merge(&mut self, other: PayoffAccumulator) {
        self.call_sum += other.call_sum;
        self.put_sum += other.put_sum;
        self.call_sq_sum += other.call_sq_sum;
        self.put_sq_sum += other.put_sq_sum;
        self.n_paths += other.n_paths;
    }

    /// Number of paths recorded so far.
    #[inline]
    pub fn n_paths(&self) -> u64 {
        self.n_paths
    }
}

/// Monte Carlo price estimates with standard errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PricingResult {
    /// Discounted mean call payoff.
    pub call_price: f64,
    /// Discounted mean put payoff.
    pub put_price: f64,
    /// Standard error of the call estimate (discounted).
    pub call_std_error: f64,
    /// Standard error of the put estimate (discounted).
    pub put_std_error: f64,
    /// Number of paths behind the estimate.
    pub n_paths: u64,
}

impl PricingResult {
    /// 95% confidence half-width of the call estimate.
    #[inline]
    pub fn call_confidence_95(&self) -> f64 {
        1.96 * self.call_std_error
    }

    /// 95% confidence half-width of the put estimate.
    #[inline]
    pub fn put_confidence_95(&self) -> f64 {
        1.96 * self.put_std_error
    }
}

/// Reduces a finished accumulator into discounted prices.
#[derive(Clone, Copy, Debug)]
pub struct ResultAggregator {
    discount_factor: f64,
}

impl ResultAggregator {
    /// Creates an aggregator discounting by `exp(-rate * maturity)`.
    pub fn new(rate: f64, maturity: f64) -> Self {
        Self {
            discount_factor: (-rate * maturity).exp(),
        }
    }

    /// Returns the discount factor applied at finalisation.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Produces the discounted mean prices and standard errors.
    ///
    /// An empty accumulator yields the zero result (n_paths = 0); the engine
    /// configuration makes that unreachable in practice.
    pub fn finalize(&self, acc: &PayoffAccumulator) -> PricingResult {
        let n = acc.n_paths;
        if n == 0 {
            return PricingResult::default();
        }
        let count = n as f64;
        let call_mean = acc.call_sum / count;
        let put_mean = acc.put_sum / count;

        let (call_se, put_se) = if n > 1 {
            // Unbiased sample variance from the running sums of squares
            let call_var = (acc.call_sq_sum - count * call_mean * call_mean) / (count - 1.0);
            let put_var = (acc.put_sq_sum - count * put_mean * put_mean) / (count - 1.0);
            (
                (call_var.max(0.0) / count).sqrt(),
                (put_var.max(0.0) / count).sqrt(),
            )
        } else {
            (0.0, 0.0)
        };

        PricingResult {
            call_price: self.discount_factor * call_mean,
            put_price: self.discount_factor * put_mean,
            call_std_error: self.discount_factor * call_se,
            put_std_error: self.discount_factor * put_se,
            n_paths: n,
        }
    }
}

/// Expected prices for the optional verification mode.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ExpectedPrices {
    /// Expected call price, if supplied.
    pub call: Option<f64>,
    /// Expected put price, if supplied.
    pub put: Option<f64>,
    /// Absolute tolerance for both comparisons.
    pub tolerance: f64,
}

impl ExpectedPrices {
    /// Compares a pricing result against the expected values.
    pub fn check(&self, result: &PricingResult) -> VerificationReport {
        let compare = |expected: f64, computed: f64| PriceCheck {
            expected,
            computed,
            error: (computed - expected).abs(),
            passed: (computed - expected).abs() <= self.tolerance,
        };
        VerificationReport {
            call: self.call.map(|e| compare(e, result.call_price)),
            put: self.put.map(|e| compare(e, result.put_price)),
        }
    }
}

/// One price comparison of the verification report.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PriceCheck {
    /// Externally supplied expected price.
    pub expected: f64,
    /// Monte Carlo estimate.
    pub computed: f64,
    /// Absolute difference.
    pub error: f64,
    /// Whether the difference is within tolerance.
    pub passed: bool,
}

/// Pass/fail outcome of the verification comparison.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VerificationReport {
    /// Call comparison, if an expected call price was supplied.
    pub call: Option<PriceCheck>,
    /// Put comparison, if an expected put price was supplied.
    pub put: Option<PriceCheck>,
}

impl VerificationReport {
    /// Returns `true` when every supplied comparison passed.
    pub fn passed(&self) -> bool {
        self.call.map(|c| c.passed).unwrap_or(true) && self.put.map(|p| p.passed).unwrap_or(true)
    }

    /// Returns `true` when no expected values were supplied at all.
    pub fn is_empty(&self) -> bool {
        self.call.is_none() && self.put.is_none()
    }
}
