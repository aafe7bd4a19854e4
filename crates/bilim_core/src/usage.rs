//! Token usage and spend accounting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Token counts reported for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt.
    pub input_tokens: u64,
    /// Number of tokens in the generated output.
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Creates token usage data.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Input plus output tokens.
    pub fn total(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Price and balance settings used to estimate spend.
///
/// # Examples
///
/// ```
/// use bilim_core::UsagePricing;
///
/// let pricing = UsagePricing::default();
/// assert_eq!(pricing.cost_of(1000), 0.002);
/// assert_eq!(pricing.cost_of(0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsagePricing {
    /// Estimated USD cost of 1000 tokens.
    #[serde(default = "default_cost_per_1k_tokens")]
    pub cost_per_1k_tokens: f64,
    /// Prepaid balance the spend is deducted from.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
    /// Remaining balance below which a warning is logged.
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: f64,
}

fn default_cost_per_1k_tokens() -> f64 {
    0.002
}

fn default_initial_balance() -> f64 {
    5.0
}

fn default_low_balance_threshold() -> f64 {
    1.0
}

impl Default for UsagePricing {
    fn default() -> Self {
        Self {
            cost_per_1k_tokens: default_cost_per_1k_tokens(),
            initial_balance: default_initial_balance(),
            low_balance_threshold: default_low_balance_threshold(),
        }
    }
}

impl UsagePricing {
    /// Estimated cost of `tokens` tokens. Never negative for a non-negative price.
    pub fn cost_of(&self, tokens: u64) -> f64 {
        (tokens as f64 / 1000.0) * self.cost_per_1k_tokens.max(0.0)
    }
}

/// Cumulative consumption since the publisher first ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct UsageRecord {
    /// Tokens consumed across all generation calls.
    total_tokens: u64,
    /// Estimated spend in USD.
    total_cost: f64,
    /// Date of the first run.
    start_date: NaiveDate,
    /// Successful generation calls.
    facts_generated: u64,
}

impl UsageRecord {
    /// Creates an empty record starting on `start_date`.
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            total_tokens: 0,
            total_cost: 0.0,
            start_date,
            facts_generated: 0,
        }
    }

    /// Accounts for one generation call that consumed `tokens` tokens.
    pub fn add(&mut self, tokens: u64, pricing: &UsagePricing) {
        self.total_tokens = self.total_tokens.saturating_add(tokens);
        self.total_cost += pricing.cost_of(tokens);
        self.facts_generated = self.facts_generated.saturating_add(1);
    }

    /// Summarises the record as of `today`.
    pub fn report(&self, pricing: &UsagePricing, today: NaiveDate) -> UsageReport {
        let days_running = (today - self.start_date).num_days().max(1) as u64;
        UsageReport {
            remaining_balance: pricing.initial_balance - self.total_cost,
            total_tokens: self.total_tokens,
            total_cost: self.total_cost,
            facts_generated: self.facts_generated,
            days_running,
            facts_per_day: self.facts_generated as f64 / days_running as f64,
            cost_per_day: self.total_cost / days_running as f64,
            low_balance: pricing.initial_balance - self.total_cost
                < pricing.low_balance_threshold,
        }
    }
}

/// Derived spend statistics, logged after every generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    /// Initial balance minus estimated spend.
    pub remaining_balance: f64,
    /// Tokens consumed so far.
    pub total_tokens: u64,
    /// Estimated spend so far.
    pub total_cost: f64,
    /// Successful generation calls so far.
    pub facts_generated: u64,
    /// Whole days since the first run, at least one.
    pub days_running: u64,
    /// Average generation calls per day.
    pub facts_per_day: f64,
    /// Average spend per day.
    pub cost_per_day: f64,
    /// Remaining balance is under the warning threshold.
    pub low_balance: bool,
}
