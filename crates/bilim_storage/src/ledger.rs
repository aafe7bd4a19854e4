//! Usage ledger backends.

use crate::json_file::{read_json, write_json};
use async_trait::async_trait;
use bilim_core::{TokenUsage, UsagePricing, UsageRecord, UsageReport};
use bilim_error::BilimResult;
use bilim_interface::UsageLedger;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Logs a usage report as structured fields, warning when the balance is low.
pub fn log_usage_report(report: &UsageReport) {
    info!(
        remaining_balance = %format!("{:.3}", report.remaining_balance),
        total_tokens = report.total_tokens,
        total_cost = %format!("{:.3}", report.total_cost),
        facts_generated = report.facts_generated,
        facts_per_day = %format!("{:.1}", report.facts_per_day),
        cost_per_day = %format!("{:.4}", report.cost_per_day),
        "Usage statistics"
    );

    if report.low_balance {
        warn!(
            remaining_balance = %format!("{:.3}", report.remaining_balance),
            "Estimated balance is running low"
        );
    }
}

/// Usage ledger persisted as a single JSON object.
///
/// The file is read once in [`JsonUsageLedger::open`] and rewritten in full
/// after every [`UsageLedger::record`] call.
#[derive(Debug)]
pub struct JsonUsageLedger {
    path: PathBuf,
    pricing: UsagePricing,
    record: Mutex<UsageRecord>,
}

impl JsonUsageLedger {
    /// Opens the ledger at `path`, creating it with today's start date if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or decoded, or if a
    /// new file cannot be written.
    #[instrument(skip(path, pricing), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, pricing: UsagePricing) -> BilimResult<Self> {
        let path = path.as_ref().to_path_buf();

        let record = match read_json::<UsageRecord>(&path).await? {
            Some(record) => {
                debug!(
                    total_tokens = record.total_tokens(),
                    facts_generated = record.facts_generated(),
                    "Loaded usage ledger"
                );
                record
            }
            None => {
                let record = UsageRecord::new(Local::now().date_naive());
                write_json(&path, &record).await?;
                info!(start_date = %record.start_date(), "Created usage ledger");
                record
            }
        };

        Ok(Self {
            path,
            pricing,
            record: Mutex::new(record),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Report for the current record as of today.
    pub async fn report(&self) -> UsageReport {
        self.record
            .lock()
            .await
            .report(&self.pricing, Local::now().date_naive())
    }
}

#[async_trait]
impl UsageLedger for JsonUsageLedger {
    #[instrument(skip(self), fields(tokens = usage.total()))]
    async fn record(&self, usage: TokenUsage) -> BilimResult<UsageRecord> {
        let mut record = self.record.lock().await;
        let previous = record.clone();
        record.add(usage.total(), &self.pricing);
        if let Err(e) = write_json(&self.path, &*record).await {
            *record = previous;
            return Err(e);
        }

        log_usage_report(&record.report(&self.pricing, Local::now().date_naive()));
        Ok(record.clone())
    }

    async fn snapshot(&self) -> UsageRecord {
        self.record.lock().await.clone()
    }

    fn pricing(&self) -> &UsagePricing {
        &self.pricing
    }
}

/// In-memory usage ledger.
#[derive(Debug)]
pub struct MemoryUsageLedger {
    pricing: UsagePricing,
    record: parking_lot::Mutex<UsageRecord>,
}

impl MemoryUsageLedger {
    /// Creates an empty ledger starting on `start_date`.
    pub fn new(start_date: NaiveDate, pricing: UsagePricing) -> Self {
        Self {
            pricing,
            record: parking_lot::Mutex::new(UsageRecord::new(start_date)),
        }
    }
}

impl Default for MemoryUsageLedger {
    fn default() -> Self {
        Self::new(Local::now().date_naive(), UsagePricing::default())
    }
}

#[async_trait]
impl UsageLedger for MemoryUsageLedger {
    async fn record(&self, usage: TokenUsage) -> BilimResult<UsageRecord> {
        let mut record = self.record.lock();
        record.add(usage.total(), &self.pricing);
        Ok(record.clone())
    }

    async fn snapshot(&self) -> UsageRecord {
        self.record.lock().clone()
    }

    fn pricing(&self) -> &UsagePricing {
        &self.pricing
    }
}
