//! The publish cycle: generate unique facts, attach photos, publish.

use crate::{CycleConfig, CycleMetrics};
use bilim_core::{GeneratedFact, HistoryEntry, NormalizedKey};
use bilim_error::BilimResult;
use bilim_interface::{Channel, FactSource, HistoryStore, ImageSource, MessageId};
use chrono::Utc;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Marker placed before the explanation line of a caption.
const EXPLANATION_MARKER: &str = "👉";

/// Formats the caption published under a fact's photo.
///
/// # Examples
///
/// ```
/// use bilim_bot::format_caption;
/// use bilim_core::GeneratedFact;
///
/// let fact = GeneratedFact::new("Fakt", Some("Chunki sabab".to_string()), "moon");
/// assert_eq!(format_caption(&fact, "@bilim_faktlar"), "Fakt\n👉 Chunki sabab\n\n@bilim_faktlar");
///
/// let bare = GeneratedFact::new("Fakt", None, "moon");
/// assert_eq!(format_caption(&bare, "@bilim_faktlar"), "Fakt\n\n@bilim_faktlar");
/// ```
pub fn format_caption(fact: &GeneratedFact, signature: &str) -> String {
    match fact.explanation() {
        Some(explanation) => format!(
            "{}\n{} {}\n\n{}",
            fact.statement(),
            EXPLANATION_MARKER,
            explanation,
            signature
        ),
        None => format!("{}\n\n{}", fact.statement(), signature),
    }
}

/// Counts describing one run of the publish cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Facts requested from the fact source
    pub attempts: usize,
    /// Facts rejected because their key was already known
    pub duplicates: usize,
    /// Attempts that produced the fallback fact
    pub fallbacks: usize,
    /// Published facts that used the fallback image
    pub image_fallbacks: usize,
    /// Facts published successfully
    pub published: usize,
    /// Facts whose publish failed
    pub failed: usize,
}

/// Settings of a publish cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSettings {
    /// Unique facts wanted per cycle
    pub batch_size: usize,
    /// Generation attempts before publishing a short batch
    pub max_attempts: usize,
    /// Pause between consecutive publishes
    pub publish_delay: Duration,
    /// Last line of every caption
    pub signature: String,
    /// Timezone of history timestamps
    pub timezone: Tz,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            batch_size: 4,
            max_attempts: 20,
            publish_delay: Duration::from_secs(3),
            signature: "@bilim_faktlar".to_string(),
            timezone: chrono_tz::Asia::Tashkent,
        }
    }
}

impl CycleSettings {
    /// Settings from configuration.
    pub fn from_config(config: &CycleConfig, timezone: Tz) -> Self {
        Self {
            batch_size: config.batch_size,
            max_attempts: config.max_attempts,
            publish_delay: Duration::from_secs(config.publish_delay_secs),
            signature: config.signature.clone(),
            timezone,
        }
    }
}

/// Orchestrates fact generation, deduplication, image lookup and publishing.
#[derive(Debug)]
pub struct PublishCycle<F, I, C, H> {
    facts: Arc<F>,
    images: Arc<I>,
    channel: Arc<C>,
    history: Arc<H>,
    settings: CycleSettings,
    metrics: CycleMetrics,
}

impl<F, I, C, H> PublishCycle<F, I, C, H>
where
    F: FactSource,
    I: ImageSource,
    C: Channel,
    H: HistoryStore,
{
    /// Creates a cycle over the given collaborators.
    pub fn new(
        facts: Arc<F>,
        images: Arc<I>,
        channel: Arc<C>,
        history: Arc<H>,
        settings: CycleSettings,
    ) -> Self {
        Self {
            facts,
            images,
            channel,
            history,
            settings,
            metrics: CycleMetrics::new(),
        }
    }

    /// Reports into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: CycleMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Settings in effect.
    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Metrics collector this cycle reports into.
    pub fn metrics(&self) -> &CycleMetrics {
        &self.metrics
    }

    /// Runs one cycle. Never fails: problems are logged and counted.
    #[instrument(
        skip(self),
        fields(channel = %self.channel.channel_name(), batch_size = self.settings.batch_size)
    )]
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let known = match self.history.keys().await {
            Ok(known) => known,
            Err(e) => {
                error!(error = %e, "Failed to load publish history, skipping cycle");
                self.metrics.record_cycle(&report);
                return report;
            }
        };

        let batch = self.collect_batch(&known, &mut report).await;

        for (index, fact) in batch.iter().enumerate() {
            if index > 0 && !self.settings.publish_delay.is_zero() {
                tokio::time::sleep(self.settings.publish_delay).await;
            }

            match self.publish_fact(fact, &mut report).await {
                Ok(message_id) => {
                    report.published += 1;
                    self.metrics.record_publish();
                    info!(
                        message_id = %message_id,
                        statement = %fact.statement(),
                        "Fact published"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(error = %e, statement = %fact.statement(), "Failed to publish fact");
                }
            }
        }

        info!(
            attempts = report.attempts,
            duplicates = report.duplicates,
            fallbacks = report.fallbacks,
            published = report.published,
            failed = report.failed,
            "Publish cycle finished"
        );
        self.metrics.record_cycle(&report);
        report
    }

    /// Generates facts until the batch is full or the attempt cap is reached.
    async fn collect_batch(
        &self,
        known: &HashSet<NormalizedKey>,
        report: &mut CycleReport,
    ) -> Vec<GeneratedFact> {
        let mut batch = Vec::with_capacity(self.settings.batch_size);
        let mut batch_keys = HashSet::new();

        while batch.len() < self.settings.batch_size && report.attempts < self.settings.max_attempts
        {
            let sourced = self.facts.generate_fact().await;
            report.attempts += 1;
            if sourced.is_fallback() {
                report.fallbacks += 1;
            }

            let fact = sourced.into_inner();
            let key = fact.key();
            if known.contains(&key) || !batch_keys.insert(key) {
                report.duplicates += 1;
                debug!(statement = %fact.statement(), "Skipping duplicate fact");
                continue;
            }

            batch.push(fact);
        }

        if batch.len() < self.settings.batch_size {
            warn!(
                collected = batch.len(),
                attempts = report.attempts,
                "Attempt limit reached before the batch was full"
            );
        }

        batch
    }

    /// Resolves a photo, publishes the fact and records it in history.
    async fn publish_fact(
        &self,
        fact: &GeneratedFact,
        report: &mut CycleReport,
    ) -> BilimResult<MessageId> {
        let image = self.images.resolve_image(fact.keywords()).await;
        if image.is_fallback() {
            report.image_fallbacks += 1;
        }

        let caption = format_caption(fact, &self.settings.signature);
        let message_id = self.channel.publish_photo(image.value(), &caption).await?;

        let timestamp = Utc::now().with_timezone(&self.settings.timezone).fixed_offset();
        let entry = HistoryEntry::new(fact.key().into_inner(), fact.category(), timestamp);
        if let Err(e) = self.history.append(entry).await {
            error!(error = %e, "Fact published but could not be recorded in history");
        }

        Ok(message_id)
    }
}
