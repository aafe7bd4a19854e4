use crate::{BilimConfig, CycleReport, PublishCycle, Scheduler};
use bilim_error::BilimResult;
use bilim_interface::{Channel, FactSource, HistoryStore, ImageSource};
use bilim_social::UpdatePoller;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, info, instrument, warn};

/// Timing of the server loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interval between scheduler ticks
    pub poll_interval: Duration,
    /// Pause after a failed long poll
    pub reconnect_backoff: Duration,
    /// Run one cycle before entering the loop
    pub warm_start: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            reconnect_backoff: Duration::from_secs(15),
            warm_start: true,
        }
    }
}

impl From<&BilimConfig> for ServerSettings {
    fn from(config: &BilimConfig) -> Self {
        Self {
            poll_interval: config.schedule.poll_interval(),
            reconnect_backoff: Duration::from_secs(config.telegram.reconnect_backoff_secs),
            warm_start: config.schedule.warm_start,
        }
    }
}

/// Single control loop alternating between the update long-poll and the
/// scheduler tick.
///
/// Cycles run inline on the loop, so two cycles never overlap.
pub struct BotServer<F, I, C, H> {
    cycle: PublishCycle<F, I, C, H>,
    scheduler: Scheduler,
    poller: Option<UpdatePoller>,
    settings: ServerSettings,
}

impl<F, I, C, H> BotServer<F, I, C, H>
where
    F: FactSource,
    I: ImageSource,
    C: Channel,
    H: HistoryStore,
{
    /// Creates a server without an update poller.
    pub fn new(
        cycle: PublishCycle<F, I, C, H>,
        scheduler: Scheduler,
        settings: ServerSettings,
    ) -> Self {
        Self {
            cycle,
            scheduler,
            poller: None,
            settings,
        }
    }

    /// Long-polls the messaging service between ticks.
    pub fn with_poller(mut self, poller: UpdatePoller) -> Self {
        self.poller = Some(poller);
        self
    }

    /// The publish cycle driven by this server.
    pub fn cycle(&self) -> &PublishCycle<F, I, C, H> {
        &self.cycle
    }

    /// Runs every cycle due at `now`, in trigger order.
    pub async fn run_due(&mut self, now: DateTime<Utc>) -> Vec<CycleReport> {
        let mut reports = Vec::new();
        for time in self.scheduler.due(now) {
            info!(trigger = %time.format("%H:%M"), "Running scheduled publish cycle");
            reports.push(self.cycle.run_cycle().await);
        }
        reports
    }

    /// Runs until interrupted.
    ///
    /// # Errors
    ///
    /// Currently never returns an error; failures inside the loop are logged
    /// and retried.
    #[instrument(skip(self))]
    pub async fn start(mut self) -> BilimResult<()> {
        info!(
            timezone = %self.scheduler.timezone(),
            times = ?self.scheduler.times(),
            "Starting bot server"
        );

        if self.settings.warm_start {
            info!("Warm start: running one publish cycle");
            self.cycle.run_cycle().await;
        }

        let mut tick = interval(self.settings.poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.run_due(Utc::now()).await;
                    if let Some(next) = self.scheduler.next_due() {
                        debug!(
                            next = %next.with_timezone(&self.scheduler.timezone()),
                            "Next trigger"
                        );
                    }
                }
                result = poll_updates(&mut self.poller) => {
                    if let Err(e) = result {
                        warn!(
                            error = %e,
                            backoff_secs = self.settings.reconnect_backoff.as_secs(),
                            "Update polling failed, backing off"
                        );
                        sleep(self.settings.reconnect_backoff).await;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested");
                    return Ok(());
                }
            }
        }
    }
}

async fn poll_updates(poller: &mut Option<UpdatePoller>) -> BilimResult<()> {
    match poller {
        Some(poller) => {
            let updates = poller.poll().await?;
            if !updates.is_empty() {
                debug!(count = updates.len(), "Acknowledged updates");
            }
            Ok(())
        }
        None => std::future::pending().await,
    }
}
