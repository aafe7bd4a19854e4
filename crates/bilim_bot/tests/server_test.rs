use async_trait::async_trait;
use bilim_bot::{BotServer, CycleMetrics, CycleSettings, PublishCycle, Scheduler, ServerSettings};
use bilim_core::{GeneratedFact, Sourced};
use bilim_error::BilimResult;
use bilim_interface::{Channel, FactSource, ImageSource, MessageId};
use bilim_storage::MemoryHistoryStore;
use chrono::{NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Asia::Tashkent;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fact source producing a new fact on every call.
#[derive(Default)]
struct CountingFacts {
    calls: AtomicUsize,
}

#[async_trait]
impl FactSource for CountingFacts {
    async fn generate_fact(&self) -> Sourced<GeneratedFact> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Sourced::Service(GeneratedFact::new(
            format!("Fakt raqami {n}"),
            Some("Chunki sanoq davom etadi".to_string()),
            "number, count",
        ))
    }
}

struct StaticImage;

#[async_trait]
impl ImageSource for StaticImage {
    async fn resolve_image(&self, _keywords: &[String]) -> Sourced<String> {
        Sourced::Service("https://images.pexels.com/photos/1/large.jpeg".to_string())
    }
}

#[derive(Default)]
struct CountingChannel {
    sent: AtomicUsize,
}

#[async_trait]
impl Channel for CountingChannel {
    async fn publish_photo(&self, _photo_url: &str, _caption: &str) -> BilimResult<MessageId> {
        let n = self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(MessageId(n as i64 + 1))
    }

    fn channel_name(&self) -> &str {
        "@test_channel"
    }
}

type TestCycle = PublishCycle<CountingFacts, StaticImage, CountingChannel, MemoryHistoryStore>;

fn cycle(channel: Arc<CountingChannel>, metrics: CycleMetrics) -> TestCycle {
    PublishCycle::new(
        Arc::new(CountingFacts::default()),
        Arc::new(StaticImage),
        channel,
        Arc::new(MemoryHistoryStore::new()),
        CycleSettings {
            batch_size: 2,
            publish_delay: Duration::ZERO,
            ..CycleSettings::default()
        },
    )
    .with_metrics(metrics)
}

fn settings(warm_start: bool) -> ServerSettings {
    ServerSettings {
        poll_interval: Duration::from_secs(3600),
        warm_start,
        ..ServerSettings::default()
    }
}

/// A scheduler whose only trigger is half a day away.
fn distant_scheduler() -> Scheduler {
    let now = Utc::now();
    let trigger = (now + TimeDelta::hours(12)).with_timezone(&Tashkent).time();
    Scheduler::new(Tashkent, vec![trigger], now)
}

#[tokio::test]
async fn test_run_due_runs_one_cycle_per_due_trigger() {
    let start = Tashkent
        .with_ymd_and_hms(2024, 11, 3, 10, 0, 0)
        .unwrap()
        .with_timezone(&Utc);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let channel = Arc::new(CountingChannel::default());
    let metrics = CycleMetrics::new();
    let mut server = BotServer::new(
        cycle(channel.clone(), metrics.clone()),
        Scheduler::new(Tashkent, vec![nine], start),
        settings(false),
    );

    assert!(server.run_due(start).await.is_empty());

    let reports = server.run_due(start + TimeDelta::days(1)).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].published, 2);
    assert_eq!(metrics.cycles(), 1);
    assert_eq!(channel.sent.load(Ordering::SeqCst), 2);

    assert!(server.run_due(start + TimeDelta::days(1)).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_warm_start_runs_one_cycle_before_the_schedule() {
    let channel = Arc::new(CountingChannel::default());
    let metrics = CycleMetrics::new();
    let server = BotServer::new(
        cycle(channel.clone(), metrics.clone()),
        distant_scheduler(),
        settings(true),
    );

    let outcome = tokio::time::timeout(Duration::from_secs(60), server.start()).await;

    assert!(outcome.is_err(), "server loop should still be running");
    assert_eq!(metrics.cycles(), 1);
    assert_eq!(metrics.published(), 2);
    assert_eq!(channel.sent.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_without_warm_start_nothing_runs_until_a_trigger() {
    let channel = Arc::new(CountingChannel::default());
    let metrics = CycleMetrics::new();
    let server = BotServer::new(
        cycle(channel.clone(), metrics.clone()),
        distant_scheduler(),
        settings(false),
    );

    let outcome = tokio::time::timeout(Duration::from_secs(60), server.start()).await;

    assert!(outcome.is_err());
    assert_eq!(metrics.cycles(), 0);
    assert_eq!(channel.sent.load(Ordering::SeqCst), 0);
}
