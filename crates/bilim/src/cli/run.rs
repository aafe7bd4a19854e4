//! Wiring of the publisher from configuration and credentials.

use bilim_bot::{
    ApiState, BilimConfig, BotServer, CycleMetrics, CycleSettings, PublishCycle, Scheduler,
    Secrets, ServerSettings, spawn_api,
};
use bilim_error::BilimResult;
use bilim_interface::HistoryStore;
use bilim_models::{AnthropicClient, FactGenerator};
use bilim_social::{ImageResolver, PexelsClient, TelegramChannel, TelegramClient, UpdatePoller};
use bilim_storage::{JsonHistoryStore, JsonUsageLedger, log_usage_report};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

type Cycle = PublishCycle<
    FactGenerator<AnthropicClient, JsonUsageLedger>,
    ImageResolver<PexelsClient>,
    TelegramChannel,
    JsonHistoryStore,
>;

/// Everything a running publisher needs.
struct Publisher {
    config: BilimConfig,
    cycle: Cycle,
    telegram: Arc<TelegramClient>,
}

/// Loads configuration and credentials and builds the publish cycle.
async fn build_publisher(config_path: Option<&Path>) -> BilimResult<Publisher> {
    let config = BilimConfig::load(config_path)?;
    let secrets = Secrets::from_env()?;
    let tz = config.schedule.tz()?;

    let ledger = Arc::new(
        JsonUsageLedger::open(&config.usage.ledger_path, config.usage.pricing()).await?,
    );
    let history = Arc::new(JsonHistoryStore::open(&config.history.path).await?);

    log_usage_report(&ledger.report().await);
    info!(published_facts = history.count().await?, "Loaded publish history");

    let anthropic = AnthropicClient::new(&secrets.anthropic_api_key, &config.generation.model)
        .with_base_url(&config.generation.api_base_url);
    let facts = Arc::new(
        FactGenerator::new(Arc::new(anthropic), ledger)
            .with_max_tokens(config.generation.max_tokens),
    );

    let pexels = PexelsClient::new(&secrets.pexels_api_key)
        .with_base_url(&config.images.api_base_url)
        .with_per_page(config.images.per_page);
    let images = Arc::new(
        ImageResolver::new(Arc::new(pexels)).with_fallback_url(&config.images.fallback_url),
    );

    let telegram = Arc::new(
        TelegramClient::new(
            &secrets.bot_token,
            Duration::from_secs(config.telegram.connect_timeout_secs),
        )?
        .with_base_url(&config.telegram.api_base_url)
        .with_retries(
            config.telegram.send_retries,
            Duration::from_secs(config.telegram.retry_interval_secs),
        ),
    );
    let channel = Arc::new(TelegramChannel::new(telegram.clone(), &secrets.channel_id));

    let cycle = PublishCycle::new(
        facts,
        images,
        channel,
        history,
        CycleSettings::from_config(&config.cycle, tz),
    );

    Ok(Publisher {
        config,
        cycle,
        telegram,
    })
}

/// Handle the `run` command.
pub async fn run_server(config_path: Option<&Path>) -> BilimResult<()> {
    let Publisher {
        config,
        cycle,
        telegram,
    } = build_publisher(config_path).await?;

    let metrics = CycleMetrics::new();
    let cycle = cycle.with_metrics(metrics.clone());

    if config.server.enabled {
        let addr = spawn_api(config.server.port, ApiState::new(metrics)).await?;
        info!(%addr, "Health API listening");
    }

    let scheduler = Scheduler::from_config(&config.schedule, Utc::now())?;
    let poller = UpdatePoller::new(
        telegram,
        Duration::from_secs(config.telegram.long_poll_timeout_secs),
    );

    info!("Bot server starting. Press Ctrl+C to stop.");

    BotServer::new(cycle, scheduler, ServerSettings::from(&config))
        .with_poller(poller)
        .start()
        .await
}

/// Handle the `once` command.
pub async fn run_once(config_path: Option<&Path>) -> BilimResult<()> {
    let publisher = build_publisher(config_path).await?;
    let report = publisher.cycle.run_cycle().await;

    println!(
        "Published {} of {} facts ({} attempts, {} duplicates, {} failed)",
        report.published,
        publisher.cycle.settings().batch_size,
        report.attempts,
        report.duplicates,
        report.failed
    );

    Ok(())
}
