//! Inspection commands that never publish.

use bilim_bot::{BilimConfig, Scheduler, Secrets};
use bilim_error::BilimResult;
use bilim_interface::HistoryStore;
use bilim_storage::{JsonHistoryStore, JsonUsageLedger};
use chrono::Utc;
use std::path::Path;

/// Handle the `stats` command.
pub async fn show_stats(config_path: Option<&Path>) -> BilimResult<()> {
    let config = BilimConfig::load(config_path)?;
    let ledger = JsonUsageLedger::open(&config.usage.ledger_path, config.usage.pricing()).await?;
    let history = JsonHistoryStore::open(&config.history.path).await?;

    let report = ledger.report().await;
    println!("Usage ledger: {}", ledger.path().display());
    println!("  Remaining balance: ${:.3}", report.remaining_balance);
    println!("  Total tokens:      {}", report.total_tokens);
    println!("  Total cost:        ${:.3}", report.total_cost);
    println!("  Facts generated:   {}", report.facts_generated);
    println!("  Days running:      {}", report.days_running);
    println!("  Facts per day:     {:.1}", report.facts_per_day);
    println!("  Cost per day:      ${:.4}", report.cost_per_day);
    if report.low_balance {
        println!("  Warning: balance is below the configured threshold");
    }
    println!("History: {}", history.path().display());
    println!("  Published facts:   {}", history.count().await?);

    Ok(())
}

/// Handle the `check` command.
pub fn check(config_path: Option<&Path>) -> BilimResult<()> {
    let config = BilimConfig::load(config_path)?;
    let secrets = Secrets::from_env()?;
    let scheduler = Scheduler::from_config(&config.schedule, Utc::now())?;

    println!("Configuration OK");
    println!("  Channel:   {}", secrets.channel_id);
    println!("  Timezone:  {}", scheduler.timezone());
    let times: Vec<String> = scheduler
        .times()
        .iter()
        .map(|time| time.format("%H:%M").to_string())
        .collect();
    println!("  Triggers:  {}", times.join(", "));
    if let Some(next) = scheduler.next_due() {
        println!("  Next run:  {}", next.with_timezone(&scheduler.timezone()));
    }
    println!(
        "  Batch:     {} facts, up to {} attempts",
        config.cycle.batch_size, config.cycle.max_attempts
    );
    println!("  Model:     {}", config.generation.model);

    Ok(())
}
