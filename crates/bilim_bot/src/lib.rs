//! Publishing engine for the bilim fact channel.
//!
//! - [`PublishCycle`] generates a batch of unique facts, pairs each with a
//!   photo and publishes them, recording every success in history
//! - [`Scheduler`] fires the cycle at fixed wall-clock times in a timezone
//! - [`BotServer`] runs the single control loop: warm start, then alternate
//!   between the update long-poll and the scheduler tick
//! - [`CycleMetrics`] and the [`create_router`] API expose health and counts
//! - [`BilimConfig`] and [`Secrets`] carry the layered configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod cycle;
mod metrics;
mod schedule;
mod server;

pub use api::{ApiState, create_router, spawn_api};
pub use config::{
    BilimConfig, CycleConfig, GenerationConfig, HistoryConfig, ImagesConfig, ScheduleConfig,
    Secrets, ServerConfig, TIME_FORMAT, TelegramConfig, UsageConfig,
};
pub use cycle::{CycleReport, CycleSettings, PublishCycle, format_caption};
pub use metrics::{CycleMetrics, MetricsSnapshot};
pub use schedule::{DailyTrigger, Schedule, ScheduleCheck, Scheduler};
pub use server::{BotServer, ServerSettings};
