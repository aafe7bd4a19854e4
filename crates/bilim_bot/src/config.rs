//! Configuration for the fact publisher.
//!
//! Sources are merged in increasing precedence:
//! 1. Bundled defaults (`bilim.toml` shipped with the crate)
//! 2. `~/.config/bilim/bilim.toml`
//! 3. `./bilim.toml`
//! 4. An explicit file passed on the command line
//! 5. Environment variables prefixed `BILIM__`, e.g. `BILIM__CYCLE__BATCH_SIZE=8`
//!
//! Credentials never live in configuration files; see [`Secrets`].

use bilim_core::UsagePricing;
use bilim_error::{BilimError, BilimResult, ConfigError};
use chrono::NaiveTime;
use chrono_tz::Tz;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../bilim.toml");

/// Format of trigger times in the configuration.
pub const TIME_FORMAT: &str = "%H:%M";

/// Complete publisher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilimConfig {
    /// When cycles run
    pub schedule: ScheduleConfig,
    /// What a cycle does
    pub cycle: CycleConfig,
    /// Generative-text settings
    pub generation: GenerationConfig,
    /// Photo search settings
    pub images: ImagesConfig,
    /// Messaging client settings
    pub telegram: TelegramConfig,
    /// Usage ledger location and pricing
    pub usage: UsageConfig,
    /// History store location
    pub history: HistoryConfig,
    /// Health and metrics API
    pub server: ServerConfig,
}

/// Daily trigger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone the trigger times are given in
    pub timezone: String,
    /// Wall-clock trigger times, `HH:MM`
    pub times: Vec<String>,
    /// Seconds between scheduler ticks
    pub poll_interval_secs: u64,
    /// Run one cycle immediately at startup
    pub warm_start: bool,
}

impl ScheduleConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns error if the name is not a known IANA timezone.
    pub fn tz(&self) -> BilimResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            BilimError::from(ConfigError::new(format!(
                "Unknown timezone '{}': {}",
                self.timezone, e
            )))
        })
    }

    /// Parses the trigger times, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns error if any time is not `HH:MM`.
    pub fn trigger_times(&self) -> BilimResult<Vec<NaiveTime>> {
        let mut times = self
            .times
            .iter()
            .map(|time| {
                NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|e| {
                    BilimError::from(ConfigError::new(format!(
                        "Invalid trigger time '{}': {}",
                        time, e
                    )))
                })
            })
            .collect::<BilimResult<Vec<_>>>()?;
        times.sort();
        times.dedup();
        Ok(times)
    }

    /// Interval between scheduler ticks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Publish cycle configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Unique facts wanted per cycle
    pub batch_size: usize,
    /// Generation attempts per cycle before publishing a short batch
    pub max_attempts: usize,
    /// Seconds between consecutive publishes
    pub publish_delay_secs: u64,
    /// Last line of every caption
    pub signature: String,
}

/// Generative-text configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier
    pub model: String,
    /// Cap on generated tokens per fact
    pub max_tokens: u32,
    /// API host
    pub api_base_url: String,
}

/// Photo search configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// API host
    pub api_base_url: String,
    /// Results requested per search
    pub per_page: u32,
    /// Image published when no photo is found
    pub fallback_url: String,
}

/// Messaging client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// API host
    pub api_base_url: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Server-side long-poll timeout in seconds
    pub long_poll_timeout_secs: u64,
    /// Pause after a failed long poll, in seconds
    pub reconnect_backoff_secs: u64,
    /// Retries of a transient send failure
    pub send_retries: usize,
    /// Seconds between send retries
    pub retry_interval_secs: u64,
}

/// Usage ledger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageConfig {
    /// Ledger file
    pub ledger_path: PathBuf,
    /// Estimated USD per 1000 tokens
    pub cost_per_1k_tokens: f64,
    /// Prepaid balance
    pub initial_balance: f64,
    /// Balance below which a warning is logged
    pub low_balance_threshold: f64,
}

impl UsageConfig {
    /// Pricing derived from this configuration.
    pub fn pricing(&self) -> UsagePricing {
        UsagePricing {
            cost_per_1k_tokens: self.cost_per_1k_tokens,
            initial_balance: self.initial_balance,
            low_balance_threshold: self.low_balance_threshold,
        }
    }
}

/// History store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History file
    pub path: PathBuf,
}

/// Health and metrics API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Serve the API at all
    pub enabled: bool,
    /// Listening port; the `PORT` environment variable takes precedence
    pub port: u16,
}

impl BilimConfig {
    /// Loads configuration from every source, validating the result.
    ///
    /// # Errors
    ///
    /// Returns error if a present file cannot be parsed, a value has the wrong
    /// type, or validation fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bilim_bot::BilimConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = BilimConfig::load(None)?;
    /// println!("Publishing at {:?}", config.schedule.times);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> BilimResult<Self> {
        debug!(
            "Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults"
        );

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bilim/bilim.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("bilim").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BILIM")
                .separator("__")
                .try_parsing(true),
        );

        let mut config = Self::build(builder)?;

        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    /// Bundled defaults overlaid with a TOML document, validated.
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be parsed or validation fails.
    pub fn from_toml(overrides: &str) -> BilimResult<Self> {
        let builder = Self::defaults().add_source(File::from_str(overrides, FileFormat::Toml));
        let config = Self::build(builder)?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> BilimResult<Self> {
        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| {
                BilimError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown timezone, an unparsable or missing trigger
    /// time, or a batch size outside `1..=max_attempts`.
    pub fn validate(&self) -> BilimResult<()> {
        self.schedule.tz()?;

        if self.schedule.trigger_times()?.is_empty() {
            return Err(ConfigError::new("At least one trigger time is required").into());
        }

        let cycle = &self.cycle;
        if cycle.batch_size == 0 || cycle.batch_size > cycle.max_attempts {
            return Err(ConfigError::new(format!(
                "Batch size {} must be between 1 and max_attempts ({})",
                cycle.batch_size, cycle.max_attempts
            ))
            .into());
        }

        Ok(())
    }
}

/// Credentials read from the environment.
#[derive(Clone)]
pub struct Secrets {
    /// Telegram bot token
    pub bot_token: String,
    /// Target chat id or `@channel`
    pub channel_id: String,
    /// Pexels API key
    pub pexels_api_key: String,
    /// Anthropic API key
    pub anthropic_api_key: String,
}

impl Secrets {
    /// Variables that must be set.
    pub const REQUIRED: [&'static str; 4] =
        ["BOT_TOKEN", "CHANNEL_ID", "PEXELS_API_KEY", "ANTHROPIC_API_KEY"];

    /// Reads every credential from the process environment.
    ///
    /// # Errors
    ///
    /// Returns error naming every missing or empty variable.
    pub fn from_env() -> BilimResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads every credential through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns error naming every variable `lookup` has no non-empty value for.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BilimResult<Self> {
        let mut missing = Vec::new();
        let values = Self::REQUIRED.map(|name| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        });

        if !missing.is_empty() {
            return Err(ConfigError::new(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ))
            .into());
        }

        let [bot_token, channel_id, pexels_api_key, anthropic_api_key] = values;
        Ok(Self {
            bot_token,
            channel_id,
            pexels_api_key,
            anthropic_api_key,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("pexels_api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .finish()
    }
}
