use crate::{fact_prompt, parse::parse_reply};
use async_trait::async_trait;
use bilim_core::{GeneratedFact, Sourced, Topic};
use bilim_error::{BilimResult, Service, ServiceError, ServiceErrorKind};
use bilim_interface::{FactSource, TextDriver, UsageLedger};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Default cap on generated tokens per fact.
pub const DEFAULT_MAX_TOKENS: u32 = 80;

/// The fact published when generation or parsing fails.
///
/// # Examples
///
/// ```
/// use bilim_models::fallback_fact;
///
/// let fact = fallback_fact();
/// assert!(fact.explanation().as_deref().unwrap().starts_with("Chunki"));
/// assert_eq!(fact.keywords(), &vec!["bee", "vision", "ultraviolet"]);
/// ```
pub fn fallback_fact() -> GeneratedFact {
    GeneratedFact::new(
        "Asalarilar ultrabinafsha nur ko'radi.",
        Some("Chunki ularda maxsus ko'z tuzilishi bor.".to_string()),
        "bee, vision, ultraviolet",
    )
}

/// Fact source backed by a generative-text driver.
///
/// Every generation asks for a fact about a randomly chosen [`Topic`], records
/// the consumed tokens in the usage ledger and parses the reply. Any failure
/// yields [`fallback_fact`].
#[derive(Debug)]
pub struct FactGenerator<D, L> {
    driver: Arc<D>,
    ledger: Arc<L>,
    max_tokens: u32,
}

impl<D, L> FactGenerator<D, L>
where
    D: TextDriver,
    L: UsageLedger,
{
    /// Creates a generator with the default token cap.
    pub fn new(driver: Arc<D>, ledger: Arc<L>) -> Self {
        Self {
            driver,
            ledger,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the cap on generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Generates and parses one fact about `topic`.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails, the reply is empty, or no statement
    /// can be parsed from it.
    #[instrument(
        skip(self),
        fields(provider = self.driver.provider_name(), model = self.driver.model_name())
    )]
    pub async fn try_generate(&self, topic: Topic) -> BilimResult<GeneratedFact> {
        let prompt = fact_prompt(topic);
        let response = self.driver.generate(&prompt, self.max_tokens).await?;

        if let Err(e) = self.ledger.record(response.usage).await {
            warn!(error = %e, "Failed to update usage ledger");
        }

        let text = response.text.trim();
        if text.is_empty() {
            return Err(
                ServiceError::new(ServiceErrorKind::EmptyResponse(Service::Anthropic)).into(),
            );
        }
        debug!(reply = %text, "Received fact reply");

        parse_reply(text)
            .map(|fact| fact.with_topic(topic))
            .ok_or_else(|| {
                ServiceError::new(ServiceErrorKind::Decode {
                    service: Service::Anthropic,
                    message: format!("no statement in reply: {}", text),
                })
                .into()
            })
    }
}

#[async_trait]
impl<D, L> FactSource for FactGenerator<D, L>
where
    D: TextDriver,
    L: UsageLedger,
{
    async fn generate_fact(&self) -> Sourced<GeneratedFact> {
        let topic = Topic::choose(&mut rand::thread_rng());

        match self.try_generate(topic).await {
            Ok(fact) => {
                info!(topic = %topic, statement = %fact.statement(), "Generated fact");
                Sourced::Service(fact)
            }
            Err(e) => {
                error!(topic = %topic, error = %e, "Fact generation failed, using fallback");
                Sourced::Fallback(fallback_fact())
            }
        }
    }
}
