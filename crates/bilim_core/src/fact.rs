//! Generated facts and their topic domains.

use crate::NormalizedKey;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Connective word every explanation line starts with ("because").
pub const CONNECTIVE: &str = "Chunki";

/// Maximum number of keywords kept from a keyword annotation.
const MAX_KEYWORDS: usize = 4;

/// Topic domains a fact is drawn from.
///
/// # Examples
///
/// ```
/// use bilim_core::Topic;
///
/// assert_eq!(Topic::HumanBody.to_string(), "Human Body");
/// assert_eq!(Topic::all().len(), 16);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantArray,
)]
pub enum Topic {
    /// Physics
    Physics,
    /// Chemistry
    Chemistry,
    /// Biology
    Biology,
    /// Astronomy
    Astronomy,
    /// Geography
    Geography,
    /// Technology
    Technology,
    /// Human body
    #[strum(serialize = "Human Body")]
    #[serde(rename = "Human Body")]
    HumanBody,
    /// Nature
    Nature,
    /// Space
    Space,
    /// Ocean
    Ocean,
    /// Animals
    Animals,
    /// Plants
    Plants,
    /// Weather
    Weather,
    /// Earth
    Earth,
    /// History of science
    #[strum(serialize = "Science History")]
    #[serde(rename = "Science History")]
    ScienceHistory,
    /// Innovation
    Innovation,
}

impl Topic {
    /// Every topic, in declaration order.
    pub fn all() -> &'static [Topic] {
        <Topic as strum::VariantArray>::VARIANTS
    }

    /// Picks a topic uniformly at random.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Topic {
        *Self::all()
            .choose(rng)
            .unwrap_or(&Topic::Nature)
    }
}

/// A fact produced by the generative-text service (or the fallback).
///
/// Only the normalized key of a fact is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeneratedFact {
    /// Headline statement (about 50 characters).
    statement: String,
    /// Explanation line starting with [`CONNECTIVE`], when one was produced.
    explanation: Option<String>,
    /// Up to four lower-cased keywords: subject, action, detail, visual.
    keywords: Vec<String>,
    /// Keyword annotation as returned by the service.
    raw_keywords: String,
    /// Topic the fact was requested for.
    topic: Option<Topic>,
}

impl GeneratedFact {
    /// Creates a fact, deriving the keyword list from the raw annotation.
    pub fn new(
        statement: impl Into<String>,
        explanation: Option<String>,
        raw_keywords: impl Into<String>,
    ) -> Self {
        let raw_keywords = raw_keywords.into();
        Self {
            statement: statement.into(),
            explanation,
            keywords: parse_keyword_list(&raw_keywords),
            raw_keywords,
            topic: None,
        }
    }

    /// Attaches the topic the fact was generated for.
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Statement and explanation joined by a newline.
    pub fn text(&self) -> String {
        match &self.explanation {
            Some(explanation) => format!("{}\n{}", self.statement, explanation),
            None => self.statement.clone(),
        }
    }

    /// Deduplication key of this fact.
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::new(&self.text())
    }

    /// Category recorded in history: the topic name, else the primary keyword.
    pub fn category(&self) -> String {
        match (&self.topic, self.keywords.first()) {
            (Some(topic), _) => topic.to_string(),
            (None, Some(keyword)) => keyword.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Splits a comma-separated keyword annotation into at most four keywords.
///
/// # Examples
///
/// ```
/// use bilim_core::parse_keyword_list;
///
/// let keywords = parse_keyword_list(" Moon, ice ,, poles, shadow, crater");
/// assert_eq!(keywords, vec!["moon", "ice", "poles", "shadow"]);
/// ```
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}
