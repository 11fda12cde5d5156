use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::SourceError;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

pub const DEFAULT_ENDPOINT: &str = "https://opentdb.com/api.php";

const DEFAULT_CATEGORY: u32 = 9;
const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Where to fetch questions from, and how many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    pub endpoint: Url,
    pub category: u32,
    pub question_count: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint URL is valid"),
            category: DEFAULT_CATEGORY,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl SourceConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognizes `TRIVIA_ENDPOINT`, `TRIVIA_CATEGORY` and `TRIVIA_AMOUNT`;
    /// unset or unparseable values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let endpoint = env::var("TRIVIA_ENDPOINT")
            .ok()
            .and_then(|raw| Url::parse(&raw).ok())
            .unwrap_or(defaults.endpoint);
        let category = env::var("TRIVIA_CATEGORY")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(defaults.category);
        let question_count = env::var("TRIVIA_AMOUNT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|count| *count > 0)
            .unwrap_or(defaults.question_count);

        Self {
            endpoint,
            category,
            question_count,
        }
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

/// One record as delivered by the question bank, markup and entities intact.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Response envelope of the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceResponse {
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

//
// ─── QUESTION SOURCE ───────────────────────────────────────────────────────────
//

/// A remote bank of multiple-choice questions.
///
/// The trait seam keeps the loader testable without a network; the production
/// implementation is `OpenTriviaClient`.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch one batch of up to `amount` raw records.
    ///
    /// The source may legitimately return fewer records than requested.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on transport failure, a non-success status, or
    /// an unparseable body.
    async fn fetch_batch(&self, amount: u32) -> Result<Vec<RawQuestion>, SourceError>;
}

/// HTTP client for an Open Trivia DB compatible endpoint.
#[derive(Clone, Debug)]
pub struct OpenTriviaClient {
    client: Client,
    config: SourceConfig,
}

impl OpenTriviaClient {
    #[must_use]
    pub fn new(config: SourceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn request_url(&self, amount: u32) -> Url {
        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("amount", &amount.to_string())
            .append_pair("category", &self.config.category.to_string())
            .append_pair("type", "multiple");
        url
    }
}

#[async_trait]
impl QuestionSource for OpenTriviaClient {
    async fn fetch_batch(&self, amount: u32) -> Result<Vec<RawQuestion>, SourceError> {
        let response = self.client.get(self.request_url(amount)).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let parsed: SourceResponse = serde_json::from_str(&body)?;
        Ok(parsed.results)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
