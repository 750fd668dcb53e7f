//! Optional summary enhancement through a hosted LLM.
//!
//! The deterministic report is always computed first. An enhancer may only
//! replace `summary`; any failure is logged and the deterministic report is
//! returned unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::AiConfig;
use crate::engine::SentimentReport;
use crate::metrics::ENHANCER_FALLBACKS;

/// Upper bound for an enhanced summary (chars).
const MAX_SUMMARY_CHARS: usize = 600;
/// Feedback items forwarded to the provider.
const MAX_ITEMS_FORWARDED: usize = 50;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("missing API key")]
    MissingKey,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("provider returned an empty summary")]
    Empty,
}

#[async_trait]
pub trait SummaryEnhancer: Send + Sync {
    /// `Ok(None)` means "nothing to add"; the deterministic summary stays.
    async fn enhance(
        &self,
        items: &[String],
        report: &SentimentReport,
    ) -> Result<Option<String>, EnhanceError>;

    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

pub type DynEnhancer = Arc<dyn SummaryEnhancer>;

/// Factory: build an enhancer according to config and environment variables.
///
/// * If `AI_TEST_MODE=mock`, returns a deterministic mock.
/// * Else if `config.enabled==false`, returns a disabled enhancer.
/// * Else builds the configured provider.
pub fn build_enhancer(config: &AiConfig) -> DynEnhancer {
    if std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockEnhancer::default());
    }

    if !config.enabled {
        return Arc::new(DisabledEnhancer);
    }

    match config.provider.as_str() {
        "openai" => match OpenAiEnhancer::new(config) {
            Ok(e) => Arc::new(e),
            Err(e) => {
                warn!(error = %e, "could not build OpenAI client, enhancer disabled");
                Arc::new(DisabledEnhancer)
            }
        },
        other => {
            warn!(provider = other, "unknown enhancer provider, enhancer disabled");
            Arc::new(DisabledEnhancer)
        }
    }
}

/// Run the enhancer and fold its answer into the report.
/// Returns the (possibly) updated report and whether the enhancer contributed.
pub async fn apply_enhancement(
    enhancer: &dyn SummaryEnhancer,
    items: &[String],
    mut report: SentimentReport,
) -> (SentimentReport, bool) {
    match enhancer.enhance(items, &report).await {
        Ok(Some(text)) => {
            let cleaned = sanitize_summary(&text);
            if cleaned.is_empty() {
                return (report, false);
            }
            report.summary = cleaned;
            (report, true)
        }
        Ok(None) => (report, false),
        Err(e) => {
            ::metrics::counter!(ENHANCER_FALLBACKS).increment(1);
            warn!(
                provider = enhancer.provider_name(),
                error = %e,
                "enhancer failed, using deterministic summary"
            );
            (report, false)
        }
    }
}

/// Single line, printable, bounded length.
pub fn sanitize_summary(raw: &str) -> String {
    let joined = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let cleaned: String = joined.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim_matches('"').trim();
    if cleaned.chars().count() <= MAX_SUMMARY_CHARS {
        return cleaned.to_string();
    }
    cleaned.chars().take(MAX_SUMMARY_CHARS).collect()
}

// ------------------------------------------------------------
// Concrete enhancers
// ------------------------------------------------------------

/// Always `Ok(None)`; used when enhancement is off.
pub struct DisabledEnhancer;

#[async_trait]
impl SummaryEnhancer for DisabledEnhancer {
    async fn enhance(
        &self,
        _items: &[String],
        _report: &SentimentReport,
    ) -> Result<Option<String>, EnhanceError> {
        Ok(None)
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic stand-in for tests/local runs.
#[derive(Clone)]
pub struct MockEnhancer {
    pub prefix: String,
}

impl Default for MockEnhancer {
    fn default() -> Self {
        Self {
            prefix: "(mock)".to_string(),
        }
    }
}

#[async_trait]
impl SummaryEnhancer for MockEnhancer {
    async fn enhance(
        &self,
        _items: &[String],
        report: &SentimentReport,
    ) -> Result<Option<String>, EnhanceError> {
        Ok(Some(format!("{} {}", self.prefix, report.summary)))
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// OpenAI Chat Completions. Requires an API key in the config.
pub struct OpenAiEnhancer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiEnhancer {
    pub fn new(config: &AiConfig) -> Result<Self, EnhanceError> {
        if config.api_key.trim().is_empty() {
            return Err(EnhanceError::MissingKey);
        }
        let total = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .user_agent(concat!("feedback-signals/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(total.min(Duration::from_secs(4)))
            .timeout(total)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}
#[derive(Serialize)]
struct ChatReq<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}
#[derive(Deserialize)]
struct ChatResp {
    choices: Vec<Choice>,
}
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}
#[derive(Deserialize)]
struct ChoiceMsg {
    content: String,
}

#[async_trait]
impl SummaryEnhancer for OpenAiEnhancer {
    async fn enhance(
        &self,
        items: &[String],
        report: &SentimentReport,
    ) -> Result<Option<String>, EnhanceError> {
        let sys = "You summarize event feedback. Return 2-3 plain sentences, neutral tone, no lists, no emojis. Stay consistent with the given sentiment score and themes.";
        let mut user = format!(
            "Sentiment score: {}/100. Themes: {}.\nFeedback:\n",
            report.sentiment_score,
            report.common_themes.join(", ")
        );
        for it in items.iter().take(MAX_ITEMS_FORWARDED) {
            user.push_str("- ");
            user.push_str(it.trim());
            user.push('\n');
        }

        let req = ChatReq {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: sys,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.2,
            max_tokens: 200,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EnhanceError::Status(resp.status().as_u16()));
        }
        let body: ChatResp = resp.json().await?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");
        let cleaned = sanitize_summary(content);
        if cleaned.is_empty() {
            return Err(EnhanceError::Empty);
        }
        Ok(Some(cleaned))
    }
    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
