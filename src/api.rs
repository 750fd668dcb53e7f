use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::AiConfig;
use crate::engine::FeedbackSummarizer;
use crate::enhance::{apply_enhancement, build_enhancer, DynEnhancer};
use crate::error::EngineError;
use crate::lexicon::Lexicon;
use crate::metrics::{
    Metrics, SENTIMENT_SCORE, SUGGEST_REQUESTS, SUMMARY_REQUESTS, VALIDATION_ERRORS,
};
use crate::relevance::{CandidateRelevanceRanker, RankingQuery, Roster};

/// Lowercase: header names are stored normalized.
pub const AI_USED_HEADER: &str = "x-ai-used";

/// Shared, read-only state: lexicon and roster are loaded once.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<FeedbackSummarizer>,
    pub ranker: Arc<CandidateRelevanceRanker>,
    pub enhancer: DynEnhancer,
}

impl AppState {
    pub fn new(lexicon: Lexicon, roster: Roster, enhancer: DynEnhancer) -> Self {
        Self {
            summarizer: Arc::new(FeedbackSummarizer::new(Arc::new(lexicon))),
            ranker: Arc::new(CandidateRelevanceRanker::new(Arc::new(roster))),
            enhancer,
        }
    }

    /// Resolve lexicon, roster and enhancer from env/config files.
    pub fn from_env() -> anyhow::Result<Self> {
        let lexicon = Lexicon::from_env()?;
        let roster = Roster::from_env()?;
        let enhancer = build_enhancer(&AiConfig::load_or_disabled());
        info!(
            enhancer = enhancer.provider_name(),
            candidates = roster.candidates.len(),
            "app state ready"
        );
        Ok(Self::new(lexicon, roster, enhancer))
    }
}

pub fn router(state: AppState) -> Router {
    let metrics = Metrics::init();

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/feedback/summary", post(summarize))
        .route("/speakers/suggest", post(suggest))
        .merge(metrics.router())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReq {
    #[serde(default)]
    feedback_items: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestReq {
    #[serde(default)]
    event_topic: Option<String>,
    #[serde(default)]
    event_details: Option<String>,
}

async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<SummaryReq>, JsonRejection>,
) -> Result<Response, EngineError> {
    ::metrics::counter!(SUMMARY_REQUESTS).increment(1);
    let Json(req) = body.map_err(|e| EngineError::BadRequest(e.body_text()))?;

    let items = req.feedback_items.unwrap_or_default();
    let summarizer = state.summarizer.clone();
    let (items, result) = tokio::task::spawn_blocking(move || {
        let r = summarizer.summarize(items.as_slice());
        (items, r)
    })
    .await
    .map_err(|e| anyhow!("summary task failed: {e}"))?;

    let report = result.inspect_err(count_validation)?;
    ::metrics::histogram!(SENTIMENT_SCORE).record(f64::from(report.sentiment_score));

    let (report, used) = apply_enhancement(state.enhancer.as_ref(), &items, report).await;

    let mut resp = Json(report).into_response();
    resp.headers_mut()
        .insert(HeaderName::from_static(AI_USED_HEADER), ai_used_value(used));
    Ok(resp)
}

async fn suggest(
    State(state): State<AppState>,
    body: Result<Json<SuggestReq>, JsonRejection>,
) -> Result<Response, EngineError> {
    ::metrics::counter!(SUGGEST_REQUESTS).increment(1);
    let Json(req) = body.map_err(|e| EngineError::BadRequest(e.body_text()))?;

    let query = RankingQuery::new(req.event_topic.unwrap_or_default(), req.event_details);
    let ranker = state.ranker.clone();
    let ranked = tokio::task::spawn_blocking(move || ranker.rank(&query))
        .await
        .map_err(|e| anyhow!("ranking task failed: {e}"))?
        .inspect_err(count_validation)?;

    Ok(Json(ranked).into_response())
}

fn count_validation(e: &EngineError) {
    if e.is_validation() {
        ::metrics::counter!(VALIDATION_ERRORS).increment(1);
    }
}

fn ai_used_value(used: bool) -> HeaderValue {
    HeaderValue::from_static(if used { "1" } else { "0" })
}
