// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod devlog;
pub mod engine;
pub mod enhance;
pub mod error;
pub mod lexicon;
pub mod matcher;
pub mod metrics;
pub mod narrative;
pub mod recommend;
pub mod relevance;
pub mod sentiment;
pub mod themes;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::engine::{FeedbackSummarizer, SentimentReport};
pub use crate::error::EngineError;
pub use crate::lexicon::Lexicon;
pub use crate::matcher::LexiconMatcher;
pub use crate::relevance::{CandidateRelevanceRanker, RankedCandidate, RankingQuery, Roster};

/// Build the full HTTP app from env/config files, the same way the binary does.
pub async fn app() -> anyhow::Result<axum::Router> {
    let state = AppState::from_env()?;
    Ok(router(state))
}
