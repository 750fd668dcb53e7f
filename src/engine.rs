//! # Summary Engine
//! Pure, testable pipeline that maps a feedback corpus → `SentimentReport`.
//! No I/O, safe to call from any number of workers at once.
//!
//! Order: sentiment counts → top themes → rule-driven clauses and
//! recommendations → headline. The summary is the headline followed by the
//! clauses.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::devlog::{anon_hash, dev_logging_enabled};
use crate::error::EngineError;
use crate::lexicon::Lexicon;
use crate::matcher::LexiconMatcher;
use crate::narrative::NarrativeComposer;
use crate::recommend::RecommendationEngine;
use crate::sentiment::{concat_corpus, SentimentBreakdown, SentimentScorer};
use crate::themes::ThemeExtractor;

/// Final response of the summary pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReport {
    pub summary: String,
    /// 0..=100
    pub sentiment_score: u8,
    pub sentiment_breakdown: SentimentBreakdown,
    /// At most three, highest count first; never a zero-count theme.
    pub common_themes: Vec<String>,
    pub recommendations: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FeedbackSummarizer {
    lexicon: Arc<Lexicon>,
    sentiment: SentimentScorer,
    themes: ThemeExtractor,
    rules: RecommendationEngine,
    narrative: NarrativeComposer,
}

impl FeedbackSummarizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let matcher = LexiconMatcher::new();
        Self {
            lexicon,
            sentiment: SentimentScorer::new(matcher),
            themes: ThemeExtractor::new(matcher),
            rules: RecommendationEngine::new(),
            narrative: NarrativeComposer::new(),
        }
    }

    /// Summarize a non-empty corpus. An empty slice is a validation error.
    pub fn summarize<S: AsRef<str>>(&self, items: &[S]) -> Result<SentimentReport, EngineError> {
        if items.is_empty() {
            return Err(EngineError::missing(
                "feedbackItems",
                "feedbackItems must be a non-empty array of strings",
            ));
        }

        let blob = concat_corpus(items);
        let lex = &self.lexicon;

        let s = self.sentiment.score_blob(&blob, items.len(), &lex.sentiment);
        let common_themes: Vec<String> = self
            .themes
            .top_themes(&blob, &lex.themes)
            .into_iter()
            .map(|t| t.name)
            .collect();

        let recs = self
            .rules
            .build(common_themes.as_slice(), s.score, items.len(), &lex.rules);
        let headline = self.narrative.compose(s.score, common_themes.as_slice());

        let mut summary = headline;
        for clause in &recs.clauses {
            summary.push(' ');
            summary.push_str(clause);
        }

        if dev_logging_enabled() {
            info!(
                target: "signals",
                id = %anon_hash(&blob),
                items = items.len(),
                positive = s.positive_count,
                negative = s.negative_count,
                score = s.score,
                themes = ?common_themes,
                "summary computed"
            );
        }

        Ok(SentimentReport {
            summary,
            sentiment_score: s.score,
            sentiment_breakdown: s.breakdown,
            common_themes,
            recommendations: recs.recommendations,
            action_items: recs.action_items,
        })
    }
}
