// src/sentiment.rs
//! Corpus-level sentiment: one 0..=100 score plus a positive/neutral/negative
//! percentage split that always sums to 100.

use serde::{Deserialize, Serialize};

use crate::lexicon::SentimentLexicon;
use crate::matcher::LexiconMatcher;

/// Score returned when no sentiment word is found.
pub const NEUTRAL_SCORE: u8 = 50;

/// Sentiment words per item that count as a "fully opinionated" corpus
/// for the neutral share.
const WORDS_PER_ITEM: usize = 5;

/// Percentage split; fields are non-negative and sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u8,
    pub neutral: u8,
    pub negative: u8,
}

impl SentimentBreakdown {
    pub fn total(&self) -> u32 {
        u32::from(self.positive) + u32::from(self.neutral) + u32::from(self.negative)
    }
}

/// Raw hit counts plus the derived score and split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive_count: usize,
    pub negative_count: usize,
    pub score: u8,
    pub breakdown: SentimentBreakdown,
}

/// Join corpus items into one blob. A space keeps words from fusing across items.
pub fn concat_corpus<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer {
    matcher: LexiconMatcher,
}

impl SentimentScorer {
    pub fn new(matcher: LexiconMatcher) -> Self {
        Self { matcher }
    }

    /// Score an already concatenated blob that came from `item_count` items.
    pub fn score_blob(&self, blob: &str, item_count: usize, lex: &SentimentLexicon) -> SentimentScore {
        let positive_count = self.matcher.count_family(blob, lex.positive.as_slice());
        let negative_count = self.matcher.count_family(blob, lex.negative.as_slice());

        SentimentScore {
            positive_count,
            negative_count,
            score: sentiment_score(positive_count, negative_count),
            breakdown: breakdown(positive_count, negative_count, item_count),
        }
    }

    pub fn score_corpus<S: AsRef<str>>(&self, items: &[S], lex: &SentimentLexicon) -> SentimentScore {
        self.score_blob(&concat_corpus(items), items.len(), lex)
    }
}

/// `round(pos / total * 100)`, or 50 when there is no signal.
pub fn sentiment_score(positive: usize, negative: usize) -> u8 {
    let total = positive + negative;
    if total == 0 {
        return NEUTRAL_SCORE;
    }
    pct(positive as f64 / total as f64 * 100.0)
}

/// Three-way split. Order of operations is fixed: raw percentages first,
/// then positive and neutral rescaled against the raw sum, then negative
/// takes whatever is left.
pub fn breakdown(positive: usize, negative: usize, item_count: usize) -> SentimentBreakdown {
    let total = positive + negative;
    let denom = total.max(1) as f64;

    let raw_pos = pct(positive as f64 / denom * 100.0);
    let opinionated = pct_u32(total as f64 / (item_count * WORDS_PER_ITEM).max(1) as f64 * 100.0);
    let raw_neu = 100u32.saturating_sub(opinionated) as u8;
    let raw_neg = pct(negative as f64 / denom * 100.0);

    let raw_sum = u32::from(raw_pos) + u32::from(raw_neu) + u32::from(raw_neg);
    let (mut pos, mut neu) = (raw_pos, raw_neu);
    if raw_sum > 0 {
        let sum = f64::from(raw_sum);
        pos = pct(f64::from(raw_pos) / sum * 100.0);
        neu = pct(f64::from(raw_neu) / sum * 100.0);
    }

    // Two half-up roundings can overshoot by one; trim it from neutral so
    // negative never goes below zero.
    let over = (u32::from(pos) + u32::from(neu)).saturating_sub(100) as u8;
    neu -= over.min(neu);

    SentimentBreakdown {
        positive: pos,
        neutral: neu,
        negative: 100 - pos - neu,
    }
}

/// Round half up into 0..=100.
fn pct(x: f64) -> u8 {
    x.round().clamp(0.0, 100.0) as u8
}

/// Round half up without the upper clamp (corpus can be more than "fully opinionated").
fn pct_u32(x: f64) -> u32 {
    x.round().max(0.0) as u32
}
