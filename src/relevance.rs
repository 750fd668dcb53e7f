// src/relevance.rs
//! Candidate relevance ranking: roster config types, additive keyword scoring,
//! clamping and a stable top-N shortlist.
//!
//! All keyword checks here are lowercase substring containment, unlike the
//! whole-word lexicon counters on the feedback side:
//! - expertise tags and past topics: tag inside the topic or details
//! - domain boosts: query term inside the topic or details, and boost
//!   expertise term inside one of the candidate's tags

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::devlog::{anon_hash, dev_logging_enabled, truncate_vec};
use crate::error::EngineError;

// --- env defaults & names ---
pub const DEFAULT_ROSTER_CONFIG_PATH: &str = "config/roster.toml";
pub const ENV_ROSTER_CONFIG_PATH: &str = "ROSTER_CONFIG_PATH";

const EMBEDDED_ROSTER: &str = include_str!("../config/roster.toml");

pub const MIN_RELEVANCE: i32 = 60;
pub const MAX_RELEVANCE: i32 = 100;
pub const DEFAULT_TOP_N: usize = 5;

const EXPERTISE_POINTS: i32 = 3;
const TOPIC_POINTS: i32 = 2;

const SIMILAR_TOPICS_REASON: &str = "Has presented on similar topics before.";
const DEFAULT_REASON: &str =
    "Brings broad industry experience and a strong speaking record relevant to this event.";

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub bio: String,
    pub base_relevance_score: i32,
    #[serde(default)]
    pub potential_topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DomainBoost {
    pub name: String,
    pub query_terms: Vec<String>,
    pub expertise_terms: Vec<String>,
    #[serde(default = "default_bonus")]
    pub bonus: i32,
    pub reason: String,
}

fn default_bonus() -> i32 {
    5
}

/// Immutable roster plus the boost table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Roster {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub boosts: Vec<DomainBoost>,
}

impl Roster {
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml_str(EMBEDDED_ROSTER).context("embedded roster is invalid")
    }

    /// `ROSTER_CONFIG_PATH` → `config/roster.toml` (if present) → embedded copy.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(p) = std::env::var(ENV_ROSTER_CONFIG_PATH) {
            return Self::from_path(PathBuf::from(p));
        }
        let default = Path::new(DEFAULT_ROSTER_CONFIG_PATH);
        if default.is_file() {
            return Self::from_path(default);
        }
        info!("roster: using embedded default");
        Self::embedded()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read roster config at {}", path.display()))?;
        let roster = Self::from_toml_str(&content)
            .with_context(|| format!("invalid roster config at {}", path.display()))?;
        info!(
            path = %path.display(),
            candidates = roster.candidates.len(),
            boosts = roster.boosts.len(),
            "roster loaded"
        );
        Ok(roster)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let roster: Roster = toml::from_str(toml_str)?;
        if let Some(c) = roster.candidates.iter().find(|c| c.name.trim().is_empty()) {
            bail!("candidate with empty name (bio `{}`)", c.bio);
        }
        for b in &roster.boosts {
            if b.query_terms.iter().all(|t| t.trim().is_empty()) {
                bail!("boost `{}` has no query terms", b.name);
            }
            if b.expertise_terms.iter().all(|t| t.trim().is_empty()) {
                bail!("boost `{}` has no expertise terms", b.name);
            }
        }
        Ok(roster)
    }
}

/* ----------------------------
Query / result shapes
---------------------------- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQuery {
    pub topic: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl RankingQuery {
    pub fn new(topic: impl Into<String>, details: Option<String>) -> Self {
        Self {
            topic: topic.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub name: String,
    pub expertise: Vec<String>,
    /// 60..=100
    pub relevance_score: u8,
    pub reason_for_suggestion: String,
    pub potential_topics: Vec<String>,
}

/// Score and reasons for one candidate before truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateScore {
    pub score: i32,
    pub reasons: Vec<String>,
}

/// Lowercased query fields, prepared once per request.
struct QueryText {
    topic: String,
    details: String,
    combined: String,
}

impl QueryText {
    fn new(q: &RankingQuery) -> Self {
        let topic = q.topic.trim().to_lowercase();
        let details = q
            .details
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let combined = format!("{topic} {details}");
        Self {
            topic,
            details,
            combined,
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        let n = needle.trim().to_lowercase();
        !n.is_empty() && (self.topic.contains(&n) || self.details.contains(&n))
    }
}

/* ----------------------------
Ranker
---------------------------- */

#[derive(Debug, Clone)]
pub struct CandidateRelevanceRanker {
    roster: Arc<Roster>,
    top_n: usize,
}

impl CandidateRelevanceRanker {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Rank the whole roster for `query` and keep the best `top_n`.
    /// A blank topic is a validation error; an empty roster yields `[]`.
    pub fn rank(&self, query: &RankingQuery) -> Result<Vec<RankedCandidate>, EngineError> {
        if query.topic.trim().is_empty() {
            return Err(EngineError::missing("eventTopic", "eventTopic is required"));
        }

        let q = QueryText::new(query);
        let mut scored: Vec<(&Candidate, CandidateScore)> = self
            .roster
            .candidates
            .iter()
            .map(|c| (c, self.score_prepared(c, &q)))
            .collect();

        // Stable: equal scores keep roster order.
        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        scored.truncate(self.top_n);

        let out: Vec<RankedCandidate> = scored
            .into_iter()
            .map(|(c, s)| RankedCandidate {
                name: c.name.clone(),
                expertise: c.expertise.clone(),
                relevance_score: s.score as u8,
                reason_for_suggestion: s.reasons.join(" "),
                potential_topics: c.potential_topics.clone(),
            })
            .collect();

        dev_log_ranking(&q.combined, &out);
        Ok(out)
    }

    /// Score a single candidate; exposed for tests and diagnostics.
    pub fn score_candidate(&self, candidate: &Candidate, query: &RankingQuery) -> CandidateScore {
        self.score_prepared(candidate, &QueryText::new(query))
    }

    fn score_prepared(&self, c: &Candidate, q: &QueryText) -> CandidateScore {
        let mut score = c.base_relevance_score;
        let mut reasons = Vec::new();

        // 1) Expertise tags
        let matched: Vec<&str> = c
            .expertise
            .iter()
            .filter(|tag| q.mentions(tag))
            .map(String::as_str)
            .collect();
        if !matched.is_empty() {
            score = score.saturating_add(EXPERTISE_POINTS * matched.len() as i32);
            reasons.push(format!(
                "Expertise in {} matches the event focus.",
                matched.join(", ")
            ));
        }

        // 2) Past topics
        let topic_hits = c.potential_topics.iter().filter(|t| q.mentions(t)).count();
        if topic_hits > 0 {
            score = score.saturating_add(TOPIC_POINTS * topic_hits as i32);
            reasons.push(SIMILAR_TOPICS_REASON.to_string());
        }

        // 3) Domain boosts, independent of each other
        for boost in &self.roster.boosts {
            if !boost.query_terms.iter().any(|t| q.mentions(t)) {
                continue;
            }
            let tag_hit = c.expertise.iter().any(|tag| {
                let tag = tag.to_lowercase();
                boost
                    .expertise_terms
                    .iter()
                    .map(|t| t.trim().to_lowercase())
                    .any(|t| !t.is_empty() && tag.contains(&t))
            });
            if tag_hit {
                score = score.saturating_add(boost.bonus);
                reasons.push(boost.reason.clone());
            }
        }

        // 4) Clamp
        let score = score.clamp(MIN_RELEVANCE, MAX_RELEVANCE);

        if reasons.is_empty() {
            reasons.push(DEFAULT_REASON.to_string());
        }

        CandidateScore { score, reasons }
    }
}

/// Minimal, anonymized dev logger for ranking events.
fn dev_log_ranking(query: &str, out: &[RankedCandidate]) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(query);
    let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
    let scores: Vec<u8> = out.iter().map(|r| r.relevance_score).collect();
    // Never log raw query text. Only hashed id + short lists.
    info!(
        target: "relevance",
        %id,
        shortlisted = out.len(),
        names = ?truncate_vec(&names, 5),
        scores = ?scores,
        "ranked"
    );
}

/* ----------------------------
Tests
---------------------------- */
