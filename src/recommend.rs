// src/recommend.rs
//! Rule-driven narrative clauses, recommendations and action items.
//!
//! Per present theme:
//! - one narrative clause chosen by sentiment band (praise / mixed / concern)
//! - one corrective recommendation when the score is below `RECOMMEND_BELOW`
//!
//! With fewer than three themes, generic fillers are appended:
//! - score > 70  → affirming clause + recommendation
//! - score < 50  → concern clause + recommendation
//! - items > 5   → participation clause + recommendation
//!
//! Action items come from the recommendations through the ordered rewrite table.

use crate::lexicon::{ActionRule, RecommendationRules, ThemePhrasing};
use crate::themes::MAX_THEMES;

/// Theme recommendations are only emitted below this score.
pub const RECOMMEND_BELOW: u8 = 60;
/// Corpus size above which the participation note is added.
pub const PARTICIPATION_MIN_ITEMS: usize = 5;
/// Fewer recommendations than this pulls in the default action items.
const MIN_ACTIONABLE: usize = 3;

/// high: > 70, mid: (50, 70], low: <= 50
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentBand {
    High,
    Mid,
    Low,
}

impl SentimentBand {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            SentimentBand::High
        } else if score > 50 {
            SentimentBand::Mid
        } else {
            SentimentBand::Low
        }
    }
}

impl ThemePhrasing {
    pub fn clause(&self, band: SentimentBand) -> &str {
        match band {
            SentimentBand::High => &self.praise,
            SentimentBand::Mid => &self.mixed,
            SentimentBand::Low => &self.concern,
        }
    }
}

/// Output of the rule pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations {
    pub clauses: Vec<String>,
    pub recommendations: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn build<S: AsRef<str>>(
        &self,
        themes: &[S],
        score: u8,
        item_count: usize,
        rules: &RecommendationRules,
    ) -> Recommendations {
        let band = SentimentBand::from_score(score);
        let mut clauses = Vec::new();
        let mut recommendations = Vec::new();

        for theme in themes {
            let Some(p) = rules.phrasing_for(theme.as_ref()) else {
                continue;
            };
            clauses.push(p.clause(band).to_string());
            if score < RECOMMEND_BELOW {
                recommendations.push(p.recommendation.clone());
            }
        }

        if themes.len() < MAX_THEMES {
            let f = &rules.fillers;
            if score > 70 {
                clauses.push(f.affirming_clause.clone());
                recommendations.push(f.affirming_recommendation.clone());
            }
            if score < 50 {
                clauses.push(f.concern_clause.clone());
                recommendations.push(f.concern_recommendation.clone());
            }
            if item_count > PARTICIPATION_MIN_ITEMS {
                clauses.push(
                    f.participation_clause
                        .replace("{count}", &item_count.to_string()),
                );
                recommendations.push(f.participation_recommendation.clone());
            }
        }

        if recommendations.is_empty() {
            recommendations.push(rules.fillers.default_recommendation.clone());
        }

        let action_items = derive_action_items(&recommendations, rules);

        Recommendations {
            clauses,
            recommendations,
            action_items,
        }
    }
}

/// Rewrite each recommendation with the first matching rule, then top up
/// with the default action items when there are fewer than three.
pub fn derive_action_items(recommendations: &[String], rules: &RecommendationRules) -> Vec<String> {
    let mut items: Vec<String> = recommendations
        .iter()
        .map(|r| rewrite_action(r, &rules.action_rules))
        .collect();
    if recommendations.len() < MIN_ACTIONABLE {
        items.extend(rules.fillers.default_action_items.iter().cloned());
    }
    items
}

/// First rule whose prefix matches wins; no match passes the text through.
pub fn rewrite_action(recommendation: &str, action_rules: &[ActionRule]) -> String {
    action_rules
        .iter()
        .find_map(|rule| {
            recommendation
                .strip_prefix(rule.prefix.as_str())
                .map(|rest| format!("{}{}", rule.replacement, rest))
        })
        .unwrap_or_else(|| recommendation.to_string())
}
