// tests/ranking.rs
//
// Candidate ranking: additive scoring, clamping, stable ordering, top-N.

use std::sync::Arc;

use feedback_signals::relevance::{MAX_RELEVANCE, MIN_RELEVANCE};
use feedback_signals::{CandidateRelevanceRanker, RankingQuery, Roster};

/* ----------------------------
Inline, deterministic roster
---------------------------- */
const TEST_ROSTER: &str = r#"
[[candidates]]
name = "Clinical AI"
expertise = ["AI in Healthcare"]
bio = "Clinical AI researcher."
base_relevance_score = 95
potential_topics = ["Diagnostics"]

[[candidates]]
name = "First Generalist"
expertise = ["Operations"]
base_relevance_score = 70

[[candidates]]
name = "Second Generalist"
expertise = ["Finance"]
base_relevance_score = 70

[[candidates]]
name = "Newcomer"
expertise = ["Nursing"]
base_relevance_score = 20

[[boosts]]
name = "ai"
query_terms = ["ai", "artificial intelligence"]
expertise_terms = ["ai", "machine learning"]
reason = "Specializes in artificial intelligence, a core theme of this event."
"#;

fn ranker(toml: &str) -> CandidateRelevanceRanker {
    CandidateRelevanceRanker::new(Arc::new(Roster::from_toml_str(toml).expect("roster")))
}

#[test]
fn ai_specialist_clamps_at_100_and_cites_both_reasons() {
    let out = ranker(TEST_ROSTER)
        .rank(&RankingQuery::new("AI in Healthcare", None))
        .unwrap();

    let top = &out[0];
    assert_eq!(top.name, "Clinical AI");
    // 95 + 3 (expertise) + 5 (ai boost) = 103 -> 100
    assert_eq!(top.relevance_score, 100);
    assert!(
        top.reason_for_suggestion
            .contains("Expertise in AI in Healthcare matches the event focus."),
        "{}",
        top.reason_for_suggestion
    );
    assert!(top
        .reason_for_suggestion
        .contains("Specializes in artificial intelligence"));
}

#[test]
fn embedded_roster_returns_exactly_five() {
    let roster = Roster::embedded().unwrap();
    assert_eq!(roster.candidates.len(), 8);

    let out = CandidateRelevanceRanker::new(Arc::new(roster))
        .rank(&RankingQuery::new("Hospital innovation summit", None))
        .unwrap();
    assert_eq!(out.len(), 5);
}

#[test]
fn small_roster_returns_everyone() {
    let out = ranker(TEST_ROSTER)
        .rank(&RankingQuery::new("Quarterly planning", None))
        .unwrap();
    assert_eq!(out.len(), 4);
}

#[test]
fn ties_keep_roster_order() {
    let out = ranker(TEST_ROSTER)
        .rank(&RankingQuery::new("Quarterly planning", None))
        .unwrap();
    let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Clinical AI", "First Generalist", "Second Generalist", "Newcomer"]
    );
}

#[test]
fn low_base_score_is_clamped_up_with_default_reason() {
    let out = ranker(TEST_ROSTER)
        .rank(&RankingQuery::new("Quarterly planning", None))
        .unwrap();
    let newcomer = out.iter().find(|c| c.name == "Newcomer").unwrap();
    assert_eq!(i32::from(newcomer.relevance_score), MIN_RELEVANCE);
    assert!(newcomer
        .reason_for_suggestion
        .starts_with("Brings broad industry experience"));
}

#[test]
fn details_feed_matching() {
    let r = ranker(TEST_ROSTER);
    let without = r
        .rank(&RankingQuery::new("Annual summit", None))
        .unwrap();
    let with = r
        .rank(&RankingQuery::new(
            "Annual summit",
            Some("Sessions on finance and diagnostics".into()),
        ))
        .unwrap();

    let score_of = |list: &[feedback_signals::RankedCandidate], name: &str| {
        list.iter()
            .find(|c| c.name == name)
            .map(|c| c.relevance_score)
            .unwrap()
    };
    // Expertise tag substring in details: +3
    assert_eq!(score_of(&with, "Second Generalist"), score_of(&without, "Second Generalist") + 3);
    // Past topic substring in details: +2
    assert_eq!(score_of(&with, "Clinical AI"), score_of(&without, "Clinical AI") + 2);
    let ai = with.iter().find(|c| c.name == "Clinical AI").unwrap();
    assert!(ai
        .reason_for_suggestion
        .contains("Has presented on similar topics before."));
}

#[test]
fn boost_query_terms_match_as_substrings() {
    let r = ranker(TEST_ROSTER);
    let roster = Roster::from_toml_str(TEST_ROSTER).unwrap();
    let ai = &roster.candidates[0];

    // "said" contains "ai"; ranking never requires whole words.
    let s = r.score_candidate(ai, &RankingQuery::new("What the board said", None));
    assert_eq!(s.score, 100);
    assert_eq!(
        s.reasons,
        vec!["Specializes in artificial intelligence, a core theme of this event.".to_string()]
    );
}

#[test]
fn ai_boost_fires_inside_longer_words_on_embedded_roster() {
    let roster = Roster::embedded().unwrap();
    let chen = roster
        .candidates
        .iter()
        .find(|c| c.name == "Dr. Sarah Chen")
        .unwrap();
    let r = CandidateRelevanceRanker::new(Arc::new(roster.clone()));

    let s = r.score_candidate(chen, &RankingQuery::new("Maintaining clinical detail", None));
    // 95 + 5 (ai boost) -> 100
    assert_eq!(s.score, 100);
    assert_eq!(s.reasons.len(), 1);
    assert!(s.reasons[0].contains("artificial intelligence"));
}

#[test]
fn policy_boost_adds_five_for_regulatory_expert() {
    let roster = Roster::embedded().unwrap();
    let rodriguez = roster
        .candidates
        .iter()
        .find(|c| c.name == "Prof. Elena Rodriguez")
        .unwrap();
    let r = CandidateRelevanceRanker::new(Arc::new(roster.clone()));

    let s = r.score_candidate(rodriguez, &RankingQuery::new("Healthcare regulation", None));
    // 88 + 5 (policy boost)
    assert_eq!(s.score, 93);
    assert_eq!(
        s.reasons,
        vec!["Brings a policy and regulatory perspective to the discussion.".to_string()]
    );

    // Without a policy term in the query the boost stays off.
    let plain = r.score_candidate(rodriguez, &RankingQuery::new("Hospital operations", None));
    assert_eq!(plain.score, 88);
}

#[test]
fn tele_boost_fires_on_related_tag() {
    let toml = r#"
[[candidates]]
name = "Remote Psychiatrist"
expertise = ["Telepsychiatry"]
base_relevance_score = 70

[[boosts]]
name = "telemedicine"
query_terms = ["telemedicine", "virtual care"]
expertise_terms = ["tele"]
reason = "Hands-on experience delivering telemedicine and virtual care."
"#;
    let out = ranker(toml)
        .rank(&RankingQuery::new("Virtual care in mental health", None))
        .unwrap();
    assert_eq!(out[0].relevance_score, 75);
    assert!(out[0].reason_for_suggestion.contains("telemedicine"));
}

#[test]
fn extreme_base_score_does_not_overflow() {
    let toml = r#"
[[candidates]]
name = "Overflow"
expertise = ["AI in Healthcare"]
base_relevance_score = 2147483647
potential_topics = ["AI in Healthcare"]

[[boosts]]
name = "ai"
query_terms = ["ai"]
expertise_terms = ["ai"]
bonus = 5
reason = "AI."
"#;
    let out = ranker(toml)
        .rank(&RankingQuery::new("AI in Healthcare", None))
        .unwrap();
    assert_eq!(i32::from(out[0].relevance_score), MAX_RELEVANCE);
}

#[test]
fn blank_topic_is_rejected() {
    let err = ranker(TEST_ROSTER)
        .rank(&RankingQuery::new("  ", Some("details only".into())))
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("eventTopic"));
}

#[test]
fn empty_roster_yields_empty_list() {
    let out = CandidateRelevanceRanker::new(Arc::new(Roster::default()))
        .rank(&RankingQuery::new("Anything", None))
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn top_n_is_configurable_and_scores_stay_in_range() {
    let out = CandidateRelevanceRanker::new(Arc::new(Roster::embedded().unwrap()))
        .with_top_n(3)
        .rank(&RankingQuery::new(
            "Telehealth policy and artificial intelligence",
            Some("regulation of virtual care".into()),
        ))
        .unwrap();
    assert_eq!(out.len(), 3);
    for c in &out {
        let s = i32::from(c.relevance_score);
        assert!((MIN_RELEVANCE..=MAX_RELEVANCE).contains(&s), "{}: {s}", c.name);
        assert!(!c.reason_for_suggestion.is_empty());
    }
    assert!(out.windows(2).all(|w| w[0].relevance_score >= w[1].relevance_score));
}
