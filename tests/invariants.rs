//! Property-style checks over seeded random corpora and queries.
//! Seeds are fixed so a failure always reproduces.

use std::sync::Arc;

use feedback_signals::relevance::{MAX_RELEVANCE, MIN_RELEVANCE};
use feedback_signals::sentiment::breakdown;
use feedback_signals::{CandidateRelevanceRanker, FeedbackSummarizer, Lexicon, RankingQuery, Roster};
use rand::{rngs::StdRng, Rng, SeedableRng};

const FILLER: &[&str] = &[
    "the", "session", "was", "and", "a", "bit", "overall", "we", "felt", "during", "next", "time",
];

fn pick<'a>(rng: &mut StdRng, words: &[&'a str]) -> &'a str {
    words[rng.random_range(0..words.len())]
}

/// Random sentence mixing filler with lexicon words and theme variants.
fn sentence(rng: &mut StdRng, vocab: &[&str]) -> String {
    let len = rng.random_range(1..12);
    let mut words = Vec::with_capacity(len);
    for _ in 0..len {
        if rng.random_bool(0.4) {
            words.push(pick(rng, vocab).to_string());
        } else {
            words.push(pick(rng, FILLER).to_string());
        }
    }
    words.join(" ")
}

#[test]
fn summary_invariants_hold_for_random_corpora() {
    let lexicon = Lexicon::embedded().unwrap();
    let mut vocab: Vec<String> = Vec::new();
    vocab.extend(lexicon.sentiment.positive.iter().cloned());
    vocab.extend(lexicon.sentiment.negative.iter().cloned());
    for f in &lexicon.themes.families {
        vocab.extend(f.variants.iter().cloned());
    }
    let vocab: Vec<&str> = vocab.iter().map(String::as_str).collect();
    let summarizer = FeedbackSummarizer::new(Arc::new(lexicon.clone()));

    let mut rng = StdRng::seed_from_u64(0x5eed_f00d);
    for round in 0..300 {
        let n = rng.random_range(1..15);
        let items: Vec<String> = (0..n).map(|_| sentence(&mut rng, &vocab)).collect();

        let r = summarizer.summarize(&items).unwrap();
        assert!(r.sentiment_score <= 100, "round {round}");
        assert_eq!(r.sentiment_breakdown.total(), 100, "round {round}: {items:?}");
        assert!(r.common_themes.len() <= 3, "round {round}");
        assert!(!r.summary.is_empty());
        assert!(!r.recommendations.is_empty());
        assert!(r.action_items.len() >= r.recommendations.len());

        // Every reported theme was actually mentioned.
        let lowered = items.join(" ").to_lowercase();
        for theme in &r.common_themes {
            let fam = lexicon
                .themes
                .families
                .iter()
                .find(|f| &f.name == theme)
                .unwrap();
            assert!(
                fam.variants.iter().any(|v| lowered.contains(v.as_str())),
                "round {round}: theme {theme} without a variant"
            );
        }

        assert_eq!(r, summarizer.summarize(&items).unwrap(), "round {round}");
    }
}

#[test]
fn breakdown_always_sums_to_100() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2_000 {
        let pos = rng.random_range(0..200);
        let neg = rng.random_range(0..200);
        let items = rng.random_range(1..60);
        let b = breakdown(pos, neg, items);
        assert_eq!(b.total(), 100, "pos={pos} neg={neg} items={items}: {b:?}");
    }
}

#[test]
fn ranking_invariants_hold_for_random_queries() {
    let ranker = CandidateRelevanceRanker::new(Arc::new(Roster::embedded().unwrap()));
    let terms = [
        "AI", "healthcare", "telemedicine", "policy", "regulation", "data", "privacy",
        "robotics", "equity", "operations", "summit", "virtual care", "machine learning",
    ];

    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..200 {
        let topic = (0..rng.random_range(1..4))
            .map(|_| pick(&mut rng, &terms))
            .collect::<Vec<_>>()
            .join(" ");
        let details = rng
            .random_bool(0.5)
            .then(|| pick(&mut rng, &terms).to_string());
        let query = RankingQuery::new(topic, details);

        let out = ranker.rank(&query).unwrap();
        assert_eq!(out.len(), 5, "round {round}");
        for c in &out {
            let s = i32::from(c.relevance_score);
            assert!((MIN_RELEVANCE..=MAX_RELEVANCE).contains(&s), "round {round}");
            assert!(!c.reason_for_suggestion.is_empty());
        }
        assert!(
            out.windows(2)
                .all(|w| w[0].relevance_score >= w[1].relevance_score),
            "round {round}: {query:?}"
        );
        assert_eq!(out, ranker.rank(&query).unwrap());
    }
}
