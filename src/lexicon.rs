// src/lexicon.rs
//! Lexicon configuration: sentiment words, theme families and the rule tables
//! that turn theme hits into sentences.
//!
//! Everything is data. The default document (`config/lexicon.toml`) is embedded
//! at build time; `LEXICON_CONFIG_PATH` points the service at another file.
//! The document is read once at startup and then shared read-only.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// --- env defaults & names ---
pub const DEFAULT_LEXICON_CONFIG_PATH: &str = "config/lexicon.toml";
pub const ENV_LEXICON_CONFIG_PATH: &str = "LEXICON_CONFIG_PATH";

const EMBEDDED_LEXICON: &str = include_str!("../config/lexicon.toml");

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
struct LexiconRoot {
    sentiment: SentimentLexicon,
    themes: Vec<ThemeCfg>,
    fillers: Fillers,
    #[serde(default)]
    action_rules: Vec<ActionRule>,
}

/// Two disjoint word sets.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ThemeCfg {
    name: String,
    variants: Vec<String>,
    praise: String,
    mixed: String,
    concern: String,
    recommendation: String,
}

/// Generic sentences used when fewer than three themes surface.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Fillers {
    pub affirming_clause: String,
    pub concern_clause: String,
    /// `{count}` is replaced by the number of feedback items.
    pub participation_clause: String,
    pub affirming_recommendation: String,
    pub concern_recommendation: String,
    pub participation_recommendation: String,
    pub default_recommendation: String,
    #[serde(default)]
    pub default_action_items: Vec<String>,
}

/// `recommendation` starting with `prefix` becomes `replacement + rest`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ActionRule {
    pub prefix: String,
    pub replacement: String,
}

/* ----------------------------
Validated, shareable structures
---------------------------- */

/// A named family of variant words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFamily {
    pub name: String,
    pub variants: Vec<String>,
}

/// Ordered theme families; order is the tie-break for equal counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLexicon {
    pub families: Vec<ThemeFamily>,
}

/// Fixed per-theme sentences, one per sentiment band plus a corrective recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePhrasing {
    pub praise: String,
    pub mixed: String,
    pub concern: String,
    pub recommendation: String,
}

/// Everything the recommendation step needs, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRules {
    pub phrasing: Vec<(String, ThemePhrasing)>,
    pub fillers: Fillers,
    pub action_rules: Vec<ActionRule>,
}

impl RecommendationRules {
    pub fn phrasing_for(&self, theme: &str) -> Option<&ThemePhrasing> {
        self.phrasing
            .iter()
            .find(|(name, _)| name == theme)
            .map(|(_, p)| p)
    }
}

/// Complete, validated lexicon bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    pub sentiment: SentimentLexicon,
    pub themes: ThemeLexicon,
    pub rules: RecommendationRules,
}

impl Lexicon {
    /// The built-in document shipped with the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_toml_str(EMBEDDED_LEXICON).context("embedded lexicon is invalid")
    }

    /// Resolve the lexicon for this process:
    /// `LEXICON_CONFIG_PATH` → `config/lexicon.toml` (if present) → embedded copy.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(p) = std::env::var(ENV_LEXICON_CONFIG_PATH) {
            return Self::from_path(PathBuf::from(p));
        }
        let default = Path::new(DEFAULT_LEXICON_CONFIG_PATH);
        if default.is_file() {
            return Self::from_path(default);
        }
        info!("lexicon: using embedded default");
        Self::embedded()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon config at {}", path.display()))?;
        let lex = Self::from_toml_str(&content)
            .with_context(|| format!("invalid lexicon config at {}", path.display()))?;
        info!(
            path = %path.display(),
            positive = lex.sentiment.positive.len(),
            negative = lex.sentiment.negative.len(),
            themes = lex.themes.families.len(),
            "lexicon loaded"
        );
        Ok(lex)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let root: LexiconRoot = toml::from_str(toml_str)?;

        let positive = normalize_words(&root.sentiment.positive, "sentiment.positive")?;
        let negative = normalize_words(&root.sentiment.negative, "sentiment.negative")?;
        let pos_set: BTreeSet<&str> = positive.iter().map(String::as_str).collect();
        if let Some(w) = negative.iter().find(|w| pos_set.contains(w.as_str())) {
            bail!("word `{w}` is listed as both positive and negative");
        }

        let mut seen = BTreeSet::new();
        let mut families = Vec::with_capacity(root.themes.len());
        let mut phrasing = Vec::with_capacity(root.themes.len());
        for t in root.themes {
            let name = t.name.trim().to_string();
            if name.is_empty() {
                bail!("theme with empty name");
            }
            if !seen.insert(name.clone()) {
                bail!("theme `{name}` declared twice");
            }
            let variants = normalize_words(&t.variants, &format!("themes.{name}.variants"))?;
            families.push(ThemeFamily {
                name: name.clone(),
                variants,
            });
            phrasing.push((
                name,
                ThemePhrasing {
                    praise: t.praise,
                    mixed: t.mixed,
                    concern: t.concern,
                    recommendation: t.recommendation,
                },
            ));
        }

        if let Some(r) = root.action_rules.iter().find(|r| r.prefix.is_empty()) {
            bail!("action rule with empty prefix (replacement `{}`)", r.replacement);
        }

        Ok(Self {
            sentiment: SentimentLexicon { positive, negative },
            themes: ThemeLexicon { families },
            rules: RecommendationRules {
                phrasing,
                fillers: root.fillers,
                action_rules: root.action_rules,
            },
        })
    }
}

/// Lowercase, trim, dedup (keeping first occurrence); reject empty lists and blank words.
fn normalize_words(words: &[String], what: &str) -> anyhow::Result<Vec<String>> {
    if words.is_empty() {
        bail!("{what} must not be empty");
    }
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(words.len());
    for w in words {
        let w = w.trim().to_lowercase();
        if w.is_empty() {
            bail!("{what} contains a blank word");
        }
        if seen.insert(w.clone()) {
            out.push(w);
        }
    }
    Ok(out)
}
