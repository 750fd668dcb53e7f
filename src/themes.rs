// src/themes.rs
//! Theme detection: count each family over the corpus blob and keep the top three.

use crate::lexicon::ThemeLexicon;
use crate::matcher::LexiconMatcher;

/// Maximum number of themes reported.
pub const MAX_THEMES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeExtractor {
    matcher: LexiconMatcher,
}

impl ThemeExtractor {
    pub fn new(matcher: LexiconMatcher) -> Self {
        Self { matcher }
    }

    /// Counts for every family, in declaration order (zeros included).
    pub fn count_all(&self, blob: &str, lex: &ThemeLexicon) -> Vec<ThemeCount> {
        lex.families
            .iter()
            .map(|f| ThemeCount {
                name: f.name.clone(),
                count: self.matcher.count_family(blob, f.variants.as_slice()),
            })
            .collect()
    }

    /// Non-zero themes, highest count first, at most `MAX_THEMES`.
    /// `sort_by` is stable, so equal counts keep declaration order.
    pub fn top_themes(&self, blob: &str, lex: &ThemeLexicon) -> Vec<ThemeCount> {
        let mut counts = self.count_all(blob, lex);
        counts.retain(|t| t.count > 0);
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(MAX_THEMES);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::ThemeFamily;

    fn fam(name: &str, variants: &[&str]) -> ThemeFamily {
        ThemeFamily {
            name: name.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn lex() -> ThemeLexicon {
        ThemeLexicon {
            families: vec![
                fam("content", &["content", "material"]),
                fam("presenter", &["presenter", "speaker"]),
                fam("organization", &["venue", "organized"]),
                fam("time", &["time", "schedule"]),
            ],
        }
    }

    fn names(v: &[ThemeCount]) -> Vec<&str> {
        v.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn ranks_by_count_then_declaration_order() {
        let blob = "schedule time schedule. venue was fine. speaker, content";
        let top = ThemeExtractor::default().top_themes(blob, &lex());
        // time=3, then content/presenter/organization all 1 -> declaration order wins
        assert_eq!(names(&top), vec!["time", "content", "presenter"]);
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn zero_count_themes_are_dropped() {
        let top = ThemeExtractor::default().top_themes("the speaker spoke", &lex());
        assert_eq!(names(&top), vec!["presenter"]);
    }

    #[test]
    fn empty_blob_has_no_themes() {
        assert!(ThemeExtractor::default().top_themes("", &lex()).is_empty());
    }

    #[test]
    fn count_all_keeps_every_family() {
        let all = ThemeExtractor::default().count_all("material material", &lex());
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].count, 2);
        assert!(all[1..].iter().all(|t| t.count == 0));
    }
}
