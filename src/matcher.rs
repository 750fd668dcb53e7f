// src/matcher.rs
//! Whole-word, case-insensitive occurrence counting.
//!
//! A match must not touch another alphanumeric character on either side, so
//! `"good"` counts in `"Good, really good!"` (twice) but not in `"goodness"`.
//! Matches are non-overlapping and scanned left to right. Multi-word entries
//! (`"virtual care"`) are matched as literal phrases with the same boundary rule.

/// Stateless matcher shared by every scoring component.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconMatcher;

impl LexiconMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Count non-overlapping whole-word matches of `word` in `text`.
    /// Empty text or an empty word yields 0.
    pub fn count_occurrences(&self, text: &str, word: &str) -> usize {
        let needle = word.trim().to_lowercase();
        if text.is_empty() || needle.is_empty() {
            return 0;
        }
        let hay = text.to_lowercase();
        count_lowered(&hay, &needle)
    }

    /// Sum of `count_occurrences` over every variant of a family.
    pub fn count_family<S: AsRef<str>>(&self, text: &str, variants: &[S]) -> usize {
        if text.is_empty() {
            return 0;
        }
        // Lowercase the text once for the whole family.
        let hay = text.to_lowercase();
        variants
            .iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .map(|v| count_lowered(&hay, &v))
            .sum()
    }
}

/// Both sides already lowercased; `needle` non-empty.
fn count_lowered(hay: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut from = 0;

    while from <= hay.len() {
        let Some(rel) = hay[from..].find(needle) else {
            break;
        };
        let start = from + rel;
        let end = start + needle.len();

        if is_boundary_before(hay, start) && is_boundary_after(hay, end) {
            count += 1;
            from = end;
        } else {
            // Rejected candidate: resume one char later so overlapping
            // positions still get their chance.
            let step = hay[start..].chars().next().map_or(1, char::len_utf8);
            from = start + step;
        }
    }

    count
}

fn is_boundary_before(hay: &str, start: usize) -> bool {
    hay[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn is_boundary_after(hay: &str, end: usize) -> bool {
    hay[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}
