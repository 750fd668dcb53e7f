// src/narrative.rs
//! Headline sentence for the summary, picked by score band.

#[derive(Debug, Clone, Copy, Default)]
pub struct NarrativeComposer;

impl NarrativeComposer {
    pub fn new() -> Self {
        Self
    }

    /// `score > 70` positive, `> 50` moderate, else improvement template.
    /// The theme sentence needs at least two themes and names the first two.
    pub fn compose<S: AsRef<str>>(&self, score: u8, themes: &[S]) -> String {
        let (headline, theme_lead) = if score > 70 {
            (
                format!("Overall feedback is positive, with a sentiment score of {score}/100."),
                "Attendees particularly highlighted",
            )
        } else if score > 50 {
            (
                format!("Feedback is moderately positive, with a sentiment score of {score}/100."),
                "Common topics included",
            )
        } else {
            (
                format!("Feedback indicates room for improvement, with a sentiment score of {score}/100."),
                "Key areas mentioned were",
            )
        };

        match themes {
            [first, second, ..] => format!(
                "{headline} {theme_lead} {} and {}.",
                first.as_ref(),
                second.as_ref()
            ),
            _ => headline,
        }
    }
}
