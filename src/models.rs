//! Data models for generated question/answer cards.

/// One parsed question/answer pair.
///
/// Both fields are trimmed and non-empty; [`QaItem::new`] refuses anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaItem {
    pub question: String,
    pub answer: String,
}

impl QaItem {
    pub fn new(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }

        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// How well the user recalled a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Unanswered,
    Remembered,
    Forgot,
}

impl Verdict {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'y' | 'Y' | '1' => Some(Self::Remembered),
            'n' | 'N' | '2' => Some(Self::Forgot),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Unanswered => "Unanswered",
            Self::Remembered => "Remembered",
            Self::Forgot => "Forgot",
        }
    }

    pub fn is_answered(&self) -> bool {
        *self != Self::Unanswered
    }

    pub fn color_for_theme(&self, theme: &crate::ui::theme::Theme) -> ratatui::style::Color {
        match self {
            Self::Unanswered => theme.colors.text_dim,
            Self::Remembered => theme.colors.remembered,
            Self::Forgot => theme.colors.forgot,
        }
    }
}

/// Verdict tally for a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub remembered: usize,
    pub forgot: usize,
    pub unanswered: usize,
}

impl SessionStats {
    pub fn from_responses(responses: &[Verdict]) -> Self {
        let mut stats = Self {
            total: responses.len(),
            ..Default::default()
        };

        for verdict in responses {
            match verdict {
                Verdict::Unanswered => stats.unanswered += 1,
                Verdict::Remembered => stats.remembered += 1,
                Verdict::Forgot => stats.forgot += 1,
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_item_trims_and_rejects_blank_parts() {
        let item = QaItem::new("  What is DNA? \n", "\tA molecule ").unwrap();
        assert_eq!(item.question, "What is DNA?");
        assert_eq!(item.answer, "A molecule");

        assert!(QaItem::new("   ", "answer").is_none());
        assert!(QaItem::new("question", "").is_none());
    }

    #[test]
    fn verdict_keys() {
        assert_eq!(Verdict::from_key('y'), Some(Verdict::Remembered));
        assert_eq!(Verdict::from_key('2'), Some(Verdict::Forgot));
        assert_eq!(Verdict::from_key('x'), None);
        assert!(!Verdict::Unanswered.is_answered());
    }

    #[test]
    fn stats_tally_every_slot() {
        let stats = SessionStats::from_responses(&[
            Verdict::Remembered,
            Verdict::Forgot,
            Verdict::Remembered,
            Verdict::Unanswered,
        ]);
        assert_eq!(
            stats,
            SessionStats {
                total: 4,
                remembered: 2,
                forgot: 1,
                unanswered: 1,
            }
        );
    }
}
