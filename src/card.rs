//! Transient state of the active flashcard.
//!
//! There is exactly one [`CardState`] alive at a time. It is reseeded from the
//! session's stored verdict whenever the active index changes, so reveal and
//! settle state never leak from one card to the next.

use std::time::Instant;

use crate::models::Verdict;

/// What the active card is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPhase {
    /// Question only.
    Hidden,
    /// Answer visible, waiting for a verdict.
    Revealed,
    /// Verdict recorded, holding it on screen until the session advances.
    Settling,
    /// Card was answered on an earlier visit; verdict is shown read-only.
    Attempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    index: usize,
    revealed: bool,
    verdict: Verdict,
    attempted: bool,
    settle_until: Option<Instant>,
}

impl CardState {
    /// Start a fresh activation for `index`, seeded with its stored verdict.
    pub fn activate(index: usize, stored: Verdict) -> Self {
        Self {
            index,
            revealed: false,
            verdict: stored,
            attempted: stored.is_answered(),
            settle_until: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_attempted(&self) -> bool {
        self.attempted
    }

    pub fn is_settling(&self) -> bool {
        self.settle_until.is_some()
    }

    /// Whether the verdict buttons should be offered.
    pub fn accepts_verdict(&self) -> bool {
        self.revealed && !self.attempted && !self.is_settling()
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Record a verdict for this activation and hold it until `deadline`.
    ///
    /// Returns `false` (leaving the card untouched) when the answer is still
    /// hidden, the card is read-only, or a previous verdict is still settling.
    pub fn record_verdict(&mut self, verdict: Verdict, deadline: Instant) -> bool {
        if !verdict.is_answered() || !self.accepts_verdict() {
            return false;
        }

        self.verdict = verdict;
        self.settle_until = Some(deadline);
        true
    }

    /// True once the settle window has elapsed.
    pub fn settle_due(&self, now: Instant) -> bool {
        self.settle_until.is_some_and(|deadline| now >= deadline)
    }

    pub fn phase(&self) -> CardPhase {
        if self.is_settling() {
            CardPhase::Settling
        } else if self.attempted {
            CardPhase::Attempted
        } else if self.revealed {
            CardPhase::Revealed
        } else {
            CardPhase::Hidden
        }
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::activate(0, Verdict::Unanswered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fresh_card_walks_hidden_revealed_settling() {
        let now = Instant::now();
        let mut card = CardState::activate(3, Verdict::Unanswered);
        assert_eq!(card.phase(), CardPhase::Hidden);

        card.reveal();
        card.reveal();
        assert_eq!(card.phase(), CardPhase::Revealed);

        assert!(card.record_verdict(Verdict::Forgot, now + Duration::from_millis(200)));
        assert_eq!(card.phase(), CardPhase::Settling);
        assert_eq!(card.verdict(), Verdict::Forgot);
        assert!(!card.settle_due(now));
        assert!(card.settle_due(now + Duration::from_millis(200)));
    }

    #[test]
    fn verdict_needs_revealed_answer() {
        let mut card = CardState::activate(0, Verdict::Unanswered);
        assert!(!card.record_verdict(Verdict::Remembered, Instant::now()));
        assert_eq!(card.verdict(), Verdict::Unanswered);
    }

    #[test]
    fn second_verdict_while_settling_is_ignored() {
        let now = Instant::now();
        let mut card = CardState::activate(0, Verdict::Unanswered);
        card.reveal();
        assert!(card.record_verdict(Verdict::Remembered, now));
        assert!(!card.record_verdict(Verdict::Forgot, now));
        assert_eq!(card.verdict(), Verdict::Remembered);
    }

    #[test]
    fn unanswered_is_not_a_verdict() {
        let mut card = CardState::activate(0, Verdict::Unanswered);
        card.reveal();
        assert!(!card.record_verdict(Verdict::Unanswered, Instant::now()));
        assert!(!card.is_settling());
    }

    #[test]
    fn revisited_card_is_read_only() {
        let mut card = CardState::activate(1, Verdict::Remembered);
        assert_eq!(card.phase(), CardPhase::Attempted);
        assert!(!card.is_revealed());

        card.reveal();
        assert!(card.is_revealed());
        assert!(!card.accepts_verdict());
        assert!(!card.record_verdict(Verdict::Forgot, Instant::now()));
        assert_eq!(card.verdict(), Verdict::Remembered);
    }
}
