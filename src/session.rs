//! Review session controller.
//!
//! Owns the generated cards, the response table and the current position.
//! Every verdict and every move goes through here; the active [`CardState`]
//! never writes the response table itself.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::card::CardState;
use crate::models::{QaItem, SessionStats, Verdict};

/// Default time a recorded verdict stays on screen before moving on.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    InProgress,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Session {
    items: Vec<QaItem>,
    responses: Vec<Verdict>,
    current_index: usize,
    card: CardState,
    settle: Duration,
}

impl Session {
    pub fn new(settle: Duration) -> Self {
        Self {
            items: Vec::new(),
            responses: Vec::new(),
            current_index: 0,
            card: CardState::default(),
            settle,
        }
    }

    /// Load a freshly generated sequence, discarding all previous state.
    pub fn initialize(&mut self, items: Vec<QaItem>) {
        debug!(count = items.len(), "initializing review session");
        self.responses = vec![Verdict::Unanswered; items.len()];
        self.items = items;
        self.current_index = 0;
        self.activate();
    }

    /// Store a verdict for `index`. Later writes replace earlier ones.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn record_response(&mut self, index: usize, verdict: Verdict) -> bool {
        match self.responses.get_mut(index) {
            Some(slot) => {
                *slot = verdict;
                true
            }
            None => false,
        }
    }

    /// Move to the next card, stopping at the Completed boundary.
    pub fn advance(&mut self) -> bool {
        if self.current_index >= self.items.len() {
            return false;
        }
        self.current_index += 1;
        self.activate();
        debug!(index = self.current_index, "advanced");
        true
    }

    /// Move to the previous card. No-op at the first card and once completed.
    pub fn retreat(&mut self) -> bool {
        if self.current_index == 0 || self.is_completed() {
            return false;
        }
        self.current_index -= 1;
        self.activate();
        debug!(index = self.current_index, "retreated");
        true
    }

    /// Start the same cards over with a clean response table.
    pub fn restart(&mut self) {
        debug!("restarting session");
        self.responses.fill(Verdict::Unanswered);
        self.current_index = 0;
        self.activate();
    }

    pub fn progress_fraction(&self) -> f64 {
        let len = self.items.len();
        if len == 0 {
            return 0.0;
        }
        if self.is_completed() {
            return 1.0;
        }
        ((self.current_index + 1) as f64 / len as f64).clamp(0.0, 1.0)
    }

    pub fn reveal(&mut self) {
        if !self.is_completed() {
            self.card.reveal();
        }
    }

    /// Judge the active card: record the response, then hold it for the
    /// settle window before [`Session::tick`] advances.
    ///
    /// Ignored while a previous verdict is still settling, before the answer
    /// is revealed, and on cards answered during an earlier visit.
    pub fn judge(&mut self, verdict: Verdict, now: Instant) -> bool {
        if self.is_completed() || !self.card.record_verdict(verdict, now + self.settle) {
            debug!(index = self.card.index(), ?verdict, "verdict ignored");
            return false;
        }
        self.record_response(self.current_index, verdict)
    }

    /// Drop a pending settled advance, keeping the recorded verdict.
    pub fn cancel_settle(&mut self) {
        if self.card.is_settling() {
            debug!(index = self.current_index, "settle cancelled");
            self.activate();
        }
    }

    /// Fire the pending advance once its settle window has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.card.settle_due(now) {
            self.advance()
        } else {
            false
        }
    }

    pub fn items(&self) -> &[QaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> Option<&QaItem> {
        self.items.get(self.current_index)
    }

    pub fn card(&self) -> &CardState {
        &self.card
    }

    pub fn response(&self, index: usize) -> Option<Verdict> {
        self.responses.get(index).copied()
    }

    pub fn responses(&self) -> &[Verdict] {
        &self.responses
    }

    pub fn is_completed(&self) -> bool {
        self.current_index == self.items.len()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.items.is_empty() {
            SessionPhase::Empty
        } else if self.is_completed() {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress
        }
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_responses(&self.responses)
    }

    // Reseed the card slot for the current index. Dropping the old slot
    // also drops any pending settle deadline.
    fn activate(&mut self) {
        let stored = self
            .responses
            .get(self.current_index)
            .copied()
            .unwrap_or_default();
        self.card = CardState::activate(self.current_index, stored);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE)
    }
}
