/*!
 * Buffer state and transition rules.
 *
 * Holds the original text, the transformed text and the direction.
 * Every mutation that can change (original, direction) tags itself with
 * its origin and returns whether the request policy must be evaluated.
 */

use super::models::{Direction, Origin, Session};
use super::provenance::ProvenanceTracker;

#[derive(Debug, Default)]
pub struct BufferState {
    original: String,
    translated: String,
    direction: Direction,
    provenance: ProvenanceTracker,
}

impl BufferState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn translated(&self) -> &str {
        &self.translated
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current contents as a session triple
    pub fn session(&self) -> Session {
        Session::new(self.original.clone(), self.translated.clone(), self.direction)
    }

    /// Replace the original text from a live edit
    ///
    /// Returns `true` when the text actually changed.
    #[must_use]
    pub fn set_original(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.original {
            return false;
        }
        self.original = text;
        self.provenance.record(Origin::UserEdit);
        true
    }

    /// Write the derived buffer. Never triggers an evaluation.
    pub fn set_translated(&mut self, text: impl Into<String>) {
        self.translated = text.into();
    }

    /// Change direction from a live edit
    ///
    /// Returns `true` when the direction actually changed.
    #[must_use]
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction {
            return false;
        }
        self.direction = direction;
        self.provenance.record(Origin::UserEdit);
        true
    }

    /// Flip direction, exchanging the buffers only when both are populated
    #[must_use]
    pub fn swap(&mut self) -> bool {
        if !self.original.is_empty() && !self.translated.is_empty() {
            std::mem::swap(&mut self.original, &mut self.translated);
        }
        self.direction = self.direction.flipped();
        self.provenance.record(Origin::UserEdit);
        true
    }

    /// Reset the original text. Goes through the live-edit path.
    #[must_use]
    pub fn clear(&mut self) -> bool {
        self.set_original(String::new())
    }

    /// Write a restored triple in one step
    ///
    /// Always requests an evaluation, even if nothing changed, so the
    /// restoration is consumed by the evaluation it belongs to.
    #[must_use]
    pub fn apply_snapshot(&mut self, session: Session) -> bool {
        self.direction = session.direction;
        self.original = session.original_text;
        self.translated = session.translated_text;
        self.provenance.record(Origin::Restoration);
        true
    }

    /// Consume the origin of the latest evaluating write
    pub fn take_origin(&mut self) -> Origin {
        self.provenance.take()
    }

    /// Whether the buffers have a pending, unconsumed restoration
    pub fn is_restored(&self) -> bool {
        self.provenance.is_restored()
    }
}
