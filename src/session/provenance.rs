/*!
 * One-shot provenance of the latest buffer write.
 *
 * The write that changes the buffers records its origin in the same call,
 * and the next evaluation consumes it. Consuming always resets the slot,
 * so a restoration can only ever suppress the evaluation it caused.
 */

use log::trace;

use super::models::Origin;

#[derive(Debug, Default)]
pub struct ProvenanceTracker {
    pending: Option<Origin>,
}

impl ProvenanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the write that is happening right now
    pub fn record(&mut self, origin: Origin) {
        trace!("Recorded buffer write origin {:?}", origin);
        self.pending = Some(origin);
    }

    /// Consume the recorded origin, defaulting to a live edit
    pub fn take(&mut self) -> Origin {
        self.pending.take().unwrap_or_default()
    }

    /// Whether the unconsumed write came from a restoration
    pub fn is_restored(&self) -> bool {
        self.pending == Some(Origin::Restoration)
    }
}
