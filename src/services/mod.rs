/*!
 * Contracts for the collaborators a session talks to.
 *
 * - `http`: reqwest client for the transformation and share services
 * - `history`: history stores used as the persistence callback
 * - `clipboard`: system clipboard access
 * - `mock`: scripted implementations for tests and offline use
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::{ClipboardError, HistoryError, ServiceError};
use crate::session::models::{Notice, Session, ShareSnapshot, TransformOutcome, TransformRequest};

/// Remote transformation service (encode/decode)
#[async_trait]
pub trait Transformer: Send + Sync + Debug {
    /// Transform the request's text in the request's direction
    ///
    /// # Returns
    /// * `Ok(TransformOutcome::Transformed)` - the transformed text
    /// * `Ok(TransformOutcome::Rejected)` - the service refused the input
    /// * `Err(ServiceError)` - transport failure, verdict unknown
    async fn transform(&self, request: &TransformRequest) -> Result<TransformOutcome, ServiceError>;
}

/// Resolves an opaque share id into a snapshot
#[async_trait]
pub trait ShareResolver: Send + Sync + Debug {
    async fn resolve(&self, id: &str) -> Result<ShareSnapshot, ServiceError>;
}

/// Persistence callback for completed transformations
pub trait HistoryStore: Send + Sync + Debug {
    /// Record a completed transformation
    fn save(&self, session: &Session) -> Result<(), HistoryError>;

    /// Stored sessions, newest first
    fn entries(&self) -> Result<Vec<Session>, HistoryError>;
}

/// Fire-and-forget user-visible messages
pub trait Notifier: Send + Sync + Debug {
    fn notify(&self, notice: Notice);
}

/// Write-only clipboard
pub trait Clipboard: Send + Sync + Debug {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Receives the shareable state whenever it is re-derived
pub trait ShareListener: Send + Sync + Debug {
    fn share_updated(&self, snapshot: Option<ShareSnapshot>);
}

pub mod clipboard;
pub mod history;
pub mod http;
pub mod mock;
