/*!
 * Mock collaborators for testing.
 *
 * - `MockTransformer::working()` - base64 encodes/decodes, rejects bad code
 * - `MockTransformer::rejecting()` - always rejects the input
 * - `MockTransformer::failing()` - always fails at the transport level
 * - Recording notifier, clipboard and share listener that keep every call
 */

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{ClipboardError, ServiceError};
use crate::services::{Clipboard, Notifier, ShareListener, ShareResolver, Transformer};
use crate::session::models::{Direction, Notice, ShareSnapshot, TransformOutcome, TransformRequest};

/// Behavior mode for the mock transformer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Base64 encode/decode, rejecting undecodable code
    Working,
    /// Always rejects with a domain error
    Rejecting,
    /// Always fails with a transport error
    Failing,
}

/// Scripted transformation service
#[derive(Debug, Clone)]
pub struct MockTransformer {
    behavior: MockBehavior,
    /// Every request received, shared between clones
    requests: Arc<Mutex<Vec<TransformRequest>>>,
    /// Optional per-request latency
    latency: Option<fn(&TransformRequest) -> Duration>,
}

impl MockTransformer {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn rejecting() -> Self {
        Self::new(MockBehavior::Rejecting)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Delay each answer by the duration the function picks for it
    pub fn with_latency(mut self, latency: fn(&TransformRequest) -> Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<TransformRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// The reference transformation: base64
    pub fn reference_transform(direction: Direction, text: &str) -> TransformOutcome {
        match direction {
            Direction::Encode => TransformOutcome::Transformed(STANDARD.encode(text)),
            Direction::Decode => match STANDARD.decode(text).ok().and_then(|bytes| String::from_utf8(bytes).ok()) {
                Some(decoded) => TransformOutcome::Transformed(decoded),
                None => TransformOutcome::Rejected {
                    message: "Invalid code".to_string(),
                },
            },
        }
    }
}

#[async_trait]
impl Transformer for MockTransformer {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformOutcome, ServiceError> {
        self.requests.lock().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency(request)).await;
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::reference_transform(request.direction, &request.original_text)),
            MockBehavior::Rejecting => Ok(TransformOutcome::Rejected {
                message: "Invalid code".to_string(),
            }),
            MockBehavior::Failing => Err(ServiceError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
        }
    }
}

/// Share resolver backed by a fixed map
#[derive(Debug, Default)]
pub struct MockShareResolver {
    shares: HashMap<String, ShareSnapshot>,
}

impl MockShareResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_share(mut self, id: impl Into<String>, snapshot: ShareSnapshot) -> Self {
        self.shares.insert(id.into(), snapshot);
        self
    }
}

#[async_trait]
impl ShareResolver for MockShareResolver {
    async fn resolve(&self, id: &str) -> Result<ShareSnapshot, ServiceError> {
        self.shares
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Share {} not found", id)))
    }
}

/// Notifier that keeps every notice
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Clipboard that keeps every write
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    unavailable: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes always fail
    pub fn unavailable() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError("Clipboard unavailable".to_string()));
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

/// Share listener that keeps every emission
#[derive(Debug, Default)]
pub struct RecordingShareListener {
    updates: Mutex<Vec<Option<ShareSnapshot>>>,
}

impl RecordingShareListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<Option<ShareSnapshot>> {
        self.updates.lock().clone()
    }

    pub fn last(&self) -> Option<Option<ShareSnapshot>> {
        self.updates.lock().last().cloned()
    }
}

impl ShareListener for RecordingShareListener {
    fn share_updated(&self, snapshot: Option<ShareSnapshot>) {
        self.updates.lock().push(snapshot);
    }
}
