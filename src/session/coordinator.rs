/*!
 * Session coordinator.
 *
 * Owns the buffers, the debounce timer and the share publisher, and reacts
 * to one event at a time: edits and restorations come in through `&mut self`
 * methods, timer expiries and service responses come back through an
 * internal channel drained by [`SessionCoordinator::step`].
 *
 * Every outbound request carries a sequence number and the exact input it
 * was built from. A response is applied only if it answers the latest
 * request and the buffers still hold that input; anything else is dropped.
 */

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::app_config::Config;
use crate::errors::{HistoryError, ServiceError};
use crate::services::{Clipboard, HistoryStore, Notifier, ShareListener, ShareResolver, Transformer};

use super::buffer::BufferState;
use super::debounce::{DEFAULT_QUIET_PERIOD, DebounceScheduler};
use super::models::{Direction, Notice, Origin, Session, ShareSnapshot, TransformOutcome, TransformRequest};
use super::share::{SharePublisher, share_url};

/// Shown when the service rejects the input
pub const INVALID_INPUT_MESSAGE: &str = "Invalid code.";
/// Shown after copying the transformed text
pub const TEXT_COPIED_MESSAGE: &str = "Text copied to clipboard.";
/// Shown after copying a share link
pub const LINK_COPIED_MESSAGE: &str = "Link copied to clipboard.";

/// Default base of generated share links
pub const DEFAULT_SHARE_BASE_URL: &str = "https://mindall.herokuapp.com/";

/// External collaborators of a session
#[derive(Debug, Clone)]
pub struct Services {
    pub transformer: Arc<dyn Transformer>,
    pub share_resolver: Arc<dyn ShareResolver>,
    pub history: Arc<dyn HistoryStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clipboard: Arc<dyn Clipboard>,
    pub share_listener: Arc<dyn ShareListener>,
}

/// Tunables of a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Quiet period before a transformation request fires
    pub quiet_period: Duration,
    /// Base of generated share links
    pub share_base_url: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet_period: Duration::from_millis(config.session.debounce_ms),
            share_base_url: config.share.base_url.clone(),
        }
    }
}

/// Internal events delivered back to the coordinator
#[derive(Debug)]
pub enum SessionEvent {
    /// A debounce timer expired
    DebounceElapsed { ticket: u64 },
    /// A transformation request finished
    TransformCompleted {
        request: TransformRequest,
        result: Result<TransformOutcome, ServiceError>,
    },
    /// A history write finished
    HistorySaved { result: Result<(), HistoryError> },
}

impl SessionEvent {
    fn debounce_elapsed(ticket: u64) -> Self {
        Self::DebounceElapsed { ticket }
    }
}

/// External inputs to a running session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Replace the original text
    Edit(String),
    SetDirection(Direction),
    Swap,
    Clear,
    /// Apply a selected session (e.g. from history)
    Restore(Session),
    /// Resolve a share id and apply it
    OpenShare(String),
    CopyTranslated,
    CopyShareLink,
    Shutdown,
}

pub struct SessionCoordinator {
    pub(super) buffers: BufferState,
    scheduler: DebounceScheduler<SessionEvent>,
    publisher: SharePublisher,
    pub(super) services: Services,
    share_base_url: String,
    sender: mpsc::UnboundedSender<SessionEvent>,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    /// Sequence number of the latest issued request
    latest_seq: u64,
    in_flight: usize,
    /// History writes running on the blocking pool
    pending_saves: usize,
}

impl SessionCoordinator {
    /// Create a session from the externally selected value
    ///
    /// The selection is applied as a restoration. Must be called inside a
    /// tokio runtime, since the selection may arm the debounce timer.
    pub fn new(selected: Session, services: Services, settings: SessionSettings) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        let scheduler = DebounceScheduler::new(settings.quiet_period, sender.clone(), SessionEvent::debounce_elapsed);

        let mut coordinator = Self {
            buffers: BufferState::new(),
            scheduler,
            publisher: SharePublisher::new(),
            services,
            share_base_url: settings.share_base_url,
            sender,
            events,
            latest_seq: 0,
            in_flight: 0,
            pending_saves: 0,
        };
        coordinator.restore(selected);
        coordinator
    }

    pub fn original(&self) -> &str {
        self.buffers.original()
    }

    pub fn translated(&self) -> &str {
        self.buffers.translated()
    }

    pub fn direction(&self) -> Direction {
        self.buffers.direction()
    }

    /// Current buffers as a session triple
    pub fn session(&self) -> Session {
        self.buffers.session()
    }

    /// Current shareable state
    pub fn share_snapshot(&self) -> Option<ShareSnapshot> {
        SharePublisher::derive(&self.buffers)
    }

    /// Placeholder labels for the (source, target) fields
    pub fn placeholders(&self) -> (&'static str, &'static str) {
        self.buffers.direction().placeholders()
    }

    /// Whether a restoration is waiting to be evaluated
    pub fn provenance_pending(&self) -> bool {
        self.buffers.is_restored()
    }

    pub fn timer_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    /// Number of requests sent whose response has not arrived yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Whether a timer, a request or a history write can still produce an event
    pub fn has_pending_work(&self) -> bool {
        self.scheduler.is_armed() || self.in_flight > 0 || self.pending_saves > 0
    }

    // =========================================================================
    // Buffer mutations
    // =========================================================================

    /// Live edit of the original text
    pub fn set_original(&mut self, text: impl Into<String>) {
        if self.buffers.set_original(text) {
            self.evaluate();
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.buffers.set_direction(direction) {
            self.evaluate();
        }
    }

    /// Flip direction, exchanging the buffers when both are populated
    pub fn swap(&mut self) {
        if self.buffers.swap() {
            self.publish_share();
            self.evaluate();
        }
    }

    /// Empty the original text through the live-edit path
    pub fn clear(&mut self) {
        if self.buffers.clear() {
            self.evaluate();
        }
    }

    /// Decide whether the current (original, direction) needs a request
    pub(super) fn evaluate(&mut self) {
        let origin = self.buffers.take_origin();
        let restored = origin == Origin::Restoration;
        let has_original = !self.buffers.original().is_empty();
        let has_translation = !self.buffers.translated().is_empty();

        if has_original && (!restored || !has_translation) {
            let ticket = self.scheduler.arm();
            debug!("Scheduled transformation ({:?}, ticket #{})", origin, ticket);
            return;
        }

        self.scheduler.cancel();
        if has_translation && !restored {
            debug!("Original text is empty, clearing transformed text");
            self.buffers.set_translated(String::new());
            self.publish_share();
        }
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    /// Wait for and process exactly one internal event
    pub async fn step(&mut self) {
        // The coordinator holds a sender, so the channel never closes
        if let Some(event) = self.events.recv().await {
            self.handle_event(event);
        }
    }

    /// Process events until no timer is armed and no request is in flight
    pub async fn settle(&mut self) {
        while self.has_pending_work() {
            self.step().await;
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::DebounceElapsed { ticket } => self.on_debounce_elapsed(ticket),
            SessionEvent::TransformCompleted { request, result } => self.on_transform_completed(request, result),
            SessionEvent::HistorySaved { result } => {
                self.pending_saves = self.pending_saves.saturating_sub(1);
                if let Err(e) = result {
                    warn!("Failed to save session to history: {}", e);
                }
            }
        }
    }

    fn on_debounce_elapsed(&mut self, ticket: u64) {
        if !self.scheduler.accept(ticket) {
            return;
        }
        if self.buffers.original().is_empty() {
            return;
        }

        self.latest_seq += 1;
        let request = TransformRequest {
            seq: self.latest_seq,
            direction: self.buffers.direction(),
            original_text: self.buffers.original().to_string(),
        };
        debug!(
            "Sending transformation request #{} ({}, {} chars)",
            request.seq,
            request.direction,
            request.original_text.chars().count()
        );

        let transformer = Arc::clone(&self.services.transformer);
        let sender = self.sender.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = transformer.transform(&request).await;
            let _ = sender.send(SessionEvent::TransformCompleted { request, result });
        });
    }

    fn on_transform_completed(&mut self, request: TransformRequest, result: Result<TransformOutcome, ServiceError>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if !self.is_current(&request) {
            debug!("Discarding stale response for request #{} (latest #{})", request.seq, self.latest_seq);
            return;
        }

        match result {
            Ok(TransformOutcome::Transformed(text)) => {
                info!("Transformation #{} completed ({})", request.seq, request.direction);
                self.buffers.set_translated(text);
                self.publish_share();
                self.save_to_history();
            }
            Ok(TransformOutcome::Rejected { message }) => {
                debug!("Service rejected request #{}: {}", request.seq, message);
                self.buffers.set_translated(String::new());
                self.services.notifier.notify(Notice::Error(INVALID_INPUT_MESSAGE.to_string()));
                self.emit_share(None);
            }
            Err(e) => {
                warn!("Transformation request #{} failed: {}", request.seq, e);
            }
        }
    }

    /// Hand the current triple to the history store on the blocking pool
    fn save_to_history(&mut self) {
        let session = self.buffers.session();
        let history = Arc::clone(&self.services.history);
        let sender = self.sender.clone();
        self.pending_saves += 1;
        tokio::task::spawn_blocking(move || {
            let result = history.save(&session);
            let _ = sender.send(SessionEvent::HistorySaved { result });
        });
    }

    fn is_current(&self, request: &TransformRequest) -> bool {
        request.seq == self.latest_seq
            && request.direction == self.buffers.direction()
            && request.original_text == self.buffers.original()
    }

    // =========================================================================
    // Share publishing
    // =========================================================================

    pub(super) fn publish_share(&mut self) {
        let snapshot = SharePublisher::derive(&self.buffers);
        if let Some(emission) = self.publisher.next_emission(snapshot) {
            self.services.share_listener.share_updated(emission);
        }
    }

    fn emit_share(&mut self, snapshot: Option<ShareSnapshot>) {
        self.publisher.force(snapshot.clone());
        self.services.share_listener.share_updated(snapshot);
    }

    // =========================================================================
    // Clipboard
    // =========================================================================

    /// Copy the transformed text. Returns whether anything was copied.
    pub fn copy_translated(&self) -> bool {
        let text = self.buffers.translated();
        if text.is_empty() {
            return false;
        }
        self.copy_with_notice(text, TEXT_COPIED_MESSAGE)
    }

    /// Copy a share link for the current original text and direction
    pub fn copy_share_link(&self) -> Option<String> {
        let link = match self.share_link() {
            Ok(link) => link,
            Err(e) => {
                warn!("Could not build share link: {:#}", e);
                self.services.notifier.notify(Notice::Error(e.to_string()));
                return None;
            }
        };
        self.copy_with_notice(&link, LINK_COPIED_MESSAGE).then_some(link)
    }

    /// Share link for the current original text and direction
    pub fn share_link(&self) -> anyhow::Result<String> {
        let snapshot = ShareSnapshot::new(self.buffers.original(), self.buffers.direction());
        share_url(&self.share_base_url, &snapshot)
    }

    fn copy_with_notice(&self, text: &str, message: &str) -> bool {
        match self.services.clipboard.write_text(text) {
            Ok(()) => {
                self.services.notifier.notify(Notice::Info(message.to_string()));
                true
            }
            Err(e) => {
                warn!("{}", e);
                self.services.notifier.notify(Notice::Error(e.to_string()));
                false
            }
        }
    }

    // =========================================================================
    // Command loop
    // =========================================================================

    /// Apply one external command
    pub async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Edit(text) => self.set_original(text),
            SessionCommand::SetDirection(direction) => self.set_direction(direction),
            SessionCommand::Swap => self.swap(),
            SessionCommand::Clear => self.clear(),
            SessionCommand::Restore(session) => self.restore(session),
            SessionCommand::OpenShare(id) => {
                self.open_share(&id).await;
            }
            SessionCommand::CopyTranslated => {
                self.copy_translated();
            }
            SessionCommand::CopyShareLink => {
                self.copy_share_link();
            }
            SessionCommand::Shutdown => {}
        }
    }

    /// Run until the command channel closes or `Shutdown` arrives
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Session {
        enum Next {
            Command(Option<SessionCommand>),
            Event(Option<SessionEvent>),
        }

        loop {
            let next = tokio::select! {
                command = commands.recv() => Next::Command(command),
                event = self.events.recv() => Next::Event(event),
            };

            match next {
                Next::Command(None) | Next::Command(Some(SessionCommand::Shutdown)) => break,
                Next::Command(Some(command)) => self.handle_command(command).await,
                Next::Event(Some(event)) => self.handle_event(event),
                Next::Event(None) => break,
            }
        }

        self.scheduler.cancel();
        while self.pending_saves > 0 {
            match self.events.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }
        debug!("Session loop finished");
        self.buffers.session()
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("buffers", &self.buffers)
            .field("timer_armed", &self.scheduler.is_armed())
            .field("latest_seq", &self.latest_seq)
            .field("in_flight", &self.in_flight)
            .field("pending_saves", &self.pending_saves)
            .finish()
    }
}
