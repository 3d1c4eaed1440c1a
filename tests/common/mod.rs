/*!
 * Common test utilities for the cipherpad test suite
 */

use std::sync::Arc;

use cipherpad::services::history::MemoryHistory;
use cipherpad::services::mock::{
    MockShareResolver, MockTransformer, RecordingClipboard, RecordingNotifier, RecordingShareListener,
};
use cipherpad::session::{Services, Session, SessionCoordinator, SessionSettings};

/// A session wired to mock collaborators, with handles to inspect them
pub struct Harness {
    pub session: SessionCoordinator,
    pub transformer: MockTransformer,
    pub history: Arc<MemoryHistory>,
    pub notifier: Arc<RecordingNotifier>,
    pub clipboard: Arc<RecordingClipboard>,
    pub share: Arc<RecordingShareListener>,
}

/// Installs a test logger once; repeated calls are ignored
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a harness around a working base64 transformer
pub fn harness(selected: Session) -> Harness {
    harness_with(MockTransformer::working(), MockShareResolver::new(), selected)
}

/// Builds a harness with explicit transformer and share resolver
pub fn harness_with(transformer: MockTransformer, resolver: MockShareResolver, selected: Session) -> Harness {
    init_logging();

    let history = Arc::new(MemoryHistory::new(50));
    let notifier = Arc::new(RecordingNotifier::new());
    let clipboard = Arc::new(RecordingClipboard::new());
    let share = Arc::new(RecordingShareListener::new());

    let services = Services {
        transformer: Arc::new(transformer.clone()),
        share_resolver: Arc::new(resolver),
        history: history.clone(),
        notifier: notifier.clone(),
        clipboard: clipboard.clone(),
        share_listener: share.clone(),
    };

    let session = SessionCoordinator::new(selected, services, SessionSettings::default());

    Harness {
        session,
        transformer,
        history,
        notifier,
        clipboard,
        share,
    }
}
