/*!
 * Restoration of externally supplied sessions.
 *
 * Covers history selection, share ids resolved through the share service,
 * and share links carrying the text and direction in their query.
 */

use log::{info, warn};

use crate::session::models::{Notice, Session};
use crate::session::share::parse_share_url;

use super::coordinator::SessionCoordinator;

impl SessionCoordinator {
    /// Apply a selected session
    ///
    /// The triple is written in one step and tagged as a restoration, so
    /// a session that already carries its translation issues no request,
    /// while one without a translation is looked up.
    pub fn restore(&mut self, session: Session) {
        if self.buffers.apply_snapshot(session) {
            self.publish_share();
            self.evaluate();
        }
    }

    /// Resolve a share id and restore it with an empty translation
    ///
    /// On failure the service's message is shown and the buffers are left
    /// untouched. Returns whether the share was applied.
    pub async fn open_share(&mut self, id: &str) -> bool {
        let resolver = std::sync::Arc::clone(&self.services.share_resolver);
        match resolver.resolve(id).await {
            Ok(snapshot) => {
                info!("Opened share {} ({})", id, snapshot.direction);
                self.restore(snapshot.into_session());
                true
            }
            Err(e) => {
                warn!("Failed to resolve share {}: {}", id, e);
                self.services.notifier.notify(Notice::Error(e.user_message()));
                false
            }
        }
    }

    /// Restore from a share link of the form `<base>?t=...&d=0|1`
    pub fn open_share_link(&mut self, link: &str) -> bool {
        match parse_share_url(link) {
            Ok(snapshot) => {
                self.restore(snapshot.into_session());
                true
            }
            Err(e) => {
                warn!("{:#}", e);
                self.services.notifier.notify(Notice::Error(e.to_string()));
                false
            }
        }
    }
}
