/*!
 * Bidirectional transformation session.
 *
 * This module provides:
 * - Buffer state and its transition rules
 * - Debounced scheduling of transformation requests
 * - Provenance tagging of buffer writes
 * - Share snapshot derivation and share links
 * - Restoration from history, share ids and share links
 */

pub mod buffer;
pub mod coordinator;
pub mod debounce;
pub mod models;
pub mod provenance;
pub mod restore;
pub mod share;

// Re-export main types
pub use coordinator::{Services, SessionCommand, SessionCoordinator, SessionEvent, SessionSettings};
pub use models::{Direction, Notice, Origin, Session, ShareSnapshot, TransformOutcome, TransformRequest};
