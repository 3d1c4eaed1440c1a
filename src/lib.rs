/*!
 * # cipherpad - Debounced Encode/Decode Sessions
 *
 * A Rust library for editing text while a remote cipher service keeps
 * its encoded (or decoded) counterpart up to date.
 *
 * ## Features
 *
 * - Debounced transformation requests while the user types
 * - Direction swap that inverts a populated session
 * - Restoration from history, share ids and share links without
 *   re-requesting an already known translation
 * - Share snapshots and share links kept in sync with the output
 * - Stale responses are discarded instead of overwriting fresher results
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `session`: The session state machine:
 *   - `session::buffer`: Buffer state and transition rules
 *   - `session::debounce`: Cancellable quiet-period timer
 *   - `session::provenance`: Origin tagging of buffer writes
 *   - `session::share`: Share snapshots and links
 *   - `session::coordinator` and `session::restore`: Request coordination
 * - `services`: Collaborator contracts and implementations:
 *   - `services::http`: Cipher and share service client
 *   - `services::history`: History stores
 *   - `services::clipboard`: System clipboard
 *   - `services::mock`: Scripted collaborators for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod services;
pub mod session;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ClipboardError, HistoryError, ServiceError};
pub use session::{Direction, Session, SessionCommand, SessionCoordinator, ShareSnapshot};
