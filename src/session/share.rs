/*!
 * Share publisher and share link format.
 *
 * Links look like `<base>?t=<original text>&d=<0|1>` where `d=1` means the
 * link opens in decode direction.
 */

use anyhow::{Context, Result, anyhow};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use super::buffer::BufferState;
use super::models::{Direction, ShareSnapshot};

/// Characters left as-is by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Derives the shareable state from the buffers
///
/// Remembers the last emitted value so the listener is not called twice
/// in a row with the same snapshot.
#[derive(Debug, Default)]
pub struct SharePublisher {
    last_emitted: Option<Option<ShareSnapshot>>,
}

impl SharePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some` only when there is a transformed text to share
    pub fn derive(buffers: &BufferState) -> Option<ShareSnapshot> {
        if buffers.translated().is_empty() {
            None
        } else {
            Some(ShareSnapshot::new(buffers.original(), buffers.direction()))
        }
    }

    /// Returns the value to emit, or `None` if it equals the last emission
    pub fn next_emission(&mut self, snapshot: Option<ShareSnapshot>) -> Option<Option<ShareSnapshot>> {
        if self.last_emitted.as_ref() == Some(&snapshot) {
            return None;
        }
        self.last_emitted = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Record an emission made regardless of the last one
    pub fn force(&mut self, snapshot: Option<ShareSnapshot>) {
        self.last_emitted = Some(snapshot);
    }
}

/// Build the share link for a snapshot
pub fn share_url(base: &str, snapshot: &ShareSnapshot) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid share base URL: {}", base))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(format!(
        "{}?t={}&d={}",
        url,
        utf8_percent_encode(&snapshot.original_text, COMPONENT),
        snapshot.direction.share_flag()
    ))
}

/// Read a snapshot back out of a share link
///
/// Accepts `t` encoded either per URI component or as a form value.
pub fn parse_share_url(link: &str) -> Result<ShareSnapshot> {
    let url = Url::parse(link).with_context(|| format!("Invalid share link: {}", link))?;

    let mut text = None;
    let mut direction = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "t" => text = Some(value.into_owned()),
            "d" => {
                direction = Some(
                    Direction::from_share_flag(&value)
                        .ok_or_else(|| anyhow!("Invalid direction flag in share link: {}", value))?,
                )
            }
            _ => {}
        }
    }

    let text = text.ok_or_else(|| anyhow!("Share link has no text parameter"))?;
    Ok(ShareSnapshot::new(text, direction.unwrap_or_default()))
}
