/*!
 * System clipboard backed by arboard.
 */

use log::debug;

use crate::errors::ClipboardError;
use crate::services::Clipboard;

/// Opens the platform clipboard for every write
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))?;
        debug!("Copied {} characters to the clipboard", text.chars().count());
        Ok(())
    }
}
