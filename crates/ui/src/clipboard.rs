//! Copying message text out of the terminal.
//!
//! The system clipboard is tried first. Without one (SSH sessions, Termux,
//! headless X) the text is sent to the terminal as an OSC 52 sequence, which
//! most modern terminals turn into a clipboard write.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;

/// Destination for copied text.
pub trait ClipboardSink {
    /// Returns whether the text reached a clipboard.
    fn copy(&mut self, text: &str) -> bool;
}

/// System clipboard with an OSC 52 fallback.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    #[cfg(not(target_os = "android"))]
    fn copy_native(text: &str) -> Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
    }

    #[cfg(target_os = "android")]
    fn copy_native(_text: &str) -> Result<(), String> {
        Err("no system clipboard on this platform".to_string())
    }

    fn copy_osc52(text: &str) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> bool {
        match Self::copy_native(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "system clipboard unavailable, using OSC 52");
                match Self::copy_osc52(text) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "copy failed");
                        false
                    }
                }
            }
        }
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
