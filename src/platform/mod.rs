#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::*;

use anyhow::Result;

pub trait Clipboard: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<()>;
}

/// System clipboard through `arboard`.
///
/// A handle is opened per copy; holding one keeps an X11 connection alive.
#[cfg(not(target_os = "macos"))]
pub struct ArboardClipboard;

#[cfg(not(target_os = "macos"))]
impl Clipboard for ArboardClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| anyhow::anyhow!("Failed to open the clipboard: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to set clipboard text: {}", e))?;
        tracing::info!("Copied {} chars to the clipboard", text.len());
        Ok(())
    }
}

pub fn get_clipboard() -> Box<dyn Clipboard> {
    #[cfg(target_os = "macos")]
    {
        Box::new(MacOsClipboard::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(ArboardClipboard)
    }
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;

    // Headless machines have no clipboard, so only the error shape is checked.
    #[test]
    fn clipboard_failure_is_an_error_not_a_panic() {
        if let Err(e) = get_clipboard().copy_text("hello") {
            let message = e.to_string();
            assert!(
                message.starts_with("Failed to open the clipboard")
                    || message.starts_with("Failed to set clipboard text"),
                "unexpected error: {}",
                message
            );
        }
    }
}
