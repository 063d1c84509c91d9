use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use super::Clipboard;

pub struct MacOsClipboard;

impl MacOsClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for MacOsClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new("pbcopy")
            .env("LANG", "en_US.UTF-8")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .context("Failed to start pbcopy")?;
        if let Some(ref mut stdin) = child.stdin {
            stdin.write_all(text.as_bytes())?;
        }
        // Close stdin so pbcopy sees EOF.
        drop(child.stdin.take());
        let status = child.wait()?;
        if !status.success() {
            anyhow::bail!("pbcopy exited with {}", status);
        }
        tracing::info!("Copied {} chars to the clipboard", text.len());
        Ok(())
    }
}
