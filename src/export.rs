use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_FILE_NAME: &str = "myText.txt";

/// The user's download directory, or the current directory without one.
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Writes `text` verbatim to `dir/file_name`, replacing any existing file.
pub fn download(text: &str, dir: &Path, file_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let dest = dir.join(file_name);
    std::fs::write(&dest, text).with_context(|| format!("Failed to write {}", dest.display()))?;
    tracing::info!("Saved {} bytes to {}", text.len(), dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_exact_text() {
        let dir = tempfile::tempdir().unwrap();
        let text = "line one\n  line two\t\n";
        let dest = download(text, dir.path(), DEFAULT_FILE_NAME).unwrap();
        assert_eq!(dest, dir.path().join("myText.txt"));
        assert_eq!(std::fs::read_to_string(dest).unwrap(), text);
    }

    #[test]
    fn overwrites_previous_download() {
        let dir = tempfile::tempdir().unwrap();
        download("old contents", dir.path(), DEFAULT_FILE_NAME).unwrap();
        let dest = download("", dir.path(), DEFAULT_FILE_NAME).unwrap();
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "");
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let dest = download("x", &nested, "out.txt").unwrap();
        assert!(dest.exists());
    }
}
