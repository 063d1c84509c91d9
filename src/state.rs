use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::export;
use crate::history::{self, HistoryStore, RemoveOutcome};
use crate::notify::Notification;
use crate::persistence::Storage;
use crate::platform::Clipboard;
use crate::speech::{SpeechController, SpeechEngine};
use crate::text::{DerivedMetrics, TextOp, TextState};
use crate::translate::{self, TargetLanguage, TranslationDisplay, Translator};

/// Everything one editing session owns.
///
/// All mutations go through `&mut self`, so they are applied one at a time.
/// A translation only ever writes the translation display.
pub struct Session<S: Storage> {
    text: TextState,
    history: HistoryStore<S>,
    translation: TranslationDisplay,
    target: TargetLanguage,
    translator: Translator,
    speech: SpeechController,
    clipboard: Box<dyn Clipboard>,
    export: ExportSettings,
}

impl<S: Storage> Session<S> {
    pub fn new(
        settings: &Settings,
        storage: S,
        speech_engine: Box<dyn SpeechEngine>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            text: TextState::new(),
            history: HistoryStore::load(storage),
            translation: TranslationDisplay::default(),
            target: settings.translation.default_target,
            translator: Translator::new(
                settings.translation.endpoint.clone(),
                settings.translation.source_lang.clone(),
            ),
            speech: SpeechController::new(speech_engine, settings.speech.clone()),
            clipboard,
            export: settings.export.clone(),
        }
    }

    pub fn text(&self) -> &str {
        self.text.text()
    }

    pub fn preview(&self) -> &str {
        self.text.preview()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.set_text(text);
    }

    pub fn append_line(&mut self, line: &str) {
        let mut text = self.text.text().to_string();
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
        self.text.set_text(text);
    }

    pub fn transform(&mut self, op: TextOp) -> Notification {
        self.text.transform(op)
    }

    pub fn metrics(&self) -> DerivedMetrics {
        self.text.metrics()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn add_to_history(&mut self) -> Notification {
        let outcome = self.history.add(self.text.text());
        tracing::debug!("History add: {:?}", outcome);
        outcome.notification()
    }

    pub fn remove_from_history(&mut self, index: usize) -> Notification {
        match self.history.remove_at(index) {
            RemoveOutcome::Removed(_) => Notification::danger("History item removed!"),
            RemoveOutcome::NotSaved(_) => Notification::danger(history::NOT_SAVED_MESSAGE),
            RemoveOutcome::OutOfRange => {
                Notification::warning(format!("No history entry #{}", index + 1))
            }
        }
    }

    pub fn restore_from_history(&mut self, index: usize) -> Notification {
        match self.history.restore_candidate(index) {
            Some(entry) => {
                let entry = entry.to_string();
                self.text.set_text(entry);
                Notification::info("Text restored from history!")
            }
            None => Notification::warning(format!("No history entry #{}", index + 1)),
        }
    }

    pub fn target(&self) -> TargetLanguage {
        self.target
    }

    pub fn set_target(&mut self, target: TargetLanguage) {
        self.target = target;
    }

    pub fn translation(&self) -> &TranslationDisplay {
        &self.translation
    }

    pub async fn translate(&mut self) -> Notification {
        if self.text.is_blank() {
            self.translation.set(translate::NO_TEXT_MESSAGE);
            return Notification::warning("Please enter text to translate.");
        }
        let result = self.translator.translate(self.text.text(), self.target).await;
        translate::apply_result(&mut self.translation, result)
    }

    pub fn speak_original(&self) -> Notification {
        self.speech.speak_original(self.text.text())
    }

    pub fn speak_translation(&self) -> Notification {
        self.speech.speak_translated(self.translation.text(), self.target)
    }

    pub fn stop_speaking(&self) -> Notification {
        self.speech.stop()
    }

    pub fn copy(&self) -> Notification {
        match self.clipboard.copy_text(self.text.text()) {
            Ok(()) => Notification::info("Text Copied!"),
            Err(e) => {
                tracing::error!("Clipboard copy failed: {:#}", e);
                Notification::danger("Copy failed!")
            }
        }
    }

    /// Writes the working text to the download directory, or `dir` if given.
    pub fn download(&self, dir: Option<&Path>) -> Notification {
        let dir = dir
            .map(Path::to_path_buf)
            .or_else(|| self.export.directory.clone())
            .unwrap_or_else(export::default_download_dir);
        match export::download(self.text.text(), &dir, &self.export.file_name) {
            Ok(path) => Notification::success(format!("File Downloaded! ({})", path.display())),
            Err(e) => {
                tracing::error!("Download failed: {:#}", e);
                Notification::danger("Download failed!")
            }
        }
    }

    pub fn history_labels(&self) -> Vec<String> {
        self.history
            .entries()
            .iter()
            .map(|e| history::display_label(e))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub translation: TranslationSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    pub endpoint: String,
    pub source_lang: String,
    pub default_target: TargetLanguage,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: translate::MYMEMORY_ENDPOINT.to_string(),
            source_lang: "en".to_string(),
            default_target: TargetLanguage::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub original_lang: String,
    pub original_rate: f32,
    pub translated_rate: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            original_lang: "en-US".to_string(),
            original_rate: 1.3,
            translated_rate: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub file_name: String,
    pub directory: Option<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: export::DEFAULT_FILE_NAME.to_string(),
            directory: None,
        }
    }
}
