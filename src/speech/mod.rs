pub mod system;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::notify::Notification;
use crate::state::SpeechSettings;
use crate::translate::TargetLanguage;

/// A platform voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 style tag, e.g. `en-US`
    pub lang: String,
}

/// One request to speak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    /// Multiplier over the engine's normal speaking rate
    pub rate: f32,
    pub voice: Option<String>,
}

/// Text-to-speech output. One utterance plays at a time.
pub trait SpeechEngine: Send + Sync {
    fn voices(&self) -> Vec<Voice>;
    /// Starting a new utterance cancels the one playing.
    fn speak(&self, utterance: &Utterance) -> Result<()>;
    fn cancel(&self) -> Result<()>;
    fn is_speaking(&self) -> bool;
}

impl<T: SpeechEngine + ?Sized> SpeechEngine for Arc<T> {
    fn voices(&self) -> Vec<Voice> {
        (**self).voices()
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        (**self).speak(utterance)
    }

    fn cancel(&self) -> Result<()> {
        (**self).cancel()
    }

    fn is_speaking(&self) -> bool {
        (**self).is_speaking()
    }
}

/// Used when the platform has no synthesizer; every request fails.
pub struct UnavailableSpeech {
    reason: String,
}

impl UnavailableSpeech {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechEngine for UnavailableSpeech {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _utterance: &Utterance) -> Result<()> {
        anyhow::bail!("Speech unavailable: {}", self.reason)
    }

    fn cancel(&self) -> Result<()> {
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }
}

/// First voice whose language tag starts with `code`.
pub fn select_voice<'a>(voices: &'a [Voice], code: &str) -> Option<&'a Voice> {
    voices.iter().find(|v| v.lang.starts_with(code))
}

/// Speak/stop logic on top of a [`SpeechEngine`].
pub struct SpeechController {
    engine: Box<dyn SpeechEngine>,
    settings: SpeechSettings,
}

impl SpeechController {
    pub fn new(engine: Box<dyn SpeechEngine>, settings: SpeechSettings) -> Self {
        Self { engine, settings }
    }

    pub fn is_speaking(&self) -> bool {
        self.engine.is_speaking()
    }

    /// Toggles: stops playback if something is playing.
    pub fn speak_original(&self, text: &str) -> Notification {
        if self.engine.is_speaking() {
            return match self.engine.cancel() {
                Ok(()) => Notification::warning("Speech stopped!"),
                Err(e) => {
                    tracing::error!("Failed to stop speech: {}", e);
                    Notification::danger("Could not stop speech!")
                }
            };
        }

        if text.trim().is_empty() {
            return Notification::warning("No text to speak!");
        }

        let utterance = Utterance {
            text: text.to_string(),
            lang: self.settings.original_lang.clone(),
            rate: self.settings.original_rate,
            voice: None,
        };
        self.play(&utterance, "Speaking original text...")
    }

    pub fn speak_translated(&self, text: &str, target: TargetLanguage) -> Notification {
        if text.trim().is_empty() {
            return Notification::warning("No translation to speak!");
        }

        if let Err(e) = self.engine.cancel() {
            tracing::warn!("Failed to cancel previous speech: {}", e);
        }

        let voices = self.engine.voices();
        let voice = select_voice(&voices, target.code()).map(|v| v.name.clone());
        if voice.is_none() {
            tracing::info!("No voice for '{}', using engine default", target.code());
        }

        let utterance = Utterance {
            text: text.to_string(),
            lang: target.code().to_string(),
            rate: self.settings.translated_rate,
            voice,
        };
        self.play(&utterance, "Speaking translation...")
    }

    pub fn stop(&self) -> Notification {
        if !self.engine.is_speaking() {
            return Notification::info("Nothing is playing.");
        }
        match self.engine.cancel() {
            Ok(()) => Notification::warning("Speech stopped!"),
            Err(e) => {
                tracing::error!("Failed to stop speech: {}", e);
                Notification::danger("Could not stop speech!")
            }
        }
    }

    fn play(&self, utterance: &Utterance, started: &str) -> Notification {
        match self.engine.speak(utterance) {
            Ok(()) => Notification::info(started),
            Err(e) => {
                tracing::error!("Speech failed: {:#}", e);
                Notification::danger("Speech is not available!")
            }
        }
    }
}
