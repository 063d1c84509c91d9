use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::notify::Notification;

pub const MYMEMORY_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
pub const FAILURE_MESSAGE: &str = "Translation failed!";
pub const NO_TEXT_MESSAGE: &str = "\u{274C} No text provided for translation.";
const EMPTY_DISPLAY: &str = "Nothing translated yet!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLanguage {
    #[default]
    Urdu,
    Hindi,
    Spanish,
    French,
    Arabic,
    Chinese,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 6] = [
        TargetLanguage::Urdu,
        TargetLanguage::Hindi,
        TargetLanguage::Spanish,
        TargetLanguage::French,
        TargetLanguage::Arabic,
        TargetLanguage::Chinese,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::Urdu => "ur",
            TargetLanguage::Hindi => "hi",
            TargetLanguage::Spanish => "es",
            TargetLanguage::French => "fr",
            TargetLanguage::Arabic => "ar",
            TargetLanguage::Chinese => "zh",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetLanguage::Urdu => "Urdu",
            TargetLanguage::Hindi => "Hindi",
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::French => "French",
            TargetLanguage::Arabic => "Arabic",
            TargetLanguage::Chinese => "Chinese",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl FromStr for TargetLanguage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TargetLanguage::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(wanted) || lang.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| anyhow::anyhow!("Unsupported target language: {}", wanted))
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: MyMemoryData,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for the MyMemory translation endpoint.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    endpoint: String,
    source_lang: String,
}

impl Translator {
    pub fn new(endpoint: impl Into<String>, source_lang: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            source_lang: source_lang.into(),
        }
    }

    pub async fn translate(&self, text: &str, target: TargetLanguage) -> Result<String> {
        let langpair = format!("{}|{}", self.source_lang, target.code());
        tracing::info!("Translating {} chars ({})", text.len(), langpair);

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .header("User-Agent", "TextUtils/0.1")
            .send()
            .await
            .context("Translation request failed")?
            .error_for_status()?;

        let body: MyMemoryResponse = resp
            .json()
            .await
            .context("Unexpected translation response")?;
        Ok(body.response_data.translated_text)
    }
}

/// What the translation preview shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDisplay {
    text: Option<String>,
}

impl TranslationDisplay {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// The stored display text, empty when nothing has been translated.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn render(&self) -> &str {
        match self.text.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => EMPTY_DISPLAY,
        }
    }
}

/// Applies a finished translation attempt to `display`.
pub fn apply_result(display: &mut TranslationDisplay, result: Result<String>) -> Notification {
    match result {
        Ok(translated) => {
            display.set(translated);
            Notification::success("Translated successfully!")
        }
        Err(e) => {
            tracing::warn!("Translation failed: {:#}", e);
            display.set(FAILURE_MESSAGE);
            Notification::danger(FAILURE_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::AlertKind;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("es".parse::<TargetLanguage>().unwrap(), TargetLanguage::Spanish);
        assert_eq!("CHINESE".parse::<TargetLanguage>().unwrap(), TargetLanguage::Chinese);
        assert_eq!(" ur ".parse::<TargetLanguage>().unwrap(), TargetLanguage::Urdu);
        assert!("de".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn default_target_is_urdu() {
        assert_eq!(TargetLanguage::default().code(), "ur");
    }

    #[test]
    fn display_placeholder_until_set() {
        let mut display = TranslationDisplay::default();
        assert_eq!(display.render(), "Nothing translated yet!");
        assert_eq!(display.text(), "");
        display.set("hola");
        assert_eq!(display.render(), "hola");
    }

    #[test]
    fn failed_result_shows_literal_message() {
        let mut display = TranslationDisplay::default();
        let note = apply_result(&mut display, Err(anyhow::anyhow!("connection refused")));
        assert_eq!(display.text(), "Translation failed!");
        assert_eq!(note.kind, AlertKind::Danger);
    }

    #[test]
    fn successful_result_replaces_display() {
        let mut display = TranslationDisplay::default();
        display.set(FAILURE_MESSAGE);
        let note = apply_result(&mut display, Ok("bonjour".into()));
        assert_eq!(display.text(), "bonjour");
        assert_eq!(note.kind, AlertKind::Success);
    }
}
