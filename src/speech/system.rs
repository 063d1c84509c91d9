use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use anyhow::{Context, Result};

use super::{SpeechEngine, Utterance, Voice};

/// Words per minute both `say` and `espeak` use at rate 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Say,
    Espeak(&'static str),
}

/// Speech through the platform's command-line synthesizer.
///
/// `say` on macOS, `espeak-ng` or `espeak` elsewhere. Each utterance is one
/// child process; cancelling kills it.
pub struct SystemSpeechEngine {
    backend: Backend,
    child: Mutex<Option<Child>>,
}

impl SystemSpeechEngine {
    pub fn detect() -> Result<Self> {
        let backend = if cfg!(target_os = "macos") {
            Backend::Say
        } else {
            ["espeak-ng", "espeak"]
                .into_iter()
                .find(|bin| command_exists(bin))
                .map(Backend::Espeak)
                .ok_or_else(|| anyhow::anyhow!("No speech synthesizer found (tried espeak-ng, espeak)"))?
        };
        tracing::info!("Using speech backend {:?}", backend);
        Ok(Self {
            backend,
            child: Mutex::new(None),
        })
    }

    fn build_command(&self, utterance: &Utterance) -> Command {
        let wpm = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        match self.backend {
            Backend::Say => {
                let mut cmd = Command::new("say");
                cmd.arg("-r").arg(wpm.to_string());
                if let Some(voice) = &utterance.voice {
                    cmd.arg("-v").arg(voice);
                }
                cmd.arg("--").arg(&utterance.text);
                cmd
            }
            Backend::Espeak(bin) => {
                let mut cmd = Command::new(bin);
                let voice = utterance
                    .voice
                    .clone()
                    .unwrap_or_else(|| utterance.lang.to_ascii_lowercase());
                cmd.arg("-s").arg(wpm.to_string()).arg("-v").arg(voice);
                cmd.arg("--").arg(&utterance.text);
                cmd
            }
        }
    }
}

impl SpeechEngine for SystemSpeechEngine {
    fn voices(&self) -> Vec<Voice> {
        let output = match self.backend {
            Backend::Say => Command::new("say").args(["-v", "?"]).output(),
            Backend::Espeak(bin) => Command::new(bin).arg("--voices").output(),
        };
        match output {
            Ok(out) if out.status.success() => {
                let listing = String::from_utf8_lossy(&out.stdout);
                match self.backend {
                    Backend::Say => parse_say_voices(&listing),
                    Backend::Espeak(_) => parse_espeak_voices(&listing),
                }
            }
            Ok(out) => {
                tracing::warn!("Voice listing exited with {}", out.status);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Failed to list voices: {}", e);
                Vec::new()
            }
        }
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        self.cancel()?;
        let child = self
            .build_command(utterance)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to start speech synthesizer")?;
        tracing::info!("Speaking {} chars ({}, rate {})", utterance.text.len(), utterance.lang, utterance.rate);
        *self
            .child
            .lock()
            .map_err(|_| anyhow::anyhow!("Speech lock poisoned"))? = Some(child);
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        let mut guard = self
            .child
            .lock()
            .map_err(|_| anyhow::anyhow!("Speech lock poisoned"))?;
        if let Some(mut child) = guard.take() {
            if child.try_wait()?.is_none() {
                child.kill().context("Failed to stop speech synthesizer")?;
                tracing::info!("Speech cancelled");
            }
            child.wait()?;
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let Ok(mut guard) = self.child.lock() else {
            return false;
        };
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl Drop for SystemSpeechEngine {
    fn drop(&mut self) {
        let _ = self.cancel();
    }
}

fn command_exists(bin: &str) -> bool {
    Command::new(bin)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Lines look like `Amelie              fr_CA    # Bonjour...`.
fn parse_say_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let head = line.split('#').next()?.trim_end();
            let (name, lang) = head.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || lang.is_empty() {
                return None;
            }
            Some(Voice {
                name: name.to_string(),
                lang: lang.replace('_', "-"),
            })
        })
        .collect()
}

/// Table with a header row: `Pty Language Age/Gender VoiceName File Other`.
fn parse_espeak_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            Some(Voice {
                // espeak selects voices by language code or file name
                name: cols[4].to_string(),
                lang: cols[1].to_string(),
            })
        })
        .collect()
}
