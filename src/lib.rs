pub mod cli;
pub mod commands;
pub mod export;
pub mod history;
pub mod notify;
pub mod persistence;
pub mod platform;
pub mod speech;
pub mod state;
pub mod text;
pub mod translate;

use std::io::Read;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cli::{Cli, CliCommand, ConfigAction, HistoryAction};
use history::{AddOutcome, HistoryStore, RemoveOutcome};
use persistence::{JsonFileStore, SharedStore, StoreKey, HISTORY_KEY};
use speech::{SpeechEngine, UnavailableSpeech};
use state::{Session, Settings};
use text::DerivedMetrics;
use translate::Translator;

pub async fn run(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting TextUtils v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => persistence::default_data_dir()?,
    };
    let store = JsonFileStore::open_in(&data_dir)?;
    let mut settings = persistence::load_settings(&store);
    if let Some(endpoint) = cli.endpoint {
        settings.translation.endpoint = endpoint;
    }
    let store: SharedStore = Arc::new(Mutex::new(store));
    let history_slot = StoreKey::new(store.clone(), HISTORY_KEY);

    match cli.command.unwrap_or(CliCommand::Shell) {
        CliCommand::Shell => {
            let speech_engine: Box<dyn SpeechEngine> =
                match speech::system::SystemSpeechEngine::detect() {
                    Ok(engine) => Box::new(engine),
                    Err(e) => {
                        tracing::warn!("{}. Speech disabled.", e);
                        Box::new(UnavailableSpeech::new(e.to_string()))
                    }
                };
            let mut session = Session::new(
                &settings,
                history_slot,
                speech_engine,
                platform::get_clipboard(),
            );
            commands::shell::run_shell(&mut session, tokio::io::stdin(), tokio::io::stdout())
                .await?;
        }
        CliCommand::Transform { op, text } => {
            println!("{}", op.apply(&text_or_stdin(text)?));
        }
        CliCommand::Stats { text } => {
            println!("{}", DerivedMetrics::compute(&text_or_stdin(text)?).summary());
        }
        CliCommand::History { action } => {
            let mut history = HistoryStore::load(history_slot);
            match action {
                HistoryAction::List => {
                    if history.is_empty() {
                        println!("No history yet.");
                    }
                    for (i, entry) in history.entries().iter().enumerate() {
                        println!("{:>2}. {}", i + 1, history::display_label(entry));
                    }
                }
                HistoryAction::Add { text } => {
                    let outcome = history.add(&text_or_stdin(text)?);
                    if outcome != AddOutcome::Added {
                        anyhow::bail!(outcome.notification().message);
                    }
                    eprintln!("{}", outcome.notification());
                }
                HistoryAction::Remove { position } => {
                    let outcome = match position.checked_sub(1) {
                        Some(index) => history.remove_at(index),
                        None => RemoveOutcome::OutOfRange,
                    };
                    match outcome {
                        RemoveOutcome::Removed(entry) => eprintln!("History item removed: {}", entry),
                        RemoveOutcome::NotSaved(_) => anyhow::bail!(history::NOT_SAVED_MESSAGE),
                        RemoveOutcome::OutOfRange => anyhow::bail!("No history entry #{}", position),
                    }
                }
            }
        }
        CliCommand::Translate { to, text } => {
            let text = text_or_stdin(text)?;
            if text.trim().is_empty() {
                anyhow::bail!("Please enter text to translate.");
            }
            let translator = Translator::new(
                settings.translation.endpoint.clone(),
                settings.translation.source_lang.clone(),
            );
            let target = to.unwrap_or(settings.translation.default_target);
            let translated = translator.translate(&text, target).await?;
            println!("{}", translated);
        }
        CliCommand::Config { action } => {
            let mut store = store
                .lock()
                .map_err(|_| anyhow::anyhow!("Store lock poisoned"))?;
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    println!("{}", render_stored_settings(&store)?);
                }
                ConfigAction::SetTarget { lang } => {
                    let mut stored = persistence::load_settings(&store);
                    stored.translation.default_target = lang;
                    persistence::save_settings(&mut store, &stored);
                    eprintln!("Default target set to {}", lang);
                }
                ConfigAction::SetDownloadDir { dir } => {
                    let mut stored: Settings = persistence::load_settings(&store);
                    stored.export.directory = Some(dir.clone());
                    persistence::save_settings(&mut store, &stored);
                    eprintln!("Downloads go to {}", dir.display());
                }
            }
        }
    }

    Ok(())
}

/// Settings as saved in `store`, ignoring command-line overrides.
fn render_stored_settings(store: &JsonFileStore) -> Result<String> {
    let stored = persistence::load_settings(store);
    Ok(format!(
        "# {}\n{}",
        store.path().display(),
        serde_json::to_string_pretty(&stored)?
    ))
}

fn text_or_stdin(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_settings_ignore_runtime_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open_in(dir.path()).unwrap();
        let mut saved = Settings::default();
        saved.translation.default_target = translate::TargetLanguage::Spanish;
        persistence::save_settings(&mut store, &saved);

        let rendered = render_stored_settings(&store).unwrap();
        assert!(rendered.starts_with(&format!("# {}", store.path().display())));
        assert!(rendered.contains(translate::MYMEMORY_ENDPOINT));
        assert!(rendered.contains("\"spanish\""));
    }
}
