pub mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::notify::Notification;
use crate::persistence::Storage;
use crate::state::Session;
use crate::text::TextOp;
use crate::translate::TargetLanguage;

pub const HELP: &str = "\
Commands:
  set <text>           replace the working text
  append <text>        add a line to the working text
  upper | lower | clear | trim | reverse | capitalize
  show                 print the working text
  stats                word, character and letter counts
  save                 add the working text to history
  history              list saved texts
  restore <n>          load history entry n into the working text
  remove <n>           delete history entry n
  lang <code>          translation target (ur, hi, es, fr, ar, zh)
  translate            translate the working text
  speak                speak the working text (again to stop)
  speak-translation    speak the last translation
  stop                 stop speaking
  copy                 copy the working text to the clipboard
  download [dir]       save the working text as myText.txt
  help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(String),
    Append(String),
    Transform(TextOp),
    Show,
    Stats,
    Save,
    History,
    Restore(usize),
    Remove(usize),
    Lang(TargetLanguage),
    Translate,
    Speak,
    SpeakTranslation,
    Stop,
    Copy,
    Download(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let trimmed = line.trim_start();
        if trimmed.trim().is_empty() {
            return Ok(None);
        }
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed.trim_end(), ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            // The argument is kept verbatim, spaces included.
            "set" => Command::Set(rest.to_string()),
            "append" => Command::Append(rest.to_string()),
            "show" => Command::Show,
            "stats" => Command::Stats,
            "save" => Command::Save,
            "history" => Command::History,
            "restore" => Command::Restore(parse_position(rest)?),
            "remove" => Command::Remove(parse_position(rest)?),
            "lang" => Command::Lang(rest.parse()?),
            "translate" => Command::Translate,
            "speak" => Command::Speak,
            "speak-translation" => Command::SpeakTranslation,
            "stop" => Command::Stop,
            "copy" => Command::Copy,
            "download" => {
                let dir = rest.trim();
                Command::Download((!dir.is_empty()).then(|| PathBuf::from(dir)))
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => match other.parse::<TextOp>() {
                Ok(op) => Command::Transform(op),
                Err(_) => anyhow::bail!("Unknown command '{}'. Type 'help'.", other),
            },
        };
        Ok(Some(command))
    }
}

/// Positions are shown 1-based.
fn parse_position(arg: &str) -> Result<usize> {
    let n: usize = arg
        .trim()
        .parse()
        .with_context(|| format!("Expected an entry number, got '{}'", arg.trim()))?;
    if n == 0 {
        anyhow::bail!("Entry numbers start at 1");
    }
    Ok(n - 1)
}

/// What a command produced.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub output: Vec<String>,
    pub notification: Option<Notification>,
    pub quit: bool,
}

impl Reply {
    fn notify(notification: Notification) -> Self {
        Self {
            notification: Some(notification),
            ..Default::default()
        }
    }

    fn lines(output: Vec<String>) -> Self {
        Self {
            output,
            ..Default::default()
        }
    }
}

pub async fn execute<S: Storage>(session: &mut Session<S>, command: Command) -> Reply {
    match command {
        Command::Set(text) => {
            session.set_text(text);
            Reply::default()
        }
        Command::Append(line) => {
            session.append_line(&line);
            Reply::default()
        }
        Command::Transform(op) => {
            let note = session.transform(op);
            Reply {
                output: vec![session.preview().to_string()],
                notification: Some(note),
                quit: false,
            }
        }
        Command::Show => Reply::lines(vec![session.preview().to_string()]),
        Command::Stats => Reply::lines(vec![session.metrics().summary()]),
        Command::Save => Reply::notify(session.add_to_history()),
        Command::History => {
            let labels = session.history_labels();
            if labels.is_empty() {
                Reply::lines(vec!["No history yet.".to_string()])
            } else {
                Reply::lines(
                    labels
                        .iter()
                        .enumerate()
                        .map(|(i, label)| format!("{:>2}. {}", i + 1, label))
                        .collect(),
                )
            }
        }
        Command::Restore(index) => {
            let note = session.restore_from_history(index);
            Reply::notify(note)
        }
        Command::Remove(index) => Reply::notify(session.remove_from_history(index)),
        Command::Lang(target) => {
            session.set_target(target);
            Reply::lines(vec![format!("Translating to {}", target)])
        }
        Command::Translate => {
            let note = session.translate().await;
            Reply {
                output: vec![session.translation().render().to_string()],
                notification: Some(note),
                quit: false,
            }
        }
        Command::Speak => Reply::notify(session.speak_original()),
        Command::SpeakTranslation => Reply::notify(session.speak_translation()),
        Command::Stop => Reply::notify(session.stop_speaking()),
        Command::Copy => Reply::notify(session.copy()),
        Command::Download(dir) => Reply::notify(session.download(dir.as_deref())),
        Command::Help => Reply::lines(vec![HELP.to_string()]),
        Command::Quit => Reply {
            quit: true,
            ..Default::default()
        },
    }
}
