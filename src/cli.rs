use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::text::TextOp;
use crate::translate::TargetLanguage;

#[derive(Debug, Parser)]
#[command(name = "text-utils", version, about = "Analyze and transform text")]
pub struct Cli {
    /// Directory holding store.json (defaults to the user data dir)
    #[arg(long, global = true, env = "TEXT_UTILS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Translation endpoint override
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Interactive session (default)
    Shell,
    /// Apply one transformation and print the result
    Transform {
        #[arg(value_parser = parse_op)]
        op: TextOp,
        /// Text to transform; read from stdin when omitted
        text: Option<String>,
    },
    /// Print word, character and letter counts
    Stats { text: Option<String> },
    /// Inspect or edit the saved history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Translate text with the remote service
    Translate {
        #[arg(long, short, value_parser = parse_lang)]
        to: Option<TargetLanguage>,
        text: Option<String>,
    },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    Add { text: Option<String> },
    /// Remove entry N (1-based)
    Remove { position: usize },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    Show,
    SetTarget {
        #[arg(value_parser = parse_lang)]
        lang: TargetLanguage,
    },
    SetDownloadDir { dir: PathBuf },
}

fn parse_op(s: &str) -> Result<TextOp, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_lang(s: &str) -> Result<TargetLanguage, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}
