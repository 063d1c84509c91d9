use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A whole-text transformation. Each one maps the old text to a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    Uppercase,
    Lowercase,
    Clear,
    TrimSpaces,
    Reverse,
    CapitalizeWords,
}

impl TextOp {
    pub const ALL: [TextOp; 6] = [
        TextOp::Uppercase,
        TextOp::Lowercase,
        TextOp::Clear,
        TextOp::TrimSpaces,
        TextOp::Reverse,
        TextOp::CapitalizeWords,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextOp::Uppercase => "upper",
            TextOp::Lowercase => "lower",
            TextOp::Clear => "clear",
            TextOp::TrimSpaces => "trim",
            TextOp::Reverse => "reverse",
            TextOp::CapitalizeWords => "capitalize",
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            TextOp::Uppercase => text.to_uppercase(),
            TextOp::Lowercase => text.to_lowercase(),
            TextOp::Clear => String::new(),
            TextOp::TrimSpaces => collapse_spaces(text),
            TextOp::Reverse => text.chars().rev().collect(),
            TextOp::CapitalizeWords => capitalize_words(text),
        }
    }
}

impl fmt::Display for TextOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextOp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper" | "uppercase" => Ok(TextOp::Uppercase),
            "lower" | "lowercase" => Ok(TextOp::Lowercase),
            "clear" => Ok(TextOp::Clear),
            "trim" | "trim-spaces" | "remove-spaces" => Ok(TextOp::TrimSpaces),
            "reverse" => Ok(TextOp::Reverse),
            "capitalize" | "capitalize-words" => Ok(TextOp::CapitalizeWords),
            other => anyhow::bail!("Unknown transformation: {}", other),
        }
    }
}

/// Only U+0020 runs are collapsed; tabs and newlines are kept.
fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Uppercase the first word character of every whitespace-delimited token.
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = true;
    for c in text.chars() {
        if c.is_whitespace() {
            pending = true;
            out.push(c);
        } else if pending && is_word_char(c) {
            pending = false;
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        for op in TextOp::ALL {
            assert_eq!(op.name().parse::<TextOp>().unwrap(), op);
        }
        assert_eq!("UPPERCASE".parse::<TextOp>().unwrap(), TextOp::Uppercase);
        assert_eq!("remove-spaces".parse::<TextOp>().unwrap(), TextOp::TrimSpaces);
        assert!("shout".parse::<TextOp>().is_err());
    }

    #[test]
    fn trim_collapses_only_literal_spaces() {
        assert_eq!(TextOp::TrimSpaces.apply("a    b  c"), "a b c");
        assert_eq!(TextOp::TrimSpaces.apply("  lead and trail  "), " lead and trail ");
        assert_eq!(TextOp::TrimSpaces.apply("tab\t\there\n\nline"), "tab\t\there\n\nline");
        assert_eq!(TextOp::TrimSpaces.apply(""), "");
    }

    #[test]
    fn reverse_is_an_involution() {
        for input in ["", "a", "Hello World", "naïve café", "line\nbreak"] {
            let once = TextOp::Reverse.apply(input);
            assert_eq!(TextOp::Reverse.apply(&once), input);
        }
        assert_eq!(TextOp::Reverse.apply("abc def"), "fed cba");
    }

    #[test]
    fn capitalize_leaves_hyphenated_tail_alone() {
        assert_eq!(TextOp::CapitalizeWords.apply("hello world-test"), "Hello World-test");
    }

    #[test]
    fn capitalize_skips_leading_punctuation() {
        assert_eq!(TextOp::CapitalizeWords.apply("(hi) there"), "(Hi) There");
        assert_eq!(TextOp::CapitalizeWords.apply("  two\tspaced\nlines"), "  Two\tSpaced\nLines");
        assert_eq!(TextOp::CapitalizeWords.apply("already Upper 3rd"), "Already Upper 3rd");
    }

    #[test]
    fn clear_always_empties() {
        assert_eq!(TextOp::Clear.apply("anything at all"), "");
    }
}
