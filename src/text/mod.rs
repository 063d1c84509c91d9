pub mod metrics;
pub mod transform;

pub use metrics::DerivedMetrics;
pub use transform::TextOp;

use crate::notify::{AlertKind, Notification};

const EMPTY_PREVIEW: &str = "Nothing to preview!";

/// The single string currently being edited.
///
/// Every operation replaces the text wholesale; there is no in-place editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextState {
    text: String,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn transform(&mut self, op: TextOp) -> Notification {
        self.text = op.apply(&self.text);
        tracing::debug!("Applied {} ({} chars)", op, self.text.len());
        op.notification()
    }

    /// Recomputed on every call.
    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics::compute(&self.text)
    }

    pub fn preview(&self) -> &str {
        if self.text.is_empty() {
            EMPTY_PREVIEW
        } else {
            &self.text
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl TextOp {
    pub fn notification(self) -> Notification {
        let (kind, message) = match self {
            TextOp::Uppercase => (AlertKind::Success, "Converted to Uppercase!"),
            TextOp::Lowercase => (AlertKind::Success, "Converted to Lowercase!"),
            TextOp::Clear => (AlertKind::Danger, "Text Cleared!"),
            TextOp::TrimSpaces => (AlertKind::Success, "Extra spaces removed!"),
            TextOp::Reverse => (AlertKind::Primary, "Text Reversed!"),
            TextOp::CapitalizeWords => (AlertKind::Success, "Capitalized!"),
        };
        Notification::new(kind, message)
    }
}
