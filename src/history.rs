use anyhow::Result;

use crate::notify::Notification;
use crate::persistence::Storage;

pub const HISTORY_CAPACITY: usize = 10;
const LABEL_MAX_CHARS: usize = 50;
pub const NOT_SAVED_MESSAGE: &str = "History could not be saved!";

/// Result of [`HistoryStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Empty,
    Duplicate,
    /// Added for this session, but the write to storage failed.
    NotSaved,
}

impl AddOutcome {
    pub fn notification(self) -> Notification {
        match self {
            AddOutcome::Added => Notification::success("Text added to history!"),
            AddOutcome::Empty | AddOutcome::Duplicate => {
                Notification::warning("Text already in history or empty!")
            }
            AddOutcome::NotSaved => Notification::danger(NOT_SAVED_MESSAGE),
        }
    }
}

/// Result of [`HistoryStore::remove_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    /// Removed for this session, but the write to storage failed.
    NotSaved(String),
    OutOfRange,
}

/// Saved texts, newest first, mirrored to `storage` after every change.
#[derive(Debug)]
pub struct HistoryStore<S: Storage> {
    entries: Vec<String>,
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    /// Never fails: unreadable or malformed payloads give an empty history.
    pub fn load(storage: S) -> Self {
        let entries = match storage.read() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<String>>(&payload) {
                Ok(stored) => sanitize(stored),
                Err(e) => {
                    tracing::warn!("Stored history is malformed: {}. Starting empty.", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored history: {}. Starting empty.", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} history entries", entries.len());
        Self { entries, storage }
    }

    pub fn add(&mut self, text: &str) -> AddOutcome {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return AddOutcome::Empty;
        }
        if self.entries.iter().any(|e| e == cleaned) {
            return AddOutcome::Duplicate;
        }

        self.entries.insert(0, cleaned.to_string());
        self.entries.truncate(HISTORY_CAPACITY);
        match self.persist() {
            Ok(()) => AddOutcome::Added,
            Err(e) => {
                tracing::error!("Failed to persist history: {:#}", e);
                AddOutcome::NotSaved
            }
        }
    }

    /// An out-of-range `index` changes nothing.
    pub fn remove_at(&mut self, index: usize) -> RemoveOutcome {
        if index >= self.entries.len() {
            tracing::warn!(
                "History index {} out of range (len {})",
                index,
                self.entries.len()
            );
            return RemoveOutcome::OutOfRange;
        }
        let removed = self.entries.remove(index);
        match self.persist() {
            Ok(()) => RemoveOutcome::Removed(removed),
            Err(e) => {
                tracing::error!("Failed to persist history: {:#}", e);
                RemoveOutcome::NotSaved(removed)
            }
        }
    }

    pub fn restore_candidate(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.entries)?;
        self.storage.write(&payload)
    }
}

/// Drops blank and repeated entries (first one wins), then caps the length.
fn sanitize(stored: Vec<String>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(HISTORY_CAPACITY);
    for entry in stored {
        if entry.trim().is_empty() || entries.contains(&entry) {
            continue;
        }
        entries.push(entry);
        if entries.len() == HISTORY_CAPACITY {
            break;
        }
    }
    entries
}

/// Shortened form of an entry for list display.
pub fn display_label(entry: &str) -> String {
    if entry.chars().count() > LABEL_MAX_CHARS {
        let head: String = entry.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        entry.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn fresh() -> (HistoryStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (HistoryStore::load(storage.clone()), storage)
    }

    #[test]
    fn load_after_add_round_trips() {
        let (mut history, storage) = fresh();
        assert_eq!(history.add("hello"), AddOutcome::Added);

        let reloaded = HistoryStore::load(storage);
        assert_eq!(reloaded.entries(), ["hello"]);
    }

    #[test]
    fn add_trims_and_prepends() {
        let (mut history, storage) = fresh();
        history.add("  first  ");
        history.add("second\n");
        assert_eq!(history.entries(), ["second", "first"]);
        assert_eq!(storage.read().unwrap().as_deref(), Some(r#"["second","first"]"#));
    }

    #[test]
    fn blank_add_is_a_no_op() {
        let (mut history, storage) = fresh();
        assert_eq!(history.add("   \t\n"), AddOutcome::Empty);
        assert_eq!(history.add(""), AddOutcome::Empty);
        assert!(history.is_empty());
        assert_eq!(storage.read().unwrap(), None);
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let (mut history, _) = fresh();
        history.add("same");
        history.add("other");
        assert_eq!(history.add("  same "), AddOutcome::Duplicate);
        assert_eq!(history.entries(), ["other", "same"]);

        // Matching is case-sensitive.
        assert_eq!(history.add("SAME"), AddOutcome::Added);
    }

    #[test]
    fn keeps_only_the_ten_newest() {
        let (mut history, storage) = fresh();
        for i in 0..11 {
            assert_eq!(history.add(&format!("entry {}", i)), AddOutcome::Added);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "entry 10");
        assert_eq!(history.entries()[9], "entry 1");
        assert!(!history.entries().iter().any(|e| e == "entry 0"));

        let reloaded = HistoryStore::load(storage);
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn remove_at_preserves_order() {
        let (mut history, storage) = fresh();
        for word in ["a", "b", "c", "d"] {
            history.add(word);
        }
        // d c b a
        assert_eq!(history.remove_at(1), RemoveOutcome::Removed("c".into()));
        assert_eq!(history.entries(), ["d", "b", "a"]);
        assert_eq!(HistoryStore::load(storage).entries(), ["d", "b", "a"]);
    }

    #[test]
    fn remove_out_of_range_changes_nothing() {
        let (mut history, _) = fresh();
        history.add("only");
        assert_eq!(history.remove_at(1), RemoveOutcome::OutOfRange);
        assert_eq!(history.entries(), ["only"]);
    }

    #[test]
    fn restore_candidate_does_not_mutate() {
        let (mut history, _) = fresh();
        history.add("x");
        history.add("y");
        assert_eq!(history.restore_candidate(1), Some("x"));
        assert_eq!(history.restore_candidate(2), None);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn malformed_payloads_load_empty() {
        for payload in ["{not json", r#"{"a":1}"#, "[1, 2, 3]", "null"] {
            let history = HistoryStore::load(MemoryStorage::with_payload(payload));
            assert!(history.is_empty(), "payload {:?} should load empty", payload);
        }
    }

    #[test]
    fn oversized_payload_is_truncated_on_load() {
        let many: Vec<String> = (0..15).map(|i| i.to_string()).collect();
        let payload = serde_json::to_string(&many).unwrap();
        let history = HistoryStore::load(MemoryStorage::with_payload(payload));
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "0");
    }

    #[test]
    fn blank_and_repeated_stored_entries_are_dropped() {
        let payload = r#"["b", "", "a", "   ", "b", "c", "a"]"#;
        let history = HistoryStore::load(MemoryStorage::with_payload(payload));
        assert_eq!(history.entries(), ["b", "a", "c"]);
    }

    #[test]
    fn cap_applies_after_dropping_repeats() {
        let mut stored: Vec<String> = vec!["dup".into(); 5];
        stored.extend((0..12).map(|i| format!("n{}", i)));
        let payload = serde_json::to_string(&stored).unwrap();
        let history = HistoryStore::load(MemoryStorage::with_payload(payload));
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries()[0], "dup");
        assert_eq!(history.entries()[9], "n8");
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self) -> Result<Option<String>> {
            Ok(Some(r#"["kept"]"#.to_string()))
        }

        fn write(&self, _payload: &str) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn failed_write_on_add_is_reported() {
        let mut history = HistoryStore::load(ReadOnlyStorage);
        let outcome = history.add("hello");
        assert_eq!(outcome, AddOutcome::NotSaved);
        assert_eq!(outcome.notification(), Notification::danger("History could not be saved!"));
        assert_eq!(history.entries(), ["hello", "kept"]);
    }

    #[test]
    fn failed_write_on_remove_is_reported() {
        let mut history = HistoryStore::load(ReadOnlyStorage);
        assert_eq!(history.remove_at(0), RemoveOutcome::NotSaved("kept".into()));
        assert!(history.is_empty());
    }

    #[test]
    fn labels_are_shortened_past_fifty_chars() {
        assert_eq!(display_label("short"), "short");
        let exact = "x".repeat(50);
        assert_eq!(display_label(&exact), exact);
        let long = "y".repeat(51);
        assert_eq!(display_label(&long), format!("{}...", "y".repeat(50)));
    }

    #[test]
    fn outcome_notifications() {
        assert_eq!(AddOutcome::Added.notification().message, "Text added to history!");
        assert_eq!(
            AddOutcome::Duplicate.notification(),
            AddOutcome::Empty.notification()
        );
    }
}
