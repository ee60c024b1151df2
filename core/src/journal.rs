//! The player-facing journal: timestamped notices, newest first.
//!
//! RULE: Append-only from the player's point of view. Entries are
//! prepended and the list is truncated to JOURNAL_CAPACITY.

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};

pub const JOURNAL_CAPACITY: usize = 100;

pub const WELCOME_ENTRY: &str = "Command established. Welcome, Commander.";

/// Synthesised for saves written before the journal was persisted.
pub const RELINK_ENTRY: &str = "Command link re-established.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Success => "✓ ",
            Self::Error   => "✖ ",
            Self::Warning => "⚠ ",
            Self::Info    => "▶ ",
        }
    }
}

/// Format one journal line: `[HH:MM] <glyph><message>`.
pub fn format_entry(message: &str, severity: Severity, at: NaiveTime) -> String {
    format!("[{}] {}{}", at.format("%H:%M"), severity.glyph(), message)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal(Vec<String>);

impl Journal {
    pub fn with_entry(entry: &str) -> Self {
        Self(vec![entry.to_string()])
    }

    pub fn welcome() -> Self {
        Self::with_entry(WELCOME_ENTRY)
    }

    pub fn relinked() -> Self {
        Self::with_entry(RELINK_ENTRY)
    }

    /// Append using the local wall-clock time.
    pub fn append(&mut self, message: &str, severity: Severity) {
        self.append_at(message, severity, Local::now().time());
    }

    pub fn append_at(&mut self, message: &str, severity: Severity, at: NaiveTime) {
        self.0.insert(0, format_entry(message, severity, at));
        self.0.truncate(JOURNAL_CAPACITY);
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn newest(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How many entries carry the given severity glyph.
    pub fn count_severity(&self, severity: Severity) -> usize {
        let marker = format!("] {}", severity.glyph());
        self.0.iter().filter(|e| e.contains(&marker)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 5, 0).unwrap()
    }

    #[test]
    fn entries_carry_time_and_glyph() {
        assert_eq!(
            format_entry("Loot salvaged.", Severity::Success, noon()),
            "[12:05] ✓ Loot salvaged."
        );
        assert_eq!(
            format_entry("Hostiles inbound.", Severity::Warning, noon()),
            "[12:05] ⚠ Hostiles inbound."
        );
    }

    #[test]
    fn newest_entry_comes_first() {
        let mut journal = Journal::welcome();
        journal.append_at("first", Severity::Info, noon());
        journal.append_at("second", Severity::Error, noon());

        assert_eq!(journal.newest(), Some("[12:05] ✖ second"));
        assert_eq!(journal.entries().last().map(String::as_str), Some(WELCOME_ENTRY));
    }

    #[test]
    fn hundred_and_first_entry_drops_the_oldest() {
        let mut journal = Journal::default();
        for i in 0..JOURNAL_CAPACITY {
            journal.append_at(&format!("entry {i}"), Severity::Info, noon());
        }
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert!(journal.entries().last().unwrap().ends_with("entry 0"));

        journal.append_at("entry 100", Severity::Info, noon());

        assert_eq!(journal.len(), JOURNAL_CAPACITY);
        assert!(journal.newest().unwrap().ends_with("entry 100"));
        assert!(journal.entries().last().unwrap().ends_with("entry 1"));
    }

    #[test]
    fn counts_by_severity() {
        let mut journal = Journal::welcome();
        journal.append_at("a", Severity::Warning, noon());
        journal.append_at("b", Severity::Warning, noon());
        journal.append_at("c", Severity::Error, noon());
        assert_eq!(journal.count_severity(Severity::Warning), 2);
        assert_eq!(journal.count_severity(Severity::Error), 1);
        assert_eq!(journal.count_severity(Severity::Success), 0);
    }
}
