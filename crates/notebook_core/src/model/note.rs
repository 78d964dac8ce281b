//! Note domain model.
//!
//! # Responsibility
//! - Define the note record and its execution/reminder dates.
//! - Provide the execution-date ordering used for sorted listings.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one.
//! - Equality compares every field, date lists included (order-sensitive).
//! - `headline` is at most `MAX_HEADLINE_CHARS` characters when persisted.
//! - Persisted dates lie within the store's nanosecond timestamp range.

use crate::db::is_storable_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Maximum persisted headline length in characters.
pub const MAX_HEADLINE_CHARS: usize = 150;

/// One notebook entry with its scheduling dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Store-assigned id; absent before creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NoteId>,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub note_text: String,
    #[serde(default)]
    pub priority: i32,
    /// Dates the note is due; selectors compare against the first one.
    #[serde(default)]
    pub execution_dates: Vec<NaiveDateTime>,
    #[serde(default)]
    pub reminder_dates: Vec<NaiveDateTime>,
}

/// Validation failure for note payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    HeadlineTooLong { chars: usize, max: usize },
    DateOutOfRange(NaiveDateTime),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeadlineTooLong { chars, max } => {
                write!(f, "headline has {chars} characters; at most {max} allowed")
            }
            Self::DateOutOfRange(date) => {
                write!(f, "date {date} is outside the storable range")
            }
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates a note without dates and without id.
    pub fn new(headline: impl Into<String>, note_text: impl Into<String>, priority: i32) -> Self {
        Self {
            id: None,
            headline: headline.into(),
            note_text: note_text.into(),
            priority,
            execution_dates: Vec::new(),
            reminder_dates: Vec::new(),
        }
    }

    /// Creates a note carrying execution and reminder dates.
    pub fn with_dates(
        headline: impl Into<String>,
        note_text: impl Into<String>,
        priority: i32,
        execution_dates: Vec<NaiveDateTime>,
        reminder_dates: Vec<NaiveDateTime>,
    ) -> Self {
        Self {
            execution_dates,
            reminder_dates,
            ..Self::new(headline, note_text, priority)
        }
    }

    pub fn add_execution_date(&mut self, date: NaiveDateTime) {
        self.execution_dates.push(date);
    }

    pub fn add_execution_dates(&mut self, dates: impl IntoIterator<Item = NaiveDateTime>) {
        self.execution_dates.extend(dates);
    }

    pub fn add_reminder_date(&mut self, date: NaiveDateTime) {
        self.reminder_dates.push(date);
    }

    pub fn add_reminder_dates(&mut self, dates: impl IntoIterator<Item = NaiveDateTime>) {
        self.reminder_dates.extend(dates);
    }

    /// Returns the execution date selectors compare against.
    pub fn first_execution_date(&self) -> Option<NaiveDateTime> {
        self.execution_dates.first().copied()
    }

    /// Checks persistence constraints.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let chars = self.headline.chars().count();
        if chars > MAX_HEADLINE_CHARS {
            return Err(NoteValidationError::HeadlineTooLong {
                chars,
                max: MAX_HEADLINE_CHARS,
            });
        }
        if let Some(date) = self
            .execution_dates
            .iter()
            .chain(&self.reminder_dates)
            .find(|date| !is_storable_timestamp(**date))
        {
            return Err(NoteValidationError::DateOutOfRange(*date));
        }
        Ok(())
    }
}

/// Orders notes by their first execution date.
///
/// Notes without execution dates sort after dated notes; two dateless notes
/// compare equal. Usable directly with `sort_by`.
pub fn compare_execution_dates(a: &Note, b: &Note) -> Ordering {
    match (a.first_execution_date(), b.first_execution_date()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_execution_dates, Note, NoteValidationError, MAX_HEADLINE_CHARS};
    use chrono::NaiveDate;
    use std::cmp::Ordering;

    fn at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid test timestamp")
    }

    #[test]
    fn dateless_notes_sort_last() {
        let dated = Note::with_dates("a", "", 1, vec![at(9)], Vec::new());
        let dateless = Note::new("b", "", 1);

        assert_eq!(compare_execution_dates(&dated, &dateless), Ordering::Less);
        assert_eq!(compare_execution_dates(&dateless, &dated), Ordering::Greater);
        assert_eq!(
            compare_execution_dates(&dateless, &Note::new("c", "", 2)),
            Ordering::Equal
        );
    }

    #[test]
    fn ordering_uses_first_execution_date_only() {
        let early = Note::with_dates("a", "", 1, vec![at(8), at(20)], Vec::new());
        let late = Note::with_dates("b", "", 1, vec![at(10), at(1)], Vec::new());
        assert_eq!(compare_execution_dates(&early, &late), Ordering::Less);

        let mut notes = vec![Note::new("none", "", 0), late.clone(), early.clone()];
        notes.sort_by(compare_execution_dates);
        assert_eq!(notes[0], early);
        assert_eq!(notes[1], late);
    }

    #[test]
    fn equality_is_order_sensitive_on_dates() {
        let first = Note::with_dates("a", "", 1, vec![at(1), at(2)], Vec::new());
        let second = Note::with_dates("a", "", 1, vec![at(2), at(1)], Vec::new());
        assert_ne!(first, second);
    }

    #[test]
    fn validate_rejects_long_headline() {
        let note = Note::new("x".repeat(MAX_HEADLINE_CHARS + 1), "", 0);
        assert_eq!(
            note.validate(),
            Err(NoteValidationError::HeadlineTooLong {
                chars: MAX_HEADLINE_CHARS + 1,
                max: MAX_HEADLINE_CHARS,
            })
        );
        assert!(Note::new("short", "", 0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_unstorable_dates() {
        let far = NaiveDate::from_ymd_opt(2300, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid test timestamp");
        let note = Note::with_dates("a", "", 1, vec![at(9)], vec![far]);
        assert_eq!(note.validate(), Err(NoteValidationError::DateOutOfRange(far)));

        let precise = at(9) + chrono::Duration::nanoseconds(1);
        assert!(Note::with_dates("b", "", 1, vec![precise], Vec::new())
            .validate()
            .is_ok());
    }
}
