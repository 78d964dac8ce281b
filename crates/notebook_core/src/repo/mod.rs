//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note storage contract consumed by services.
//! - Isolate SQLite query details from service orchestration.
//! - Provide an in-memory implementation backed by the selector matcher.
//!
//! # Invariants
//! - Repository writes must enforce `Note::validate()` before persistence.
//! - Both implementations select the same notes for the same selector and
//!   reject the same selectors.

pub mod memory_repo;
pub mod note_repo;

use crate::db::is_storable_timestamp;
use crate::query::selector::NoteSelector;
use crate::query::{SelectorError, SelectorResult};

/// Rejects selectors whose date falls outside the persisted timestamp range.
pub(crate) fn ensure_storable_selector(selector: &NoteSelector) -> SelectorResult<()> {
    match selector.date {
        Some(date) if !selector.date_relation.is_none() && !is_storable_timestamp(date) => {
            Err(SelectorError::InvalidSelector(format!(
                "selector date {date} is outside the storable range"
            )))
        }
        _ => Ok(()),
    }
}
