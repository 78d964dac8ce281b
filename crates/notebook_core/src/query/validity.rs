//! Validity rules for note selectors.
//!
//! A selector is valid iff:
//! - every active axis has a value (non-empty ids, present date);
//! - more than one id implies `Relation::In`;
//! - the date and priority axes never use `Relation::In`;
//! - the id and priority axes never use the date-only `Before`/`After`.

use crate::query::relation::Relation;
use crate::query::selector::NoteSelector;
use crate::query::{SelectorError, SelectorResult};

/// Returns whether the selector is internally consistent.
///
/// Never panics; any violation yields `false`.
pub fn is_valid(selector: &NoteSelector) -> bool {
    violation(selector).is_none()
}

/// Returns `SelectorError::InvalidSelector` naming the first violated rule.
pub fn ensure_valid(selector: &NoteSelector) -> SelectorResult<()> {
    match violation(selector) {
        Some(reason) => Err(SelectorError::InvalidSelector(reason.to_string())),
        None => Ok(()),
    }
}

impl NoteSelector {
    pub fn is_valid(&self) -> bool {
        is_valid(self)
    }
}

fn violation(selector: &NoteSelector) -> Option<&'static str> {
    let ids = selector.id_list();

    if !selector.id_relation.is_none() && ids.is_empty() {
        return Some("id relation is set but no ids are given");
    }
    if !selector.date_relation.is_none() && selector.date.is_none() {
        return Some("date relation is set but no date is given");
    }
    if ids.len() > 1 && selector.id_relation != Relation::In {
        return Some("multiple ids require the IN relation");
    }
    if selector.date_relation == Relation::In || selector.priority_relation == Relation::In {
        return Some("IN is only supported on the id axis");
    }
    if selector.id_relation.is_date_only() || selector.priority_relation.is_date_only() {
        return Some("BEFORE/AFTER are only supported on the date axis");
    }
    None
}
