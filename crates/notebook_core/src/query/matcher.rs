//! In-memory selector evaluation.
//!
//! # Invariants
//! - Selects exactly the notes the compiled predicate selects for the same
//!   data, keyed on each note's first execution date.
//! - A note without execution dates never satisfies an active date relation.
//! - A note without id never satisfies an active id relation.
//! - Output preserves input order; inputs are never mutated.

use crate::model::note::Note;
use crate::query::relation::Relation;
use crate::query::selector::NoteSelector;
use crate::query::validity::ensure_valid;
use crate::query::{SelectorError, SelectorResult};
use std::cmp::Ordering;

/// Returns the order-preserving subsequence of `notes` selected by `selector`.
///
/// # Errors
/// - `SelectorError::InvalidSelector` when the selector is not valid.
/// - `SelectorError::InternalState` when a relation escapes axis dispatch.
pub fn match_notes(selector: &NoteSelector, notes: &[Note]) -> SelectorResult<Vec<Note>> {
    ensure_valid(selector)?;

    let mut selected: Vec<&Note> = notes.iter().collect();
    if !selector.id_relation.is_none() {
        selected = narrow(selected, |note| id_matches(selector, note))?;
    }
    if !selector.priority_relation.is_none() {
        selected = narrow(selected, |note| {
            compare(
                selector.priority_relation,
                note.priority.cmp(&selector.priority),
            )
        })?;
    }
    if !selector.date_relation.is_none() {
        selected = narrow(selected, |note| date_matches(selector, note))?;
    }

    Ok(selected.into_iter().cloned().collect())
}

fn narrow<'a>(
    notes: Vec<&'a Note>,
    mut predicate: impl FnMut(&Note) -> SelectorResult<bool>,
) -> SelectorResult<Vec<&'a Note>> {
    let mut kept = Vec::with_capacity(notes.len());
    for note in notes {
        if predicate(note)? {
            kept.push(note);
        }
    }
    Ok(kept)
}

fn id_matches(selector: &NoteSelector, note: &Note) -> SelectorResult<bool> {
    let ids = selector.id_list();
    let Some(note_id) = note.id else {
        return Ok(false);
    };

    if selector.id_relation == Relation::In {
        return Ok(ids.contains(&note_id));
    }

    let first = ids.first().ok_or_else(|| {
        SelectorError::InternalState("active id relation without ids".to_string())
    })?;
    match selector.id_relation {
        Relation::Before | Relation::After => Err(SelectorError::InternalState(format!(
            "relation {:?} reached the id axis",
            selector.id_relation
        ))),
        relation => compare(relation, note_id.cmp(first)),
    }
}

fn date_matches(selector: &NoteSelector, note: &Note) -> SelectorResult<bool> {
    let date = selector.date.ok_or_else(|| {
        SelectorError::InternalState("active date relation without date".to_string())
    })?;
    let Some(first) = note.first_execution_date() else {
        return Ok(false);
    };

    let ordering = first.cmp(&date);
    match selector.date_relation {
        Relation::After => Ok(ordering == Ordering::Greater),
        Relation::Before => Ok(ordering == Ordering::Less),
        relation => compare(relation, ordering),
    }
}

/// Evaluates `field <relation> value` given `field.cmp(value)`.
fn compare(relation: Relation, ordering: Ordering) -> SelectorResult<bool> {
    match relation {
        Relation::Equals => Ok(ordering == Ordering::Equal),
        Relation::Greater => Ok(ordering == Ordering::Greater),
        Relation::GreaterEquals => Ok(ordering != Ordering::Less),
        Relation::Less => Ok(ordering == Ordering::Less),
        Relation::LessEquals => Ok(ordering != Ordering::Greater),
        other => Err(SelectorError::InternalState(format!(
            "relation {other:?} cannot be evaluated as a comparison"
        ))),
    }
}
