//! Selector to SQL predicate compiler.
//!
//! # Responsibility
//! - Turn a valid `NoteSelector` into a `WHERE` fragment and ordered bindings.
//!
//! # Invariants
//! - Clauses are emitted in fixed axis order: id, priority, date.
//! - Binding order equals placeholder order.
//! - A selector with no active axis compiles to `WHERE 1` with no bindings.
//! - Column names assume `notes n` joined with `execution_dates ex`.

use crate::model::note::NoteId;
use crate::query::relation::Relation;
use crate::query::selector::NoteSelector;
use crate::query::validity::ensure_valid;
use crate::query::{SelectorError, SelectorResult};
use chrono::NaiveDateTime;

pub const ID_COLUMN: &str = "n.id";
pub const PRIORITY_COLUMN: &str = "n.priority";
pub const DATE_COLUMN: &str = "ex.execution_date";

/// Value bound to one placeholder of a compiled predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// How a multi-id membership clause is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdListBinding {
    /// `IN (?)` bound to one comma-joined string of ids.
    ///
    /// Wire-compatible with the legacy store; SQL engines compare the
    /// string as a single value, so multi-id lists select nothing.
    #[default]
    Csv,
    /// `IN (?, ?, ...)` with one integer binding per id.
    Expanded,
}

/// Parameterized predicate fragment produced by [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPredicate {
    /// Fragment starting with `WHERE`.
    pub sql: String,
    /// Values for the `?` placeholders, in order.
    pub params: Vec<BoundValue>,
}

/// Compiles a selector with the legacy CSV id-list binding.
///
/// # Errors
/// - `SelectorError::InvalidSelector` when the selector is not valid.
pub fn compile(selector: &NoteSelector) -> SelectorResult<CompiledPredicate> {
    compile_with(selector, IdListBinding::Csv)
}

/// Compiles a selector using the given id-list binding strategy.
///
/// # Errors
/// - `SelectorError::InvalidSelector` when the selector is not valid.
/// - `SelectorError::InternalState` when a relation escapes axis dispatch.
pub fn compile_with(
    selector: &NoteSelector,
    id_binding: IdListBinding,
) -> SelectorResult<CompiledPredicate> {
    ensure_valid(selector)?;

    if selector.is_unconstrained() {
        return Ok(CompiledPredicate {
            sql: "WHERE 1".to_string(),
            params: Vec::new(),
        });
    }

    let mut clauses: Vec<String> = Vec::with_capacity(3);
    let mut params: Vec<BoundValue> = Vec::new();

    if !selector.id_relation.is_none() {
        let ids = selector.id_list();
        if selector.id_relation == Relation::In {
            clauses.push(membership_clause(ids.len(), id_binding));
        } else {
            let sign = ordering_sign(selector.id_relation, "id")?;
            clauses.push(format!("{ID_COLUMN} {sign} ?"));
        }
        bind_ids(ids, id_binding, &mut params);
    }

    if !selector.priority_relation.is_none() {
        let sign = ordering_sign(selector.priority_relation, "priority")?;
        clauses.push(format!("{PRIORITY_COLUMN} {sign} ?"));
        params.push(BoundValue::Integer(i64::from(selector.priority)));
    }

    if !selector.date_relation.is_none() {
        let sign = date_sign(selector.date_relation)?;
        let date = selector.date.ok_or_else(|| {
            SelectorError::InternalState("active date relation without date".to_string())
        })?;
        clauses.push(format!("{DATE_COLUMN} {sign} ?"));
        params.push(BoundValue::Timestamp(date));
    }

    Ok(CompiledPredicate {
        sql: format!("WHERE {}", clauses.join(" AND ")),
        params,
    })
}

fn membership_clause(id_count: usize, id_binding: IdListBinding) -> String {
    match id_binding {
        IdListBinding::Csv => format!("{ID_COLUMN} IN (?)"),
        IdListBinding::Expanded => {
            let placeholders = vec!["?"; id_count.max(1)].join(", ");
            format!("{ID_COLUMN} IN ({placeholders})")
        }
    }
}

fn bind_ids(ids: &[NoteId], id_binding: IdListBinding, params: &mut Vec<BoundValue>) {
    if ids.len() == 1 || id_binding == IdListBinding::Expanded {
        params.extend(ids.iter().map(|id| BoundValue::Integer(*id)));
        return;
    }

    let csv = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    params.push(BoundValue::Text(csv));
}

fn ordering_sign(relation: Relation, axis: &str) -> SelectorResult<&'static str> {
    match relation {
        Relation::Equals
        | Relation::Greater
        | Relation::GreaterEquals
        | Relation::Less
        | Relation::LessEquals => Ok(relation.sign()),
        other => Err(SelectorError::InternalState(format!(
            "relation {other:?} reached the {axis} clause"
        ))),
    }
}

fn date_sign(relation: Relation) -> SelectorResult<&'static str> {
    match relation {
        Relation::Before | Relation::After => Ok(relation.sign()),
        other => ordering_sign(other, "date"),
    }
}
