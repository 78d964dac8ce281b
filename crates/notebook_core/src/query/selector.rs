//! Selector value object and its fluent builder.
//!
//! # Invariants
//! - The builder never validates; validation is deferred to first use.
//! - Every relation starts as `Relation::None`.

use crate::model::note::NoteId;
use crate::query::relation::Relation;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Filter over notes by id, priority and execution date.
///
/// Each axis is a `(value, relation)` pair and is ignored while its relation
/// is `Relation::None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSelector {
    /// Duplicates are allowed; order only matters for CSV binding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<NoteId>>,
    #[serde(default)]
    pub id_relation: Relation,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub priority_relation: Relation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub date_relation: Relation,
}

impl NoteSelector {
    /// Selector that matches every note.
    pub fn empty() -> Self {
        NoteSelectorBuilder::new().build()
    }

    /// Starts a builder with every axis inactive.
    pub fn builder() -> NoteSelectorBuilder {
        NoteSelectorBuilder::new()
    }

    /// Whether no axis constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.id_relation.is_none() && self.priority_relation.is_none() && self.date_relation.is_none()
    }

    /// Id list as a slice, empty when unset.
    pub fn id_list(&self) -> &[NoteId] {
        self.ids.as_deref().unwrap_or(&[])
    }
}

/// Staged construction helper for [`NoteSelector`].
#[derive(Debug, Clone, Default)]
pub struct NoteSelectorBuilder {
    selector: NoteSelector,
}

impl NoteSelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the id list.
    pub fn set_ids(mut self, ids: Vec<NoteId>) -> Self {
        self.selector.ids = Some(ids);
        self
    }

    /// Appends ids, initializing the list on first use.
    pub fn add_ids(mut self, ids: impl IntoIterator<Item = NoteId>) -> Self {
        self.selector.ids.get_or_insert_with(Vec::new).extend(ids);
        self
    }

    /// Appends one id, initializing the list on first use.
    pub fn add_id(mut self, id: NoteId) -> Self {
        self.selector.ids.get_or_insert_with(Vec::new).push(id);
        self
    }

    pub fn set_date(mut self, date: NaiveDateTime) -> Self {
        self.selector.date = Some(date);
        self
    }

    pub fn set_priority(mut self, priority: i32) -> Self {
        self.selector.priority = priority;
        self
    }

    pub fn set_id_relation(mut self, relation: Relation) -> Self {
        self.selector.id_relation = relation;
        self
    }

    pub fn set_date_relation(mut self, relation: Relation) -> Self {
        self.selector.date_relation = relation;
        self
    }

    pub fn set_priority_relation(mut self, relation: Relation) -> Self {
        self.selector.priority_relation = relation;
        self
    }

    pub fn build(self) -> NoteSelector {
        self.selector
    }
}
