//! In-memory note repository.
//!
//! # Responsibility
//! - Serve the `NoteRepository` contract without SQLite, for embedding and
//!   as a test double for services.
//!
//! # Invariants
//! - Selection goes through `query::matcher`, so it agrees with the SQLite
//!   repository for every valid selector.
//! - Ids are assigned sequentially from 1 and never reused.
//! - Notes are kept in ascending id order.

use crate::model::note::{Note, NoteId};
use crate::query::matcher::match_notes;
use crate::query::selector::NoteSelector;
use crate::repo::ensure_storable_selector;
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use std::collections::BTreeSet;

/// Vector-backed note repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteRepository {
    notes: Vec<Note>,
    last_id: NoteId,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteRepository for InMemoryNoteRepository {
    fn create_note(&mut self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        self.last_id += 1;
        let mut stored = note.clone();
        stored.id = Some(self.last_id);
        self.notes.push(stored);
        Ok(self.last_id)
    }

    fn get_notes(&self, selector: &NoteSelector) -> RepoResult<Vec<Note>> {
        ensure_storable_selector(selector)?;
        Ok(match_notes(selector, &self.notes)?)
    }

    fn update_note(&mut self, note: &Note) -> RepoResult<usize> {
        note.validate()?;
        let note_id = note.id.ok_or_else(|| {
            RepoError::InvalidData("note id is required for update".to_string())
        })?;
        let stored = self
            .notes
            .iter_mut()
            .find(|stored| stored.id == Some(note_id))
            .ok_or(RepoError::NotFound(note_id))?;
        *stored = note.clone();
        Ok(1)
    }

    fn delete_notes(&mut self, selector: &NoteSelector) -> RepoResult<usize> {
        ensure_storable_selector(selector)?;
        let selected: BTreeSet<NoteId> = match_notes(selector, &self.notes)?
            .into_iter()
            .filter_map(|note| note.id)
            .collect();
        let before = self.notes.len();
        self.notes
            .retain(|note| !note.id.is_some_and(|id| selected.contains(&id)));
        Ok(before - self.notes.len())
    }
}
