//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/get/update/delete entry points over an injected repository.
//! - Reject invalid selectors and notes before they reach storage.
//! - Emit metadata-only log events for every mutation.
//!
//! # Invariants
//! - Note text and headlines are never written to logs.
//! - `update_note` requires a store-assigned id.

use crate::model::note::{compare_execution_dates, Note, NoteId, NoteValidationError};
use crate::query::selector::NoteSelector;
use crate::query::validity::ensure_valid;
use crate::query::SelectorError;
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Update was requested for a note without id.
    MissingId,
    /// Note payload violates persistence constraints.
    Validation(NoteValidationError),
    /// Selector is invalid or reached an inconsistent state.
    Selector(SelectorError),
    /// Target note does not exist.
    NotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "note id is required for update"),
            Self::Validation(err) => write!(f, "invalid note: {err}"),
            Self::Selector(err) => write!(f, "{err}"),
            Self::NotFound(note_id) => write!(f, "note not found: {note_id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Selector(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::MissingId | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(note_id) => Self::NotFound(note_id),
            RepoError::Selector(err) => Self::Selector(err),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<SelectorError> for NoteServiceError {
    fn from(value: SelectorError) -> Self {
        Self::Selector(value)
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new note and returns its assigned id.
    pub fn create_note(&mut self, note: &Note) -> Result<NoteId, NoteServiceError> {
        note.validate()?;
        let note_id = self.repo.create_note(note)?;
        info!(
            "event=note_create module=service status=ok note_id={} execution_dates={} reminder_dates={}",
            note_id,
            note.execution_dates.len(),
            note.reminder_dates.len()
        );
        Ok(note_id)
    }

    /// Returns every note selected by `selector`, ordered by id.
    pub fn get_notes(&self, selector: &NoteSelector) -> Result<Vec<Note>, NoteServiceError> {
        self.ensure_selector(selector, "note_get")?;
        let notes = self.repo.get_notes(selector)?;
        info!(
            "event=note_get module=service status=ok matched={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Returns selected notes ordered by first execution date, dateless last.
    pub fn get_notes_sorted_by_execution(
        &self,
        selector: &NoteSelector,
    ) -> Result<Vec<Note>, NoteServiceError> {
        let mut notes = self.get_notes(selector)?;
        notes.sort_by(compare_execution_dates);
        Ok(notes)
    }

    /// Replaces content and dates of an existing note.
    ///
    /// Returns the number of affected note rows.
    pub fn update_note(&mut self, note: &Note) -> Result<usize, NoteServiceError> {
        let note_id = note.id.ok_or(NoteServiceError::MissingId)?;
        note.validate()?;
        match self.repo.update_note(note) {
            Ok(changed) => {
                info!("event=note_update module=service status=ok note_id={note_id}");
                Ok(changed)
            }
            Err(err) => {
                warn!(
                    "event=note_update module=service status=error note_id={} error={}",
                    note_id, err
                );
                Err(err.into())
            }
        }
    }

    /// Deletes every note selected by `selector` and returns the count.
    pub fn delete_notes(&mut self, selector: &NoteSelector) -> Result<usize, NoteServiceError> {
        self.ensure_selector(selector, "note_delete")?;
        let deleted = self.repo.delete_notes(selector)?;
        info!("event=note_delete module=service status=ok deleted={deleted}");
        Ok(deleted)
    }

    fn ensure_selector(
        &self,
        selector: &NoteSelector,
        event: &str,
    ) -> Result<(), NoteServiceError> {
        ensure_valid(selector).map_err(|err| {
            warn!("event={event} module=service status=rejected error={err}");
            NoteServiceError::from(err)
        })
    }
}
