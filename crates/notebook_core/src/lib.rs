//! Core domain logic for the notebook backend.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ConfigOverrides, NotebookConfig};
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::note::{compare_execution_dates, Note, NoteId, NoteValidationError};
pub use query::compile::{compile, compile_with, BoundValue, CompiledPredicate, IdListBinding};
pub use query::matcher::match_notes;
pub use query::relation::Relation;
pub use query::selector::{NoteSelector, NoteSelectorBuilder};
pub use query::validity::{ensure_valid, is_valid};
pub use query::{SelectorError, SelectorResult};
pub use repo::memory_repo::InMemoryNoteRepository;
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::note_service::{NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
