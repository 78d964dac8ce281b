//! Note selection query model.
//!
//! # Responsibility
//! - Express filter predicates over notes as a `NoteSelector`.
//! - Compile selectors into parameterized SQL fragments.
//! - Evaluate the same selectors directly over in-memory notes.
//!
//! # Invariants
//! - Invalid selectors are never compiled or matched.
//! - For any valid selector, `compile` + storage and `match_notes` select the
//!   same set of note ids.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod compile;
pub mod matcher;
pub mod relation;
pub mod selector;
pub mod validity;

pub type SelectorResult<T> = Result<T, SelectorError>;

/// Failure raised when a selector cannot be compiled or matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector violates the validity rules; a client error.
    InvalidSelector(String),
    /// A relation escaped dispatch despite passing validation; a programming error.
    InternalState(String),
}

impl Display for SelectorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelector(details) => write!(f, "invalid note selector: {details}"),
            Self::InternalState(details) => write!(f, "internal selector state: {details}"),
        }
    }
}

impl Error for SelectorError {}
