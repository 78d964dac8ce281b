//! Domain model for notebook entries.
//!
//! # Responsibility
//! - Define the note record shared by storage, selection and transport.
//!
//! # Invariants
//! - A note id is assigned by the store; notes built by clients carry none.
//! - Date lists keep insertion order; the first execution date is the one
//!   selectors compare against.

pub mod note;
