//! Domain model for notes.
//!
//! # Responsibility
//! - Define the persisted note record and validated write payloads.
//! - Provide rendering-agnostic form validation.
//!
//! # Invariants
//! - Every persisted note is identified by a storage-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
pub mod validation;
