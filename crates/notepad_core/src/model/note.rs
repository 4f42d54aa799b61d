//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its identifier.
//! - Define the validated write payload accepted by the store.
//!
//! # Invariants
//! - `id` is assigned by storage, never reused and never changed.
//! - `date_created` is assigned once at creation and never modified.
//! - `title` and `content` are never blank for persisted notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned note identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Auto-assigned primary key.
    pub id: NoteId,
    /// Short, non-blank heading.
    pub title: String,
    /// Non-blank body text.
    pub content: String,
    /// UTC creation time.
    pub date_created: DateTime<Utc>,
}

/// Validated title/content pair used by create and update paths.
///
/// Obtain one through [`crate::validate_note_input`]; constructing it
/// directly skips validation and is reserved for tests and trusted callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
