//! Form input validation for note writes.
//!
//! # Responsibility
//! - Turn raw submitted fields into a [`NoteInput`] or a list of field errors.
//! - Stay independent of any rendering layer.
//!
//! # Invariants
//! - Every failing field is reported, in form order (`title`, `content`).
//! - Whitespace-only values count as missing.

use super::note::NoteInput;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum accepted title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
/// Keep the number in step with [`TITLE_MAX_CHARS`].
pub const TITLE_TOO_LONG_MESSAGE: &str = "Title must be at most 100 characters.";

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Ordered list of field errors returned by [`validate_note_input`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Returns messages reported for one field, in insertion order.
    pub fn for_field(&self, field: &str) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|err| err.field == field)
            .map(|err| err.message)
            .collect()
    }

    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validates submitted note fields.
///
/// Values are kept as submitted on success; only blankness and title length
/// are checked.
pub fn validate_note_input(title: &str, content: &str) -> Result<NoteInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if title.trim().is_empty() {
        errors.push("title", REQUIRED_MESSAGE);
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.push("title", TITLE_TOO_LONG_MESSAGE);
    }

    if content.trim().is_empty() {
        errors.push("content", REQUIRED_MESSAGE);
    }

    if errors.is_empty() {
        Ok(NoteInput::new(title, content))
    } else {
        Err(errors)
    }
}
