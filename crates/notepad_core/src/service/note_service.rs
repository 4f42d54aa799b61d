//! Note use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete APIs for notes.
//! - Validate form input before any storage access.
//! - Apply the configured policy for deleting unknown ids.
//!
//! # Invariants
//! - `date_created` is assigned here, once, at creation.
//! - Update replaces title and content only.
//! - Invalid input never reaches the repository.

use crate::model::note::{Note, NoteId, NoteInput};
use crate::model::validation::{validate_note_input, ValidationErrors};
use crate::repo::note_repo::{NoteRepository, RepoError};
use chrono::{SubsecRound, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Submitted fields failed validation.
    Validation(ValidationErrors),
    /// Target note does not exist.
    NotFound(NoteId),
    /// Connection or statement failure.
    StorageUnavailable(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "invalid note input: {errors}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::StorageUnavailable(err) => write!(f, "note storage unavailable: {err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::NotFound(_) => None,
            Self::StorageUnavailable(err) => Some(err),
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::StorageUnavailable(other),
        }
    }
}

impl From<ValidationErrors> for NoteServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// What deleting an unknown id does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingDeletePolicy {
    /// Silently succeed.
    Ignore,
    /// Fail with [`NoteServiceError::NotFound`].
    #[default]
    Report,
}

impl MissingDeletePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Report => "report",
        }
    }
}

impl FromStr for MissingDeletePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "report" => Ok(Self::Report),
            other => Err(format!(
                "unsupported missing-delete policy `{other}`; expected ignore|report"
            )),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    missing_delete: MissingDeletePolicy,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R, missing_delete: MissingDeletePolicy) -> Self {
        Self {
            repo,
            missing_delete,
        }
    }

    /// Lists all notes, newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.list_notes()?)
    }

    /// Gets one note by id.
    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo.get_note(id)?.ok_or(NoteServiceError::NotFound(id))
    }

    /// Validates raw fields and creates a note from them.
    pub fn create_note(&self, title: &str, content: &str) -> Result<Note, NoteServiceError> {
        let input = validate_note_input(title, content)?;
        self.insert_note(&input)
    }

    /// Creates a note from already validated input.
    pub fn insert_note(&self, input: &NoteInput) -> Result<Note, NoteServiceError> {
        // Microsecond precision keeps stored text and the returned value equal.
        let date_created = Utc::now().trunc_subsecs(6);
        Ok(self.repo.insert_note(input, date_created)?)
    }

    /// Overwrites title/content of note `id` from raw fields.
    ///
    /// An unknown id is reported before any field errors.
    pub fn update_note(
        &self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteServiceError> {
        self.get_note(id)?;
        let input = validate_note_input(title, content)?;
        self.overwrite_note(id, &input)
    }

    /// Overwrites title/content of note `id` with already validated input.
    pub fn overwrite_note(&self, id: NoteId, input: &NoteInput) -> Result<Note, NoteServiceError> {
        Ok(self.repo.update_note(id, input)?)
    }

    /// Deletes note `id` according to the configured missing-delete policy.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        let deleted = self.repo.delete_note(id)?;
        if !deleted && self.missing_delete == MissingDeletePolicy::Report {
            return Err(NoteServiceError::NotFound(id));
        }
        Ok(())
    }
}
