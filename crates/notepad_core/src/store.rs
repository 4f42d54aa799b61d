//! Note store service context.
//!
//! # Responsibility
//! - Own the database location and delete policy for one process.
//! - Run every note operation on its own short-lived connection.
//!
//! # Invariants
//! - `NoteStore::open` creates the schema before any operation runs.
//! - Connections are dropped before an operation returns, on every path.
//! - Create validates before a connection is opened.
//! - Update reports an unknown id before field errors.

use crate::db::{connect, open_db};
use crate::model::note::{Note, NoteId};
use crate::model::validation::validate_note_input;
use crate::repo::note_repo::{RepoError, SqliteNoteRepository};
use crate::service::note_service::{MissingDeletePolicy, NoteService, NoteServiceError};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Settings needed to open a [`NoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub missing_delete: MissingDeletePolicy,
}

impl StoreConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            missing_delete: MissingDeletePolicy::default(),
        }
    }
}

/// Explicitly constructed handle to the notes database.
///
/// Cheap to clone; clones share nothing but the path and policy.
#[derive(Debug, Clone)]
pub struct NoteStore {
    database_path: PathBuf,
    missing_delete: MissingDeletePolicy,
}

impl NoteStore {
    /// Creates the notes schema if needed and returns a ready store.
    pub fn open(config: StoreConfig) -> Result<Self, NoteServiceError> {
        let conn = open_db(&config.database_path).map_err(RepoError::from)?;
        drop(conn);

        info!(
            "event=store_open module=store status=ok path={} missing_delete={}",
            config.database_path.display(),
            config.missing_delete.as_str()
        );
        Ok(Self {
            database_path: config.database_path,
            missing_delete: config.missing_delete,
        })
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn missing_delete(&self) -> MissingDeletePolicy {
        self.missing_delete
    }

    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        self.run("note_list", |service| service.list_notes())
    }

    pub fn get_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.run("note_get", |service| service.get_note(id))
    }

    pub fn create_note(&self, title: &str, content: &str) -> Result<Note, NoteServiceError> {
        let input = validate_note_input(title, content)?;
        self.run("note_create", |service| service.insert_note(&input))
    }

    pub fn update_note(
        &self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteServiceError> {
        self.run("note_update", |service| service.update_note(id, title, content))
    }

    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.run("note_delete", |service| service.delete_note(id))
    }

    /// Explicit shutdown hook; no connection outlives an operation.
    pub fn close(self) {
        info!(
            "event=store_close module=store status=ok path={}",
            self.database_path.display()
        );
    }

    fn run<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>,
    ) -> Result<T, NoteServiceError> {
        let started_at = Instant::now();
        let result = connect(&self.database_path)
            .map_err(RepoError::from)
            .map_err(NoteServiceError::from)
            .and_then(|conn| {
                let repo = SqliteNoteRepository::try_new(&conn)?;
                let service = NoteService::new(repo, self.missing_delete);
                op(&service)
            });

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!("event={event} module=store status=ok duration_ms={duration_ms}"),
            Err(NoteServiceError::StorageUnavailable(err)) => error!(
                "event={event} module=store status=error duration_ms={duration_ms} error_code=storage_unavailable error={err}"
            ),
            Err(err) => warn!(
                "event={event} module=store status=rejected duration_ms={duration_ms} error={err}"
            ),
        }
        result
    }
}
