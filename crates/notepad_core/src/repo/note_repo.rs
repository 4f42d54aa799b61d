//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide single-statement CRUD APIs over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writes never touch `id` or `date_created` of existing rows.
//! - Lists are ordered by `date_created DESC, id DESC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::{table_exists, table_has_column, NOTES_COLUMNS, NOTES_TABLE};
use crate::db::DbError;
use crate::model::note::{Note, NoteId, NoteInput};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts one note and returns the stored record with its fresh id.
    fn insert_note(&self, input: &NoteInput, date_created: DateTime<Utc>) -> RepoResult<Note>;
    /// Overwrites title/content of an existing note and returns the stored record.
    fn update_note(&self, id: NoteId, input: &NoteInput) -> RepoResult<Note>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists every note, newest first.
    fn list_notes(&self) -> RepoResult<Vec<Note>>;
    /// Deletes one note. Returns `false` when no row matched.
    fn delete_note(&self, id: NoteId) -> RepoResult<bool>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository after checking the notes table shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_notes_table_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, input: &NoteInput, date_created: DateTime<Utc>) -> RepoResult<Note> {
        let note = self.conn.query_row(
            "INSERT INTO notes (title, content, date_created)
             VALUES (?1, ?2, ?3)
             RETURNING id, title, content, date_created;",
            params![input.title.as_str(), input.content.as_str(), date_created],
            parse_note_row,
        )??;
        Ok(note)
    }

    fn update_note(&self, id: NoteId, input: &NoteInput) -> RepoResult<Note> {
        let updated = self
            .conn
            .query_row(
                "UPDATE notes
                 SET
                    title = ?2,
                    content = ?3
                 WHERE id = ?1
                 RETURNING id, title, content, date_created;",
                params![id, input.title.as_str(), input.content.as_str()],
                parse_note_row,
            )
            .optional()?;

        match updated {
            Some(note) => note,
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, title, content, date_created
                 FROM notes
                 WHERE id = ?1;",
                [id],
                parse_note_row,
            )
            .optional()?;

        found.transpose()
    }

    fn list_notes(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, date_created
             FROM notes
             ORDER BY date_created DESC, id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)??);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

/// Maps one row; the outer error is transport, the inner one is data validity.
fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Note>> {
    let note = Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        date_created: row.get("date_created")?,
    };

    if note.title.trim().is_empty() || note.content.trim().is_empty() {
        return Ok(Err(RepoError::InvalidData(format!(
            "note {} has blank title or content",
            note.id
        ))));
    }

    Ok(Ok(note))
}

fn ensure_notes_table_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, NOTES_TABLE)? {
        return Err(RepoError::MissingRequiredTable(NOTES_TABLE));
    }

    for column in NOTES_COLUMNS {
        if !table_has_column(conn, NOTES_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: NOTES_TABLE,
                column,
            });
        }
    }

    Ok(())
}
