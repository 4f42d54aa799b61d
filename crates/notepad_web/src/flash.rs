//! One-shot notices carried across a redirect.
//!
//! The cookie holds a stable notice code, never free text, so its value is
//! always a valid cookie token.

use actix_web::cookie::Cookie;
use actix_web::HttpRequest;

pub const FLASH_COOKIE: &str = "notepad_flash";

/// Notice shown once on the next list render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    NoteAdded,
    NoteUpdated,
    NoteDeleted,
    NoteNotFound,
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Self::NoteAdded => "note_added",
            Self::NoteUpdated => "note_updated",
            Self::NoteDeleted => "note_deleted",
            Self::NoteNotFound => "note_not_found",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "note_added" => Some(Self::NoteAdded),
            "note_updated" => Some(Self::NoteUpdated),
            "note_deleted" => Some(Self::NoteDeleted),
            "note_not_found" => Some(Self::NoteNotFound),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoteAdded => "Note added!",
            Self::NoteUpdated => "Note updated!",
            Self::NoteDeleted => "Note deleted!",
            Self::NoteNotFound => "Note not found.",
        }
    }

    /// Presentation category: `success`, `info` or `danger`.
    pub fn category(self) -> &'static str {
        match self {
            Self::NoteAdded => "success",
            Self::NoteUpdated => "info",
            Self::NoteDeleted | Self::NoteNotFound => "danger",
        }
    }

    /// Reads the pending notice, ignoring unknown codes.
    pub fn from_request(req: &HttpRequest) -> Option<Self> {
        req.cookie(FLASH_COOKIE)
            .and_then(|cookie| Self::from_code(cookie.value()))
    }

    pub fn cookie(self) -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, self.code())
            .path("/")
            .http_only(true)
            .finish()
    }

    /// Cookie that clears any pending notice on the client.
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}
