//! Server-side HTML rendering.
//!
//! # Responsibility
//! - Compile the embedded page templates once per process.
//! - Turn notes, form state and notices into HTML bodies.
//!
//! # Invariants
//! - Every template is autoescaped; user text is never emitted raw.
//! - Every page context defines `flash` and `csrf_token` (possibly null).

use crate::flash::Flash;
use notepad_core::{Note, NoteId, ValidationErrors};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("note_form.html", include_str!("../templates/note_form.html")),
        ("error.html", include_str!("../templates/error.html")),
    ])
    .expect("embedded templates are valid");
    tera
});

#[derive(Debug, Serialize)]
struct NoteView<'a> {
    id: NoteId,
    title: &'a str,
    content: &'a str,
    date_created: String,
}

impl<'a> From<&'a Note> for NoteView<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            id: note.id,
            title: note.title.as_str(),
            content: note.content.as_str(),
            date_created: note.date_created.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FlashView {
    category: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct FormView<'a> {
    title: &'a str,
    content: &'a str,
    title_errors: Vec<&'static str>,
    content_errors: Vec<&'static str>,
}

/// Which note form is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit(NoteId),
}

impl FormKind {
    fn heading(self) -> &'static str {
        match self {
            Self::Add => "Add note",
            Self::Edit(_) => "Edit note",
        }
    }

    fn action(self) -> String {
        match self {
            Self::Add => "/add".to_string(),
            Self::Edit(id) => format!("/edit/{id}"),
        }
    }
}

/// Renders the note list page.
pub fn index_page(
    notes: &[Note],
    flash: Option<Flash>,
    csrf_token: Option<&str>,
) -> tera::Result<String> {
    let mut context = page_context(flash, csrf_token);
    let views = notes.iter().map(NoteView::from).collect::<Vec<_>>();
    context.insert("notes", &views);
    TEMPLATES.render("index.html", &context)
}

/// Renders the add or edit form with current values and inline errors.
pub fn note_form_page(
    kind: FormKind,
    title: &str,
    content: &str,
    errors: Option<&ValidationErrors>,
    csrf_token: Option<&str>,
) -> tera::Result<String> {
    let mut context = page_context(None, csrf_token);
    let field_errors = |field: &str| errors.map(|errs| errs.for_field(field)).unwrap_or_default();
    let form = FormView {
        title,
        content,
        title_errors: field_errors("title"),
        content_errors: field_errors("content"),
    };
    context.insert("heading", kind.heading());
    context.insert("action", &kind.action());
    context.insert("form", &form);
    TEMPLATES.render("note_form.html", &context)
}

/// Renders the generic failure page.
pub fn error_page(message: &str) -> tera::Result<String> {
    let mut context = page_context(None, None);
    context.insert("message", message);
    TEMPLATES.render("error.html", &context)
}

fn page_context(flash: Option<Flash>, csrf_token: Option<&str>) -> Context {
    let mut context = Context::new();
    let flash = flash.map(|flash| FlashView {
        category: flash.category(),
        message: flash.message(),
    });
    context.insert("flash", &flash);
    context.insert("csrf_token", &csrf_token);
    context
}
