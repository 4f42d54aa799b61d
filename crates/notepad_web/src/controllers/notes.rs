//! Note pages and form submissions.
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | GET | `/` | note list |
//! | GET/POST | `/add` | create form / create |
//! | GET/POST | `/edit/{id}` | edit form / update |
//! | POST | `/delete/{id}` | delete |
//!
//! Successful writes answer `303 See Other` to `/` with a flash notice.
//! Form bodies are accepted up to [`FORM_BODY_LIMIT`] bytes.

use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use notepad_core::{NoteId, NoteServiceError, NoteStore, ValidationErrors};
use serde::Deserialize;

use crate::error::WebError;
use crate::flash::Flash;
use crate::render::{self, FormKind};
use crate::state::AppState;

/// Upper bound for a url-encoded form body.
pub const FORM_BODY_LIMIT: usize = 2 * 1024 * 1024;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_BODY_LIMIT)
            .error_handler(|err, _req| WebError::from(err).into()),
    );
    cfg.service(web::resource("/").route(web::get().to(index)));
    cfg.service(
        web::resource("/add")
            .route(web::get().to(add_form))
            .route(web::post().to(add_note)),
    );
    cfg.service(
        web::resource("/edit/{id}")
            .route(web::get().to(edit_form))
            .route(web::post().to(edit_note)),
    );
    cfg.service(web::resource("/delete/{id}").route(web::post().to(delete_note)));
}

/// Submitted add/edit form. Missing fields deserialize as empty.
#[derive(Debug, Deserialize)]
struct NoteForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    csrf_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteForm {
    #[serde(default)]
    csrf_token: Option<String>,
}

async fn index(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, WebError> {
    let notes = run_store(&state, |store| store.list_notes()).await??;
    let flash = Flash::from_request(&req);
    let page = state.page_session(&req);
    let token = page.as_ref().map(|(_, token)| token.as_str());
    let body = render::index_page(&notes, flash, token)?;

    let mut response = HttpResponse::Ok();
    if let Some((session, _)) = &page {
        session.attach(&mut response);
    }
    if flash.is_some() {
        response.cookie(Flash::removal_cookie());
    }
    Ok(response.content_type(ContentType::html()).body(body))
}

async fn add_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, WebError> {
    form_page(&state, &req, FormKind::Add, "", "", None)
}

async fn add_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<NoteForm>,
) -> Result<HttpResponse, WebError> {
    let form = form.into_inner();
    verify_csrf(&state, &req, form.csrf_token.as_deref())?;

    let (title, content) = (form.title.clone(), form.content.clone());
    match run_store(&state, move |store| store.create_note(&title, &content)).await? {
        Ok(note) => {
            info!("event=note_created module=web status=ok id={}", note.id);
            Ok(redirect_home(Flash::NoteAdded))
        }
        Err(NoteServiceError::Validation(errors)) => form_page(
            &state,
            &req,
            FormKind::Add,
            &form.title,
            &form.content,
            Some(&errors),
        ),
        Err(other) => Err(other.into()),
    }
}

async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    match run_store(&state, move |store| store.get_note(id)).await? {
        Ok(note) => form_page(
            &state,
            &req,
            FormKind::Edit(id),
            &note.title,
            &note.content,
            None,
        ),
        Err(NoteServiceError::NotFound(_)) => Ok(redirect_home(Flash::NoteNotFound)),
        Err(other) => Err(other.into()),
    }
}

async fn edit_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
    form: web::Form<NoteForm>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let form = form.into_inner();
    verify_csrf(&state, &req, form.csrf_token.as_deref())?;

    let (title, content) = (form.title.clone(), form.content.clone());
    match run_store(&state, move |store| store.update_note(id, &title, &content)).await? {
        Ok(note) => {
            info!("event=note_updated module=web status=ok id={}", note.id);
            Ok(redirect_home(Flash::NoteUpdated))
        }
        Err(NoteServiceError::Validation(errors)) => form_page(
            &state,
            &req,
            FormKind::Edit(id),
            &form.title,
            &form.content,
            Some(&errors),
        ),
        Err(NoteServiceError::NotFound(_)) => Ok(redirect_home(Flash::NoteNotFound)),
        Err(other) => Err(other.into()),
    }
}

async fn delete_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NoteId>,
    form: Option<web::Form<DeleteForm>>,
) -> Result<HttpResponse, WebError> {
    let id = path.into_inner();
    let token = form.and_then(|form| form.into_inner().csrf_token);
    verify_csrf(&state, &req, token.as_deref())?;

    match run_store(&state, move |store| store.delete_note(id)).await? {
        Ok(()) => {
            info!("event=note_deleted module=web status=ok id={id}");
            Ok(redirect_home(Flash::NoteDeleted))
        }
        Err(NoteServiceError::NotFound(_)) => Ok(redirect_home(Flash::NoteNotFound)),
        Err(other) => Err(other.into()),
    }
}

/// Runs one store operation on the blocking pool.
///
/// The outer error means the operation never ran; the inner one is the
/// store's own outcome.
async fn run_store<T, F>(
    state: &AppState,
    op: F,
) -> Result<Result<T, NoteServiceError>, WebError>
where
    T: Send + 'static,
    F: FnOnce(&NoteStore) -> Result<T, NoteServiceError> + Send + 'static,
{
    let store = state.store.clone();
    web::block(move || op(&store))
        .await
        .map_err(|_| WebError::Blocking)
}

fn verify_csrf(state: &AppState, req: &HttpRequest, token: Option<&str>) -> Result<(), WebError> {
    match &state.csrf {
        Some(guard) if !guard.verify_request(req, token) => Err(WebError::Csrf),
        _ => Ok(()),
    }
}

fn form_page(
    state: &AppState,
    req: &HttpRequest,
    kind: FormKind,
    title: &str,
    content: &str,
    errors: Option<&ValidationErrors>,
) -> Result<HttpResponse, WebError> {
    let page = state.page_session(req);
    let token = page.as_ref().map(|(_, token)| token.as_str());
    let body = render::note_form_page(kind, title, content, errors, token)?;

    let mut response = HttpResponse::Ok();
    if let Some((session, _)) = &page {
        session.attach(&mut response);
    }
    Ok(response.content_type(ContentType::html()).body(body))
}

fn redirect_home(flash: Flash) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(flash.cookie())
        .finish()
}
