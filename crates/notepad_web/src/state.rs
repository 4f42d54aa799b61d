//! Request-shared application state.

use crate::config::WebConfig;
use crate::csrf::{CsrfGuard, PageSession};
use actix_web::HttpRequest;
use log::warn;
use notepad_core::NoteStore;

/// Service context handed to every handler through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: NoteStore,
    /// `None` when CSRF protection is disabled.
    pub csrf: Option<CsrfGuard>,
}

impl AppState {
    pub fn new(store: NoteStore, csrf: Option<CsrfGuard>) -> Self {
        Self { store, csrf }
    }

    /// Builds state from configuration around an already opened store.
    pub fn from_config(config: &WebConfig, store: NoteStore) -> Result<Self, String> {
        if !config.csrf_enabled {
            warn!("event=csrf_config module=web status=disabled");
            return Ok(Self::new(store, None));
        }

        let guard = match config.secret_key.as_deref() {
            Some(secret) => CsrfGuard::new(secret.as_bytes())?,
            None => {
                warn!(
                    "event=csrf_config module=web status=generated_secret detail=tokens_reset_on_restart"
                );
                CsrfGuard::with_random_secret()?
            }
        };
        Ok(Self::new(store, Some(guard)))
    }

    /// Session and form token for a rendered page; `None` when protection is off.
    pub fn page_session(&self, req: &HttpRequest) -> Option<(PageSession, String)> {
        let guard = self.csrf.as_ref()?;
        let session = PageSession::from_request(req);
        let token = guard.token_for(session.id());
        Some((session, token))
    }
}
