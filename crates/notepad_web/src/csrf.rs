//! Cross-site request forgery protection.
//!
//! # Responsibility
//! - Issue an opaque per-browser session id cookie.
//! - Derive the form token from the session id with HMAC-SHA256.
//! - Verify submitted tokens before any state-changing operation.
//!
//! # Invariants
//! - Tokens are bound to one session id and one server secret.
//! - Verification is constant-time.
//! - A request without a session cookie never passes verification.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "notepad_session";
pub const CSRF_FIELD: &str = "csrf_token";
const GENERATED_SECRET_BYTES: usize = 32;

/// Signs and verifies CSRF tokens with a server secret.
#[derive(Clone)]
pub struct CsrfGuard {
    mac: HmacSha256,
}

impl Debug for CsrfGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("CsrfGuard { .. }")
    }
}

impl CsrfGuard {
    /// Builds a guard from a configured secret.
    pub fn new(secret: &[u8]) -> Result<Self, String> {
        if secret.is_empty() {
            return Err("csrf secret cannot be empty".to_string());
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|err| format!("invalid csrf secret: {err}"))?;
        Ok(Self { mac })
    }

    /// Builds a guard from a fresh random secret; tokens die with the process.
    pub fn with_random_secret() -> Result<Self, String> {
        let mut secret = [0u8; GENERATED_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(&secret)
    }

    /// Returns the hex token expected for `session_id`.
    pub fn token_for(&self, session_id: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks `token` against `session_id`.
    pub fn verify(&self, session_id: &str, token: &str) -> bool {
        let Ok(expected) = hex::decode(token.trim()) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Verifies a submitted form token against the request's session cookie.
    pub fn verify_request(&self, req: &HttpRequest, token: Option<&str>) -> bool {
        match (session_id_from_request(req), token) {
            (Some(session_id), Some(token)) => self.verify(&session_id, token),
            _ => false,
        }
    }
}

/// Session id used while rendering one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSession {
    id: String,
    fresh: bool,
}

impl PageSession {
    /// Reuses the request's session id, or starts a new one.
    pub fn from_request(req: &HttpRequest) -> Self {
        match session_id_from_request(req) {
            Some(id) => Self { id, fresh: false },
            None => Self {
                id: Uuid::new_v4().to_string(),
                fresh: true,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Sets the session cookie on the response when it was just created.
    pub fn attach(&self, response: &mut HttpResponseBuilder) {
        if self.fresh {
            response.cookie(session_cookie(&self.id));
        }
    }
}

fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn session_id_from_request(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value())
        .ok()
        .map(|id| id.to_string())
}
