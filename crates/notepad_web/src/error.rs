//! HTTP-facing error type.

use crate::render;
use actix_web::error::UrlencodedError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use notepad_core::NoteServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const CSRF_FAILURE_MESSAGE: &str = "The CSRF token is missing or invalid.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "The notes could not be loaded or saved. Please try again later.";
pub const FORM_FAILURE_MESSAGE: &str = "The submitted form could not be read.";

/// Failures that end a request with an error page.
#[derive(Debug)]
pub enum WebError {
    /// State-changing request without a valid CSRF token.
    Csrf,
    /// Form body that could not be decoded within the size limit.
    Form(UrlencodedError),
    /// Storage failure, or a store error the handler does not recover from.
    Store(NoteServiceError),
    /// The blocking worker pool dropped the operation.
    Blocking,
    /// Page template failed to render.
    Render(tera::Error),
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csrf => write!(f, "{CSRF_FAILURE_MESSAGE}"),
            Self::Form(err) => write!(f, "form body rejected: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Blocking => write!(f, "blocking worker pool unavailable"),
            Self::Render(err) => write!(f, "template rendering failed: {err}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::Csrf | Self::Blocking => None,
        }
    }
}

impl From<NoteServiceError> for WebError {
    fn from(value: NoteServiceError) -> Self {
        Self::Store(value)
    }
}

impl From<UrlencodedError> for WebError {
    fn from(value: UrlencodedError) -> Self {
        Self::Form(value)
    }
}

impl From<tera::Error> for WebError {
    fn from(value: tera::Error) -> Self {
        Self::Render(value)
    }
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Csrf => StatusCode::BAD_REQUEST,
            Self::Form(err) => err.status_code(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            Self::Csrf => {
                warn!("event=csrf_rejected module=web status=rejected");
                CSRF_FAILURE_MESSAGE
            }
            Self::Form(err) => {
                warn!(
                    "event=form_rejected module=web status=rejected http_status={} error={err}",
                    status.as_u16()
                );
                FORM_FAILURE_MESSAGE
            }
            other => {
                error!(
                    "event=request_failed module=web status=error http_status={} error={}",
                    status.as_u16(),
                    other
                );
                GENERIC_FAILURE_MESSAGE
            }
        };

        match render::error_page(message) {
            Ok(body) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(body),
            Err(err) => {
                error!("event=error_page module=web status=error error={err}");
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(message)
            }
        }
    }
}
