//! Server-rendered HTTP front end for the notepad store.
//!
//! # Responsibility
//! - Map the four note operations onto HTML pages and form posts.
//! - Own HTTP-only concerns: CSRF tokens, flash notices, error pages.
//!
//! # Invariants
//! - Handlers never touch SQLite directly; every operation goes through `NoteStore`.
//! - State-changing requests are rejected before store access when CSRF fails.

pub mod config;
pub mod controllers;
pub mod csrf;
pub mod error;
pub mod flash;
pub mod render;
pub mod server;
pub mod state;

pub use config::WebConfig;
pub use error::WebError;
pub use server::{configure, run};
pub use state::AppState;
