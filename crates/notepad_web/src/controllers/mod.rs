//! HTTP route handlers.

pub mod notes;
