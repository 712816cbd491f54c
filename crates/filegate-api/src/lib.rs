//! Filegate API Library
//!
//! HTTP handlers, the streaming upload pipeline, and application setup.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod upload;

pub use error::HttpAppError;
pub use state::AppState;
