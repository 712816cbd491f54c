//! HTTP middleware local to the API crate.

pub mod timeout;

pub use timeout::request_timeout_middleware;
