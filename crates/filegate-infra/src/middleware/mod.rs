//! Shared HTTP middleware

pub mod request_id;
pub mod request_logging;

pub use request_id::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use request_logging::request_logging_middleware;
