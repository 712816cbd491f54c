//! Filegate Infrastructure Library
//!
//! Shared infrastructure components for the filegate service:
//! - Middleware (request ID, request logging)
//! - Telemetry initialization
//! - Error response body

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{get_request_id, request_id_middleware, request_logging_middleware, RequestId};
pub use telemetry::{init_telemetry, shutdown_telemetry};
