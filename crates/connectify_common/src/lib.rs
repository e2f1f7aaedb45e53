// --- File: crates/connectify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, not_found, validation_error,
    ConnectifyError, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::create_client_with_headers,
    map_json_error, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_result};
