use std::fmt;
use thiserror::Error;

/// The base error type for all Connectify errors.
///
/// Integration crates extend this by implementing `From<TheirError> for ConnectifyError`.
#[derive(Error, Debug)]
pub enum ConnectifyError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
        status_code: u16,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// A feature is switched off in the runtime configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ConnectifyError {
    fn status_code(&self) -> u16 {
        match self {
            ConnectifyError::HttpError(_) => 502,
            ConnectifyError::ParseError(_) => 502,
            ConnectifyError::ConfigError(_) => 500,
            ConnectifyError::ValidationError(_) => 400,
            ConnectifyError::ExternalServiceError { status_code, .. } => *status_code,
            ConnectifyError::NotFoundError(_) => 404,
            ConnectifyError::TimeoutError(_) => 504,
            ConnectifyError::ServiceUnavailable(_) => 503,
            ConnectifyError::InternalError(_) => 500,
        }
    }
}

impl From<reqwest::Error> for ConnectifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectifyError::TimeoutError(err.to_string())
        } else {
            ConnectifyError::HttpError(err.to_string())
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> ConnectifyError {
    ConnectifyError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> ConnectifyError {
    ConnectifyError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> ConnectifyError {
    ConnectifyError::NotFoundError(message.to_string())
}

/// Wraps an upstream failure. Client errors from the upstream are passed
/// through as-is, everything else becomes 502 Bad Gateway.
pub fn external_service_error<T: fmt::Display>(
    service_name: &str,
    status_code: u16,
    message: T,
) -> ConnectifyError {
    let status_code = if (400..500).contains(&status_code) {
        status_code
    } else {
        502
    };
    ConnectifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
        status_code,
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> ConnectifyError {
    ConnectifyError::InternalError(message.to_string())
}
