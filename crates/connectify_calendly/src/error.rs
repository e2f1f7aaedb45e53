// --- File: crates/connectify_calendly/src/error.rs ---
use connectify_common::{
    config_error, external_service_error, internal_error, not_found, validation_error,
    ConnectifyError, HttpStatusCode,
};
use thiserror::Error;

/// Calendly-specific error types.
#[derive(Error, Debug)]
pub enum CalendlyError {
    /// Error occurred during a Calendly API request
    #[error("Calendly API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Calendly API
    #[error("Calendly API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Calendly API response
    #[error("Failed to parse Calendly API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Calendly configuration
    #[error("Calendly configuration error: {0}")]
    ConfigError(String),

    /// No configured event matches the requested name
    #[error("Event configuration for \"{0}\" not found")]
    EventNotFound(String),

    /// Caller input is missing or malformed
    #[error("{0}")]
    InvalidInput(String),

    /// Required intake questions were left unanswered
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A pre-filled link could not be encoded
    #[error("Failed to encode booking link: {0}")]
    EncodingError(String),
}

impl CalendlyError {
    /// Calendly answers 403 when the account's plan does not allow booking through the API.
    pub fn is_plan_restricted(&self) -> bool {
        matches!(self, CalendlyError::ApiError { status_code: 403, .. })
    }
}

/// Convert CalendlyError to ConnectifyError
impl From<CalendlyError> for ConnectifyError {
    fn from(err: CalendlyError) -> Self {
        match err {
            CalendlyError::RequestError(e) => ConnectifyError::from(e),
            CalendlyError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Calendly API",
                status_code,
                format!("Status: {}, Message: {}", status_code, message),
            ),
            CalendlyError::ParseError(e) => {
                ConnectifyError::ParseError(format!("Calendly response parse error: {}", e))
            }
            CalendlyError::ConfigError(msg) => config_error(msg),
            e @ CalendlyError::EventNotFound(_) => not_found(e),
            CalendlyError::InvalidInput(msg) => validation_error(msg),
            e @ CalendlyError::MissingFields(_) => validation_error(e),
            CalendlyError::EncodingError(msg) => internal_error(msg),
        }
    }
}

impl HttpStatusCode for CalendlyError {
    fn status_code(&self) -> u16 {
        match self {
            CalendlyError::RequestError(e) if e.is_timeout() => 504,
            CalendlyError::RequestError(_) => 502,
            CalendlyError::ApiError { status_code, .. } if (400..500).contains(status_code) => {
                *status_code
            }
            CalendlyError::ApiError { .. } => 502,
            CalendlyError::ParseError(_) => 502,
            CalendlyError::ConfigError(_) => 500,
            CalendlyError::EventNotFound(_) => 404,
            CalendlyError::InvalidInput(_) => 400,
            CalendlyError::MissingFields(_) => 400,
            CalendlyError::EncodingError(_) => 500,
        }
    }
}
