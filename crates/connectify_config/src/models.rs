// --- File: crates/connectify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level, e.g. "info" or "debug".
    pub level: Option<String>,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
    /// File name prefix for the rolling log file.
    pub file_prefix: Option<String>,
}

// --- Calendly Config ---
// Holds non-secret Calendly config. The access token may be "secret_from_env"
// and is then injected from CONNECTIFY_SECRET_CALENDLY_ACCESS_TOKEN or CALENDLY_ACCESS_TOKEN.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalendlyConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

fn default_api_base_url() -> String {
    "https://api.calendly.com".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CalendlyConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            default_timezone: default_timezone(),
            request_timeout_secs: default_request_timeout_secs(),
            events: Vec::new(),
        }
    }
}

/// One bookable Calendly event type known to this integration.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EventConfig {
    #[serde(alias = "eventName")]
    pub event_name: String,
    /// Either the full API URI (https://api.calendly.com/event_types/...) or the bare UUID.
    #[serde(alias = "eventUri")]
    pub event_uri: String,
    /// Public booking page, used for pre-filled links.
    #[serde(default, alias = "schedulingUrl")]
    pub scheduling_url: Option<String>,
    #[serde(default)]
    pub location: Option<LocationConfig>,
    /// Intake questions as shown on the booking page. When empty, the
    /// questions are fetched from the Calendly event type instead.
    #[serde(default, alias = "customFields")]
    pub custom_fields: Vec<CustomFieldConfig>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LocationConfig {
    pub kind: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CustomFieldConfig {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// UI-level type of a booking field.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    #[serde(rename = "text_single_line", alias = "text", alias = "string")]
    Text,
    #[serde(rename = "text_multiline", alias = "textarea", alias = "multiline")]
    Multiline,
    Radio,
    #[serde(alias = "select")]
    Dropdown,
    #[serde(alias = "multi_select")]
    Checkbox,
    #[serde(alias = "phone_number")]
    Phone,
    Email,
    Name,
}

/// A choice label; config files may list plain strings or `{ label = "..." }` tables.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldOption {
    Label(String),
    Labeled { label: String },
}

impl FieldOption {
    pub fn label(&self) -> &str {
        match self {
            FieldOption::Label(label) | FieldOption::Labeled { label } => label,
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub use_calendly: bool,

    #[serde(default)]
    pub calendly: Option<CalendlyConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}
