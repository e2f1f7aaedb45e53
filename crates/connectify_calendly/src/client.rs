// --- File: crates/connectify_calendly/src/client.rs ---
//! Calendly REST client.

use std::env;

use chrono::{DateTime, SecondsFormat, Utc};
use connectify_common::create_client_with_headers;
use connectify_config::CalendlyConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::CalendlyError;
use crate::models::{
    AvailableSlot, CalendlyUser, Collection, CreatedInvitee, EventType, InviteePayload, Resource,
};
use crate::service::{BoxFuture, SchedulingProvider};

/// Environment variable consulted when the config carries no access token.
pub const TOKEN_ENV_VAR: &str = "CALENDLY_TOKEN";

/// Page size for list endpoints; Calendly caps it at 100.
const PAGE_SIZE: &str = "100";

/// [`SchedulingProvider`] backed by the Calendly v2 API.
#[derive(Clone)]
pub struct CalendlyClient {
    http: Client,
    base_url: String,
}

impl CalendlyClient {
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self, CalendlyError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            CalendlyError::ConfigError("Calendly access token contains invalid characters".into())
        })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = create_client_with_headers(timeout_secs, true, headers)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from the `calendly` config section, falling back to
    /// `CALENDLY_TOKEN` when no access token is configured.
    pub fn from_config(config: &CalendlyConfig) -> Result<Self, CalendlyError> {
        let token = config
            .access_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.trim().is_empty()))
            .ok_or_else(|| {
                CalendlyError::ConfigError("Missing Calendly authorization token".to_string())
            })?;

        Self::new(&config.api_base_url, &token, config.request_timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CalendlyError> {
        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            debug!("[Calendly] API response body (raw): {}", body_text);
            let message = error_message(&body_text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            info!(
                "[Calendly] API request failed with HTTP status: {}. Message: {}",
                status, message
            );
            return Err(CalendlyError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body_text)?)
    }
}

/// The provider's `message` (or `title`) field, else the raw body when non-empty.
fn error_message(body_text: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body_text).ok();
    let from_json = parsed.as_ref().and_then(|json| {
        ["message", "title"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    });

    from_json.or_else(|| {
        let trimmed = body_text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Last path segment of an event type URI, or the value itself when it is a bare UUID.
pub fn event_type_uuid(event_type_uri: &str) -> &str {
    event_type_uri
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(event_type_uri)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SchedulingProvider for CalendlyClient {
    fn available_times<'a>(
        &'a self,
        event_type_uri: &'a str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &'a str,
    ) -> BoxFuture<'a, Result<Vec<AvailableSlot>, CalendlyError>> {
        Box::pin(async move {
            let query = [
                ("event_type", event_type_uri.to_string()),
                ("start_time", timestamp(start)),
                ("end_time", timestamp(end)),
                ("timezone", timezone.to_string()),
            ];
            info!(
                "[Calendly] Fetching available times for {} ({} - {})",
                event_type_uri, query[1].1, query[2].1
            );

            let request = self
                .http
                .get(self.url("/event_type_available_times"))
                .query(&query);
            let page: Collection<AvailableSlot> = self.send(request).await?;
            Ok(page.collection)
        })
    }

    fn event_type<'a>(
        &'a self,
        event_type_uri: &'a str,
    ) -> BoxFuture<'a, Result<EventType, CalendlyError>> {
        Box::pin(async move {
            let path = format!("/event_types/{}", event_type_uuid(event_type_uri));
            let resource: Resource<EventType> = self.send(self.http.get(self.url(&path))).await?;
            Ok(resource.resource)
        })
    }

    fn create_invitee<'a>(
        &'a self,
        payload: &'a InviteePayload,
    ) -> BoxFuture<'a, Result<CreatedInvitee, CalendlyError>> {
        Box::pin(async move {
            debug!(
                "[Calendly] Invitee payload: {}",
                serde_json::to_string(payload).unwrap_or_default()
            );
            let request = self.http.post(self.url("/invitees")).json(payload);
            let resource: Resource<CreatedInvitee> = self.send(request).await?;
            info!("[Calendly] Invitee created: {}", resource.resource.uri);
            Ok(resource.resource)
        })
    }

    fn current_user(&self) -> BoxFuture<'_, Result<CalendlyUser, CalendlyError>> {
        Box::pin(async move {
            let resource: Resource<CalendlyUser> =
                self.send(self.http.get(self.url("/users/me"))).await?;
            Ok(resource.resource)
        })
    }

    fn list_event_types<'a>(
        &'a self,
        user_uri: &'a str,
    ) -> BoxFuture<'a, Result<Vec<EventType>, CalendlyError>> {
        Box::pin(async move {
            let request = self
                .http
                .get(self.url("/event_types"))
                .query(&[("user", user_uri), ("count", PAGE_SIZE)]);
            let page: Collection<EventType> = self.send(request).await?;
            Ok(page.collection)
        })
    }
}
