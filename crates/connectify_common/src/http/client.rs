use reqwest::header::HeaderMap;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Creates the shared HTTP client.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for the client
/// * `follow_redirects` - Whether the client should follow redirects
/// * `default_headers` - Sent on every request (e.g. a bearer token)
pub fn create_client_with_headers(
    timeout_secs: u64,
    follow_redirects: bool,
    default_headers: HeaderMap,
) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        })
        .default_headers(default_headers)
        .build()
}
