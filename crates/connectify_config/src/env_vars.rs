//! Environment variable handling for the Connectify application.
//!
//! Plain values are overridden with `CONNECTIFY__SECTION__KEY` variables by
//! the `config` crate. Secrets such as the Calendly token are pulled in here,
//! wherever the config says `"secret_from_env"`.

use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "CONNECTIFY";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "CONNECTIFY_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Config value that asks for the real value to be read from the environment
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a secret path to an environment variable name
///
/// `"calendly.access_token"` becomes `"CONNECTIFY_SECRET_CALENDLY_ACCESS_TOKEN"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy, unprefixed environment variable name
///
/// `"calendly.access_token"` becomes `"CALENDLY_ACCESS_TOKEN"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a secret path
///
/// Tries the prefixed name first and falls back to the legacy name.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    let env_var = secret_path_to_env_var(path);
    if let Ok(value) = env::var(&env_var) {
        return Some(value);
    }

    let legacy_env_var = legacy_secret_path_to_env_var(path);
    env::var(&legacy_env_var).ok()
}

/// Replace every `"secret_from_env"` string in `value` with its secret from the environment.
///
/// The JSON path of the marker names the variable, see [`get_secret_env_var`].
/// Returns `true` if anything was replaced. Markers without a matching
/// variable are left in place.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    fn walk(path: &mut Vec<String>, node: &mut serde_json::Value) -> bool {
        use serde_json::Value;

        match node {
            Value::Object(map) => map.iter_mut().fold(false, |replaced, (key, child)| {
                path.push(key.clone());
                let hit = walk(path, child);
                path.pop();
                replaced | hit
            }),
            Value::Array(items) => items.iter_mut().enumerate().fold(false, |replaced, (i, child)| {
                path.push(i.to_string());
                let hit = walk(path, child);
                path.pop();
                replaced | hit
            }),
            Value::String(s) if s == SECRET_MARKER => {
                let dotted = path.join(".");
                match get_secret_env_var(&dotted) {
                    Some(secret) => {
                        *s = secret;
                        true
                    }
                    None => {
                        warn!(
                            "neither {} nor {} is set",
                            secret_path_to_env_var(&dotted),
                            legacy_secret_path_to_env_var(&dotted)
                        );
                        false
                    }
                }
            }
            _ => false,
        }
    }

    walk(&mut Vec::new(), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("calendly.access_token"),
            "CONNECTIFY_SECRET_CALENDLY_ACCESS_TOKEN"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(
            legacy_secret_path_to_env_var("calendly.access_token"),
            "CALENDLY_ACCESS_TOKEN"
        );
        assert_eq!(legacy_secret_path_to_env_var("token"), "TOKEN");
    }

    #[test]
    fn test_inject_env_vars_leaves_plain_values() {
        let mut value = serde_json::json!({
            "server": { "host": "127.0.0.1" },
            "calendly": { "events": [{ "event_name": "Intro" }] }
        });
        let before = value.clone();
        assert!(!inject_env_vars(&mut value));
        assert_eq!(value, before);
    }

    #[test]
    fn test_inject_env_vars_resolves_nested_marker() {
        env::set_var("CONNECTIFY_SECRET_INJECTTEST_EVENTS_0_TOKEN", "tok-123");
        let mut value = serde_json::json!({
            "injecttest": { "events": [{ "token": SECRET_MARKER, "name": "Intro" }] }
        });
        assert!(inject_env_vars(&mut value));
        assert_eq!(value["injecttest"]["events"][0]["token"], "tok-123");
        assert_eq!(value["injecttest"]["events"][0]["name"], "Intro");
    }
}
