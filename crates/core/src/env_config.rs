//! Environment variable parsing with warn-level logging for invalid values.

use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_STALE_TIME_SECS,
};

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Reads a non-empty string variable.
fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Connection settings for the backend API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub workspace_id: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("workspace_id", &self.workspace_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            token: None,
            workspace_id: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Builds the config from `LEADSYNC_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env_non_empty("LEADSYNC_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            token: env_non_empty("LEADSYNC_API_TOKEN"),
            workspace_id: env_non_empty("LEADSYNC_WORKSPACE_ID"),
            timeout: Duration::from_secs(env_parse_with_default(
                "LEADSYNC_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }
}

/// Freshness and size policy for the page cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub stale_time: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(DEFAULT_STALE_TIME_SECS),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            stale_time: Duration::from_secs(env_parse_with_default(
                "LEADSYNC_STALE_TIME_SECS",
                DEFAULT_STALE_TIME_SECS,
            )),
            max_entries: env_parse_with_default(
                "LEADSYNC_CACHE_MAX_ENTRIES",
                DEFAULT_CACHE_MAX_ENTRIES,
            )
            .max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(var: &str, value: &str) {
        // SAFETY: each test uses its own variable name.
        unsafe { std::env::set_var(var, value) }
    }

    fn unset(var: &str) {
        // SAFETY: each test uses its own variable name.
        unsafe { std::env::remove_var(var) }
    }

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "TEST_LEADSYNC_ENV_PARSE_VALID_40121";
        set(var_name, "42");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "TEST_LEADSYNC_ENV_PARSE_INVALID_40122";
        set(var_name, "banana");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unset(var_name);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "TEST_LEADSYNC_ENV_PARSE_MISSING_40123";
        unset(var_name);
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_empty_value() {
        let var_name = "TEST_LEADSYNC_ENV_PARSE_EMPTY_40124";
        set(var_name, "");
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 10);
        unset(var_name);
    }

    #[test]
    fn client_config_debug_hides_token() {
        let config = ClientConfig::default().with_token("secret-token");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.stale_time, Duration::from_secs(DEFAULT_STALE_TIME_SECS));
        assert_eq!(config.max_entries, DEFAULT_CACHE_MAX_ENTRIES);
    }
}
