//! Client configuration.

use std::time::Duration;

/// Environment variable read by [`ClientConfig::from_env`].
pub const API_URL_ENV: &str = "ACCOUNTS_API_URL";

/// Base address used when `ACCOUNTS_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Where the API lives and how long the transport may wait on it.
///
/// `timeout` is handed to the transport as its overall per-request deadline.
/// `None` leaves the transport's own default in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the base address from `ACCOUNTS_API_URL`, falling back to
    /// `http://localhost:8080`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_api_without_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.timeout.is_none());
    }

    // The only test that touches ACCOUNTS_API_URL, so it owns the variable.
    #[test]
    fn from_env_reads_api_url_with_local_fallback() {
        std::env::remove_var(API_URL_ENV);
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.timeout.is_none());

        std::env::set_var(API_URL_ENV, "http://accounts.internal:9000");
        let config = ClientConfig::from_env();
        std::env::remove_var(API_URL_ENV);
        assert_eq!(config.base_url, "http://accounts.internal:9000");
    }

    #[test]
    fn with_timeout_sets_deadline() {
        let config = ClientConfig::new("http://api").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.base_url, "http://api");
    }
}
