use std::time::Duration;

/// Backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "NAVRANK_API_BASE";

/// Connection settings for the ranking backend.
///
/// `request_timeout` bounds plain request/response calls; large sector queries
/// can take a while, hence the generous default. `stream_timeout` is the hard
/// ceiling on a push channel reaching a terminal event and exists mostly so
/// tests can shrink it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub stream_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            stream_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl ClientConfig {
    /// Resolve the backend address from the environment, falling back to the
    /// default when the variable is unset or blank.
    pub fn from_env() -> Self {
        let base = std::env::var(BASE_URL_ENV).ok();
        Self {
            base_url: resolve_base_url(base),
            ..Self::default()
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: resolve_base_url(Some(base_url.into())),
            ..Self::default()
        }
    }
}

/// An explicitly supplied address wins over the default; blank counts as unset.
pub fn resolve_base_url(supplied: Option<String>) -> String {
    match supplied {
        Some(url) if !url.trim().is_empty() => {
            url.trim_end_matches('/').to_string()
        }
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.stream_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn supplied_base_wins() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.com/".into())),
            "https://api.example.com"
        );
    }

    #[test]
    fn blank_base_falls_back() {
        assert_eq!(resolve_base_url(Some("   ".into())), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
    }
}
