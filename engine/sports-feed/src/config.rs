use crate::error::{FeedError, FeedResult};
use crate::DEFAULT_REQUEST_TIMEOUT_SECS;
use std::fmt;
use std::time::Duration;

/// Configuration for the feed refresh pipeline
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Upstream endpoints
    pub sources: SourceConfig,

    /// Refresh cadence
    pub scheduler: SchedulerConfig,
}

#[derive(Clone)]
pub struct SourceConfig {
    /// Endpoint returning `{"data": [team, ...]}`
    pub teams_url: String,

    /// Endpoint returning `{"data": [game, ...]}`
    pub games_url: String,

    /// Sent verbatim as the `Authorization` header when present
    pub auth_token: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    /// Seconds between refresh cycles; 0 disables periodic refresh
    pub update_interval_secs: u64,
}

// The token is a credential, keep it out of logs.
impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("teams_url", &self.teams_url)
            .field("games_url", &self.games_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl SourceConfig {
    /// Source URLs in fetch order: teams first, then games
    pub fn urls(&self) -> [&str; 2] {
        [&self.teams_url, &self.games_url]
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SchedulerConfig {
    /// `None` when periodic refresh is disabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.update_interval_secs > 0).then(|| Duration::from_secs(self.update_interval_secs))
    }
}

impl FeedConfig {
    pub fn new(teams_url: impl Into<String>, games_url: impl Into<String>) -> Self {
        Self {
            sources: SourceConfig {
                teams_url: teams_url.into(),
                games_url: games_url.into(),
                auth_token: None,
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            scheduler: SchedulerConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `TEAMS_URL` and `GAMES_URL` are required. `TEAMS_TOKEN` and
    /// `UPDATE_INTERVAL_SECONDS` are optional.
    pub fn from_env() -> FeedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> FeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let teams_url = lookup("TEAMS_URL")
            .ok_or_else(|| FeedError::config("TEAMS_URL is not set"))?;
        let games_url = lookup("GAMES_URL")
            .ok_or_else(|| FeedError::config("GAMES_URL is not set"))?;

        let mut config = Self::new(teams_url.trim(), games_url.trim());
        // An empty token means no Authorization header.
        config.sources.auth_token = lookup("TEAMS_TOKEN").filter(|token| !token.trim().is_empty());

        if let Some(interval) = lookup("UPDATE_INTERVAL_SECONDS") {
            let interval = interval.trim();
            if !interval.is_empty() {
                config.scheduler.update_interval_secs = interval.parse().map_err(|_| {
                    FeedError::config(format!(
                        "UPDATE_INTERVAL_SECONDS must be a non-negative integer, got {interval:?}"
                    ))
                })?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FeedResult<()> {
        for (name, url) in [("TEAMS_URL", &self.sources.teams_url), ("GAMES_URL", &self.sources.games_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(FeedError::config(format!("{name} must be an http(s) URL, got {url:?}")));
            }
        }

        // Both sources share one raw snapshot keyed by URL.
        if self.sources.teams_url == self.sources.games_url {
            return Err(FeedError::config("TEAMS_URL and GAMES_URL must differ"));
        }

        if self.sources.request_timeout_secs == 0 {
            return Err(FeedError::config("request timeout must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_disables_refresh() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("TEAMS_URL", "https://api.example.com/teams"),
            ("GAMES_URL", "https://api.example.com/games"),
        ]))
        .unwrap();

        assert_eq!(config.sources.urls(), ["https://api.example.com/teams", "https://api.example.com/games"]);
        assert_eq!(config.sources.auth_token, None);
        assert_eq!(config.sources.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.scheduler.refresh_interval(), None);
    }

    #[test]
    fn test_full_config() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("TEAMS_URL", "https://api.example.com/teams"),
            ("GAMES_URL", "https://api.example.com/games"),
            ("TEAMS_TOKEN", "secret"),
            ("UPDATE_INTERVAL_SECONDS", "300"),
        ]))
        .unwrap();

        assert_eq!(config.sources.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.scheduler.refresh_interval(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_zero_interval_disables_refresh() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("TEAMS_URL", "http://localhost/teams"),
            ("GAMES_URL", "http://localhost/games"),
            ("UPDATE_INTERVAL_SECONDS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.scheduler.refresh_interval(), None);
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = FeedConfig::from_lookup(lookup_from(&[("TEAMS_URL", "http://localhost/teams")]))
            .unwrap_err();
        assert!(matches!(err, FeedError::Config(msg) if msg.contains("GAMES_URL")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let base = [("TEAMS_URL", "http://localhost/teams"), ("GAMES_URL", "http://localhost/games")];

        let mut vars = base.to_vec();
        vars.push(("UPDATE_INTERVAL_SECONDS", "-5"));
        assert!(FeedConfig::from_lookup(lookup_from(&vars)).is_err());

        assert!(FeedConfig::from_lookup(lookup_from(&[
            ("TEAMS_URL", "ftp://localhost/teams"),
            ("GAMES_URL", "http://localhost/games"),
        ]))
        .is_err());

        assert!(FeedConfig::from_lookup(lookup_from(&[
            ("TEAMS_URL", "http://localhost/data"),
            ("GAMES_URL", "http://localhost/data"),
        ]))
        .is_err());
    }

    #[test]
    fn test_blank_token_means_no_auth() {
        for token in ["", "   "] {
            let config = FeedConfig::from_lookup(lookup_from(&[
                ("TEAMS_URL", "http://localhost/teams"),
                ("GAMES_URL", "http://localhost/games"),
                ("TEAMS_TOKEN", token),
            ]))
            .unwrap();
            assert_eq!(config.sources.auth_token, None);
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = FeedConfig::new("http://localhost/teams", "http://localhost/games");
        config.sources.auth_token = Some("secret".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
