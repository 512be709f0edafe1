use std::path::PathBuf;
use std::time::Duration;

/// Versions endpoint for the CPIH time-series edition.
pub const DEFAULT_CATALOG_URL: &str =
    "https://api.beta.ons.gov.uk/v1/datasets/cpih01/editions/time-series/versions";

/// Runtime settings. Every field can be overridden from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Catalog endpoint listing the published versions.
    pub catalog_url: String,
    /// Sent with every request; the download host rejects bare clients.
    pub user_agent: String,
    pub timeout: Duration,
    /// Attempts per request, including the first.
    pub max_retries: u32,
    /// Delay before the first retry; doubles after each failure.
    pub retry_delay: Duration,
    /// Where the last good download is kept. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            cache_dir: Some(PathBuf::from(".cpih-cache")),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparseable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            catalog_url: lookup("CPIH_CATALOG_URL").unwrap_or(default.catalog_url),
            user_agent: lookup("CPIH_USER_AGENT").unwrap_or(default.user_agent),
            timeout: parsed("CPIH_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.timeout),
            max_retries: parsed("CPIH_MAX_RETRIES")
                .and_then(|n| u32::try_from(n).ok())
                .filter(|&n| n > 0)
                .unwrap_or(default.max_retries),
            retry_delay: parsed("CPIH_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.retry_delay),
            cache_dir: match lookup("CPIH_CACHE_DIR") {
                Some(dir) if dir.trim().is_empty() => None,
                Some(dir) => Some(PathBuf::from(dir)),
                None => default.cache_dir,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("CPIH_CATALOG_URL", "http://localhost/versions"),
            ("CPIH_TIMEOUT_SECS", "5"),
            ("CPIH_MAX_RETRIES", "7"),
            ("CPIH_RETRY_DELAY_MS", "250"),
            ("CPIH_CACHE_DIR", "/tmp/cpih"),
        ]));
        assert_eq!(config.catalog_url, "http://localhost/versions");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cpih")));
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("CPIH_TIMEOUT_SECS", "soon"),
            ("CPIH_MAX_RETRIES", "0"),
            ("CPIH_CACHE_DIR", ""),
        ]));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.cache_dir, None);
    }
}
