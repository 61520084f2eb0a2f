pub mod analysis;
pub mod chat;
pub mod dashboard;
pub mod domain;
pub mod market;
pub mod views;

pub mod config {
    use anyhow::Context;
    use std::time::Duration;

    use crate::analysis::trend::TrendWindows;

    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
    pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
        pub yahoo_base_url: String,
        pub coingecko_base_url: String,
        pub coingecko_api_key: Option<String>,
        pub http_timeout: Duration,
        pub trend_windows: TrendWindows,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup so tests don't have to touch the process env.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

            let port = match non_empty("PORT") {
                Some(s) => s
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {s})"))?,
                None => DEFAULT_PORT,
            };

            let http_timeout_secs = non_empty("HTTP_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

            let defaults = TrendWindows::default();
            let short = non_empty("TREND_SHORT_WINDOW")
                .map(|s| s.trim().parse::<usize>())
                .transpose()
                .context("TREND_SHORT_WINDOW must be a positive integer")?
                .unwrap_or(defaults.short);
            let long = non_empty("TREND_LONG_WINDOW")
                .map(|s| s.trim().parse::<usize>())
                .transpose()
                .context("TREND_LONG_WINDOW must be a positive integer")?
                .unwrap_or(defaults.long);

            Ok(Self {
                port,
                sentry_dsn: non_empty("SENTRY_DSN"),
                yahoo_base_url: non_empty("YAHOO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
                coingecko_base_url: non_empty("COINGECKO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_COINGECKO_BASE_URL.to_string()),
                coingecko_api_key: non_empty("COINGECKO_API_KEY"),
                http_timeout: Duration::from_secs(http_timeout_secs),
                trend_windows: TrendWindows::new(short, long)?,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |key: &str| map.get(key).cloned()
        }

        #[test]
        fn defaults_when_env_is_empty() {
            let settings = Settings::from_lookup(|_| None).unwrap();
            assert_eq!(settings.port, 5000);
            assert_eq!(settings.yahoo_base_url, DEFAULT_YAHOO_BASE_URL);
            assert_eq!(settings.coingecko_base_url, DEFAULT_COINGECKO_BASE_URL);
            assert!(settings.coingecko_api_key.is_none());
            assert_eq!(settings.http_timeout, Duration::from_secs(30));
            assert_eq!(settings.trend_windows, TrendWindows::default());
        }

        #[test]
        fn port_and_windows_are_overridable() {
            let settings = Settings::from_lookup(lookup_from(&[
                ("PORT", "8080"),
                ("TREND_SHORT_WINDOW", "3"),
                ("TREND_LONG_WINDOW", "7"),
                ("COINGECKO_API_KEY", "  "),
            ]))
            .unwrap();
            assert_eq!(settings.port, 8080);
            assert_eq!(settings.trend_windows.short, 3);
            assert_eq!(settings.trend_windows.long, 7);
            assert!(settings.coingecko_api_key.is_none());
        }

        #[test]
        fn rejects_bad_port_and_inverted_windows() {
            assert!(Settings::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
            assert!(Settings::from_lookup(lookup_from(&[
                ("TREND_SHORT_WINDOW", "12"),
                ("TREND_LONG_WINDOW", "10"),
            ]))
            .is_err());
        }
    }
}
