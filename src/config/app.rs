// src/config/app.rs
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::{env, path::PathBuf};

use crate::analyze::policy::{DEFAULT_POLICY_PATH, ENV_POLICY_PATH};
use crate::stake::{Bankroll, DEFAULT_BANKROLL, DEFAULT_CURRENCY};

pub const ENV_BANKROLL: &str = "BANKROLL";
pub const ENV_CURRENCY: &str = "STAKE_CURRENCY";
pub const ENV_LIVE_FIXTURE_PATH: &str = "LIVE_FIXTURE_PATH";
pub const ENV_LIVE_FEED_URL: &str = "LIVE_FEED_URL";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

pub const DEFAULT_LIVE_FIXTURE_PATH: &str = "config/live_fixture.json";

/// Process-wide settings. Read once at startup; nothing here changes afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub bankroll: Bankroll,
    pub currency: String,
    pub policy_path: PathBuf,
    pub live_fixture_path: PathBuf,
    pub live_feed_url: Option<String>,
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bankroll: Bankroll::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            policy_path: PathBuf::from(DEFAULT_POLICY_PATH),
            live_fixture_path: PathBuf::from(DEFAULT_LIVE_FIXTURE_PATH),
            live_feed_url: None,
            metrics_enabled: false,
        }
    }
}

impl AppConfig {
    /// Build from the process environment (call `dotenvy::dotenv()` first if wanted).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Same as `from_env`, with an injectable lookup for tests.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bankroll = match non_empty(ENV_BANKROLL) {
            Some(raw) => {
                let v: f64 = raw
                    .parse()
                    .with_context(|| format!("{ENV_BANKROLL}={raw:?} is not a number"))?;
                Bankroll::new(v).map_err(|e| anyhow!("{ENV_BANKROLL}: {e}"))?
            }
            None => Bankroll::new(DEFAULT_BANKROLL)?,
        };

        Ok(Self {
            bankroll,
            currency: non_empty(ENV_CURRENCY).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            policy_path: non_empty(ENV_POLICY_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_POLICY_PATH)),
            live_fixture_path: non_empty(ENV_LIVE_FIXTURE_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LIVE_FIXTURE_PATH)),
            live_feed_url: non_empty(ENV_LIVE_FEED_URL),
            metrics_enabled: non_empty(ENV_METRICS_ENABLED).is_some_and(|v| v == "1"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let m: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| m.get(k).cloned())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let c = cfg(&[]).unwrap();
        assert_eq!(c.bankroll.amount(), 500.0);
        assert_eq!(c.currency, "EUR");
        assert_eq!(c.policy_path, PathBuf::from("config/scoring.toml"));
        assert!(c.live_feed_url.is_none());
        assert!(!c.metrics_enabled);
    }

    #[test]
    fn overrides_are_applied() {
        let c = cfg(&[
            ("BANKROLL", "1200"),
            ("STAKE_CURRENCY", "GBP"),
            ("LIVE_FEED_URL", "http://localhost:9000/live"),
            ("METRICS_ENABLED", "1"),
        ])
        .unwrap();
        assert_eq!(c.bankroll.amount(), 1200.0);
        assert_eq!(c.currency, "GBP");
        assert_eq!(c.live_feed_url.as_deref(), Some("http://localhost:9000/live"));
        assert!(c.metrics_enabled);
    }

    #[test]
    fn bad_bankroll_fails_fast() {
        assert!(cfg(&[("BANKROLL", "0")]).is_err());
        assert!(cfg(&[("BANKROLL", "-10")]).is_err());
        assert!(cfg(&[("BANKROLL", "lots")]).is_err());
    }
}
