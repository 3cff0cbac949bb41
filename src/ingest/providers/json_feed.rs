use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Deserialize;
use std::path::PathBuf;

use crate::ingest::types::SignalProvider;
use crate::live::LiveMatch;

/// Feeds come either as a bare array or wrapped as `{"matches": [...]}`.
/// Rows stay raw here so one malformed match cannot sink the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedBody {
    Bare(Vec<serde_json::Value>),
    Wrapped { matches: Vec<serde_json::Value> },
}

/// Live matches in the crate's JSON shape, from an inline string, a file, or a URL.
pub struct JsonFeedProvider {
    mode: Mode,
}

enum Mode {
    // Vlastní kopie, aby testy nepotřebovaly 'static.
    Fixture(String),
    File(PathBuf),
    Http { url: String, client: reqwest::Client },
}

impl JsonFeedProvider {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    /// Re-read on every fetch, so edits show up without a restart.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::File(path.into()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_matches_from_str(&self, s: &str) -> Result<Vec<LiveMatch>> {
        let t0 = std::time::Instant::now();
        let body: FeedBody = serde_json::from_str(s)
            .with_context(|| format!("parsing {} live feed json", self.name()))?;
        let rows = match body {
            FeedBody::Bare(v) => v,
            FeedBody::Wrapped { matches } => matches,
        };

        let mut out = Vec::with_capacity(rows.len());
        for (row, raw) in rows.into_iter().enumerate() {
            match serde_json::from_value::<LiveMatch>(raw) {
                Ok(m) => out.push(m),
                Err(e) => {
                    tracing::warn!(provider = self.name(), row, error = %e, "skipping malformed live match");
                    counter!("ingest_rows_rejected_total").increment(1);
                    continue;
                }
            }
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_matches_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SignalProvider for JsonFeedProvider {
    async fn fetch_live(&self) -> Result<Vec<LiveMatch>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_matches_from_str(s),
            Mode::File(path) => {
                let s = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading live fixture {}", path.display()))?;
                self.parse_matches_from_str(&s)
            }
            Mode::Http { url, client } => {
                let body = client
                    .get(url.as_str())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("live feed GET {url}"))?
                    .text()
                    .await
                    .context("live feed .text()")?;
                self.parse_matches_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.mode {
            Mode::Fixture(_) => "fixture",
            Mode::File(_) => "file",
            Mode::Http { .. } => "http_feed",
        }
    }
}
