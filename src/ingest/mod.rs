// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::SignalProvider;
use crate::live::LiveMatch;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;

/// Two feeds name the same fixture when both team names are at least this similar.
pub const SAME_TEAM_SIMILARITY: f64 = 0.92;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_matches_total", "Total matches parsed from providers.");
        describe_counter!(
            "ingest_duplicates_total",
            "Matches dropped because an earlier provider already reported them."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_counter!(
            "ingest_rows_rejected_total",
            "Feed rows skipped because they did not parse as a live match."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "ingest_last_run_ts",
            "Unix ts when the ingest pass last ran."
        );
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub matches: Vec<LiveMatch>,
    pub duplicates: usize,
    pub errors: usize,
    pub fetched_at: i64,
}

fn name_key(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Same fixture reported by two feeds ("Man Utd" vs "Manchester Utd", ...).
/// Ids decide when both sides carry one; names only fill in when an id is missing.
pub fn same_fixture(a: &LiveMatch, b: &LiveMatch) -> bool {
    if let (Some(x), Some(y)) = (&a.id, &b.id) {
        return x == y;
    }
    let sim = |x: &str, y: &str| strsim::jaro_winkler(&name_key(x), &name_key(y));
    sim(&a.home, &b.home) >= SAME_TEAM_SIMILARITY && sim(&a.away, &b.away) >= SAME_TEAM_SIMILARITY
}

/// Normalize names, drop nameless entries and repeats; earlier entries win.
pub fn normalize_and_merge(raw: Vec<LiveMatch>) -> (Vec<LiveMatch>, usize) {
    let mut keep: Vec<LiveMatch> = Vec::with_capacity(raw.len());
    let mut dup = 0usize;
    for m in raw.into_iter().map(LiveMatch::normalized) {
        if m.home.is_empty() || m.away.is_empty() {
            dup += 1;
            continue;
        }
        if keep.iter().any(|k| same_fixture(k, &m)) {
            dup += 1;
            continue;
        }
        keep.push(m);
    }
    (keep, dup)
}

/// Run every provider once, in priority order. Failures are logged and counted,
/// never propagated.
pub async fn run_once(providers: &[Box<dyn SignalProvider>]) -> IngestReport {
    ensure_metrics_described();

    let mut raw = Vec::new();
    let mut errors = 0usize;
    for p in providers {
        match p.fetch_live().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                errors += 1;
            }
        }
    }

    let (matches, duplicates) = normalize_and_merge(raw);
    let now = chrono::Utc::now().timestamp();

    counter!("ingest_duplicates_total").increment(duplicates as u64);
    gauge!("ingest_last_run_ts").set(now as f64);

    IngestReport {
        matches,
        duplicates,
        errors,
        fetched_at: now,
    }
}
