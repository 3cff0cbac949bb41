// tests/ingest_pipeline.rs
//
// run_once over several providers: priority order, error counting,
// cross-feed duplicate merge and name normalization.

use anyhow::Result;
use async_trait::async_trait;

use halftime_edge::ingest::{self, providers::JsonFeedProvider, types::SignalProvider};
use halftime_edge::live::{LiveMatch, MatchPhase};
use halftime_edge::MatchSignals;

struct Mock {
    name: &'static str,
    matches: Vec<LiveMatch>,
}

impl Mock {
    fn new(name: &'static str, matches: Vec<LiveMatch>) -> Self {
        Self { name, matches }
    }
}

#[async_trait]
impl SignalProvider for Mock {
    async fn fetch_live(&self) -> Result<Vec<LiveMatch>> {
        Ok(self.matches.clone())
    }
    fn name(&self) -> &'static str {
        self.name
    }
}

struct Broken;

#[async_trait]
impl SignalProvider for Broken {
    async fn fetch_live(&self) -> Result<Vec<LiveMatch>> {
        Err(anyhow::anyhow!("connection refused"))
    }
    fn name(&self) -> &'static str {
        "broken"
    }
}

fn m(id: Option<&str>, home: &str, away: &str, minute: u32) -> LiveMatch {
    LiveMatch {
        id: id.map(str::to_string),
        home: home.into(),
        away: away.into(),
        score: "0-0".into(),
        halftime_score: None,
        phase: MatchPhase::HalfTime,
        minute: Some(minute),
        signals: MatchSignals::default(),
    }
}

#[tokio::test]
async fn empty_provider_list_gives_empty_report() {
    let report = ingest::run_once(&[]).await;
    assert!(report.matches.is_empty());
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.errors, 0);
    assert!(report.fetched_at > 0);
}

#[tokio::test]
async fn errors_are_counted_and_other_providers_still_run() {
    let providers: Vec<Box<dyn SignalProvider>> = vec![
        Box::new(Broken),
        Box::new(Mock::new("primary", vec![m(None, "Alpha", "Beta", 45)])),
        Box::new(Broken),
    ];
    let report = ingest::run_once(&providers).await;
    assert_eq!(report.errors, 2);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].home, "Alpha");
}

#[tokio::test]
async fn earlier_provider_wins_on_duplicates() {
    let primary = Mock::new(
        "primary",
        vec![
            m(Some("f-1"), "Bayern München", "Borussia Dortmund", 45),
            m(None, "Ajax", "Feyenoord", 45),
        ],
    );
    let secondary = Mock::new(
        "secondary",
        vec![
            // same fixture, transliterated name
            m(None, "Bayern Munchen", "Borussia  Dortmund", 46),
            // same id, different spelling entirely
            m(Some("f-1"), "FCB", "BVB", 47),
            m(None, "Celtic", "Rangers", 45),
        ],
    );
    let providers: Vec<Box<dyn SignalProvider>> = vec![Box::new(primary), Box::new(secondary)];

    let report = ingest::run_once(&providers).await;
    assert_eq!(report.duplicates, 2);
    let homes: Vec<&str> = report.matches.iter().map(|x| x.home.as_str()).collect();
    assert_eq!(homes, vec!["Bayern München", "Ajax", "Celtic"]);
    assert_eq!(report.matches[0].minute, Some(45));
}

#[tokio::test]
async fn names_are_normalized_and_nameless_rows_dropped() {
    let providers: Vec<Box<dyn SignalProvider>> = vec![Box::new(Mock::new(
        "feed",
        vec![
            m(None, "  Atl&eacute;tico   Sample ", "Harbour\tTown", 45),
            m(None, "   ", "Nobody", 45),
        ],
    ))];
    let report = ingest::run_once(&providers).await;
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].home, "Atlético Sample");
    assert_eq!(report.matches[0].away, "Harbour Town");
    assert_eq!(report.duplicates, 1);
}

#[tokio::test]
async fn distinct_ids_survive_similar_names() {
    let providers: Vec<Box<dyn SignalProvider>> = vec![Box::new(Mock::new(
        "youth",
        vec![
            m(Some("fx-1"), "Manchester City U21", "Chelsea U21", 45),
            m(Some("fx-2"), "Manchester City U23", "Chelsea U23", 45),
        ],
    ))];
    let report = ingest::run_once(&providers).await;
    assert_eq!(report.duplicates, 0);
    let ids: Vec<&str> = report
        .matches
        .iter()
        .filter_map(|x| x.id.as_deref())
        .collect();
    assert_eq!(ids, vec!["fx-1", "fx-2"]);
}

#[tokio::test]
async fn one_bad_feed_row_does_not_drop_the_feed() {
    let feed = r#"[
        {"id":"nl-1","home":"Ajax","away":"PSV","score":"0-0","status":"HT"},
        {"id":"nl-2","home":"Feyenoord","away":"AZ","halftime_stats":{"xg":null}}
    ]"#;
    let providers: Vec<Box<dyn SignalProvider>> =
        vec![Box::new(JsonFeedProvider::from_fixture_str(feed))];
    let report = ingest::run_once(&providers).await;
    assert_eq!(report.errors, 0);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].home, "Ajax");
}
