// src/live.rs
//! Live match snapshots as delivered by signal providers, and the
//! goalless-at-halftime gate that decides which ones get scored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::signals::MatchSignals;

static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})\s*[-:–]\s*(\d{1,2})\s*$").expect("score regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    NotStarted,
    FirstHalf,
    HalfTime,
    SecondHalf,
    Finished,
    Unknown,
}

impl MatchPhase {
    /// Lenient parse of feed status strings ("HT", "2H", "Half Time", ...).
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match s.as_str() {
            "ns" | "not started" | "scheduled" | "prematch" | "pre match" => Self::NotStarted,
            "1h" | "first half" | "1st half" | "live" => Self::FirstHalf,
            "ht" | "half time" | "halftime" | "break" => Self::HalfTime,
            "2h" | "second half" | "2nd half" => Self::SecondHalf,
            "ft" | "finished" | "full time" | "fulltime" | "aet" | "pen" => Self::Finished,
            _ => Self::Unknown,
        }
    }

    pub fn is_past_interval(&self) -> bool {
        matches!(self, Self::HalfTime | Self::SecondHalf)
    }
}

impl<'de> Deserialize<'de> for MatchPhase {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Self::parse(&s))
    }
}

fn default_phase() -> MatchPhase {
    MatchPhase::Unknown
}

fn default_score() -> String {
    "0-0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatch {
    #[serde(default)]
    pub id: Option<String>,
    pub home: String,
    pub away: String,
    /// Current score text as shown by the feed, e.g. "0-0".
    #[serde(default = "default_score")]
    pub score: String,
    #[serde(default)]
    pub halftime_score: Option<String>,
    #[serde(default = "default_phase", alias = "status")]
    pub phase: MatchPhase,
    #[serde(default)]
    pub minute: Option<u32>,
    #[serde(default)]
    pub signals: MatchSignals,
}

impl LiveMatch {
    /// Decode entities and collapse whitespace in team names.
    pub fn normalized(mut self) -> Self {
        self.home = normalize_team_name(&self.home);
        self.away = normalize_team_name(&self.away);
        self
    }

    /// Score at the interval, if known for this phase.
    pub fn interval_score(&self) -> Option<(u32, u32)> {
        match (&self.halftime_score, self.phase) {
            (Some(ht), _) => parse_score(ht),
            (None, MatchPhase::HalfTime) => parse_score(&self.score),
            _ => None,
        }
    }
}

/// "0-0", "1 : 2", "0–0" → `(home, away)`.
pub fn parse_score(raw: &str) -> Option<(u32, u32)> {
    let caps = SCORE_RE.captures(raw)?;
    let h = caps.get(1)?.as_str().parse().ok()?;
    let a = caps.get(2)?.as_str().parse().ok()?;
    Some((h, a))
}

pub fn normalize_team_name(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    WS_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// The situation we score: level at 0–0 when the teams went in at halftime.
pub fn is_goalless_at_halftime(m: &LiveMatch) -> bool {
    m.phase.is_past_interval() && m.interval_score() == Some((0, 0))
}
