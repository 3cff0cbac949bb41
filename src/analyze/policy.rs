//! Scoring policy: every weight, reference cap, clamp bound and label cut-off
//! used by the three stages and the stake ladder.
//!
//! Defaults are the canonical weighting scheme. A TOML file may override any
//! subset; missing sections/fields keep their defaults.
//!
//! TOML shape (all optional):
//! ```toml
//! [prematch]
//! over05_weight = 0.6
//! favorite_weight = 0.4
//! bounds = { lower = 0.05, upper = 0.95 }
//! thresholds = [0.80, 0.75, 0.70, 0.60]
//!
//! [halftime.volume]
//! shots_cap = 8.0
//!
//! [stake]
//! top_pick = 0.20
//! ```
//!
//! `HotReloadPolicy::current()` checks the file's mtime and reloads if changed.

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

pub const DEFAULT_POLICY_PATH: &str = "config/scoring.toml";
pub const ENV_POLICY_PATH: &str = "SCORING_CONFIG_PATH";

// --- Stage-1 defaults ---
pub const PRE_OVER05_WEIGHT: f64 = 0.60;
pub const PRE_FAVORITE_WEIGHT: f64 = 0.40;
pub const PRE_BOUNDS: Bounds = Bounds::new(0.05, 0.95);
pub const PRE_THRESHOLDS: [f64; 4] = [0.80, 0.75, 0.70, 0.60];

// --- Stage-2 defaults ---
pub const HT_C1_WEIGHT: f64 = 0.30;
pub const HT_VOLUME_WEIGHT: f64 = 0.45;
pub const HT_QUALITY_WEIGHT: f64 = 0.15;
pub const HT_ALIGNMENT_WEIGHT: f64 = 0.10;
pub const HT_SHOTS_CAP: f64 = 8.0;
pub const HT_SOT_CAP: f64 = 5.0;
pub const HT_XG_CAP: f64 = 1.6;
pub const HT_VOLUME_SHOTS_WEIGHT: f64 = 0.40;
pub const HT_VOLUME_SOT_WEIGHT: f64 = 0.35;
pub const HT_VOLUME_XG_WEIGHT: f64 = 0.25;
/// xG per shot on target at which quality starts to count.
pub const HT_QUALITY_FLOOR: f64 = 0.10;
/// Width of the xG-per-SoT band mapped onto quality 0..1.
pub const HT_QUALITY_SPAN: f64 = 0.20;
pub const HT_ALIGNMENT_NEUTRAL: f64 = 0.5;
pub const HT_ALIGNMENT_TOLERANCE: f64 = 0.30;
pub const HT_BOUNDS: Bounds = Bounds::new(0.05, 0.90);
pub const HT_THRESHOLDS: [f64; 4] = [0.80, 0.75, 0.70, 0.60];

// --- Stage-3 defaults ---
pub const POST_C1_WEIGHT: f64 = 0.5;
pub const POST_C2_WEIGHT: f64 = 0.5;
pub const POST_SHOTS_WEIGHT: f64 = 0.1;
pub const POST_SOT_WEIGHT: f64 = 0.2;
pub const POST_XG_WEIGHT: f64 = 0.7;
pub const POST_RISK_LIMIT: f64 = 40.0;
pub const POST_PENALTY: f64 = 0.10;
pub const POST_BOUNDS: Bounds = Bounds::new(0.05, 0.92);
pub const POST_THRESHOLDS: [f64; 4] = [0.85, 0.80, 0.75, 0.70];

// --- Stake ladder defaults (fractions of bankroll) ---
pub const STAKE_TOP_PICK: f64 = 0.20;
pub const STAKE_BET_NOW: f64 = 0.15;
pub const STAKE_SMALL: f64 = 0.10;
pub const STAKE_BORDERLINE: f64 = 0.05;
pub const STAKE_EXCEPTION: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreMatchPolicy {
    pub over05_weight: f64,
    pub favorite_weight: f64,
    pub bounds: Bounds,
    pub thresholds: [f64; 4],
}

impl Default for PreMatchPolicy {
    fn default() -> Self {
        Self {
            over05_weight: PRE_OVER05_WEIGHT,
            favorite_weight: PRE_FAVORITE_WEIGHT,
            bounds: PRE_BOUNDS,
            thresholds: PRE_THRESHOLDS,
        }
    }
}

/// Reference caps and mix for the halftime activity-intensity term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeMix {
    pub shots_cap: f64,
    pub sot_cap: f64,
    pub xg_cap: f64,
    pub shots_weight: f64,
    pub sot_weight: f64,
    pub xg_weight: f64,
}

impl Default for VolumeMix {
    fn default() -> Self {
        Self {
            shots_cap: HT_SHOTS_CAP,
            sot_cap: HT_SOT_CAP,
            xg_cap: HT_XG_CAP,
            shots_weight: HT_VOLUME_SHOTS_WEIGHT,
            sot_weight: HT_VOLUME_SOT_WEIGHT,
            xg_weight: HT_VOLUME_XG_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalftimePolicy {
    pub c1_weight: f64,
    pub volume_weight: f64,
    pub quality_weight: f64,
    pub alignment_weight: f64,
    pub volume: VolumeMix,
    pub quality_floor: f64,
    pub quality_span: f64,
    pub alignment_neutral: f64,
    pub alignment_tolerance: f64,
    pub bounds: Bounds,
    pub thresholds: [f64; 4],
}

impl Default for HalftimePolicy {
    fn default() -> Self {
        Self {
            c1_weight: HT_C1_WEIGHT,
            volume_weight: HT_VOLUME_WEIGHT,
            quality_weight: HT_QUALITY_WEIGHT,
            alignment_weight: HT_ALIGNMENT_WEIGHT,
            volume: VolumeMix::default(),
            quality_floor: HT_QUALITY_FLOOR,
            quality_span: HT_QUALITY_SPAN,
            alignment_neutral: HT_ALIGNMENT_NEUTRAL,
            alignment_tolerance: HT_ALIGNMENT_TOLERANCE,
            bounds: HT_BOUNDS,
            thresholds: HT_THRESHOLDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostIntervalPolicy {
    pub c1_weight: f64,
    pub c2_weight: f64,
    pub shots_weight: f64,
    pub sot_weight: f64,
    pub xg_weight: f64,
    /// Risk flag at or above this triggers the penalty.
    pub risk_limit: f64,
    pub penalty: f64,
    pub bounds: Bounds,
    pub thresholds: [f64; 4],
}

impl Default for PostIntervalPolicy {
    fn default() -> Self {
        Self {
            c1_weight: POST_C1_WEIGHT,
            c2_weight: POST_C2_WEIGHT,
            shots_weight: POST_SHOTS_WEIGHT,
            sot_weight: POST_SOT_WEIGHT,
            xg_weight: POST_XG_WEIGHT,
            risk_limit: POST_RISK_LIMIT,
            penalty: POST_PENALTY,
            bounds: POST_BOUNDS,
            thresholds: POST_THRESHOLDS,
        }
    }
}

/// Fractions of bankroll per recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakePolicy {
    pub top_pick: f64,
    pub bet_now: f64,
    pub small_stake: f64,
    pub borderline: f64,
    /// Manual override fraction (`force_exception`).
    pub exception: f64,
}

impl Default for StakePolicy {
    fn default() -> Self {
        Self {
            top_pick: STAKE_TOP_PICK,
            bet_now: STAKE_BET_NOW,
            small_stake: STAKE_SMALL,
            borderline: STAKE_BORDERLINE,
            exception: STAKE_EXCEPTION,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub prematch: PreMatchPolicy,
    pub halftime: HalftimePolicy,
    pub post_interval: PostIntervalPolicy,
    pub stake: StakePolicy,
}

impl ScoringPolicy {
    /// Parse and validate a TOML policy.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let policy: ScoringPolicy = toml::from_str(s).context("parsing scoring policy TOML")?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring policy from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Reject policies that would break the output invariants.
    pub fn validate(&self) -> anyhow::Result<()> {
        let pre = &self.prematch;
        let ht = &self.halftime;
        let post = &self.post_interval;
        let st = &self.stake;

        let scalars = [
            ("prematch.over05_weight", pre.over05_weight),
            ("prematch.favorite_weight", pre.favorite_weight),
            ("halftime.c1_weight", ht.c1_weight),
            ("halftime.volume_weight", ht.volume_weight),
            ("halftime.quality_weight", ht.quality_weight),
            ("halftime.alignment_weight", ht.alignment_weight),
            ("halftime.volume.shots_cap", ht.volume.shots_cap),
            ("halftime.volume.sot_cap", ht.volume.sot_cap),
            ("halftime.volume.xg_cap", ht.volume.xg_cap),
            ("halftime.volume.shots_weight", ht.volume.shots_weight),
            ("halftime.volume.sot_weight", ht.volume.sot_weight),
            ("halftime.volume.xg_weight", ht.volume.xg_weight),
            ("halftime.quality_floor", ht.quality_floor),
            ("halftime.quality_span", ht.quality_span),
            ("halftime.alignment_neutral", ht.alignment_neutral),
            ("halftime.alignment_tolerance", ht.alignment_tolerance),
            ("post_interval.c1_weight", post.c1_weight),
            ("post_interval.c2_weight", post.c2_weight),
            ("post_interval.shots_weight", post.shots_weight),
            ("post_interval.sot_weight", post.sot_weight),
            ("post_interval.xg_weight", post.xg_weight),
            ("post_interval.risk_limit", post.risk_limit),
            ("post_interval.penalty", post.penalty),
        ];
        for (name, v) in scalars {
            if !v.is_finite() {
                bail!("{name} must be finite, got {v}");
            }
        }
        if ht.quality_span <= 0.0 {
            bail!("halftime.quality_span must be > 0");
        }
        if ht.alignment_tolerance <= 0.0 {
            bail!("halftime.alignment_tolerance must be > 0");
        }

        check_stage("prematch", &pre.bounds, &pre.thresholds)?;
        check_stage("halftime", &ht.bounds, &ht.thresholds)?;
        check_stage("post_interval", &post.bounds, &post.thresholds)?;

        let ladder = [st.borderline, st.small_stake, st.bet_now, st.top_pick];
        for (name, f) in [
            ("stake.borderline", st.borderline),
            ("stake.small_stake", st.small_stake),
            ("stake.bet_now", st.bet_now),
            ("stake.top_pick", st.top_pick),
            ("stake.exception", st.exception),
        ] {
            if !(0.0..=1.0).contains(&f) {
                bail!("{name} must lie in [0, 1], got {f}");
            }
        }
        if ladder.windows(2).any(|w| w[0] > w[1]) {
            bail!("stake fractions must be non-decreasing from borderline to top_pick");
        }
        Ok(())
    }
}

fn check_stage(stage: &str, b: &Bounds, thresholds: &[f64; 4]) -> anyhow::Result<()> {
    if !(b.lower.is_finite() && b.upper.is_finite()) {
        return Err(anyhow!("{stage}.bounds must be finite"));
    }
    if !(0.0 <= b.lower && b.lower < b.upper && b.upper <= 1.0) {
        bail!(
            "{stage}.bounds must satisfy 0 <= lower < upper <= 1 (got {} .. {})",
            b.lower,
            b.upper
        );
    }
    if thresholds.iter().any(|t| !t.is_finite()) {
        bail!("{stage}.thresholds must be finite");
    }
    if thresholds.windows(2).any(|w| w[0] <= w[1]) {
        bail!("{stage}.thresholds must be strictly descending, got {thresholds:?}");
    }
    Ok(())
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadPolicy {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    policy: ScoringPolicy,
    last_modified: Option<SystemTime>,
}

impl HotReloadPolicy {
    /// Create with a path (defaults to `$SCORING_CONFIG_PATH` or "config/scoring.toml").
    pub fn new(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(ENV_POLICY_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_POLICY_PATH))
        });
        Self {
            path,
            inner: RwLock::new(State {
                policy: ScoringPolicy::default(),
                last_modified: None,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest good policy, reloading if the file changed.
    pub fn current(&self) -> ScoringPolicy {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(m) => m,
            // No file: keep whatever we have (defaults at first).
            Err(_) => return self.read().policy,
        };

        if self.read().last_modified == Some(mtime) {
            return self.read().policy;
        }

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        // Double-check in case of races.
        if guard.last_modified != Some(mtime) {
            match ScoringPolicy::load_from_file(&self.path) {
                Ok(p) => {
                    tracing::info!(path = %self.path.display(), "scoring policy loaded");
                    guard.policy = p;
                }
                Err(e) => {
                    let error = format!("{e:#}");
                    tracing::warn!(
                        path = %self.path.display(),
                        %error,
                        "invalid scoring policy; keeping previous"
                    );
                }
            }
            // Remember the mtime either way so a bad file is not re-parsed on every call.
            guard.last_modified = Some(mtime);
        }
        guard.policy
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("policy_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_are_valid() {
        ScoringPolicy::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let p = ScoringPolicy::from_toml_str(
            r#"
            [halftime.volume]
            shots_cap = 10.0

            [stake]
            top_pick = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(p.halftime.volume.shots_cap, 10.0);
        assert_eq!(p.halftime.volume.sot_cap, HT_SOT_CAP);
        assert_eq!(p.stake.top_pick, 0.25);
        assert_eq!(p.stake.bet_now, STAKE_BET_NOW);
        assert_eq!(p.prematch, PreMatchPolicy::default());
    }

    #[test]
    fn rejects_non_descending_thresholds() {
        let err = ScoringPolicy::from_toml_str(
            r#"
            [post_interval]
            thresholds = [0.85, 0.85, 0.75, 0.70]
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("strictly descending"));
    }

    #[test]
    fn rejects_bounds_outside_unit_interval() {
        let err = ScoringPolicy::from_toml_str(
            r#"
            [prematch]
            bounds = { lower = 0.5, upper = 1.5 }
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("prematch.bounds"));
    }

    #[test]
    fn rejects_decreasing_stake_ladder() {
        let err = ScoringPolicy::from_toml_str(
            r#"
            [stake]
            bet_now = 0.30
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("non-decreasing"));
    }

    #[test]
    fn loads_and_hot_reloads() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("scoring.toml");

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[post_interval]\npenalty = 0.2\n").unwrap();
            f.sync_all().unwrap();
        }

        let hot = HotReloadPolicy::new(Some(&path));
        assert_eq!(hot.current().post_interval.penalty, 0.2);

        // Ensure different mtime (coarse filesystem granularity).
        thread::sleep(Duration::from_millis(1100));

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[post_interval]\npenalty = 0.15\n").unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current().post_interval.penalty, 0.15);

        thread::sleep(Duration::from_millis(1100));

        // Broken file keeps the last good policy.
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "[post_interval]\npenalty = \"lots\"\n").unwrap();
            f.sync_all().unwrap();
        }
        assert_eq!(hot.current().post_interval.penalty, 0.15);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let hot = HotReloadPolicy::new(Some(Path::new("definitely/not/here.toml")));
        assert_eq!(hot.current(), ScoringPolicy::default());
    }
}
