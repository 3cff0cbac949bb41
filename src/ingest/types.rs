// src/ingest/types.rs
use anyhow::Result;

use crate::live::LiveMatch;

/// Anything that can hand over the current live matches with their signals.
/// Page scraping lives behind this seam, outside the scoring core.
#[async_trait::async_trait]
pub trait SignalProvider: Send + Sync {
    async fn fetch_live(&self) -> Result<Vec<LiveMatch>>;
    fn name(&self) -> &'static str;
}
