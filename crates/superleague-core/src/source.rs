// The data-source seam between the engine and the platform fetch layer.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::FetchError;
use crate::model::{LeagueInfo, PlatformState};
use crate::normalize::tag_week;

/// Week range probed when a whole season of matchups is requested.
pub const DEFAULT_SEASON_WEEKS: RangeInclusive<u32> = 1..=18;

/// Matchup records gathered for one league, plus the weeks that failed.
#[derive(Debug, Default)]
pub struct MatchupFetch {
    /// Records from every successful week, each tagged with its week.
    pub records: Vec<Value>,
    pub failures: Vec<(u32, FetchError)>,
}

/// Read access to the fantasy platform.
///
/// Implementations own transport, caching and timeouts. A `null` response
/// body is reported as `Ok(None)` / an empty list rather than an error.
#[async_trait]
pub trait LeagueDataSource: Send + Sync {
    async fn fetch_league_info(&self, league_id: &str) -> Result<Option<LeagueInfo>, FetchError>;

    async fn fetch_rosters(&self, league_id: &str) -> Result<Vec<Value>, FetchError>;

    async fn fetch_users(&self, league_id: &str) -> Result<Vec<Value>, FetchError>;

    /// Raw matchup records for a single week.
    async fn fetch_week_matchups(&self, league_id: &str, week: u32)
        -> Result<Vec<Value>, FetchError>;

    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, FetchError>;

    /// Matchups for one week, or for every week in `season_weeks` when `week`
    /// is `None`.
    ///
    /// Records are tagged with the week they were fetched for unless they
    /// already carry one. A failing week is recorded in
    /// [`MatchupFetch::failures`] and the remaining weeks are still fetched.
    async fn fetch_matchups(
        &self,
        league_id: &str,
        week: Option<u32>,
        season_weeks: RangeInclusive<u32>,
    ) -> MatchupFetch {
        let weeks = match week {
            Some(w) => w..=w,
            None => season_weeks,
        };

        let mut fetch = MatchupFetch::default();
        for w in weeks {
            match self.fetch_week_matchups(league_id, w).await {
                Ok(mut records) => {
                    tag_week(&mut records, w);
                    fetch.records.extend(records);
                }
                Err(e) => {
                    warn!(league_id, week = w, error = %e, "matchup fetch failed");
                    fetch.failures.push((w, e));
                }
            }
        }
        fetch
    }
}
