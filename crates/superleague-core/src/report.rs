// Report assembly: fetch every league through a data source, then run the
// standings, week selection and highlight stages over the results.
//
// Each league is loaded independently and concurrently; a failure in one
// league or one week becomes an `Issue` on the report and never stops the
// others.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{HighlightScope, Issue};
use crate::highlights::{self, HighlightSet};
use crate::league::{LeagueRef, LeagueRegistry};
use crate::model::{parse_rosters, parse_users, LeagueInfo, PlatformState, TeamEntry};
use crate::normalize::normalize;
use crate::source::LeagueDataSource;
use crate::standings::{self, StandingsRow};
use crate::week::{self, WeekSelection, DEFAULT_COMPLETENESS_THRESHOLD, DEFAULT_LOOKBACK_WEEKS};

/// Tunables for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub completeness_threshold: f64,
    pub lookback_weeks: u32,
    /// Last week of the season that is ever probed for matchups.
    pub max_week: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            completeness_threshold: DEFAULT_COMPLETENESS_THRESHOLD,
            lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
            max_week: *crate::source::DEFAULT_SEASON_WEEKS.end(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Standings for one league. `rows` is `None` when the league's data could
/// not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueStandings {
    pub league: LeagueRef,
    pub info: Option<LeagueInfo>,
    pub rows: Option<Vec<StandingsRow>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyHighlights {
    pub selection: WeekSelection,
    pub highlights: HighlightSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonHighlights {
    /// Highlights cover weeks strictly before this one.
    pub before_week: Option<u32>,
    pub highlights: HighlightSet,
}

/// Everything the presentation layer needs for one refresh.
#[derive(Debug, Clone, Serialize)]
pub struct SuperLeagueReport {
    pub generated_at: DateTime<Utc>,
    pub platform: Option<PlatformState>,
    /// One entry per configured league, in hierarchy order.
    pub standings: Vec<LeagueStandings>,
    pub weekly: WeeklyHighlights,
    pub season: SeasonHighlights,
    pub issues: Vec<Issue>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Everything fetched and derived for a single league.
struct LeagueLoad {
    standings: LeagueStandings,
    entries: Vec<TeamEntry>,
    issues: Vec<Issue>,
}

/// Build a full report from `source` for every configured league in `registry`.
pub async fn build_report<S>(
    source: &S,
    registry: &LeagueRegistry,
    settings: &ReportSettings,
) -> SuperLeagueReport
where
    S: LeagueDataSource + ?Sized,
{
    let mut issues = Vec::new();

    for league in registry.missing() {
        warn!(league = %league.name, "league id not configured; skipping");
        issues.push(Issue::ConfigurationMissing {
            league: league.name.clone(),
        });
    }

    let platform = match source.fetch_platform_state().await {
        Ok(Some(state)) => Some(state),
        Ok(None) => {
            warn!("platform state response was empty");
            issues.push(Issue::FetchFailure {
                league: None,
                resource: "platform state".into(),
                week: None,
                message: "empty response".into(),
            });
            None
        }
        Err(e) => {
            warn!(error = %e, "platform state fetch failed");
            issues.push(Issue::fetch(None, "platform state", None, &e));
            None
        }
    };
    let current_week = platform.as_ref().map(|s| s.week);

    // Only weeks before the current one are ever reported.
    let season_weeks = current_week.map(|current| 1..=settings.max_week.min(current.saturating_sub(1)));

    let loads = join_all(
        registry
            .configured()
            .map(|league| load_league(source, league, season_weeks.clone())),
    )
    .await;

    let mut standings = Vec::with_capacity(loads.len());
    let mut entries = Vec::new();
    for load in loads {
        standings.push(load.standings);
        entries.extend(load.entries);
        issues.extend(load.issues);
    }

    let weekly = weekly_highlights(&entries, current_week, settings);
    if !weekly.selection.is_available() {
        issues.push(Issue::InsufficientData {
            scope: HighlightScope::Weekly,
        });
    }

    let season = SeasonHighlights {
        before_week: current_week,
        highlights: current_week
            .map(|w| highlights::highlights(&highlights::season_scope(&entries, w)))
            .unwrap_or_default(),
    };
    if season.highlights.is_empty() {
        issues.push(Issue::InsufficientData {
            scope: HighlightScope::Season,
        });
    }

    info!(
        leagues = standings.len(),
        entries = entries.len(),
        issues = issues.len(),
        "report assembled"
    );

    SuperLeagueReport {
        generated_at: Utc::now(),
        platform,
        standings,
        weekly,
        season,
        issues,
    }
}

fn weekly_highlights(
    entries: &[TeamEntry],
    current_week: Option<u32>,
    settings: &ReportSettings,
) -> WeeklyHighlights {
    let Some(current) = current_week else {
        return WeeklyHighlights {
            selection: WeekSelection::UNAVAILABLE,
            highlights: HighlightSet::default(),
        };
    };

    let candidates = week::candidate_weeks(current, settings.lookback_weeks);
    let by_week = week::group_by_week(entries.iter().map(|te| &te.entry));
    let selection = week::select(&candidates, &by_week, settings.completeness_threshold);

    let highlights = match selection.week {
        Some(w) => highlights::highlights(&highlights::week_scope(entries, w)),
        None => HighlightSet::default(),
    };

    if let Some(w) = selection.week {
        info!(week = w, provisional = selection.provisional, "selected highlight week");
    }

    WeeklyHighlights {
        selection,
        highlights,
    }
}

async fn load_league<S>(
    source: &S,
    league: &LeagueRef,
    season_weeks: Option<RangeInclusive<u32>>,
) -> LeagueLoad
where
    S: LeagueDataSource + ?Sized,
{
    let id = league.external_id.as_str();
    let name = league.name.as_str();
    let mut issues = Vec::new();

    let (info, rosters, users) = futures_util::join!(
        source.fetch_league_info(id),
        source.fetch_rosters(id),
        source.fetch_users(id),
    );

    let table_fetch_failed = info.is_err() || rosters.is_err();

    let info = match info {
        Ok(info) => info,
        Err(e) => {
            warn!(league = name, error = %e, "league info fetch failed");
            issues.push(Issue::fetch(Some(name), "league info", None, &e));
            None
        }
    };
    let rosters = match rosters {
        Ok(records) => parse_rosters(&records),
        Err(e) => {
            warn!(league = name, error = %e, "roster fetch failed");
            issues.push(Issue::fetch(Some(name), "rosters", None, &e));
            Vec::new()
        }
    };
    let users = match users {
        Ok(records) => parse_users(&records),
        Err(e) => {
            warn!(league = name, error = %e, "user fetch failed");
            issues.push(Issue::fetch(Some(name), "users", None, &e));
            Vec::new()
        }
    };

    // A table needs both the league record and its rosters. A failed fetch
    // of either already explains a missing table.
    let rows = if info.is_some() && !rosters.is_empty() {
        Some(standings::rank(
            &rosters,
            &users,
            league.hierarchy_index,
            league.total_leagues,
        ))
    } else {
        if !table_fetch_failed {
            issues.push(Issue::FetchFailure {
                league: Some(name.to_string()),
                resource: "standings".into(),
                week: None,
                message: "league info or rosters missing".into(),
            });
        }
        None
    };

    let mut entries = Vec::new();
    if let Some(weeks) = season_weeks {
        let fetch = source.fetch_matchups(id, None, weeks).await;
        for (week, e) in &fetch.failures {
            issues.push(Issue::fetch(Some(name), "matchups", Some(*week), e));
        }

        let names = standings::team_names(&rosters, &users);
        entries = normalize(id, &fetch.records, 0)
            .into_iter()
            .map(|entry| TeamEntry {
                team_name: names
                    .get(&entry.roster_id)
                    .cloned()
                    .unwrap_or_else(|| standings::default_team_name(entry.roster_id)),
                league_name: league.name.clone(),
                entry,
            })
            .collect();
    }

    info!(
        league = name,
        rosters = rosters.len(),
        entries = entries.len(),
        "league loaded"
    );

    LeagueLoad {
        standings: LeagueStandings {
            league: league.clone(),
            info,
            rows,
        },
        entries,
        issues,
    }
}
