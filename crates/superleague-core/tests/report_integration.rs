// Integration tests for report assembly.
//
// A fake data source serves canned platform payloads so the whole pipeline
// (normalization, standings, week selection, highlights and issue collection)
// runs through the library's public API.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use superleague_core::error::{FetchError, HighlightScope, Issue};
use superleague_core::league::LeagueRegistry;
use superleague_core::model::{LeagueInfo, PlatformState};
use superleague_core::report::{build_report, ReportSettings};
use superleague_core::source::LeagueDataSource;
use superleague_core::standings::Zone;

// ===========================================================================
// Fake data source
// ===========================================================================

#[derive(Clone)]
struct FakeLeague {
    info: Result<Option<LeagueInfo>, FetchError>,
    rosters: Result<Vec<Value>, FetchError>,
    users: Result<Vec<Value>, FetchError>,
    matchups: HashMap<u32, Result<Vec<Value>, FetchError>>,
}

struct FakeSource {
    state: Result<Option<PlatformState>, FetchError>,
    leagues: HashMap<String, FakeLeague>,
}

fn not_found(what: &str) -> FetchError {
    FetchError::Status {
        url: format!("fake://{what}"),
        status: 404,
    }
}

impl FakeSource {
    fn league(&self, id: &str) -> Result<&FakeLeague, FetchError> {
        self.leagues.get(id).ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl LeagueDataSource for FakeSource {
    async fn fetch_league_info(&self, league_id: &str) -> Result<Option<LeagueInfo>, FetchError> {
        self.league(league_id)?.info.clone()
    }

    async fn fetch_rosters(&self, league_id: &str) -> Result<Vec<Value>, FetchError> {
        self.league(league_id)?.rosters.clone()
    }

    async fn fetch_users(&self, league_id: &str) -> Result<Vec<Value>, FetchError> {
        self.league(league_id)?.users.clone()
    }

    async fn fetch_week_matchups(
        &self,
        league_id: &str,
        week: u32,
    ) -> Result<Vec<Value>, FetchError> {
        self.league(league_id)?
            .matchups
            .get(&week)
            .cloned()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn fetch_platform_state(&self) -> Result<Option<PlatformState>, FetchError> {
        self.state.clone()
    }
}

// ===========================================================================
// Fixtures
// ===========================================================================

const PREMIER: &str = "100";
const LEAGUE_ONE: &str = "300";

fn registry() -> LeagueRegistry {
    LeagueRegistry::new([
        ("Premier", PREMIER),
        ("Championship", "YOUR_LEAGUE_ID_HERE"),
        ("League One", LEAGUE_ONE),
    ])
}

fn info(name: &str) -> Result<Option<LeagueInfo>, FetchError> {
    Ok(Some(LeagueInfo {
        name: Some(name.into()),
        season: Some("2025".into()),
        ..LeagueInfo::default()
    }))
}

fn roster(id: i64, owner: &str, wins: u32, fpts: f64) -> Value {
    json!({
        "roster_id": id,
        "owner_id": owner,
        "settings": { "wins": wins, "losses": 4 - wins, "ties": 0, "fpts": fpts, "fpts_against": 400.0 }
    })
}

/// One week of flat matchup records: `(matchup_id, roster_id, points)`.
fn week(rows: &[(i64, i64, Option<f64>)]) -> Result<Vec<Value>, FetchError> {
    Ok(rows
        .iter()
        .map(|&(m, r, p)| json!({ "matchup_id": m, "roster_id": r, "points": p }))
        .collect())
}

fn premier() -> FakeLeague {
    let mut matchups = HashMap::new();
    matchups.insert(1, week(&[(1, 1, Some(110.0)), (1, 2, Some(100.0)), (2, 3, Some(90.0)), (2, 4, Some(80.0))]));
    matchups.insert(2, week(&[(1, 1, Some(120.0)), (1, 3, Some(119.5)), (2, 2, Some(95.0)), (2, 4, Some(60.0))]));
    matchups.insert(3, week(&[(1, 1, Some(130.0)), (1, 4, Some(70.0)), (2, 2, Some(101.0)), (2, 3, Some(99.0))]));
    matchups.insert(4, week(&[(1, 1, Some(105.0)), (1, 2, Some(104.0)), (2, 3, Some(88.0)), (2, 4, Some(85.0))]));
    // Current week, still being played.
    matchups.insert(5, week(&[(1, 1, Some(150.0)), (1, 2, None), (2, 3, None), (2, 4, None)]));

    FakeLeague {
        info: info("Premier"),
        rosters: Ok(vec![
            roster(1, "u1", 4, 500.0),
            roster(2, "u2", 3, 480.0),
            roster(3, "u3", 1, 450.0),
            roster(4, "u4", 0, 300.0),
        ]),
        users: Ok(vec![
            json!({ "user_id": "u1", "display_name": "alpha_dn", "metadata": { "team_name": "Alpha" } }),
            json!({ "user_id": "u2", "display_name": "bravo_dn", "metadata": { "team_name": "Bravo" } }),
            json!({ "user_id": "u3", "display_name": "charlie" }),
            json!({ "user_id": "u4", "username": "delta" }),
        ]),
        matchups,
    }
}

fn league_one() -> FakeLeague {
    let mut matchups = HashMap::new();
    for w in 1..=4u32 {
        let base = f64::from(w);
        // Nested participant shape for this league.
        matchups.insert(
            w,
            Ok(vec![json!({
                "matchup_id": 1,
                "teams": [
                    { "roster_id": 1, "points": 100.0 + base },
                    { "roster_id": 2, "points": 90.0 + base }
                ]
            })]),
        );
    }

    FakeLeague {
        info: info("League One"),
        rosters: Ok(vec![roster(1, "v1", 2, 400.0), roster(2, "v2", 2, 410.0)]),
        users: Ok(vec![
            json!({ "user_id": "v1", "metadata": { "team_name": "Echo" } }),
            json!({ "user_id": "v2", "metadata": { "team_name": "Foxtrot" } }),
        ]),
        matchups,
    }
}

fn source() -> FakeSource {
    let mut leagues = HashMap::new();
    leagues.insert(PREMIER.to_string(), premier());
    leagues.insert(LEAGUE_ONE.to_string(), league_one());
    FakeSource {
        state: Ok(Some(PlatformState {
            week: 5,
            season: Some("2025".into()),
            season_type: Some("regular".into()),
            display_week: Some(5),
        })),
        leagues,
    }
}

fn has_issue(issues: &[Issue], pred: impl Fn(&Issue) -> bool) -> bool {
    issues.iter().any(pred)
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn full_report_for_healthy_leagues() {
    let report = build_report(&source(), &registry(), &ReportSettings::default()).await;

    // Placeholder league is reported and skipped.
    assert_eq!(report.standings.len(), 2);
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::ConfigurationMissing { league } if league == "Championship"
    )));

    // Top tier: no promotion, bottom three relegated.
    let premier = &report.standings[0];
    assert_eq!(premier.league.name, "Premier");
    let rows = premier.rows.as_ref().unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo", "charlie", "delta"]);
    let zones: Vec<_> = rows.iter().map(|r| r.zone).collect();
    assert_eq!(zones, vec![Zone::None, Zone::Demotion, Zone::Demotion, Zone::Demotion]);

    // Bottom tier: everyone in a two-team league is in the promotion zone.
    let league_one = &report.standings[1];
    assert_eq!(league_one.league.hierarchy_index, 2);
    let rows = league_one.rows.as_ref().unwrap();
    assert_eq!(rows[0].team_name, "Foxtrot");
    assert!(rows.iter().all(|r| r.zone == Zone::Promotion));

    // Week 4 is complete, so it is the weekly scope.
    assert_eq!(report.weekly.selection.week, Some(4));
    assert!(!report.weekly.selection.provisional);
    let weekly = &report.weekly.highlights;
    assert_eq!(weekly.top.as_ref().unwrap().team_name, "Alpha");
    assert_eq!(weekly.top.as_ref().unwrap().points, 105.0);
    assert_eq!(weekly.bottom.as_ref().unwrap().team_name, "delta");
    let closest = weekly.closest.as_ref().unwrap();
    assert_eq!(closest.league_name, "Premier");
    assert_eq!(closest.week, Some(4));
    assert!((closest.differential - 1.0).abs() < 1e-9);

    // Season covers weeks 1-4; the in-progress 150 never shows up.
    assert_eq!(report.season.before_week, Some(5));
    let season = &report.season.highlights;
    assert_eq!(season.top.as_ref().unwrap().points, 130.0);
    assert_eq!(season.top.as_ref().unwrap().week, Some(3));
    assert_eq!(season.bottom.as_ref().unwrap().points, 60.0);
    let closest = season.closest.as_ref().unwrap();
    assert_eq!(closest.week, Some(2));
    assert!((closest.differential - 0.5).abs() < 1e-9);

    assert!(!has_issue(&report.issues, |i| matches!(i, Issue::InsufficientData { .. })));
}

#[tokio::test]
async fn incomplete_latest_week_falls_back_to_previous() {
    let mut src = source();
    src.leagues.get_mut(PREMIER).unwrap().matchups.insert(
        4,
        week(&[(1, 1, Some(105.0)), (1, 2, None), (2, 3, None), (2, 4, None)]),
    );
    src.leagues.get_mut(LEAGUE_ONE).unwrap().matchups.insert(
        4,
        Ok(vec![json!({
            "matchup_id": 1,
            "teams": [{ "roster_id": 1, "points": null }, { "roster_id": 2, "points": 94.0 }]
        })]),
    );

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert_eq!(report.weekly.selection.week, Some(3));
    assert!(!report.weekly.selection.provisional);
    let weekly = &report.weekly.highlights;
    assert_eq!(weekly.top.as_ref().unwrap().points, 130.0);
    assert_eq!(weekly.bottom.as_ref().unwrap().team_name, "delta");
    let closest = weekly.closest.as_ref().unwrap();
    let teams: Vec<_> = closest.sides.iter().map(|s| s.team_name.as_str()).collect();
    assert_eq!(teams, vec!["Bravo", "charlie"]);
}

#[tokio::test]
async fn no_complete_week_is_provisional() {
    let mut src = source();
    for league in src.leagues.values_mut() {
        league.matchups.clear();
    }
    src.leagues.get_mut(PREMIER).unwrap().matchups.insert(
        2,
        week(&[(1, 1, Some(77.0)), (1, 2, None)]),
    );

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert_eq!(report.weekly.selection.week, Some(2));
    assert!(report.weekly.selection.provisional);
    // Only the scored entry counts; its matchup is incomplete so no closest.
    let weekly = &report.weekly.highlights;
    assert_eq!(weekly.top.as_ref().unwrap().points, 77.0);
    assert!(weekly.closest.is_none());
}

#[tokio::test]
async fn failed_league_info_is_isolated() {
    let mut src = source();
    src.leagues.get_mut(PREMIER).unwrap().info = Err(FetchError::Transport {
        url: "fake://100".into(),
        message: "connection reset".into(),
    });

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(report.standings[0].rows.is_none());
    assert!(report.standings[1].rows.is_some());
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::FetchFailure { league: Some(l), resource, .. } if l == "Premier" && resource == "league info"
    )));

    // Matchups are still usable for highlights.
    assert_eq!(report.season.highlights.top.as_ref().unwrap().team_name, "Alpha");
}

#[tokio::test]
async fn empty_league_info_means_no_table() {
    let mut src = source();
    src.leagues.get_mut(LEAGUE_ONE).unwrap().info = Ok(None);

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(report.standings[1].rows.is_none());
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::FetchFailure { league: Some(l), resource, .. } if l == "League One" && resource == "standings"
    )));
}

#[tokio::test]
async fn unrelated_failure_does_not_hide_missing_table() {
    let mut src = source();
    let league = src.leagues.get_mut(LEAGUE_ONE).unwrap();
    league.info = Ok(None);
    league.users = Err(not_found("users"));

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(report.standings[1].rows.is_none());
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::FetchFailure { league: Some(l), resource, .. } if l == "League One" && resource == "users"
    )));
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::FetchFailure { league: Some(l), resource, .. } if l == "League One" && resource == "standings"
    )));
}

#[tokio::test]
async fn failed_roster_fetch_explains_missing_table() {
    let mut src = source();
    src.leagues.get_mut(LEAGUE_ONE).unwrap().rosters = Err(not_found("rosters"));

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(report.standings[1].rows.is_none());
    let league_one: Vec<_> = report
        .issues
        .iter()
        .filter_map(|i| match i {
            Issue::FetchFailure { league: Some(l), resource, .. } if l == "League One" => {
                Some(resource.as_str())
            }
            _ => None,
        })
        .collect();
    assert_eq!(league_one, vec!["rosters"]);
}

#[tokio::test]
async fn failed_week_does_not_block_other_weeks() {
    let mut src = source();
    src.leagues
        .get_mut(PREMIER)
        .unwrap()
        .matchups
        .insert(2, Err(not_found("week 2")));

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::FetchFailure { resource, week: Some(2), .. } if resource == "matchups"
    )));
    // Week 2 held the season low and the season's closest game; both move.
    let season = &report.season.highlights;
    assert_eq!(season.bottom.as_ref().unwrap().points, 70.0);
    assert_eq!(season.top.as_ref().unwrap().points, 130.0);
    assert_eq!(report.weekly.selection.week, Some(4));
}

#[tokio::test]
async fn missing_platform_state_keeps_standings() {
    let mut src = source();
    src.state = Err(FetchError::Transport {
        url: "fake://state".into(),
        message: "timed out".into(),
    });

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(report.platform.is_none());
    assert!(report.standings.iter().all(|s| s.rows.is_some()));
    assert!(!report.weekly.selection.is_available());
    assert!(report.season.highlights.is_empty());
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::InsufficientData { scope: HighlightScope::Weekly }
    )));
    assert!(has_issue(&report.issues, |i| matches!(
        i,
        Issue::InsufficientData { scope: HighlightScope::Season }
    )));
}

#[tokio::test]
async fn first_week_of_season_has_no_highlights() {
    let mut src = source();
    src.state = Ok(Some(PlatformState {
        week: 1,
        season: None,
        season_type: None,
        display_week: None,
    }));

    let report = build_report(&src, &registry(), &ReportSettings::default()).await;

    assert!(!report.weekly.selection.is_available());
    assert!(report.season.highlights.is_empty());
    assert_eq!(report.standings.len(), 2);
}

#[tokio::test]
async fn report_serializes_to_json() {
    let report = build_report(&source(), &registry(), &ReportSettings::default()).await;
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["standings"][0]["rows"][1]["zone"], json!("demotion"));
    assert_eq!(value["weekly"]["selection"]["week"], json!(4));
    assert_eq!(value["weekly"]["highlights"][0]["kind"], json!("top"));
    assert_eq!(value["weekly"]["highlights"][0]["payload"]["team_name"], json!("Alpha"));
    assert_eq!(value["season"]["highlights"][2]["kind"], json!("closest"));
    assert_eq!(value["issues"][0]["kind"], json!("configuration_missing"));
}
