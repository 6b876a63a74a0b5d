// Canonical records the engine works on, plus parsing from platform payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ---------------------------------------------------------------------------
// Rosters and users
// ---------------------------------------------------------------------------

/// One team's season record within a league.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    /// Unique within its league.
    pub roster_id: i64,
    pub owner_id: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

/// A platform account that may own a roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub user_id: String,
    pub display_name: Option<String>,
    pub username: Option<String>,
    /// League-specific team name chosen by the owner.
    pub team_name: Option<String>,
}

/// Platform roster record. The platform splits fractional points into a
/// separate hundredths field.
#[derive(Debug, Deserialize)]
struct RawRoster {
    roster_id: i64,
    #[serde(default)]
    owner_id: Option<String>,
    #[serde(default)]
    settings: Option<RawRosterSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRosterSettings {
    #[serde(default)]
    wins: Option<u32>,
    #[serde(default)]
    losses: Option<u32>,
    #[serde(default)]
    ties: Option<u32>,
    #[serde(default)]
    fpts: Option<f64>,
    #[serde(default)]
    fpts_decimal: Option<f64>,
    #[serde(default)]
    fpts_against: Option<f64>,
    #[serde(default)]
    fpts_against_decimal: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    user_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    metadata: Option<RawUserMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawUserMetadata {
    #[serde(default)]
    team_name: Option<String>,
}

impl From<RawRoster> for Roster {
    fn from(raw: RawRoster) -> Self {
        let s = raw.settings.unwrap_or_default();
        Roster {
            roster_id: raw.roster_id,
            owner_id: raw.owner_id,
            wins: s.wins.unwrap_or(0),
            losses: s.losses.unwrap_or(0),
            ties: s.ties.unwrap_or(0),
            points_for: with_hundredths(s.fpts, s.fpts_decimal),
            points_against: with_hundredths(s.fpts_against, s.fpts_against_decimal),
        }
    }
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        User {
            user_id: raw.user_id,
            display_name: raw.display_name,
            username: raw.username,
            team_name: raw.metadata.and_then(|m| m.team_name),
        }
    }
}

fn with_hundredths(whole: Option<f64>, hundredths: Option<f64>) -> f64 {
    whole.unwrap_or(0.0) + hundredths.unwrap_or(0.0) / 100.0
}

/// Parse roster records, skipping any that don't have the expected shape.
pub fn parse_rosters(records: &[Value]) -> Vec<Roster> {
    records
        .iter()
        .filter_map(|v| match RawRoster::deserialize(v) {
            Ok(raw) => Some(Roster::from(raw)),
            Err(e) => {
                debug!(error = %e, "skipping malformed roster record");
                None
            }
        })
        .collect()
}

/// Parse user records, skipping any that don't have the expected shape.
pub fn parse_users(records: &[Value]) -> Vec<User> {
    records
        .iter()
        .filter_map(|v| match RawUser::deserialize(v) {
            Ok(raw) => Some(User::from(raw)),
            Err(e) => {
                debug!(error = %e, "skipping malformed user record");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// League metadata and platform state
// ---------------------------------------------------------------------------

/// The subset of the platform's league record the engine cares about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueInfo {
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_rosters: Option<u32>,
}

/// Live platform state: which week of the season is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformState {
    pub week: u32,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub season_type: Option<String>,
    #[serde(default)]
    pub display_week: Option<u32>,
}

// ---------------------------------------------------------------------------
// Score entries
// ---------------------------------------------------------------------------

/// One participant's score within one matchup for one week.
///
/// Entries sharing `(league, week, matchup_id)` form one matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// External id of the league the entry belongs to.
    pub league: String,
    pub week: Option<u32>,
    pub matchup_id: i64,
    pub roster_id: i64,
    /// `None` until the game has been scored.
    pub points: Option<f64>,
}

impl Entry {
    /// Points usable for comparisons (present and finite).
    pub fn scored_points(&self) -> Option<f64> {
        self.points.filter(|p| p.is_finite())
    }
}

/// An entry with the names a reader needs to make sense of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamEntry {
    pub entry: Entry,
    pub league_name: String,
    pub team_name: String,
}
