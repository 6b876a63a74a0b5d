// League standings with promotion/demotion zones.
//
// Teams are ordered by wins, then points for. The top three of every league
// except the top tier sit in the promotion zone; the bottom three of every
// league except the bottom tier sit in the demotion zone.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Roster, User};

/// Number of teams at each end of a table that move between tiers.
pub const ZONE_SIZE: usize = 3;

/// Which movement zone a standings row falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Promotion,
    Demotion,
    None,
}

/// One ranked line of a league table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    /// Dense rank, 1..=N.
    pub rank: usize,
    pub roster_id: i64,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub zone: Zone,
}

/// Rank a league's rosters and assign zones.
///
/// Rosters equal on both wins and points for keep their input order.
pub fn rank(
    rosters: &[Roster],
    users: &[User],
    hierarchy_index: usize,
    total_leagues: usize,
) -> Vec<StandingsRow> {
    let users_by_id: HashMap<&str, &User> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut ordered: Vec<&Roster> = rosters.iter().collect();
    // sort_by is stable, which gives exact ties their input order.
    ordered.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.points_for.total_cmp(&a.points_for))
    });

    let n = ordered.len();
    let promotion_allowed = hierarchy_index != 0;
    let demotion_allowed = hierarchy_index + 1 != total_leagues;

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, roster)| {
            let rank = i + 1;
            let zone = if promotion_allowed && rank <= ZONE_SIZE {
                Zone::Promotion
            } else if demotion_allowed && rank + ZONE_SIZE > n {
                Zone::Demotion
            } else {
                Zone::None
            };

            StandingsRow {
                rank,
                roster_id: roster.roster_id,
                team_name: resolve_team_name(roster, &users_by_id),
                wins: roster.wins,
                losses: roster.losses,
                ties: roster.ties,
                points_for: roster.points_for,
                points_against: roster.points_against,
                zone,
            }
        })
        .collect()
}

/// Display name for every roster in a league, keyed by roster id.
pub fn team_names(rosters: &[Roster], users: &[User]) -> HashMap<i64, String> {
    let users_by_id: HashMap<&str, &User> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();
    rosters
        .iter()
        .map(|r| (r.roster_id, resolve_team_name(r, &users_by_id)))
        .collect()
}

/// Fallback name for a roster with no usable owner details.
pub fn default_team_name(roster_id: i64) -> String {
    format!("Team {roster_id}")
}

/// Owner's team name, else display name, else username, else "Team {id}".
fn resolve_team_name(roster: &Roster, users_by_id: &HashMap<&str, &User>) -> String {
    let owner = roster
        .owner_id
        .as_deref()
        .and_then(|id| users_by_id.get(id));

    owner
        .and_then(|u| {
            non_empty(&u.team_name)
                .or_else(|| non_empty(&u.display_name))
                .or_else(|| non_empty(&u.username))
        })
        .map(str::to_string)
        .unwrap_or_else(|| default_team_name(roster.roster_id))
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
