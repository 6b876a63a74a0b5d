// Highlight statistics over a set of score entries: top scorer, bottom
// scorer, and the closest matchup.
//
// The same computation serves the weekly and the season-to-date view; only
// the entry set differs. Ties always go to the first candidate in input
// order.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::TeamEntry;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A single team's score singled out as a highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorerHighlight {
    pub league: String,
    pub league_name: String,
    pub team_name: String,
    pub roster_id: i64,
    pub week: Option<u32>,
    pub matchup_id: i64,
    pub points: f64,
}

/// One participant of a matchup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupSide {
    pub team_name: String,
    pub roster_id: i64,
    pub points: f64,
}

/// The matchup with the smallest points gap between two participants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestMatchup {
    pub league: String,
    pub league_name: String,
    pub week: Option<u32>,
    pub matchup_id: i64,
    /// Participants in input order.
    pub sides: Vec<MatchupSide>,
    /// Smallest absolute difference between any two participants.
    pub differential: f64,
}

/// One highlight record, serialized as `{"kind": ..., "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum Highlight {
    Top(ScorerHighlight),
    Bottom(ScorerHighlight),
    Closest(ClosestMatchup),
}

/// All three highlights for one scope. Each is absent when no entry qualifies.
///
/// Serializes as the list of present [`Highlight`] records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(into = "Vec<Highlight>")]
pub struct HighlightSet {
    pub top: Option<ScorerHighlight>,
    pub bottom: Option<ScorerHighlight>,
    pub closest: Option<ClosestMatchup>,
}

impl HighlightSet {
    /// True when there was nothing scored to report.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.closest.is_none()
    }

    /// The present highlights, in top/bottom/closest order.
    pub fn into_highlights(self) -> Vec<Highlight> {
        let mut out = Vec::with_capacity(3);
        if let Some(top) = self.top {
            out.push(Highlight::Top(top));
        }
        if let Some(bottom) = self.bottom {
            out.push(Highlight::Bottom(bottom));
        }
        if let Some(closest) = self.closest {
            out.push(Highlight::Closest(closest));
        }
        out
    }
}

impl From<HighlightSet> for Vec<Highlight> {
    fn from(set: HighlightSet) -> Self {
        set.into_highlights()
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute top scorer, bottom scorer and closest matchup over `entries`.
///
/// Entries without points are ignored for the scorers. A matchup only
/// competes for closest when it has at least two entries and all of them are
/// scored.
pub fn highlights(entries: &[TeamEntry]) -> HighlightSet {
    let mut top: Option<(&TeamEntry, f64)> = None;
    let mut bottom: Option<(&TeamEntry, f64)> = None;

    for te in entries {
        let Some(points) = te.entry.scored_points() else {
            continue;
        };
        if top.map_or(true, |(_, best)| points > best) {
            top = Some((te, points));
        }
        if bottom.map_or(true, |(_, worst)| points < worst) {
            bottom = Some((te, points));
        }
    }

    HighlightSet {
        top: top.map(|(te, points)| scorer(te, points)),
        bottom: bottom.map(|(te, points)| scorer(te, points)),
        closest: closest_matchup(entries),
    }
}

/// Entries from completed weeks only: week known and before `current_week`.
pub fn season_scope(entries: &[TeamEntry], current_week: u32) -> Vec<TeamEntry> {
    entries
        .iter()
        .filter(|te| te.entry.week.is_some_and(|w| w < current_week))
        .cloned()
        .collect()
}

/// Entries from a single week.
pub fn week_scope(entries: &[TeamEntry], week: u32) -> Vec<TeamEntry> {
    entries
        .iter()
        .filter(|te| te.entry.week == Some(week))
        .cloned()
        .collect()
}

fn scorer(te: &TeamEntry, points: f64) -> ScorerHighlight {
    ScorerHighlight {
        league: te.entry.league.clone(),
        league_name: te.league_name.clone(),
        team_name: te.team_name.clone(),
        roster_id: te.entry.roster_id,
        week: te.entry.week,
        matchup_id: te.entry.matchup_id,
        points,
    }
}

type MatchupKey<'a> = (&'a str, Option<u32>, i64);

fn closest_matchup(entries: &[TeamEntry]) -> Option<ClosestMatchup> {
    // Groups in first-encountered order.
    let mut index: HashMap<MatchupKey<'_>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&TeamEntry>> = Vec::new();
    for te in entries {
        let key = (te.entry.league.as_str(), te.entry.week, te.entry.matchup_id);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(te);
    }

    let mut best: Option<(&[&TeamEntry], f64)> = None;
    for group in &groups {
        let Some(diff) = min_differential(group) else {
            continue;
        };
        if best.map_or(true, |(_, best_diff)| diff < best_diff) {
            best = Some((group.as_slice(), diff));
        }
    }

    let (group, differential) = best?;
    let first = group[0];
    Some(ClosestMatchup {
        league: first.entry.league.clone(),
        league_name: first.league_name.clone(),
        week: first.entry.week,
        matchup_id: first.entry.matchup_id,
        sides: group
            .iter()
            .map(|te| MatchupSide {
                team_name: te.team_name.clone(),
                roster_id: te.entry.roster_id,
                points: te.entry.scored_points().unwrap_or_default(),
            })
            .collect(),
        differential,
    })
}

/// Smallest gap between any two scores in the group, or `None` when the group
/// has fewer than two entries or any entry is unscored.
fn min_differential(group: &[&TeamEntry]) -> Option<f64> {
    if group.len() < 2 {
        return None;
    }
    let mut points: Vec<f64> = group
        .iter()
        .map(|te| te.entry.scored_points())
        .collect::<Option<_>>()?;
    points.sort_by(f64::total_cmp);
    points
        .windows(2)
        .map(|w| w[1] - w[0])
        .min_by(f64::total_cmp)
}
