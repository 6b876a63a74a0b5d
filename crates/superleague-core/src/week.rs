// Week selection: which week's matchups are final enough to report.
//
// A week is reportable once enough of its matchups are fully scored. When no
// candidate clears the bar, the latest week with any data is used instead and
// flagged provisional so the caller can caption it accordingly.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::Entry;

/// Fraction of complete matchups required when none is configured.
pub const DEFAULT_COMPLETENESS_THRESHOLD: f64 = 0.8;

/// Weeks looked at before `current - 1` when none is configured.
pub const DEFAULT_LOOKBACK_WEEKS: u32 = 3;

/// Outcome of week selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekSelection {
    /// `None` when no candidate week had any data.
    pub week: Option<u32>,
    /// The week did not meet the completeness threshold.
    pub provisional: bool,
}

impl WeekSelection {
    pub const UNAVAILABLE: WeekSelection = WeekSelection {
        week: None,
        provisional: false,
    };

    pub fn is_available(&self) -> bool {
        self.week.is_some()
    }
}

/// Complete and total matchup counts for one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completeness {
    pub complete: usize,
    pub total: usize,
}

impl Completeness {
    /// Whether the complete fraction reaches `threshold`. Never true for an
    /// empty week.
    pub fn meets(&self, threshold: f64) -> bool {
        self.total > 0 && (self.complete as f64 / self.total as f64) >= threshold
    }
}

/// Count complete matchups among one week's entries.
///
/// Entries are grouped by `(league, matchup_id)`; a group is complete when
/// every entry in it has points.
pub fn week_completeness(entries: &[Entry]) -> Completeness {
    let mut groups: HashMap<(&str, i64), bool> = HashMap::new();
    for entry in entries {
        let complete = groups
            .entry((entry.league.as_str(), entry.matchup_id))
            .or_insert(true);
        *complete &= entry.points.is_some();
    }

    Completeness {
        complete: groups.values().filter(|&&c| c).count(),
        total: groups.len(),
    }
}

/// Pick the week to report.
///
/// `candidate_weeks` is scanned in the given order and the first week meeting
/// `threshold` wins. Failing that, the numerically largest candidate with any
/// entries is returned as provisional. With no data at all the selection is
/// [`WeekSelection::UNAVAILABLE`].
pub fn select(
    candidate_weeks: &[u32],
    entries_by_week: &BTreeMap<u32, Vec<Entry>>,
    threshold: f64,
) -> WeekSelection {
    if let Some(&week) = candidate_weeks
        .iter()
        .find(|&&w| week_completeness(entries_for(entries_by_week, w)).meets(threshold))
    {
        return WeekSelection {
            week: Some(week),
            provisional: false,
        };
    }

    candidate_weeks
        .iter()
        .copied()
        .filter(|&w| !entries_for(entries_by_week, w).is_empty())
        .max()
        .map(|week| WeekSelection {
            week: Some(week),
            provisional: true,
        })
        .unwrap_or(WeekSelection::UNAVAILABLE)
}

fn entries_for(entries_by_week: &BTreeMap<u32, Vec<Entry>>, week: u32) -> &[Entry] {
    entries_by_week.get(&week).map(Vec::as_slice).unwrap_or(&[])
}

/// Candidate weeks in priority order: the week before `current_week`, then up
/// to `lookback` weeks before that. Weeks below 1 are dropped.
pub fn candidate_weeks(current_week: u32, lookback: u32) -> Vec<u32> {
    let Some(latest) = current_week.checked_sub(1) else {
        return Vec::new();
    };
    (0..=lookback)
        .filter_map(|back| latest.checked_sub(back))
        .filter(|&w| w >= 1)
        .collect()
}

/// Bucket entries by week. Entries without a week are dropped.
pub fn group_by_week<'a, I>(entries: I) -> BTreeMap<u32, Vec<Entry>>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut by_week: BTreeMap<u32, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        if let Some(week) = entry.week {
            by_week.entry(week).or_default().push(entry.clone());
        }
    }
    by_week
}
