// Matchup payload normalization.
//
// The platform's matchup endpoint has returned two shapes over time: flat
// per-roster records (`{roster_id, points, matchup_id, ...}`) and matchup
// records that nest their participants in an array field
// (`{matchup_id, teams: [{roster_id, points}, ...]}`). Both are flattened into
// `Entry` values here. Anything else is skipped, never reported as an error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::Entry;

const ROSTER_ID: &str = "roster_id";
const POINTS: &str = "points";
const CUSTOM_POINTS: &str = "custom_points";
const MATCHUP_ID: &str = "matchup_id";
const WEEK: &str = "week";

/// Flatten a raw matchup payload into score entries for `league`.
///
/// Records without their own `matchup_id` get `matchup_index_base + position`
/// as a synthetic id, where `position` is the record's index in `payload`.
/// Sub-records inherit the parent's week and matchup id.
pub fn normalize(league: &str, payload: &[Value], matchup_index_base: i64) -> Vec<Entry> {
    let mut entries = Vec::new();

    for (position, record) in payload.iter().enumerate() {
        let Some(obj) = record.as_object() else {
            debug!(league, position, "skipping non-object matchup record");
            continue;
        };

        let week = week_of(obj);
        let matchup_id =
            int_field(obj, MATCHUP_ID).unwrap_or(matchup_index_base + position as i64);

        // Flat shape: the record is itself one participant.
        if let Some(roster_id) = int_field(obj, ROSTER_ID) {
            if obj.contains_key(POINTS) {
                entries.push(Entry {
                    league: league.to_string(),
                    week,
                    matchup_id,
                    roster_id,
                    points: points_of(obj),
                });
                continue;
            }
        }

        // Nested shape: participants live in one or more array fields.
        let before = entries.len();
        for value in obj.values() {
            let Some(items) = value.as_array() else {
                continue;
            };
            for sub in items.iter().filter_map(Value::as_object) {
                let Some(roster_id) = int_field(sub, ROSTER_ID) else {
                    continue;
                };
                entries.push(Entry {
                    league: league.to_string(),
                    week,
                    matchup_id,
                    roster_id,
                    points: points_of(sub),
                });
            }
        }

        if entries.len() == before {
            debug!(league, position, "skipping unrecognized matchup record");
        }
    }

    entries
}

/// Set `week` on every object record that doesn't already carry one.
pub fn tag_week(records: &mut [Value], week: u32) {
    for record in records.iter_mut() {
        if let Some(obj) = record.as_object_mut() {
            if week_of(obj).is_none() {
                obj.insert(WEEK.to_string(), Value::from(week));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Integer field, accepting numeric strings as well.
fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn week_of(obj: &Map<String, Value>) -> Option<u32> {
    int_field(obj, WEEK).and_then(|w| u32::try_from(w).ok())
}

/// A commissioner override in `custom_points` wins over the computed `points`.
fn points_of(obj: &Map<String, Value>) -> Option<f64> {
    obj.get(CUSTOM_POINTS)
        .and_then(Value::as_f64)
        .or_else(|| obj.get(POINTS).and_then(Value::as_f64))
}
