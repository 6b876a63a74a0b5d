// Error and warning types shared by the engine and its data sources.

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// A failed call to the platform data source.
///
/// Carries strings rather than the transport's error types so the engine
/// stays independent of the HTTP client used by the fetch layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

// ---------------------------------------------------------------------------
// Report-level issues
// ---------------------------------------------------------------------------

/// Which highlight section an issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightScope {
    Weekly,
    Season,
}

impl std::fmt::Display for HighlightScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighlightScope::Weekly => f.write_str("weekly"),
            HighlightScope::Season => f.write_str("season"),
        }
    }
}

/// A non-fatal problem encountered while building a report.
///
/// None of these abort the run; they are collected on the report so the
/// presentation layer can surface them as warnings next to partial results.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error(
        "could not load {resource} for {}{}: {message}",
        league_label(.league),
        week_suffix(.week)
    )]
    FetchFailure {
        league: Option<String>,
        resource: String,
        week: Option<u32>,
        message: String,
    },

    #[error("league `{league}` has no league id configured")]
    ConfigurationMissing { league: String },

    #[error("{scope} highlights unavailable: no scored matchups found")]
    InsufficientData { scope: HighlightScope },
}

impl Issue {
    /// Build a fetch-failure issue from a collaborator error.
    pub fn fetch(
        league: Option<&str>,
        resource: &str,
        week: Option<u32>,
        err: &FetchError,
    ) -> Self {
        Issue::FetchFailure {
            league: league.map(str::to_string),
            resource: resource.to_string(),
            week,
            message: err.to_string(),
        }
    }
}

fn league_label(league: &Option<String>) -> &str {
    league.as_deref().unwrap_or("platform")
}

fn week_suffix(week: &Option<u32>) -> String {
    week.map(|w| format!(" (week {w})")).unwrap_or_default()
}
