// Library root: the aggregation engine behind the super league dashboard.
//
// Pure stages (normalize, week, standings, highlights) plus the data-source
// seam and the report assembly that drives them.

pub mod error;
pub mod highlights;
pub mod league;
pub mod model;
pub mod normalize;
pub mod report;
pub mod source;
pub mod standings;
pub mod week;

pub use error::{FetchError, HighlightScope, Issue};
pub use league::{LeagueRef, LeagueRegistry};
pub use report::{build_report, ReportSettings, SuperLeagueReport};
pub use source::LeagueDataSource;
