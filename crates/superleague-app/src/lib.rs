// Library root for the dashboard binary: configuration, the Sleeper data
// source, and terminal output.

pub mod cache;
pub mod config;
pub mod sleeper;
pub mod summary;
