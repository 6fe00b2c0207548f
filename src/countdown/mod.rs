//! The countdown domain: path argument disambiguation and delta formatting.

mod formatter;
mod path_args;

pub use formatter::CountdownFormatter;
pub use path_args::parse_path;

use chrono::NaiveDate;
use thiserror::Error;

/// A single badge request: the date to count toward and the event label.
///
/// Constructed per request from the URL path; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownRequest {
    pub target_date: NaiveDate,
    pub label: String,
}

/// Which side of the target date the current instant falls on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    /// The target date lies in the future.
    Toward,
    /// The current instant is exactly the target midnight.
    At,
    /// The target date lies in the past.
    Since,
}

/// The formatted outcome of a countdown computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownResult {
    /// The composed event phrase, e.g. `夏休みまで`.
    pub phrase: String,
    /// The numeric countdown string, e.g. `10日` or `3日4時間5分`.
    pub countdown: String,
    pub direction: Direction,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountdownError {
    /// The two path segments could not be disambiguated into exactly one
    /// date token and one non-empty label.
    #[error("invalid URL format, expected /YYYYMMDD/event-name or /event-name/YYYYMMDD")]
    InvalidFormat,
    /// The date token matched `\d{8}` but is not a valid calendar date.
    #[error("{0} is not a valid calendar date")]
    InvalidDate(String),
}
