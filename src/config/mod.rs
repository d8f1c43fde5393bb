#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use toml_config::FinderConfig;

use crate::utils::error::{FinderError, Result};
use chrono::NaiveDate;

/// Parses `YYYY-MM-DD` as a local calendar day.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| FinderError::InvalidDate {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
