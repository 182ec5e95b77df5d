//! File logging setup
//!
//! Logs go to a file in the data directory so they never interleave with
//! console responses or the terminal window.

use std::fs::{self, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::error::{CliError, Result};

/// Parse a level name, falling back to `info`
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the global file logger
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::io("Failed to create log directory", e))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CliError::io("Failed to open log file", e))?;

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();

    WriteLogger::init(level, config, file)
        .map_err(|e| CliError::config_with_source("Failed to initialise logging", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }
}
