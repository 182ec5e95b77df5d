//! User configuration, loaded through confy
//!
//! Stored as TOML in the platform config directory under the name `megabot`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "megabot";

/// Persistent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the task file and the log file
    pub data_directory: PathBuf,
    /// Name of the task file inside `data_directory`
    pub task_filename: String,
    /// One of off, error, warn, info, debug, trace
    pub log_level: String,
    /// Colour console output when stdout is a terminal
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_directory = dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from("data"));

        Self {
            data_directory,
            task_filename: "megabot.txt".to_string(),
            log_level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Load the stored configuration, writing defaults on first run
    pub fn load() -> crate::error::Result<Self> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn task_file(&self) -> PathBuf {
        self.data_directory.join(&self.task_filename)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_directory.join(format!("{}.log", APP_NAME))
    }
}
