//! Flat-file storage adapter for TaskList
//!
//! Handles persistence of tasks to a pipe-delimited text file. Loading skips
//! malformed lines up to a fixed tolerance; saving always rewrites the
//! whole file.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use megabot_core::record::{format_record, parse_record};
use megabot_core::{Task, TaskList};

use crate::error::{CliError, Result};

/// Most malformed lines a load may skip before giving up
pub const MAX_INVALID_LINES: usize = 10;

/// Flat-file storage adapter
#[derive(Debug, Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
}

impl FlatFileStorage {
    /// Create a new storage adapter for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load tasks from the file
    ///
    /// A missing file is a first run and yields no tasks. Blank lines are
    /// ignored; malformed lines are skipped with a warning, and more than
    /// [`MAX_INVALID_LINES`] of them abort the load.
    pub fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            info!("No task file at {}, starting fresh", self.path.display());
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| {
            CliError::storage_read_with_source(&self.path, "the file could not be opened", e)
        })?;
        let reader = BufReader::new(file);

        let mut tasks = Vec::new();
        let mut invalid = 0usize;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                CliError::storage_read_with_source(&self.path, "the file could not be read", e)
            })?;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                continue;
            }

            match parse_record(line) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    invalid += 1;
                    warn!("Skipping invalid task line {}: {}", line_no + 1, e);
                    if invalid > MAX_INVALID_LINES {
                        return Err(CliError::storage_read(
                            &self.path,
                            format!("more than {} lines are corrupt", MAX_INVALID_LINES),
                        ));
                    }
                }
            }
        }

        info!(
            "Loaded {} task(s) from {} ({} skipped)",
            tasks.len(),
            self.path.display(),
            invalid
        );
        Ok(tasks)
    }

    /// Save all tasks, replacing the file
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// reader never sees a half-written file.
    pub fn save(&self, tasks: &TaskList) -> Result<()> {
        let write_err = |e: std::io::Error| CliError::storage_write(&self.path, e);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp_path = self.sibling("tmp");
        {
            let mut file = File::create(&tmp_path).map_err(write_err)?;
            for task in tasks {
                writeln!(file, "{}", format_record(task)).map_err(write_err)?;
            }
            file.sync_all().map_err(write_err)?;
        }
        fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        debug!("Saved {} task(s) to {}", tasks.len(), self.path.display());
        Ok(())
    }

    /// Copy the current file aside, returning the backup path
    ///
    /// Returns `None` when there is nothing to back up.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let backup_path = self.sibling("bak");
        fs::copy(&self.path, &backup_path).map_err(|e| CliError::storage_write(&backup_path, e))?;
        info!("Backed up {} to {}", self.path.display(), backup_path.display());
        Ok(Some(backup_path))
    }

    /// `megabot.txt` -> `megabot.txt.<suffix>`
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }
}
