//! Flat-file storage records
//!
//! One task per line, fields joined by `" | "`:
//!
//! ```text
//! T | 0 | buy milk
//! D | 1 | submit report | 2023-12-01 1400
//! E | 0 | team sync | 2023-12-01 0900-2023-12-01 1000
//! ```
//!
//! Dates are written in [`STORAGE_FORMAT`](crate::date::STORAGE_FORMAT).

use regex::Regex;
use std::sync::LazyLock;

use crate::date::format_storage;
use crate::error::{CoreError, Result};
use crate::task::{Task, TaskKind};

pub const FIELD_SEPARATOR: &str = " | ";

// Event span: two canonical timestamps joined by '-'
static EVENT_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{4})-(\d{4}-\d{2}-\d{2} \d{4})$")
        .expect("Invalid event span regex pattern")
});

/// Format a Task as a storage line
pub fn format_record(task: &Task) -> String {
    let status = if task.is_done() { "1" } else { "0" };
    let tag = task.kind().tag().to_string();
    let head = [tag.as_str(), status, task.description()].join(FIELD_SEPARATOR);

    match task.kind() {
        TaskKind::ToDo => head,
        TaskKind::Deadline { due } => {
            format!("{}{}{}", head, FIELD_SEPARATOR, format_storage(*due))
        }
        TaskKind::Event { start, end } => format!(
            "{}{}{}-{}",
            head,
            FIELD_SEPARATOR,
            format_storage(*start),
            format_storage(*end)
        ),
    }
}

/// Parse a storage line into a Task
///
/// Type and status are split off the left, the temporal field off the
/// right; everything between is the description, separators included.
pub fn parse_record(line: &str) -> Result<Task> {
    let (tag, rest) = line
        .split_once(FIELD_SEPARATOR)
        .ok_or_else(|| CoreError::invalid_record("expected at least 3 fields, found 1"))?;
    let (status, body) = rest
        .split_once(FIELD_SEPARATOR)
        .ok_or_else(|| CoreError::invalid_record("expected at least 3 fields, found 2"))?;

    let done = match status {
        "1" => true,
        "0" => false,
        other => {
            return Err(CoreError::invalid_record(format!(
                "status must be 0 or 1, found '{}'",
                other
            )));
        }
    };

    let task = match tag {
        "T" => Task::todo(body),
        "D" => {
            let (description, due) = split_temporal(body)?;
            Task::deadline(description, due)
        }
        "E" => {
            let (description, span) = split_temporal(body)?;
            let caps = EVENT_SPAN_REGEX.captures(span).ok_or_else(|| {
                CoreError::invalid_record(format!("malformed event span '{}'", span))
            })?;
            Task::event(description, &caps[1], &caps[2])
        }
        other => {
            return Err(CoreError::invalid_record(format!(
                "unknown task type '{}'",
                other
            )));
        }
    };

    let task = task.map_err(|e| CoreError::invalid_record(e.to_string()))?;
    Ok(task.with_done(done))
}

fn split_temporal(body: &str) -> Result<(&str, &str)> {
    body.rsplit_once(FIELD_SEPARATOR)
        .ok_or_else(|| CoreError::invalid_record("missing date/time field"))
}
