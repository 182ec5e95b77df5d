//! Core error types for MegaBot domain logic
//!
//! These errors represent domain-level failures, not I/O or front-end errors.
//! Every message is written for the user: it says what was expected so the
//! next input can be corrected.

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("The description of {kind} cannot be empty. Please use format: {usage}")]
    EmptyDescription { kind: String, usage: String },

    #[error("Please use format: {usage}")]
    BadFormat { usage: String },

    #[error("Please specify {what}. Usage: {usage}")]
    MissingArgument { what: String, usage: String },

    #[error("'{input}' is not a valid task number. Usage: {usage}")]
    NotANumber { input: String, usage: String },

    #[error("{}", index_message(.number, .size))]
    IndexOutOfRange { number: i64, size: usize },

    #[error(
        "Invalid date/time format: '{input}'. Supported formats include: \
         2024-12-25, 25/12/2024, 12/25/2024, Dec 25 2024, \
         2024-12-25 1430, 2024-12-25 14:30, 25/12/2024 2:30 PM"
    )]
    DateFormat { input: String },

    #[error("Start time cannot be after end time. Start: {start}, End: {end}")]
    InvalidRange { start: String, end: String },

    #[error(
        "I don't understand what you mean :-( Try one of: list, todo, deadline, \
         event, mark, unmark, delete, find, bye"
    )]
    UnknownCommand,

    #[error("Invalid storage record: {reason}")]
    InvalidRecord { reason: String },
}

fn index_message(number: &i64, size: &usize) -> String {
    match *size {
        0 => format!("Task number {} does not exist. Your list is empty.", number),
        1 => format!("Task number {} does not exist. The only valid number is 1.", number),
        _ => format!(
            "Task number {} does not exist. Please use a number from 1 to {}.",
            number, size
        ),
    }
}

impl CoreError {
    /// Create an empty-description error for the given task kind
    pub fn empty_description(kind: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::EmptyDescription {
            kind: kind.into(),
            usage: usage.into(),
        }
    }

    /// Create a bad-format error naming the expected syntax
    pub fn bad_format(usage: impl Into<String>) -> Self {
        Self::BadFormat {
            usage: usage.into(),
        }
    }

    /// Create a missing-argument error
    pub fn missing_argument(what: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::MissingArgument {
            what: what.into(),
            usage: usage.into(),
        }
    }

    /// Create a not-a-number error
    pub fn not_a_number(input: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::NotANumber {
            input: input.into(),
            usage: usage.into(),
        }
    }

    /// Create a date format error echoing the offending input
    pub fn date_format(input: impl Into<String>) -> Self {
        Self::DateFormat {
            input: input.into(),
        }
    }

    /// Create an invalid-record error
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
