//! Argument parsing for classified command lines
//!
//! Each function validates the shape of one command's arguments and hands
//! back borrowed, trimmed slices of the input. Failures carry the exact
//! expected syntax so the user can retype the command.

use regex::Regex;
use std::sync::LazyLock;

use crate::command::CommandKind;
use crate::error::{CoreError, Result};

const DEADLINE_SEPARATOR: &str = " /by ";

// Regex pattern is validated at compile time - invalid patterns are programming errors
static EVENT_SEPARATOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" /(from|to) ").expect("Invalid regex pattern - this is a compile-time constant")
});

/// Return everything after the first space, or "" if there is none
pub fn strip_keyword(line: &str) -> &str {
    line.split_once(' ').map(|(_, rest)| rest).unwrap_or("")
}

/// Parse the 1-based task number of a `mark`/`unmark`/`delete` line
pub fn parse_task_number(line: &str, kind: CommandKind) -> Result<i64> {
    let token = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| CoreError::missing_argument("a task number", kind.usage()))?;

    token
        .parse::<i64>()
        .map_err(|_| CoreError::not_a_number(token, kind.usage()))
}

/// Split `<description> /by <due>`
pub fn parse_deadline_args(rest: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = rest.split(DEADLINE_SEPARATOR).map(str::trim).collect();

    match parts.as_slice() {
        [description, due] if !description.is_empty() && !due.is_empty() => Ok((description, due)),
        _ => Err(CoreError::bad_format(CommandKind::Deadline.usage())),
    }
}

/// Split `<description> /from <start> /to <end>`
///
/// The two separators may appear in either order; start and end are
/// assigned by separator name. Returns `(description, start, end)`.
pub fn parse_event_args(rest: &str) -> Result<(&str, &str, &str)> {
    let usage = CommandKind::Event.usage();
    if rest.trim().is_empty() {
        return Err(CoreError::empty_description("an event", usage));
    }

    let separators: Vec<_> = EVENT_SEPARATOR_REGEX.captures_iter(rest).collect();
    let [first, second] = separators.as_slice() else {
        return Err(CoreError::bad_format(usage));
    };

    let (Some(first_sep), Some(second_sep)) = (first.get(0), second.get(0)) else {
        return Err(CoreError::bad_format(usage));
    };
    let first_is_from = &first[1] == "from";
    if first_is_from == (&second[1] == "from") {
        // "/from" twice or "/to" twice
        return Err(CoreError::bad_format(usage));
    }

    let description = rest[..first_sep.start()].trim();
    let middle = rest[first_sep.end()..second_sep.start()].trim();
    let last = rest[second_sep.end()..].trim();

    if description.is_empty() || middle.is_empty() || last.is_empty() {
        return Err(CoreError::bad_format(usage));
    }

    if first_is_from {
        Ok((description, middle, last))
    } else {
        Ok((description, last, middle))
    }
}

/// Extract the search keyword of a `find` line
pub fn parse_find_keyword(rest: &str) -> Result<&str> {
    let keyword = rest.trim();
    if keyword.is_empty() {
        return Err(CoreError::missing_argument(
            "a keyword to search for",
            CommandKind::Find.usage(),
        ));
    }
    Ok(keyword)
}
