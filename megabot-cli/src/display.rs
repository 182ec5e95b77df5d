//! Console output formatting
//!
//! Handles colored output of dispatcher responses

use colored::*;

use crate::dispatcher::ERROR_MARKER;

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Greeting printed when a front end starts
pub fn welcome() -> &'static str {
    "Hello! I'm MegaBot, your favourite yellow dinosaur bot!\nWhat brings you here today?"
}

/// Format a response for the console
///
/// Error lines are red, completed tasks green. Without color the response
/// is returned unchanged.
pub fn format_response(response: &str, use_color: bool) -> String {
    if !use_color {
        return response.to_string();
    }

    response
        .lines()
        .map(|line| {
            if line.starts_with(ERROR_MARKER) {
                line.red().bold().to_string()
            } else if line.contains("][X] ") {
                line.green().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
