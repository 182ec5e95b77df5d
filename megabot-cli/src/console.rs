//! Line-by-line console front end

use std::io::{BufRead, Write};

use log::info;
use megabot_core::CommandKind;

use crate::dispatcher::Dispatcher;
use crate::display::{format_response, welcome};
use crate::error::{CliError, Result};

/// Read commands until `bye` or end of input
pub fn run<R: BufRead, W: Write>(
    dispatcher: &mut Dispatcher,
    input: R,
    mut output: W,
    use_color: bool,
) -> Result<()> {
    let write_err = |e: std::io::Error| CliError::io("Failed to write to console", e);

    writeln!(output, "{}", welcome()).map_err(write_err)?;
    if let Some(notice) = dispatcher.take_notice() {
        writeln!(output, "{}", format_response(&notice, use_color)).map_err(write_err)?;
    }

    for line in input.lines() {
        let line = line.map_err(|e| CliError::io("Failed to read from console", e))?;
        let response = dispatcher.handle(&line);
        writeln!(output, "{}", format_response(&response, use_color)).map_err(write_err)?;
        output.flush().map_err(write_err)?;

        if CommandKind::classify(&line) == CommandKind::Bye {
            return Ok(());
        }
    }

    info!("Console input closed");
    Ok(())
}
