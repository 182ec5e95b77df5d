use std::io;

use clap::Parser;
use log::info;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::dispatcher::{is_error_response, Dispatcher};
use crate::display::{format_response, supports_color};
use crate::error::Result;
use crate::storage::FlatFileStorage;

mod cli;
mod config;
mod console;
mod dispatcher;
mod display;
mod error;
mod logging;
mod storage;
mod window;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load()?;

    let level = logging::parse_level(cli.log_level.as_deref().unwrap_or(&cfg.log_level));
    if let Err(e) = logging::init(&cfg.log_file(), level) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let storage = FlatFileStorage::new(cli.file.clone().unwrap_or_else(|| cfg.task_file()));
    info!("Using task file {}", storage.path().display());

    let mut dispatcher = Dispatcher::new(storage);
    let use_color = cfg.color && !cli.no_color && supports_color();

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => {
            console::run(&mut dispatcher, io::stdin().lock(), io::stdout().lock(), use_color)?;
        }

        Commands::Window => window::run(&mut dispatcher)?,

        Commands::Run { line } => {
            let response = dispatcher.handle(&line.join(" "));
            println!("{}", format_response(&response, use_color));
            if is_error_response(&response) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
