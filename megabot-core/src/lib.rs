//! MegaBot Core - Pure domain logic for the task tracker
//!
//! This crate contains no I/O operations. Reading and writing the task file
//! is handled by adapters in consuming crates; this crate only knows how a
//! task looks as a line of text.

pub mod command;
pub mod date;
pub mod error;
pub mod parser;
pub mod record;
pub mod task;

pub use command::CommandKind;
pub use error::{CoreError, Result};
pub use task::{Task, TaskKind, TaskList, TaskStatus};
