//! Command dispatch
//!
//! Turns one input line into one response string. Every failure is caught
//! here and rendered as text behind [`ERROR_MARKER`]; nothing propagates to
//! the front ends. Each successful mutating command rewrites the task file.

use log::{debug, error, info, warn};
use megabot_core::parser::{
    parse_deadline_args, parse_event_args, parse_find_keyword, parse_task_number, strip_keyword,
};
use megabot_core::{CommandKind, CoreError, Task, TaskList};

use crate::error::Result;
use crate::storage::FlatFileStorage;

/// Prefix of every error response
pub const ERROR_MARKER: &str = "OOPSIE!!";

pub const FAREWELL: &str = "Bye. Hope to see you again soon!";

const LOADING_ERROR: &str = "Error loading tasks from file. Starting with empty task list.";

/// Check whether a response reports a failure
pub fn is_error_response(response: &str) -> bool {
    response.lines().any(|line| line.starts_with(ERROR_MARKER))
}

/// Routes commands to the task list and keeps the task file in sync
pub struct Dispatcher {
    tasks: TaskList,
    storage: FlatFileStorage,
    /// Shown once, ahead of the first response
    notice: Option<String>,
}

impl Dispatcher {
    /// Load the task file and build a dispatcher around it
    ///
    /// If the file cannot be loaded the dispatcher starts with an empty list,
    /// keeps a copy of the unreadable file, and reports the problem on the
    /// first response.
    pub fn new(storage: FlatFileStorage) -> Self {
        match storage.load() {
            Ok(tasks) => Self {
                tasks: TaskList::from(tasks),
                storage,
                notice: None,
            },
            Err(e) => {
                error!("{}", e);
                let kept = match storage.backup() {
                    Ok(Some(path)) => format!(" The old file was kept at {}.", path.display()),
                    Ok(None) => String::new(),
                    Err(e) => {
                        warn!("Could not back up unreadable task file: {}", e);
                        String::new()
                    }
                };
                info!("Starting with an empty task list");

                Self {
                    tasks: TaskList::new(),
                    storage,
                    notice: Some(format!("{} {}{}", ERROR_MARKER, LOADING_ERROR, kept)),
                }
            }
        }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Take the pending start-up notice, if any
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Process one input line and return the response text
    pub fn handle(&mut self, line: &str) -> String {
        let response = self
            .execute(line)
            .unwrap_or_else(|e| format!("{} {}", ERROR_MARKER, e));

        match self.take_notice() {
            Some(notice) => format!("{}\n{}", notice, response),
            None => response,
        }
    }

    fn execute(&mut self, line: &str) -> Result<String> {
        let line = line.trim();
        let kind = CommandKind::classify(line);
        debug!("Dispatching '{}' command", kind);

        let response = match kind {
            CommandKind::List => self.list(),
            CommandKind::Todo => self.add(Task::todo(strip_keyword(line))?),
            CommandKind::Deadline => {
                let (description, due) = parse_deadline_args(strip_keyword(line))?;
                self.add(Task::deadline(description, due)?)
            }
            CommandKind::Event => {
                let (description, start, end) = parse_event_args(strip_keyword(line))?;
                self.add(Task::event(description, start, end)?)
            }
            CommandKind::Mark => self.set_done(line, kind, true)?,
            CommandKind::Unmark => self.set_done(line, kind, false)?,
            CommandKind::Delete => self.delete(line)?,
            CommandKind::Find => self.find(strip_keyword(line))?,
            CommandKind::Bye => FAREWELL.to_string(),
            CommandKind::Unknown => return Err(CoreError::UnknownCommand.into()),
        };

        if kind.is_mutating() {
            if let Err(e) = self.storage.save(&self.tasks) {
                // The in-memory list stays as is; the next successful save catches up
                error!("{}", e);
                return Ok(format!("{}\n{} {}", response, ERROR_MARKER, e));
            }
        }

        Ok(response)
    }

    fn list(&self) -> String {
        if self.tasks.is_empty() {
            return "You have no tasks in your list.".to_string();
        }
        format!(
            "Here are the tasks in your list:\n{}",
            numbered(self.tasks.iter())
        )
    }

    fn add(&mut self, task: Task) -> String {
        info!("Adding task: {}", task);
        let shown = task.to_string();
        self.tasks.add(task);
        format!(
            "Got it. I've added this task:\n  {}\n{}",
            shown,
            count_line(self.tasks.len())
        )
    }

    fn set_done(&mut self, line: &str, kind: CommandKind, done: bool) -> Result<String> {
        let number = parse_task_number(line, kind)?;
        let index = self.tasks.index_of_number(number)?;

        if done {
            self.tasks.mark_done(index);
        } else {
            self.tasks.mark_undone(index);
        }

        let task = self.tasks.get(index).ok_or(CoreError::IndexOutOfRange {
            number,
            size: self.tasks.len(),
        })?;

        Ok(if done {
            format!("Nice! I've marked this task as done:\n  {}", task)
        } else {
            format!("OK, I've marked this task as not done yet:\n  {}", task)
        })
    }

    fn delete(&mut self, line: &str) -> Result<String> {
        let number = parse_task_number(line, CommandKind::Delete)?;
        let index = self.tasks.index_of_number(number)?;
        let removed = self.tasks.delete(index)?;
        info!("Removed task #{}: {}", number, removed);

        Ok(format!(
            "Noted. I've removed this task:\n  {}\n{}",
            removed,
            count_line(self.tasks.len())
        ))
    }

    fn find(&self, rest: &str) -> Result<String> {
        let keyword = parse_find_keyword(rest)?;
        let found = self.tasks.find(keyword);

        if found.is_empty() {
            return Ok(format!("No matching tasks found for keyword: {}", keyword));
        }
        Ok(format!(
            "Here are the matching tasks in your list:\n{}",
            numbered(found)
        ))
    }
}

fn numbered<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| format!("{}.{}", i + 1, task))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_line(count: usize) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("Now you have {} {} in the list.", count, noun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn dispatcher_in(dir: &TempDir) -> Dispatcher {
        Dispatcher::new(FlatFileStorage::new(dir.path().join("megabot.txt")))
    }

    fn file_content(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("megabot.txt")).unwrap_or_default()
    }

    #[test]
    fn test_todo_is_added_and_saved() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);

        let response = bot.handle("todo read book");
        assert!(response.contains("read book"));
        assert!(response.contains("Now you have 1 task in the list."));
        assert!(!is_error_response(&response));
        assert_eq!(file_content(&dir), "T | 0 | read book\n");
    }

    #[test]
    fn test_deadline_then_mark() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);

        bot.handle("deadline submit /by 2023-12-01");
        let response = bot.handle("mark 1");
        assert!(response.contains("[D][X] submit (by: Dec 1 2023)"));
        assert_eq!(file_content(&dir), "D | 1 | submit | 2023-12-01 0000\n");

        let response = bot.handle("unmark 1");
        assert!(response.contains("[D][ ] submit (by: Dec 1 2023)"));
    }

    #[test]
    fn test_mark_twice_is_harmless() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);
        bot.handle("todo read book");

        bot.handle("mark 1");
        let response = bot.handle("mark 1");
        assert!(!is_error_response(&response));
        assert!(bot.tasks().get(0).unwrap().is_done());
    }

    #[test]
    fn test_backwards_event_rejected() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);

        let response = bot.handle("event trip /from 2023-01-05 /to 2023-01-01");
        assert!(response.starts_with(ERROR_MARKER));
        assert!(response.contains("Start time cannot be after end time"));
        assert!(bot.tasks().is_empty());
        assert!(!dir.path().join("megabot.txt").exists());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);
        bot.handle("todo read book");
        bot.handle("todo buy milk");

        let lower = bot.handle("find book");
        assert_eq!(lower, "Here are the matching tasks in your list:\n1.[T][ ] read book");
        assert_eq!(bot.handle("find BOOK"), lower);

        assert_eq!(
            bot.handle("find bread"),
            "No matching tasks found for keyword: bread"
        );
    }

    #[test]
    fn test_list() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);
        assert_eq!(bot.handle("list"), "You have no tasks in your list.");

        bot.handle("todo read book");
        bot.handle("event team sync /from 2023-12-01 0900 /to 2023-12-01 1000");
        assert_eq!(
            bot.handle("LIST"),
            "Here are the tasks in your list:\n\
             1.[T][ ] read book\n\
             2.[E][ ] team sync (from: Dec 1 2023 09:00 to: Dec 1 2023 10:00)"
        );
    }

    #[test]
    fn test_delete_bounds() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);
        bot.handle("todo one");
        bot.handle("todo two");

        for line in ["delete 3", "delete 0", "delete -1"] {
            let response = bot.handle(line);
            assert!(response.starts_with(ERROR_MARKER), "{}", line);
            assert!(response.contains("from 1 to 2"), "{}", line);
        }
        assert_eq!(bot.tasks().len(), 2);

        let response = bot.handle("delete 2");
        assert!(response.contains("Noted. I've removed this task:\n  [T][ ] two"));
        assert!(response.contains("Now you have 1 task in the list."));
        assert_eq!(file_content(&dir), "T | 0 | one\n");
    }

    #[test]
    fn test_errors_name_expected_syntax() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);

        let cases = [
            ("todo", "todo <task>"),
            ("deadline submit", "deadline <task> /by <date>"),
            ("event party /from 2023-01-01", "event <task> /from <start> /to <end>"),
            ("mark", "mark <task number>"),
            ("unmark x", "unmark <task number>"),
            ("find   ", "find <keyword>"),
        ];
        for (line, usage) in cases {
            let response = bot.handle(line);
            assert!(response.starts_with(ERROR_MARKER), "{}", line);
            assert!(response.contains(usage), "{} -> {}", line, response);
        }
        assert!(bot.handle("deadline x /by soonish").contains("'soonish'"));
        assert!(bot.tasks().is_empty());
    }

    #[test]
    fn test_unknown_and_bye_do_not_save() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);

        let response = bot.handle("dance");
        assert!(response.starts_with(ERROR_MARKER));
        assert!(response.contains("I don't understand"));
        assert_eq!(bot.handle("bye"), FAREWELL);
        assert_eq!(bot.handle(""), response);
        assert!(!dir.path().join("megabot.txt").exists());
    }

    #[test]
    fn test_tasks_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let mut bot = dispatcher_in(&dir);
            bot.handle("todo read book");
            bot.handle("deadline return book /by 25/12/2024 2:30 PM");
            bot.handle("mark 2");
        }

        let mut bot = dispatcher_in(&dir);
        assert_eq!(
            bot.handle("list"),
            "Here are the tasks in your list:\n\
             1.[T][ ] read book\n\
             2.[D][X] return book (by: Dec 25 2024 14:30)"
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("megabot.txt");
        fs::write(&path, "this is not a task\n".repeat(15)).unwrap();

        let mut bot = dispatcher_in(&dir);
        assert!(bot.tasks().is_empty());

        let first = bot.handle("list");
        assert!(first.starts_with(ERROR_MARKER));
        assert!(first.contains("Error loading tasks from file"));
        assert!(first.ends_with("You have no tasks in your list."));
        assert!(dir.path().join("megabot.txt.bak").exists());

        // Reported once only
        assert_eq!(bot.handle("list"), "You have no tasks in your list.");
    }

    #[test]
    fn test_partially_corrupt_file_loads_valid_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("megabot.txt");
        fs::write(
            &path,
            "T | 0 | a\nbroken\nT | 1 | b\nD | 0 | c\nT | 0 | d\n",
        )
        .unwrap();

        let mut bot = dispatcher_in(&dir);
        assert_eq!(bot.tasks().len(), 3);
        assert!(!is_error_response(&bot.handle("list")));
    }

    #[test]
    fn test_save_failure_is_reported_without_rollback() {
        let dir = TempDir::new().unwrap();
        let mut bot = dispatcher_in(&dir);
        // A directory where the file should be makes the final rename fail
        fs::create_dir(dir.path().join("megabot.txt")).unwrap();

        let response = bot.handle("todo read book");
        assert!(response.starts_with("Got it."));
        assert!(is_error_response(&response));
        assert!(response.contains("Could not save tasks"));
        assert_eq!(bot.tasks().len(), 1);
    }
}
