//! Task domain model
//!
//! Pure domain logic for task management with no I/O operations.

use chrono::{Duration, NaiveDateTime};

use crate::command::CommandKind;
use crate::date::{format_display, parse_date_time};
use crate::error::{CoreError, Result};

/// Type-specific temporal data of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    ToDo,
    Deadline { due: NaiveDateTime },
    /// `start <= end` always holds
    Event {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// Single-letter tag used in display and storage
    pub fn tag(&self) -> char {
        match self {
            TaskKind::ToDo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

/// Time-relative status label of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    Overdue,
    DueSoon,
    Upcoming,
    Ongoing,
    Ended,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
            TaskStatus::DueSoon => "due soon",
            TaskStatus::Upcoming => "upcoming",
            TaskStatus::Ongoing => "ongoing",
            TaskStatus::Ended => "ended",
        }
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    /// Create a todo
    pub fn todo(description: &str) -> Result<Self> {
        let description = require_description(description, CommandKind::Todo, "a todo")?;
        Ok(Self::with_kind(description, TaskKind::ToDo))
    }

    /// Create a deadline, parsing the due date/time once
    pub fn deadline(description: &str, due: &str) -> Result<Self> {
        let description = require_description(description, CommandKind::Deadline, "a deadline")?;
        let due = parse_date_time(due)?;
        Ok(Self::with_kind(description, TaskKind::Deadline { due }))
    }

    /// Create an event; fails with [`CoreError::InvalidRange`] if it ends before it starts
    pub fn event(description: &str, start: &str, end: &str) -> Result<Self> {
        let description = require_description(description, CommandKind::Event, "an event")?;
        let start = parse_date_time(start)?;
        let end = parse_date_time(end)?;

        if start > end {
            return Err(CoreError::InvalidRange {
                start: format_display(start),
                end: format_display(end),
            });
        }

        Ok(Self::with_kind(description, TaskKind::Event { start, end }))
    }

    fn with_kind(description: String, kind: TaskKind) -> Self {
        Self {
            description,
            done: false,
            kind,
        }
    }

    /// Builder method to set completion status
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Mark as done; idempotent
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Mark as not done; idempotent
    pub fn mark_undone(&mut self) {
        self.done = false;
    }

    /// Render as `[<kind>][<X| >] <description> (<temporal suffix>)`
    pub fn to_display_string(&self) -> String {
        let icon = if self.done { 'X' } else { ' ' };
        let head = format!("[{}][{}] {}", self.kind.tag(), icon, self.description);

        match &self.kind {
            TaskKind::ToDo => head,
            TaskKind::Deadline { due } => format!("{} (by: {})", head, format_display(*due)),
            TaskKind::Event { start, end } => format!(
                "{} (from: {} to: {})",
                head,
                format_display(*start),
                format_display(*end)
            ),
        }
    }

    /// Status label relative to `now`; `None` for an open todo
    pub fn status(&self, now: NaiveDateTime) -> Option<TaskStatus> {
        if self.done {
            return Some(TaskStatus::Completed);
        }

        match &self.kind {
            TaskKind::ToDo => None,
            TaskKind::Deadline { due } => Some(if now > *due {
                TaskStatus::Overdue
            } else if now + Duration::days(1) > *due {
                TaskStatus::DueSoon
            } else {
                TaskStatus::Upcoming
            }),
            TaskKind::Event { start, end } => Some(if now < *start {
                TaskStatus::Upcoming
            } else if now <= *end {
                TaskStatus::Ongoing
            } else {
                TaskStatus::Ended
            }),
        }
    }

    /// Check if an open deadline has passed
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status(now) == Some(TaskStatus::Overdue)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

fn require_description(description: &str, kind: CommandKind, noun: &str) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(CoreError::empty_description(noun, kind.usage()));
    }
    Ok(description.to_string())
}

/// Ordered in-memory collection of tasks
///
/// Position is the only identity: indices are always `0..len()` and a
/// deletion shifts later tasks down by one. Users see 1-based numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Create a new empty task list
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a task
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Get a task by 0-based index
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.tasks.len()
    }

    /// Convert a 1-based task number typed by the user into an index
    pub fn index_of_number(&self, number: i64) -> Result<usize> {
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|index| self.is_valid_index(*index))
            .ok_or(CoreError::IndexOutOfRange {
                number,
                size: self.len(),
            })
    }

    /// Mark the task at `index` done; out-of-range indices are ignored
    pub fn mark_done(&mut self, index: usize) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.mark_done();
        }
    }

    /// Mark the task at `index` not done; out-of-range indices are ignored
    pub fn mark_undone(&mut self, index: usize) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.mark_undone();
        }
    }

    /// Remove and return the task at `index`
    pub fn delete(&mut self, index: usize) -> Result<Task> {
        if !self.is_valid_index(index) {
            return Err(CoreError::IndexOutOfRange {
                number: i64::try_from(index).map_or(i64::MAX, |i| i.saturating_add(1)),
                size: self.len(),
            });
        }
        Ok(self.tasks.remove(index))
    }

    /// Count total tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if list is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks whose description contains `keyword`, case-insensitively, in list order
    pub fn find(&self, keyword: &str) -> Vec<&Task> {
        let keyword = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| task.description.to_lowercase().contains(&keyword))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Count completed tasks
    pub fn count_completed(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    /// Count overdue tasks
    pub fn count_overdue(&self, now: NaiveDateTime) -> usize {
        self.tasks.iter().filter(|task| task.is_overdue(now)).count()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_list() -> TaskList {
        let mut list = TaskList::new();
        list.add(Task::todo("read book").unwrap());
        list.add(Task::todo("buy milk").unwrap());
        list.add(Task::deadline("return Book", "2023-12-01").unwrap());
        list
    }

    #[test]
    fn test_todo_creation() {
        let task = Task::todo("  read book ").unwrap();
        assert_eq!(task.description(), "read book");
        assert!(!task.is_done());
        assert_eq!(task.kind(), &TaskKind::ToDo);
    }

    #[test]
    fn test_blank_description_rejected() {
        assert!(matches!(
            Task::todo("   "),
            Err(CoreError::EmptyDescription { .. })
        ));
        assert!(matches!(
            Task::deadline("", "2023-12-01"),
            Err(CoreError::EmptyDescription { .. })
        ));
        assert!(matches!(
            Task::event(" ", "2023-12-01", "2023-12-02"),
            Err(CoreError::EmptyDescription { .. })
        ));
    }

    #[test]
    fn test_deadline_bad_date_propagates() {
        assert!(matches!(
            Task::deadline("submit", "someday"),
            Err(CoreError::DateFormat { .. })
        ));
    }

    #[test]
    fn test_event_range_enforced() {
        let err = Task::event("trip", "2023-01-05", "2023-01-01").unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));

        // Zero-length events are allowed
        let task = Task::event("call", "2023-01-01 1000", "2023-01-01 1000").unwrap();
        match task.kind() {
            TaskKind::Event { start, end } => assert!(start <= end),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_display_strings() {
        let todo = Task::todo("read book").unwrap();
        assert_eq!(todo.to_display_string(), "[T][ ] read book");

        let deadline = Task::deadline("submit", "2023-12-01").unwrap().with_done(true);
        assert_eq!(deadline.to_display_string(), "[D][X] submit (by: Dec 1 2023)");

        let event = Task::event("team sync", "2023-12-01 0900", "2023-12-01 1000").unwrap();
        assert_eq!(
            event.to_string(),
            "[E][ ] team sync (from: Dec 1 2023 09:00 to: Dec 1 2023 10:00)"
        );
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut task = Task::todo("read book").unwrap();
        task.mark_undone();
        assert!(!task.is_done());

        task.mark_done();
        task.mark_done();
        assert!(task.is_done());

        task.mark_undone();
        assert!(!task.is_done());
    }

    #[test]
    fn test_deadline_status() {
        let task = Task::deadline("submit", "2023-12-01 1200").unwrap();
        assert_eq!(task.status(at(2023, 11, 20, 0)), Some(TaskStatus::Upcoming));
        assert_eq!(task.status(at(2023, 12, 1, 0)), Some(TaskStatus::DueSoon));
        assert_eq!(task.status(at(2023, 12, 2, 0)), Some(TaskStatus::Overdue));
        assert!(task.is_overdue(at(2023, 12, 2, 0)));

        let done = task.with_done(true);
        assert_eq!(done.status(at(2023, 12, 2, 0)), Some(TaskStatus::Completed));
        assert!(!done.is_overdue(at(2023, 12, 2, 0)));
    }

    #[test]
    fn test_event_status() {
        let task = Task::event("trip", "2023-01-01", "2023-01-05").unwrap();
        assert_eq!(task.status(at(2022, 12, 31, 0)), Some(TaskStatus::Upcoming));
        assert_eq!(task.status(at(2023, 1, 3, 0)), Some(TaskStatus::Ongoing));
        assert_eq!(task.status(at(2023, 1, 6, 0)), Some(TaskStatus::Ended));
        assert_eq!(Task::todo("x").unwrap().status(at(2023, 1, 1, 0)), None);
    }

    #[test]
    fn test_list_add_and_get() {
        let list = sample_list();
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
        assert_eq!(list.get(1).unwrap().description(), "buy milk");
        assert!(list.get(3).is_none());
        assert!(list.is_valid_index(2));
        assert!(!list.is_valid_index(3));
    }

    #[test]
    fn test_list_mark_out_of_range_is_noop() {
        let mut list = sample_list();
        let before = list.clone();
        list.mark_done(10);
        list.mark_undone(3);
        assert_eq!(list, before);

        list.mark_done(0);
        assert!(list.get(0).unwrap().is_done());
        list.mark_undone(0);
        assert!(!list.get(0).unwrap().is_done());
    }

    #[test]
    fn test_delete_boundaries() {
        let mut list = sample_list();

        let err = list.delete(3).unwrap_err();
        assert_eq!(err, CoreError::IndexOutOfRange { number: 4, size: 3 });

        let removed = list.delete(2).unwrap();
        assert_eq!(removed.description(), "return Book");
        assert_eq!(list.len(), 2);

        // Later tasks shift down
        list.delete(0).unwrap();
        assert_eq!(list.get(0).unwrap().description(), "buy milk");
    }

    #[test]
    fn test_size_tracks_adds_and_deletes() {
        let mut list = TaskList::new();
        let mut expected = 0usize;
        for i in 0..6 {
            list.add(Task::todo(&format!("task {}", i)).unwrap());
            expected += 1;
            if i % 2 == 1 {
                list.delete(0).unwrap();
                expected -= 1;
            }
            if list.delete(list.len()).is_ok() {
                expected -= 1;
            }
        }
        assert_eq!(list.len(), expected);
        assert!((0..list.len()).all(|i| list.is_valid_index(i)));
    }

    #[test]
    fn test_index_of_number() {
        let list = sample_list();
        assert_eq!(list.index_of_number(1).unwrap(), 0);
        assert_eq!(list.index_of_number(3).unwrap(), 2);
        for bad in [0, -1, 4, i64::MIN] {
            assert_eq!(
                list.index_of_number(bad).unwrap_err(),
                CoreError::IndexOutOfRange {
                    number: bad,
                    size: 3
                }
            );
        }
    }

    #[test]
    fn test_find_case_insensitive_in_order() {
        let list = sample_list();

        let found: Vec<&str> = list.find("BOOK").iter().map(|t| t.description()).collect();
        assert_eq!(found, vec!["read book", "return Book"]);

        assert!(list.find("bread").is_empty());
    }

    #[test]
    fn test_counts() {
        let mut list = sample_list();
        list.mark_done(0);
        assert_eq!(list.count_completed(), 1);
        assert_eq!(list.count_overdue(at(2024, 1, 1, 0)), 1);
        assert_eq!(list.count_overdue(at(2023, 1, 1, 0)), 0);
    }
}
