//! Command grammar
//!
//! Classifies a raw input line by its leading keyword. Classification never
//! looks at the arguments: a malformed `deadline` line is still a
//! [`CommandKind::Deadline`] and fails later, in the parser.

/// The closed set of commands understood by MegaBot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    List,
    Todo,
    Deadline,
    Event,
    Mark,
    Unmark,
    Delete,
    Find,
    Bye,
    Unknown,
}

impl CommandKind {
    /// Every known command, in help order
    pub const KNOWN: [CommandKind; 9] = [
        CommandKind::List,
        CommandKind::Todo,
        CommandKind::Deadline,
        CommandKind::Event,
        CommandKind::Mark,
        CommandKind::Unmark,
        CommandKind::Delete,
        CommandKind::Find,
        CommandKind::Bye,
    ];

    /// Classify an input line (case-insensitive)
    ///
    /// `list` and `bye` only match exactly; every other keyword matches the
    /// bare word or the word followed by a space.
    pub fn classify(line: &str) -> Self {
        let input = line.trim().to_lowercase();
        if input.is_empty() {
            return CommandKind::Unknown;
        }

        Self::KNOWN
            .iter()
            .copied()
            .find(|kind| {
                let keyword = kind.keyword();
                if kind.takes_arguments() {
                    input == keyword
                        || input
                            .strip_prefix(keyword)
                            .is_some_and(|rest| rest.starts_with(' '))
                } else {
                    input == keyword
                }
            })
            .unwrap_or(CommandKind::Unknown)
    }

    /// The keyword typed by the user
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::List => "list",
            CommandKind::Todo => "todo",
            CommandKind::Deadline => "deadline",
            CommandKind::Event => "event",
            CommandKind::Mark => "mark",
            CommandKind::Unmark => "unmark",
            CommandKind::Delete => "delete",
            CommandKind::Find => "find",
            CommandKind::Bye => "bye",
            CommandKind::Unknown => "",
        }
    }

    /// Full expected syntax, quoted back to the user in error messages
    pub fn usage(&self) -> &'static str {
        match self {
            CommandKind::List => "list",
            CommandKind::Todo => "todo <task>",
            CommandKind::Deadline => "deadline <task> /by <date>",
            CommandKind::Event => "event <task> /from <start> /to <end>",
            CommandKind::Mark => "mark <task number>",
            CommandKind::Unmark => "unmark <task number>",
            CommandKind::Delete => "delete <task number>",
            CommandKind::Find => "find <keyword>",
            CommandKind::Bye => "bye",
            CommandKind::Unknown => "",
        }
    }

    /// Whether executing this command changes the task list
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            CommandKind::Todo
                | CommandKind::Deadline
                | CommandKind::Event
                | CommandKind::Mark
                | CommandKind::Unmark
                | CommandKind::Delete
        )
    }

    fn takes_arguments(&self) -> bool {
        !matches!(self, CommandKind::List | CommandKind::Bye)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Unknown => write!(f, "unknown"),
            kind => write!(f, "{}", kind.keyword()),
        }
    }
}
