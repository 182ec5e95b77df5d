//! Terminal window front end
//!
//! A task panel, a conversation panel and a text box. Every submitted line
//! goes through the same [`Dispatcher`] as the console.

mod ui;

use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use megabot_core::CommandKind;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::dispatcher::Dispatcher;
use crate::display::welcome;
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

pub struct App<'a> {
    pub dispatcher: &'a mut Dispatcher,
    pub input: String,
    pub conversation: Vec<Message>,
    /// Lines scrolled up from the bottom of the conversation
    pub scroll: u16,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(dispatcher: &'a mut Dispatcher) -> Self {
        let mut conversation = vec![Message {
            speaker: Speaker::Bot,
            text: welcome().to_string(),
        }];
        if let Some(notice) = dispatcher.take_notice() {
            conversation.push(Message {
                speaker: Speaker::Bot,
                text: notice,
            });
        }

        Self {
            dispatcher,
            input: String::new(),
            conversation,
            scroll: 0,
            should_quit: false,
        }
    }

    /// Send the text box contents to the dispatcher
    pub fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            return;
        }

        let response = self.dispatcher.handle(&line);
        let is_bye = CommandKind::classify(&line) == CommandKind::Bye;

        self.conversation.push(Message {
            speaker: Speaker::User,
            text: line,
        });
        self.conversation.push(Message {
            speaker: Speaker::Bot,
            text: response,
        });
        self.scroll = 0;

        if is_bye {
            self.should_quit = true;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Up => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
    }
}

/// Open the window and run until the user leaves
pub fn run(dispatcher: &mut Dispatcher) -> Result<()> {
    enable_raw_mode().map_err(|e| CliError::terminal("Failed to enable raw mode", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| CliError::terminal("Failed to setup terminal", e))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| CliError::terminal("Failed to create terminal", e))?;

    let mut app = App::new(dispatcher);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    info!("Window closed");
    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| CliError::terminal("Failed to draw", e))?;

        if let Event::Key(key) =
            event::read().map_err(|e| CliError::terminal("Failed to read event", e))?
        {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
