//! Window rendering

use chrono::{Local, NaiveDateTime};
use megabot_core::{Task, TaskStatus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{App, Speaker};
use crate::dispatcher::ERROR_MARKER;

pub fn draw(f: &mut Frame, app: &App) {
    let now = Local::now().naive_local();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(8),    // Panels
            Constraint::Length(3), // Status bar
            Constraint::Length(3), // Text box
        ])
        .split(f.area());

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[0]);

    draw_task_panel(f, app, panels[0], now);
    draw_conversation(f, app, panels[1]);
    draw_status_bar(f, app, chunks[1], now);
    draw_input(f, app, chunks[2]);
}

fn draw_task_panel(f: &mut Frame, app: &App, area: Rect, now: NaiveDateTime) {
    let items: Vec<ListItem> = app
        .dispatcher
        .tasks()
        .iter()
        .enumerate()
        .map(|(i, task)| task_item(i + 1, task, now))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tasks ")
            .title_alignment(Alignment::Left)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(list, area);
}

fn task_item(number: usize, task: &Task, now: NaiveDateTime) -> ListItem<'static> {
    let text_style = if task.is_done() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(format!("{}. ", number), Style::default().fg(Color::Cyan)),
        Span::styled(task.to_display_string(), text_style),
    ];

    if let Some(status) = task.status(now) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", status.label()),
            Style::default().fg(status_color(status)),
        ));
    }

    ListItem::new(Line::from(spans))
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::Overdue => Color::Red,
        TaskStatus::DueSoon => Color::Yellow,
        TaskStatus::Upcoming => Color::Blue,
        TaskStatus::Ongoing => Color::Magenta,
        TaskStatus::Ended => Color::DarkGray,
    }
}

fn draw_conversation(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for message in &app.conversation {
        match message.speaker {
            Speaker::User => lines.push(Line::from(Span::styled(
                format!("> {}", message.text),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))),
            Speaker::Bot => {
                for text in message.text.lines() {
                    let style = if text.starts_with(ERROR_MARKER) {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::from(Span::styled(text.to_string(), style)));
                }
            }
        }
        lines.push(Line::from(""));
    }

    // Keep the newest lines in view unless the user scrolled up
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let rendered: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(inner_width))
        .sum();
    let bottom = rendered.saturating_sub(inner_height);
    let offset = bottom.saturating_sub(app.scroll as usize);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" MegaBot ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));

    f.render_widget(paragraph, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, now: NaiveDateTime) {
    let tasks = app.dispatcher.tasks();
    let total = tasks.len();
    let done = tasks.count_completed();
    let overdue = tasks.count_overdue(now);

    let status = vec![
        Span::raw(" "),
        Span::styled(format!("{} total", total), Style::default()),
        Span::raw(" | "),
        Span::styled(format!("{} done", done), Style::default().fg(Color::Green)),
        Span::raw(" | "),
        if overdue > 0 {
            Span::styled(format!("{} overdue", overdue), Style::default().fg(Color::Red))
        } else {
            Span::styled("0 overdue", Style::default().fg(Color::DarkGray))
        },
        Span::raw(" | "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Send "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Quit"),
    ];

    let paragraph = Paragraph::new(Line::from(status))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Say something "),
    );
    f.render_widget(input, area);

    let max_x = area.x + area.width.saturating_sub(2);
    let cursor_x = (area.x + 1).saturating_add(app.input.chars().count() as u16);
    f.set_cursor_position((cursor_x.min(max_x), area.y + 1));
}
