// Rendering

use super::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const TITLE: Color = Color::Rgb(0x6B, 0x72, 0x80);
const ACCENT: Color = Color::Rgb(0xFF, 0xA5, 0xA5);
const MUTED: Color = Color::Rgb(0xAA, 0xAA, 0xAA);
const GRABBED: Color = Color::Rgb(0xD3, 0xD3, 0xD3);

pub fn draw(f: &mut Frame, app: &App) {
    let input_height = if app.show_input() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Length(input_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    if app.show_input() {
        draw_input(f, app, chunks[1]);
    }
    draw_tasks(f, app, chunks[2]);
    draw_help(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Span::styled(
        "To Do List",
        Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
    ));
    let add = Paragraph::new(Span::styled("Add a task + (a)", Style::default().fg(ACCENT)))
        .alignment(Alignment::Right);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    f.render_widget(title, halves[0]);
    f.render_widget(add, halves[1]);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title("New task (Enter to save)");

    let text = if app.input().is_empty() {
        Span::styled("Enter new task", Style::default().fg(MUTED))
    } else {
        Span::raw(app.input())
    };
    f.render_widget(Paragraph::new(text).block(block), area);

    f.set_cursor_position(input_cursor(area, app.input()));
}

/// Cursor cell just after the typed text, kept inside the input box
fn input_cursor(area: Rect, input: &str) -> (u16, u16) {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    let x = area.x.saturating_add(1).saturating_add(typed);
    (x.min(area.right().saturating_sub(2)), area.y.saturating_add(1))
}

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let tasks = app.visible_tasks();
    if tasks.is_empty() {
        let empty = Paragraph::new(Span::styled("No tasks yet", Style::default().fg(MUTED)));
        f.render_widget(empty, area);
        return;
    }

    let editing = match app.mode() {
        Mode::Editing { id } => Some(id.as_str()),
        _ => None,
    };
    let grabbed = match app.mode() {
        Mode::Dragging { id, .. } => Some(id.as_str()),
        _ => None,
    };

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let checkbox = if task.completed { "[x] " } else { "[ ] " };

            let text = if editing == Some(task.id.as_str()) {
                Span::styled(
                    format!("{}_", app.edit_text()),
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )
            } else if task.completed {
                Span::styled(
                    task.text.clone(),
                    Style::default().fg(MUTED).add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                Span::raw(task.text.clone())
            };

            let line = Line::from(vec![
                Span::styled(checkbox, Style::default().fg(MUTED)),
                text,
                Span::styled(format!("  {} {}", task.day, task.date), Style::default().fg(MUTED)),
            ]);

            let item = ListItem::new(line);
            if grabbed == Some(task.id.as_str()) {
                item.style(Style::default().bg(GRABBED).fg(Color::Black))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::TOP))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected().min(tasks.len() - 1)));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.mode() {
        Mode::Normal => "a add  e edit  d delete  space done  m move  q quit",
        Mode::Adding => "Enter save  Esc hide",
        Mode::Editing { .. } => "Enter save  Esc cancel",
        Mode::Dragging { .. } => "Up/Down move  Enter drop  Esc cancel",
    };
    f.render_widget(Paragraph::new(Span::styled(help, Style::default().fg(MUTED))), area);
}
