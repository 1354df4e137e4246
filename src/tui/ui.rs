//! Stateless UI rendering for tic-tac-toe.

use super::app::{App, status_message};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictactoe_core::{Board, Cell, GameMode, Mark, Position, TurnState};

/// Renders the whole screen for one state snapshot.
pub fn draw(frame: &mut Frame, app: &App, state: &TurnState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(2), // Annotation
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let subtitle = match state.mode() {
        GameMode::PvAutomated => format!("Versus AI ({})", app.provider_label()),
        GameMode::LocalPvp => "Local PvP".to_string(),
    };
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "TIC TAC TOE",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    if state.mode() == GameMode::PvAutomated
        && let Some(annotation) = state.annotation().filter(|a| !a.is_empty())
    {
        let bubble = Paragraph::new(format!("\u{201c}{}\u{201d}", annotation))
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
            .alignment(Alignment::Center);
        frame.render_widget(bubble, chunks[1]);
    }

    draw_board(frame, chunks[2], state, app.cursor());

    let status = Paragraph::new(status_message(state))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    let sound = if app.is_muted() { "unmute" } else { "mute" };
    let help = Paragraph::new(format!(
        "1-9/arrows+enter: move  r: reset  m: mode  s: {}  q: quit",
        sound
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn draw_board(frame: &mut Frame, area: Rect, state: &TurnState, cursor: Position) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    let highlight = state.outcome().winning_line();
    let dimmed = state.pending_automated_move() || state.outcome().is_terminal();
    for (row, area) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        let cells = [row * 3, row * 3 + 1, row * 3 + 2];
        draw_row(frame, area, state.board(), cursor, &cells, highlight, dimmed);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_row(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    cursor: Position,
    cells: &[usize; 3],
    highlight: Option<[usize; 3]>,
    dimmed: bool,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for (i, &index) in cells.iter().enumerate() {
        let is_winning = highlight.is_some_and(|line| line.contains(&index));
        let is_cursor = cursor.to_index() == index && !dimmed;
        draw_cell(frame, cols[i * 2], board, index, is_cursor, is_winning);
    }
    draw_separator_vertical(frame, cols[1]);
    draw_separator_vertical(frame, cols[3]);
}

fn draw_cell(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    index: usize,
    is_cursor: bool,
    is_winning: bool,
) {
    let label = (index + 1).to_string();
    let (symbol, base_style) = match board.get(index).unwrap_or(Cell::Empty) {
        Cell::Empty => (label.as_str(), Style::default().fg(Color::DarkGray)),
        Cell::Occupied(Mark::X) => (
            "X",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Cell::Occupied(Mark::O) => (
            "O",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if is_winning {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if is_cursor {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(format!(" {} ", symbol), style)),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(38))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"), Line::from("│"), Line::from("│")])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
