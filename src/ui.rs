//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::game::{Game, Phase};
use crate::leaderboard::Leaderboard;
use crate::settings::Settings;
use crate::tetromino::PieceKind;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";

/// Render the entire game UI
pub fn render_game(
    frame: &mut Frame,
    game: &Game,
    settings: &Settings,
    leaderboard: &Leaderboard,
    name_entry: Option<&str>,
) {
    let area = frame.area();

    // board panel is 2 chars per cell plus borders
    let board_panel_width = game.board.width() as u16 * 2 + 2;
    let game_width = board_panel_width + 20;
    let game_height = game.board.height() as u16 + 2;

    let game_area = center_rect(area, game_width, game_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_panel_width),
            Constraint::Length(20), // next + stats + leaderboard
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),  // next preview
            Constraint::Length(9),  // stats
            Constraint::Min(4),     // leaderboard
        ])
        .split(main_layout[1]);

    let next_kind = game.next.as_ref().map(|p| p.kind);
    render_next(frame, right_layout[0], next_kind, settings);
    render_stats(frame, right_layout[1], game, leaderboard);
    render_leaderboard(frame, right_layout[2], leaderboard);

    // Overlays
    match game.phase {
        Phase::Idle => render_overlay(frame, area, "GRIDFALL", "Press Enter to start"),
        Phase::Paused => render_overlay(frame, area, "PAUSED", "Press P to resume"),
        Phase::Over => match name_entry {
            Some(name) => render_name_entry(frame, area, game, name),
            None => render_overlay(frame, area, "GAME OVER", "Enter restart  R reset  Q quit"),
        },
        Phase::Running => {}
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board with the active piece and its ghost
fn render_board(frame: &mut Frame, area: Rect, game: &Game, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let show_ghost = settings.visual.show_ghost;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Precompute active and ghost cell sets once per frame
    let active: Vec<(i32, i32)> = game
        .current
        .as_ref()
        .map(|p| p.block_positions())
        .unwrap_or_default();
    let ghost: Vec<(i32, i32)> = if show_ghost && game.phase == Phase::Running {
        game.current
            .as_ref()
            .map(|p| {
                let gy = p.ghost_y(&game.board);
                active
                    .iter()
                    .map(|&(x, y)| (x, y + (gy - p.y)))
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    let active_color = game
        .current
        .as_ref()
        .map(|p| p.kind.color())
        .unwrap_or(Color::White);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..game.board.height() as i32 {
        let mut spans = Vec::new();
        for col in 0..game.board.width() as i32 {
            let (text, style) = if active.contains(&(col, row)) {
                (block_char, Style::default().fg(active_color))
            } else if ghost.contains(&(col, row)) {
                (ghost_char, Style::default().fg(Color::DarkGray))
            } else {
                match game.board.get(col, row) {
                    Some(Cell::Filled(kind)) => (block_char, Style::default().fg(kind.color())),
                    _ => (EMPTY, Style::default()),
                }
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render the next-piece preview
fn render_next(frame: &mut Frame, area: Rect, next: Option<PieceKind>, settings: &Settings) {
    let (block_char, _) = settings.visual.block_chars();

    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kind) = next else { return };

    let color = kind.color();
    let cells = kind.cells();

    // drop fully empty rows so short matrices sit centered
    let mut lines: Vec<Line> = Vec::new();
    for row in cells.iter().filter(|r| r.iter().any(|&b| b)) {
        let mut spans = Vec::new();
        for &occupied in row {
            if occupied {
                spans.push(Span::styled(block_char, Style::default().fg(color)));
            } else {
                spans.push(Span::raw(EMPTY));
            }
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render score / level / lines panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game, leaderboard: &Leaderboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("SCORE ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", game.score.points),
            Style::default().fg(Color::Yellow).bold(),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("LEVEL ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", game.score.level),
            Style::default().fg(Color::Cyan),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("LINES ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}", game.score.lines),
            Style::default().fg(Color::Green),
        ),
    ]));

    if let Some(best) = leaderboard.best() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("BEST  ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}", best), Style::default().fg(Color::Magenta)),
        ]));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render the top-scores panel
fn render_leaderboard(frame: &mut Frame, area: Rect, leaderboard: &Leaderboard) {
    let block = Block::default()
        .title(" TOP ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (i, entry) in leaderboard.entries.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let mut name = entry.name.clone();
        name.truncate(8);
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::Gray)),
            Span::styled(format!("{:<8} ", name), Style::default().fg(Color::White)),
            Span::styled(format!("{}", entry.score), Style::default().fg(Color::Yellow)),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "no scores yet",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for idle/pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = (subtitle.len() as u16 + 6).max(24);
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Game-over modal with a name prompt for the leaderboard
fn render_name_entry(frame: &mut Frame, area: Rect, game: &Game, name: &str) {
    let popup_area = center_rect(area, 34, 8);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled("GAME OVER", Style::default().fg(Color::Yellow).bold()),
        Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", game.score.points),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::raw(""),
        Line::styled("Enter your name:", Style::default().fg(Color::Gray)),
        Line::from(vec![
            Span::styled(name, Style::default().fg(Color::Green)),
            Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
        Line::styled(
            "Enter save  Esc skip",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
