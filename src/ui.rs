//! Layout and drawing: board, sidebar, next preview, pause and game-over overlays.

use crate::board::Cell;
use crate::game::GameState;
use crate::tetromino::TetrominoKind;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so it looks square.
const CELL_WIDTH: u16 = 2;
const FILLED: &str = "██";
const EMPTY: &str = " ·";

const SIDEBAR_WIDTH: u16 = 24;

/// How long the board takes to fade out under the game-over overlay.
const GAME_OVER_FADE_MS: u32 = 600;

/// Running effect state owned by the app between frames.
#[derive(Default)]
pub struct Effects {
    game_over_fade: Option<Effect>,
    last_process: Option<Instant>,
}

impl Effects {
    /// Forget any running effect (new game).
    pub fn clear(&mut self) {
        self.game_over_fade = None;
        self.last_process = None;
    }
}

/// Board size in terminal cells including the border.
fn board_outer_size(state: &GameState) -> (u16, u16) {
    let w = state.board().width() as u16 * CELL_WIDTH + 2;
    let h = state.board().height() as u16 + 2;
    (w, h)
}

/// Draw the whole game screen.
pub fn draw(frame: &mut Frame, state: &GameState, theme: &Theme, effects: &mut Effects, now: Instant) {
    let area = frame.area();
    let (bw, bh) = board_outer_size(state);
    let total_w = bw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(bh), Constraint::Fill(1)])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let (board_area, sidebar_area) = (inner[0], inner[1]);

    let board_rect = draw_board(frame, state, theme, board_area);
    draw_sidebar(frame, state, theme, sidebar_area);

    if state.is_game_over() {
        apply_game_over_fade(frame, theme, board_rect, effects, now);
        draw_game_over(frame, state, theme, board_area);
    } else {
        effects.clear();
        if state.is_paused() {
            draw_pause_overlay(frame, theme, board_area);
        }
    }
}

/// Draws locked cells and the falling piece; returns the inner board rect.
fn draw_board(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" tetrotui ", theme.title));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    let bounds = inner.intersection(buf.area);
    for (y, row) in state.display_rows().iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let rx = inner.x + x as u16 * CELL_WIDTH;
            let ry = inner.y + y as u16;
            if rx + CELL_WIDTH > bounds.x + bounds.width || ry >= bounds.y + bounds.height {
                continue;
            }
            let (symbol, style) = match cell {
                Cell::Filled(kind) => {
                    let c = theme.piece_color(kind.color_index());
                    (FILLED, Style::default().fg(c).bg(theme.bg))
                }
                Cell::Empty => (EMPTY, Style::default().fg(theme.div_line).bg(theme.bg)),
            };
            buf.set_string(rx, ry, symbol, style);
        }
    }
    bounds
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Score + level
            Constraint::Length(5), // Next (border + title + preview)
            Constraint::Length(4), // Pause / new game
            Constraint::Fill(1),   // Controls
        ])
        .split(area);

    let stats = Block::default().borders(Borders::ALL).border_style(border_style);
    let stats_inner = stats.inner(chunks[0]);
    stats.render(chunks[0], frame.buffer_mut());
    Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(state.score().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Level: ", title_style),
            Span::styled(state.level().to_string(), fg_style),
        ]),
    ]))
    .render(stats_inner, frame.buffer_mut());

    let next = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next.inner(chunks[1]);
    next.render(chunks[1], frame.buffer_mut());
    draw_next_preview(frame, state.next_kind(), theme, next_inner);

    let pause_label = if state.is_paused() {
        "Resume"
    } else {
        "Pause"
    };
    let pause_style = if state.is_game_over() {
        dim_style
    } else {
        fg_style
    };
    let buttons = Block::default().borders(Borders::ALL).border_style(border_style);
    let buttons_inner = buttons.inner(chunks[2]);
    buttons.render(chunks[2], frame.buffer_mut());
    Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("Space ", title_style),
            Span::styled(pause_label, pause_style),
        ]),
        Line::from(vec![
            Span::styled("R     ", title_style),
            Span::styled("New Game", fg_style),
        ]),
    ]))
    .render(buttons_inner, frame.buffer_mut());

    let controls = vec![
        Line::from(Span::styled("Controls", title_style)),
        Line::from(Span::styled("← →  Move", dim_style)),
        Line::from(Span::styled("↓    Soft drop", dim_style)),
        Line::from(Span::styled("↑    Rotate", dim_style)),
        Line::from(Span::styled("Q    Quit", dim_style)),
    ];
    Paragraph::new(controls).render(chunks[3].inner(Margin::new(1, 0)), frame.buffer_mut());
}

/// Next piece drawn from its base shape, centred in the box.
fn draw_next_preview(frame: &mut Frame, kind: TetrominoKind, theme: &Theme, area: Rect) {
    let shape = kind.base_shape();
    let color = theme.piece_color(kind.color_index());
    let w = shape.width() as u16 * CELL_WIDTH;
    let h = shape.height() as u16;
    let off_x = area.width.saturating_sub(w) / 2;
    let off_y = area.height.saturating_sub(h) / 2;
    let buf = frame.buffer_mut();
    let bounds = area.intersection(buf.area);
    for (dx, dy) in shape.filled_cells() {
        let rx = area.x + off_x + dx as u16 * CELL_WIDTH;
        let ry = area.y + off_y + dy as u16;
        if rx + CELL_WIDTH <= bounds.x + bounds.width && ry < bounds.y + bounds.height {
            buf.set_string(rx, ry, FILLED, Style::default().fg(color));
        }
    }
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 18, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(Span::styled("Space to resume", Style::default().fg(theme.main_fg))),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let popup = centered_popup(area, 20, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over! ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(Span::styled(
            format!("Final Score: {}", state.score()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled("R  Play Again", Style::default().fg(theme.title).bold())),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

/// Fade the board to the background once the game ends (TachyonFX).
fn apply_game_over_fade(frame: &mut Frame, theme: &Theme, board_rect: Rect, effects: &mut Effects, now: Instant) {
    let delta = effects
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    effects.last_process = Some(now);

    let effect = effects.game_over_fade.get_or_insert_with(|| {
        fx::fade_to(theme.div_line, theme.bg, (GAME_OVER_FADE_MS, Interpolation::QuadOut))
            .with_area(board_rect)
    });
    frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
}
