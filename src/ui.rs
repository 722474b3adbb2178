#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Board and particle coordinates are tiny compared to u16/i32 ranges
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use crate::app::App;
use crate::components::{GameState, Particle, TetrominoType};
use crate::game::{COLS, ROWS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Each cell is 2 characters wide and 1 tall
const CELL_WIDTH: u16 = 2;
const BOARD_WIDTH: u16 = COLS as u16 * CELL_WIDTH + 2; // +2 for borders
const BOARD_HEIGHT: u16 = ROWS as u16 + 2;
const MIN_INFO_WIDTH: u16 = 22;
pub const MIN_TOTAL_WIDTH: u16 = BOARD_WIDTH + MIN_INFO_WIDTH;
pub const MIN_TOTAL_HEIGHT: u16 = BOARD_HEIGHT + 2;

pub fn render(f: &mut Frame, app: &mut App) {
    if f.area().width < MIN_TOTAL_WIDTH || f.area().height < MIN_TOTAL_HEIGHT {
        {
            let mut game_state = app.world.resource_mut::<GameState>();
            if !game_state.game_over() && !game_state.paused {
                game_state.paused = true;
                game_state.was_paused_for_resize = true;
            }
        }

        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Blockfall - Paused"),
        );
        f.render_widget(warning_text, centered_rect(50, 30, f.area()));
        return;
    } else if app.game_state().was_paused_for_resize {
        let mut game_state = app.world.resource_mut::<GameState>();
        game_state.was_paused_for_resize = false;
        game_state.paused = false;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(MIN_INFO_WIDTH)])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Length(BOARD_HEIGHT), // Game board
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);
    render_info(f, app.game_state(), main_layout[1]);
}

fn render_info(f: &mut Frame, game_state: &GameState, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(5), // Stats
            Constraint::Length(3), // Status
            Constraint::Min(8),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let stats = Paragraph::new(stats_text(game_state)).wrap(Wrap { trim: true });
    f.render_widget(stats, info_layout[1]);

    if game_state.new_high_score {
        let banner = Paragraph::new("NEW HIGH SCORE!")
            .style(
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(banner, info_layout[2]);
    }

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↑: Rotate\n\
        ↓: Soft drop\n\
        Space: Hard drop\n\
        P: Pause\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

#[must_use]
pub fn stats_text(game_state: &GameState) -> String {
    format!(
        "Score: {}\nLines: {}\nLevel: {}\nHigh Score: {}",
        game_state.score,
        game_state.lines_cleared,
        game_state.level(),
        game_state.high_score,
    )
}

/// Symbol and style for one display-grid value: locked or active blocks are
/// solid, ghost cells (negative ids) are shaded.
#[must_use]
pub fn cell_appearance(value: i8) -> Option<(&'static str, Style)> {
    let tetromino_type = TetrominoType::from_color_id(value.unsigned_abs())?;
    let color = tetromino_type.get_color();
    if value > 0 {
        Some(("██", Style::default().fg(color).bg(Color::Black)))
    } else {
        Some((
            "░░",
            Style::default()
                .fg(color)
                .bg(Color::Black)
                .add_modifier(Modifier::DIM),
        ))
    }
}

/// Text for the board overlay, if any.
#[must_use]
pub fn overlay_text(game_state: &GameState) -> Option<&'static str> {
    if game_state.game_over() {
        Some("GAME OVER\nEnter: play again")
    } else if game_state.was_paused_for_resize {
        None
    } else if game_state.paused && game_state.score == 0 && game_state.lines_cleared == 0 {
        Some("Press P to start")
    } else if game_state.paused {
        Some("PAUSED\nP: resume")
    } else {
        None
    }
}

fn render_game_board(f: &mut Frame, app: &mut App, area: Rect) {
    let inner_area = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    let grid = app.display_grid();
    for (y, row) in grid.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let Some((symbol, style)) = cell_appearance(value) else {
                continue;
            };
            let cell_x = inner_area.left() + x as u16 * CELL_WIDTH;
            let cell_y = inner_area.top() + y as u16;
            if cell_x + 1 < inner_area.right() && cell_y < inner_area.bottom() {
                f.buffer_mut().set_string(cell_x, cell_y, symbol, style);
            }
        }
    }

    render_particles(f, app, inner_area);

    if let Some(text) = overlay_text(app.game_state()) {
        let color = if app.game_state().game_over() {
            Color::Red
        } else {
            Color::LightCyan
        };
        let overlay_area = Rect {
            x: inner_area.x + 1,
            y: inner_area.y + inner_area.height / 2 - 1,
            width: inner_area.width.saturating_sub(2),
            height: 2,
        };
        let overlay = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(Clear, overlay_area);
        f.render_widget(overlay, overlay_area);
    }
}

fn render_particles(f: &mut Frame, app: &mut App, area: Rect) {
    let particles: Vec<Particle> = app
        .world
        .query::<&Particle>()
        .iter(&app.world)
        .cloned()
        .collect();

    for particle in particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= COLS as u16 || y >= ROWS as u16 {
            continue;
        }

        let particle_x = area.left() + x * CELL_WIDTH;
        let particle_y = area.top() + y;
        let symbol = if particle.size > 0.7 {
            "█"
        } else if particle.size > 0.4 {
            "▓"
        } else {
            "▒"
        };

        if let Some(cell) = f.buffer_mut().cell_mut((particle_x, particle_y)) {
            cell.set_symbol(symbol);
            cell.set_fg(particle.color);
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
