//! Terminal rendering of a run.
//!
//! Layout:
//! ```text
//! | ====== HP ====== | Floor | Enemies |
//! |        dungeon grid               |
//! | log (newest first) | controls     |
//! |            status line            |
//! ```

use dungeon::Position;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

use crate::game::{Game, Status};

pub const PLAYER_GLYPH: char = '@';

/// Glyph for one cell: player over enemy over terrain
pub fn cell_glyph(game: &Game, pos: Position) -> char {
    if game.player().position == pos {
        return PLAYER_GLYPH;
    }
    if let Some(enemy) = game.enemy_at(pos) {
        return enemy.symbol();
    }
    game.dungeon().tile(pos).map_or(' ', |tile| tile.glyph())
}

/// Plain-text board, one string per row
pub fn board_lines(game: &Game) -> Vec<String> {
    (0..game.height())
        .map(|y| {
            (0..game.width())
                .map(|x| cell_glyph(game, Position::new(x, y)))
                .collect()
        })
        .collect()
}

/// One-line summary used by the headless driver
pub fn hud_line(game: &Game) -> String {
    format!(
        "HP: {}/{}  Floor: {}  Enemies: {}  [{}]",
        game.player().hp,
        game.player().max_hp,
        game.floor(),
        game.enemy_count(),
        game.status().label()
    )
}

pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, game: &Game) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                        // HUD
                Constraint::Length(board_height(game)),       // grid
                Constraint::Min(7),                           // log + controls
                Constraint::Length(1),                        // status
            ])
            .split(frame.area());

        self.render_hud(frame, chunks[0], game);
        self.render_board(frame, chunks[1], game);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        self.render_log(frame, bottom[0], game);
        self.render_controls(frame, bottom[1]);
        self.render_status(frame, chunks[3], game);
    }

    fn render_hud(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(14),
            ])
            .split(area);

        let player = game.player();
        let ratio = (f64::from(player.hp.max(0)) / f64::from(player.max_hp)).clamp(0.0, 1.0);
        let hp_color = if ratio > 0.5 {
            Color::Green
        } else if ratio > 0.25 {
            Color::Yellow
        } else {
            Color::Red
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("HP"))
            .gauge_style(Style::default().fg(hp_color))
            .ratio(ratio)
            .label(format!("{}/{}", player.hp, player.max_hp));
        frame.render_widget(gauge, chunks[0]);

        let floor = Paragraph::new(game.floor().to_string())
            .block(Block::default().borders(Borders::ALL).title("Floor"))
            .alignment(Alignment::Center);
        frame.render_widget(floor, chunks[1]);

        let enemies = Paragraph::new(game.enemy_count().to_string())
            .block(Block::default().borders(Borders::ALL).title("Enemies"))
            .alignment(Alignment::Center);
        frame.render_widget(enemies, chunks[2]);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let lines: Vec<Line> = (0..game.height())
            .map(|y| {
                let spans: Vec<Span> = (0..game.width())
                    .map(|x| {
                        let glyph = cell_glyph(game, Position::new(x, y));
                        Span::styled(glyph.to_string(), glyph_style(glyph))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(board, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let items: Vec<ListItem> = game
            .messages()
            .enumerate()
            .map(|(i, message)| {
                let style = if i == 0 {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(message.text.clone(), style)))
            })
            .collect();

        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Log"));
        frame.render_widget(list, area);
    }

    fn render_controls(&self, frame: &mut Frame, area: Rect) {
        let text = vec![
            Line::from("Move: Arrow keys or WASD"),
            Line::from("Attack: move into enemy tile"),
            Line::from("Restart: R"),
            Line::from("Next floor: N (after defeating all enemies)"),
            Line::from("Quit: Q / Esc"),
        ];
        let controls =
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Controls"));
        frame.render_widget(controls, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, game: &Game) {
        let color = match game.status() {
            Status::Playing => Color::Green,
            Status::Won => Color::Cyan,
            Status::Lost => Color::Red,
        };
        let status = Paragraph::new(format!("{}  (seed {})", game.status().label(), game.seed()))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(status, area);
    }
}

impl Default for GameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid rows plus the two border lines
fn board_height(game: &Game) -> u16 {
    u16::try_from(game.height())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

fn glyph_style(glyph: char) -> Style {
    match glyph {
        PLAYER_GLYPH => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        'g' => Style::default().fg(Color::Red),
        '#' => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Gray),
    }
}
