use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::tanks::{
    PowerUpKind, TanksGame, TanksStatus, TerrainCell, GRID, KILLS_PER_LEVEL,
};
use crate::engine::{Direction as Heading, Point};
use crate::games::{Game, Services};
use crate::prefs::{KEY_TANKS_BEST, KEY_TANKS_COMFORT};

const FIELD_BG: Color = Color::Rgb(10, 12, 10);

pub struct Tanks {
    game: TanksGame,
    best: u32,
    best_submitted: bool,
}

impl Tanks {
    pub fn new(svc: &Services) -> Self {
        let comfort = svc.prefs.get_bool(KEY_TANKS_COMFORT, false);
        Tanks {
            game: TanksGame::new(comfort),
            best: svc.prefs.get_u32(KEY_TANKS_BEST, 0),
            best_submitted: false,
        }
    }

    fn dir_glyph(dir: Heading) -> &'static str {
        match dir {
            Heading::Up => "▲ ",
            Heading::Right => "▶ ",
            Heading::Down => "▼ ",
            Heading::Left => "◀ ",
        }
    }

    fn render_field(&self, width: usize) -> Vec<Line<'static>> {
        let pad = width.saturating_sub(GRID as usize * 2) / 2;
        let mut lines = Vec::with_capacity(GRID as usize);

        for y in 0..GRID {
            let mut spans = vec![Span::raw(" ".repeat(pad))];
            for x in 0..GRID {
                let p = Point::new(x, y);
                spans.push(self.cell_span(p));
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn cell_span(&self, p: Point) -> Span<'static> {
        let base_style = Style::default().bg(FIELD_BG);

        if self.game.bullets().iter().any(|b| b.pos == p) {
            return Span::styled("• ", base_style.fg(Color::Rgb(255, 255, 200)).add_modifier(Modifier::BOLD));
        }
        let player = self.game.player();
        if player.alive && player.pos == p {
            return Span::styled(
                Self::dir_glyph(player.dir),
                base_style.fg(Color::Rgb(80, 220, 255)).add_modifier(Modifier::BOLD),
            );
        }
        if let Some(enemy) = self.game.enemies().iter().find(|t| t.alive && t.pos == p) {
            return Span::styled(
                Self::dir_glyph(enemy.dir),
                base_style.fg(Color::Rgb(255, 90, 90)).add_modifier(Modifier::BOLD),
            );
        }
        if let Some(power_up) = self.game.power_ups().iter().find(|pu| pu.pos == p) {
            let (glyph, color) = match power_up.kind {
                PowerUpKind::Shield => ("✚ ", Color::Rgb(90, 230, 120)),
                PowerUpKind::RapidFire => ("↯ ", Color::Rgb(255, 220, 80)),
            };
            return Span::styled(glyph, base_style.fg(color).add_modifier(Modifier::BOLD));
        }
        match self.game.terrain_at(p) {
            TerrainCell::Empty => Span::styled("  ", base_style),
            TerrainCell::Brick => Span::styled("▒▒", base_style.fg(Color::Rgb(200, 110, 60))),
            TerrainCell::Steel => Span::styled("██", base_style.fg(Color::Rgb(140, 140, 155))),
            TerrainCell::Base => Span::styled(
                "▣▣",
                base_style.fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
            ),
        }
    }
}

impl Game for Tanks {
    fn update(&mut self, svc: &mut Services) {
        self.game.tick();
        for sound in self.game.take_sounds() {
            svc.audio.play(sound);
        }

        if self.game.status() == TanksStatus::Over && !self.best_submitted {
            self.best_submitted = true;
            if self.game.score() > self.best {
                self.best = self.game.score();
                svc.prefs.set(KEY_TANKS_BEST, &self.best);
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, svc: &mut Services) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.game.toggle_pause(),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let comfort = !self.game.comfort();
                self.game.set_comfort(comfort);
                svc.prefs.set(KEY_TANKS_COMFORT, &comfort);
            }
            _ => {
                if self.game.status() == TanksStatus::Over {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.reset();
                    }
                    return;
                }
                match key.code {
                    KeyCode::Up => self.game.press_direction(Heading::Up),
                    KeyCode::Right => self.game.press_direction(Heading::Right),
                    KeyCode::Down => self.game.press_direction(Heading::Down),
                    KeyCode::Left => self.game.press_direction(Heading::Left),
                    KeyCode::Char(' ') => self.game.press_fire(),
                    _ => {}
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(120, 180, 90)))
            .title(" 🪖 Tanks ")
            .title_style(Style::default().fg(Color::Rgb(160, 220, 110)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(GRID as u16),
                Constraint::Length(1),
            ])
            .split(inner);

        let shield = "✚".repeat(self.game.shield() as usize);
        let mut status = vec![
            Span::styled(
                format!(" Score: {} ", self.game.score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Lives: {} ", "♥ ".repeat(self.game.lives() as usize)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Level: {} ", self.game.level()),
                Style::default().fg(Color::Green),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Kills: {}/{} ", self.game.kills_this_level(), KILLS_PER_LEVEL),
                Style::default().fg(Color::Rgb(255, 140, 90)),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 Best: {} ", self.best), Style::default().fg(Color::Cyan)),
        ];
        if !shield.is_empty() {
            status.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            status.push(Span::styled(shield, Style::default().fg(Color::Rgb(90, 230, 120))));
        }
        if self.game.rapid_fire_active() {
            status.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            status.push(Span::styled("↯ RAPID", Style::default().fg(Color::Rgb(255, 220, 80))));
        }
        if self.game.comfort() {
            status.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            status.push(Span::styled("☕ Comfort", Style::default().fg(Color::Rgb(180, 160, 255))));
        }
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        let lines = self.render_field(chunks[1].width as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        let footer = match self.game.status() {
            TanksStatus::Over => Line::from(vec![
                Span::styled(" 💀 GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled("Press ENTER to restart, Esc for menu", Style::default().fg(Color::Gray)),
            ]),
            TanksStatus::Paused => Line::from(vec![Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )]),
            TanksStatus::Running => Line::from(vec![
                Span::styled(" ↑↓←→ Move ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("SPACE Fire ", Style::default().fg(Color::Yellow)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("C Comfort ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn reset(&mut self) {
        let comfort = self.game.comfort();
        self.game = TanksGame::new(comfort);
        self.best_submitted = false;
    }

    fn get_score(&self) -> u32 {
        self.game.score()
    }

    fn is_game_over(&self) -> bool {
        self.game.status() == TanksStatus::Over
    }
}
