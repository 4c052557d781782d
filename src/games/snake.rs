use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::snake::{SnakeGame, SnakeSpeed, SnakeStatus, GRID_H, GRID_W};
use crate::engine::{Direction as Heading, Point};
use crate::event::TICK_MS;
use crate::games::{Game, Services};

const FIELD_BG: Color = Color::Rgb(8, 14, 8);
const FOOD_GLYPHS: [(&str, Color); 4] = [
    ("◆ ", Color::Rgb(255, 90, 90)),
    ("● ", Color::Rgb(255, 180, 60)),
    ("♥ ", Color::Rgb(255, 110, 180)),
    ("★ ", Color::Rgb(255, 230, 90)),
];

pub fn best_key(speed: SnakeSpeed) -> String {
    format!("snake_best_{}", speed.label().to_lowercase())
}

pub struct Snake {
    game: SnakeGame,
    best: u32,
    best_submitted: bool,
}

impl Snake {
    pub fn new(svc: &Services) -> Self {
        let speed = SnakeSpeed::Brisk;
        Snake {
            game: SnakeGame::new(speed),
            best: svc.prefs.get_u32(&best_key(speed), 0),
            best_submitted: false,
        }
    }

    fn change_speed(&mut self, speed: SnakeSpeed, svc: &Services) {
        self.game.set_speed(speed);
        self.best = svc.prefs.get_u32(&best_key(speed), 0);
    }

    fn render_field(&self, width: usize) -> Vec<Line<'static>> {
        let pad = width.saturating_sub(GRID_W as usize * 2 + 2) / 2;
        let border_style = Style::default().fg(Color::Rgb(60, 110, 60));
        let mut lines = Vec::with_capacity(GRID_H as usize + 2);

        let pad_span = Span::raw(" ".repeat(pad));
        lines.push(Line::from(vec![
            pad_span.clone(),
            Span::styled(format!("╭{}╮", "─".repeat(GRID_W as usize * 2)), border_style),
        ]));
        for y in 0..GRID_H {
            let mut spans = vec![pad_span.clone(), Span::styled("│", border_style)];
            for x in 0..GRID_W {
                spans.push(self.cell_span(Point::new(x, y)));
            }
            spans.push(Span::styled("│", border_style));
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(vec![
            pad_span,
            Span::styled(format!("╰{}╯", "─".repeat(GRID_W as usize * 2)), border_style),
        ]));
        lines
    }

    fn cell_span(&self, p: Point) -> Span<'static> {
        let base_style = Style::default().bg(FIELD_BG);

        if self.game.head() == p {
            return Span::styled(
                "◉ ",
                base_style.fg(Color::Rgb(120, 255, 120)).add_modifier(Modifier::BOLD),
            );
        }
        if self.game.body().any(|&b| b == p) {
            return Span::styled("● ", base_style.fg(Color::Rgb(80, 200, 80)));
        }
        if self.game.food() == p {
            let (glyph, color) = FOOD_GLYPHS[self.game.food_kind() as usize % FOOD_GLYPHS.len()];
            return Span::styled(glyph, base_style.fg(color).add_modifier(Modifier::BOLD));
        }
        Span::styled("  ", base_style)
    }

    fn overlay_line(&self) -> Option<Line<'static>> {
        match self.game.status() {
            SnakeStatus::Idle => Some(Line::from(vec![
                Span::styled(" 🐍 Ready ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled("Press ENTER to start", Style::default().fg(Color::Gray)),
            ])),
            SnakeStatus::Countdown(n) => Some(Line::from(Span::styled(
                format!(" {} ... ", n),
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
            ))),
            SnakeStatus::Paused => Some(Line::from(Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))),
            SnakeStatus::Ended => Some(Line::from(vec![
                Span::styled(" 💀 GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled("Press ENTER to restart, Esc for menu", Style::default().fg(Color::Gray)),
            ])),
            SnakeStatus::Running => None,
        }
    }
}

impl Game for Snake {
    fn update(&mut self, svc: &mut Services) {
        self.game.tick(TICK_MS);
        for sound in self.game.take_sounds() {
            svc.audio.play(sound);
        }

        if self.game.status() == SnakeStatus::Ended && !self.best_submitted {
            self.best_submitted = true;
            if self.game.score() > self.best {
                self.best = self.game.score();
                svc.prefs.set(&best_key(self.game.speed()), &self.best);
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, svc: &mut Services) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.game.toggle_pause(),
            KeyCode::Char('1') => self.change_speed(SnakeSpeed::Relaxed, svc),
            KeyCode::Char('2') => self.change_speed(SnakeSpeed::Brisk, svc),
            KeyCode::Char('3') => self.change_speed(SnakeSpeed::Blazing, svc),
            KeyCode::Enter | KeyCode::Char(' ') => match self.game.status() {
                SnakeStatus::Idle => self.game.start(),
                SnakeStatus::Ended => {
                    self.reset();
                    self.game.start();
                }
                _ => {}
            },
            KeyCode::Up => self.game.set_direction(Heading::Up),
            KeyCode::Right => self.game.set_direction(Heading::Right),
            KeyCode::Down => self.game.set_direction(Heading::Down),
            KeyCode::Left => self.game.set_direction(Heading::Left),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 180, 80)))
            .title(" 🐍 Snake ")
            .title_style(Style::default().fg(Color::Rgb(120, 230, 120)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min((GRID_H + 2) as u16),
                Constraint::Length(1),
            ])
            .split(inner);

        let speed_spans: Vec<Span> = SnakeSpeed::all()
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if s == self.game.speed() {
                    Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Rgb(110, 110, 130))
                };
                Span::styled(format!("[{}]{} ", i + 1, s.label()), style)
            })
            .collect();

        let mut status = vec![
            Span::styled(
                format!(" Score: {} ", self.game.score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Length: {} ", self.game.len()),
                Style::default().fg(Color::Green),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("🏆 Best: {} ", self.best), Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        ];
        status.extend(speed_spans);
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        frame.render_widget(
            Paragraph::new(self.render_field(chunks[1].width as usize)),
            chunks[1],
        );

        let footer = self.overlay_line().unwrap_or_else(|| {
            Line::from(vec![
                Span::styled(" ↑↓←→ Steer ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("1-3 Speed ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ])
        });
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn reset(&mut self) {
        let speed = self.game.speed();
        self.game = SnakeGame::new(speed);
        self.best_submitted = false;
    }

    fn get_score(&self) -> u32 {
        self.game.score()
    }

    fn is_game_over(&self) -> bool {
        self.game.status() == SnakeStatus::Ended
    }
}
