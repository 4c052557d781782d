use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;
use serde::{Deserialize, Serialize};

use crate::engine::cards::{CardsGame, CardsStatus, PairCount};
use crate::event::TICK_MS;
use crate::games::{Game, Services};

const VALUE_GLYPHS: [&str; 10] = ["♠", "♥", "♦", "♣", "★", "✦", "♪", "♫", "◆", "●"];
const VALUE_COLORS: [Color; 10] = [
    Color::Rgb(120, 200, 255),
    Color::Rgb(255, 110, 110),
    Color::Rgb(255, 170, 60),
    Color::Rgb(150, 230, 110),
    Color::Rgb(255, 230, 90),
    Color::Rgb(200, 140, 255),
    Color::Rgb(110, 230, 210),
    Color::Rgb(255, 150, 200),
    Color::Rgb(250, 120, 70),
    Color::Rgb(160, 160, 255),
];

/// Best run for a pair-count preset: fewest moves, time as tiebreaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardsBest {
    pub moves: u32,
    pub time_ms: u64,
}

impl CardsBest {
    pub fn improves_on(self, old: Option<CardsBest>) -> bool {
        match old {
            None => true,
            Some(old) => {
                self.moves < old.moves || (self.moves == old.moves && self.time_ms < old.time_ms)
            }
        }
    }
}

pub fn best_key(preset: PairCount) -> String {
    format!("cards_best_{}", preset.label().to_lowercase())
}

pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn grid_cols(preset: PairCount) -> usize {
    match preset {
        PairCount::Casual | PairCount::Standard => 4,
        PairCount::Expert => 5,
    }
}

pub struct Cards {
    game: CardsGame,
    cursor: usize,
    best: Option<CardsBest>,
    best_submitted: bool,
}

impl Cards {
    pub fn new(svc: &Services) -> Self {
        let preset = PairCount::Standard;
        Cards {
            game: CardsGame::new(preset),
            cursor: 0,
            best: svc.prefs.get(&best_key(preset)),
            best_submitted: false,
        }
    }

    fn change_preset(&mut self, preset: PairCount, svc: &Services) {
        self.game.reset(preset);
        self.cursor = 0;
        self.best = svc.prefs.get(&best_key(preset));
        self.best_submitted = false;
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let cols = grid_cols(self.game.pair_count()) as i32;
        let total = self.game.cards().len() as i32;
        let next = self.cursor as i32 + dx + dy * cols;
        if next >= 0 && next < total {
            self.cursor = next as usize;
        }
    }

    fn card_lines(&self, width: usize) -> Vec<Line<'static>> {
        let cols = grid_cols(self.game.pair_count());
        let cards = self.game.cards();
        let tile_w = 5; // 4 chars + gap
        let pad = width.saturating_sub(cols * tile_w) / 2;
        let pad_span = Span::raw(" ".repeat(pad));
        let mut lines = Vec::new();

        for row_cards in cards.chunks(cols) {
            let mut top = vec![pad_span.clone()];
            let mut mid = vec![pad_span.clone()];
            let mut bot = vec![pad_span.clone()];
            for card in row_cards {
                let selected = card.id == self.cursor;
                let border = if selected {
                    Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
                } else if card.matched {
                    Style::default().fg(Color::Rgb(60, 130, 60))
                } else {
                    Style::default().fg(Color::Rgb(90, 90, 110))
                };
                let face = if card.flipped || card.matched {
                    let glyph = VALUE_GLYPHS[(card.value as usize - 1) % VALUE_GLYPHS.len()];
                    let color = VALUE_COLORS[(card.value as usize - 1) % VALUE_COLORS.len()];
                    let style = if card.matched {
                        Style::default().fg(color).add_modifier(Modifier::DIM)
                    } else {
                        Style::default().fg(color).add_modifier(Modifier::BOLD)
                    };
                    Span::styled(format!("{} ", glyph), style)
                } else {
                    Span::styled("▒▒", Style::default().fg(Color::Rgb(70, 80, 120)))
                };

                top.push(Span::styled("╭──╮", border));
                top.push(Span::raw(" "));
                mid.push(Span::styled("│", border));
                mid.push(face);
                mid.push(Span::styled("│", border));
                mid.push(Span::raw(" "));
                bot.push(Span::styled("╰──╯", border));
                bot.push(Span::raw(" "));
            }
            lines.push(Line::from(top));
            lines.push(Line::from(mid));
            lines.push(Line::from(bot));
        }
        lines
    }
}

impl Game for Cards {
    fn update(&mut self, svc: &mut Services) {
        self.game.tick(TICK_MS);
        for sound in self.game.take_sounds() {
            svc.audio.play(sound);
        }

        if self.game.status() == CardsStatus::Won && !self.best_submitted {
            self.best_submitted = true;
            let run = CardsBest {
                moves: self.game.moves(),
                time_ms: self.game.elapsed_ms(),
            };
            if run.improves_on(self.best) {
                self.best = Some(run);
                svc.prefs.set(&best_key(self.game.pair_count()), &run);
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, svc: &mut Services) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('1') => self.change_preset(PairCount::Casual, svc),
            KeyCode::Char('2') => self.change_preset(PairCount::Standard, svc),
            KeyCode::Char('3') => self.change_preset(PairCount::Expert, svc),
            KeyCode::Left => self.move_cursor(-1, 0),
            KeyCode::Right => self.move_cursor(1, 0),
            KeyCode::Up => self.move_cursor(0, -1),
            KeyCode::Down => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.game.status() == CardsStatus::Won {
                    self.reset();
                } else {
                    // Rejected flips are silent no-ops.
                    self.game.flip(self.cursor);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(200, 140, 90)))
            .title(" 🃏 Memory ")
            .title_style(Style::default().fg(Color::Rgb(255, 190, 120)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(12),
                Constraint::Length(1),
            ])
            .split(inner);

        let preset_spans: Vec<Span> = PairCount::all()
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let style = if p == self.game.pair_count() {
                    Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Rgb(110, 110, 130))
                };
                Span::styled(format!("[{}]{} ", i + 1, p.label()), style)
            })
            .collect();

        let best_text = match self.best {
            Some(best) => format!("🏆 Best: {} moves / {} ", best.moves, format_ms(best.time_ms)),
            None => "🏆 Best: -- ".to_string(),
        };
        let mut status = vec![
            Span::styled(
                format!(" Moves: {} ", self.game.moves()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Time: {} ", format_ms(self.game.elapsed_ms())),
                Style::default().fg(Color::Green),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(best_text, Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        ];
        status.extend(preset_spans);
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);

        frame.render_widget(
            Paragraph::new(self.card_lines(chunks[1].width as usize)),
            chunks[1],
        );

        let footer = if self.game.status() == CardsStatus::Won {
            Line::from(vec![
                Span::styled(" 🎉 ALL PAIRS FOUND! ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!(
                        "{} moves in {} │ Press ENTER to play again",
                        self.game.moves(),
                        format_ms(self.game.elapsed_ms())
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled(" ↑↓←→ Select ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("ENTER Flip ", Style::default().fg(Color::Yellow)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("1-3 Pairs ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Reshuffle ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(footer), chunks[2]);
    }

    fn reset(&mut self) {
        let preset = self.game.pair_count();
        self.game.reset(preset);
        self.cursor = 0;
        self.best_submitted = false;
    }

    fn get_score(&self) -> u32 {
        // Lower is better for memory; expose matched pairs for the shell.
        self.game.cards().iter().filter(|c| c.matched).count() as u32 / 2
    }

    fn is_game_over(&self) -> bool {
        self.game.status() == CardsStatus::Won
    }
}
