use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::tetris::{TetrisAction, TetrisGame, TetrisStatus, COLS, ROWS};
use crate::event::TICK_MS;
use crate::games::{Game, Services};
use crate::prefs::KEY_TETRIS_BEST;

const BOARD_BG: Color = Color::Rgb(8, 8, 16);

/// Classic piece palette, indexed by shape (I O T S Z J L).
const PIECE_COLORS: [Color; 7] = [
    Color::Rgb(80, 220, 230),
    Color::Rgb(240, 210, 60),
    Color::Rgb(190, 90, 230),
    Color::Rgb(90, 220, 90),
    Color::Rgb(230, 80, 80),
    Color::Rgb(80, 110, 240),
    Color::Rgb(240, 150, 50),
];

pub struct Tetris {
    game: TetrisGame,
    best: u32,
    best_submitted: bool,
}

impl Tetris {
    pub fn new(svc: &Services) -> Self {
        Tetris {
            game: TetrisGame::new(),
            best: svc.prefs.get_u32(KEY_TETRIS_BEST, 0),
            best_submitted: false,
        }
    }

    /// The board plus the active piece and its ghost, as color indices.
    fn composed_cells(&self) -> [[Option<(u8, bool)>; COLS]; ROWS] {
        let mut cells: [[Option<(u8, bool)>; COLS]; ROWS] = [[None; COLS]; ROWS];
        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let v = self.game.cell(x, y);
                if v != 0 {
                    *cell = Some((v - 1, false));
                }
            }
        }
        if let Some(piece) = self.game.active() {
            if let Some(ghost_y) = self.game.ghost_y() {
                for (r, row) in piece.shape.iter().enumerate() {
                    for (c, &v) in row.iter().enumerate() {
                        if v == 0 {
                            continue;
                        }
                        let gy = ghost_y + r as i32;
                        let gx = piece.x + c as i32;
                        if gy >= 0 && (gy as usize) < ROWS && gx >= 0 && (gx as usize) < COLS {
                            let slot = &mut cells[gy as usize][gx as usize];
                            if slot.is_none() {
                                *slot = Some((piece.index as u8, true));
                            }
                        }
                    }
                }
            }
            for (r, row) in piece.shape.iter().enumerate() {
                for (c, &v) in row.iter().enumerate() {
                    if v == 0 {
                        continue;
                    }
                    let py = piece.y + r as i32;
                    let px = piece.x + c as i32;
                    if py >= 0 && (py as usize) < ROWS && px >= 0 && (px as usize) < COLS {
                        cells[py as usize][px as usize] = Some((piece.index as u8, false));
                    }
                }
            }
        }
        cells
    }

    fn board_lines(&self) -> Vec<Line<'static>> {
        let cells = self.composed_cells();
        let wall = Span::styled("│", Style::default().fg(Color::Rgb(70, 70, 90)));
        let mut lines = Vec::with_capacity(ROWS + 2);
        lines.push(Line::from(Span::styled(
            format!("╭{}╮", "─".repeat(COLS * 2)),
            Style::default().fg(Color::Rgb(70, 70, 90)),
        )));
        for row in cells.iter() {
            let mut spans = vec![wall.clone()];
            for cell in row.iter() {
                spans.push(match cell {
                    Some((index, false)) => Span::styled(
                        "██",
                        Style::default().fg(PIECE_COLORS[*index as usize]).bg(BOARD_BG),
                    ),
                    Some((index, true)) => Span::styled(
                        "▒▒",
                        Style::default().fg(PIECE_COLORS[*index as usize]).bg(BOARD_BG),
                    ),
                    None => Span::styled("  ", Style::default().bg(BOARD_BG)),
                });
            }
            spans.push(wall.clone());
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(Span::styled(
            format!("╰{}╯", "─".repeat(COLS * 2)),
            Style::default().fg(Color::Rgb(70, 70, 90)),
        )));
        lines
    }

    fn preview_lines(index: Option<usize>) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(2);
        match index {
            Some(index) => {
                let shape = TetrisGame::preview_shape(index);
                for row in &shape {
                    let mut spans = vec![Span::raw("  ")];
                    for &v in row {
                        spans.push(if v != 0 {
                            Span::styled("██", Style::default().fg(PIECE_COLORS[index]))
                        } else {
                            Span::raw("  ")
                        });
                    }
                    lines.push(Line::from(spans));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "  --",
                Style::default().fg(Color::DarkGray),
            ))),
        }
        lines
    }
}

impl Game for Tetris {
    fn update(&mut self, svc: &mut Services) {
        self.game.tick(TICK_MS);
        for sound in self.game.take_sounds() {
            svc.audio.play(sound);
        }

        if self.game.status() == TetrisStatus::Over && !self.best_submitted {
            self.best_submitted = true;
            if self.game.score() > self.best {
                self.best = self.game.score();
                svc.prefs.set(KEY_TETRIS_BEST, &self.best);
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, _svc: &mut Services) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.game.toggle_pause(),
            _ => {
                if self.game.status() == TetrisStatus::Over {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.reset();
                    }
                    return;
                }
                match key.code {
                    KeyCode::Left => self.game.apply(TetrisAction::Left),
                    KeyCode::Right => self.game.apply(TetrisAction::Right),
                    KeyCode::Up | KeyCode::Char('x') => self.game.apply(TetrisAction::Rotate),
                    KeyCode::Down => self.game.apply(TetrisAction::SoftDrop),
                    KeyCode::Char(' ') => self.game.apply(TetrisAction::HardDrop),
                    KeyCode::Char('c') | KeyCode::Char('C') => self.game.apply(TetrisAction::Hold),
                    _ => {}
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(90, 120, 220)))
            .title(" 🧩 Tetris ")
            .title_style(Style::default().fg(Color::Rgb(140, 170, 255)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min((ROWS + 2) as u16), Constraint::Length(1)])
            .split(inner);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((COLS * 2 + 2) as u16 + 2),
                Constraint::Min(18),
            ])
            .split(chunks[0]);

        frame.render_widget(Paragraph::new(self.board_lines()), cols[0]);

        let mut side = vec![
            Line::from(Span::styled(
                format!("Score  {}", self.game.score()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Lines  {}", self.game.lines()),
                Style::default().fg(Color::Green),
            )),
            Line::from(Span::styled(
                format!("Level  {}", self.game.level()),
                Style::default().fg(Color::Rgb(255, 140, 90)),
            )),
            Line::from(Span::styled(
                format!("Best   {}", self.best),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(""),
            Line::from(Span::styled("Next", Style::default().fg(Color::Rgb(180, 180, 200)))),
        ];
        side.extend(Self::preview_lines(Some(self.game.next_index())));
        side.push(Line::from(""));
        side.push(Line::from(Span::styled(
            "Hold",
            Style::default().fg(Color::Rgb(180, 180, 200)),
        )));
        side.extend(Self::preview_lines(self.game.held_index()));
        frame.render_widget(Paragraph::new(side), cols[1]);

        let footer = match self.game.status() {
            TetrisStatus::Over => Line::from(vec![
                Span::styled(" 💀 GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled("Press ENTER to restart, Esc for menu", Style::default().fg(Color::Gray)),
            ]),
            TetrisStatus::Paused => Line::from(vec![Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )]),
            TetrisStatus::Running => Line::from(vec![
                Span::styled(" ←→ Move ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("↑ Rotate ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("↓ Soft ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("SPACE Drop ", Style::default().fg(Color::Yellow)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("C Hold ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart", Style::default().fg(Color::DarkGray)),
            ]),
        };
        frame.render_widget(Paragraph::new(footer), chunks[1]);
    }

    fn reset(&mut self) {
        self.game = TetrisGame::new();
        self.best_submitted = false;
    }

    fn get_score(&self) -> u32 {
        self.game.score()
    }

    fn is_game_over(&self) -> bool {
        self.game.status() == TetrisStatus::Over
    }
}
