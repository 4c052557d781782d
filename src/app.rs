use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::audio::Audio;
use crate::games::cards::Cards;
use crate::games::snake::Snake;
use crate::games::tanks::Tanks;
use crate::games::tetris::Tetris;
use crate::games::{Game, Services};
use crate::prefs::{Prefs, KEY_SOUND};

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Home,
    Tanks,
    Tetris,
    Snake,
    Cards,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Tanks, Tab::Tetris, Tab::Snake, Tab::Cards]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Tanks => " Tanks ",
            Tab::Tetris => " Tetris ",
            Tab::Snake => " Snake ",
            Tab::Cards => " Memory ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Tanks => 1,
            Tab::Tetris => 2,
            Tab::Snake => 3,
            Tab::Cards => 4,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-3 for home screen game selection
    pub tanks: Tanks,
    pub tetris: Tetris,
    pub snake: Snake,
    pub cards: Cards,
    pub services: Services,
    pub show_best: bool,
}

impl App {
    pub fn new() -> Self {
        let prefs = Prefs::load();
        let audio = Audio::new(prefs.get_bool(KEY_SOUND, true));
        let services = Services { prefs, audio };
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            tanks: Tanks::new(&services),
            tetris: Tetris::new(&services),
            snake: Snake::new(&services),
            cards: Cards::new(&services),
            services,
            show_best: false,
        }
    }

    pub fn on_tick(&mut self) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Tanks => self.tanks.update(&mut self.services),
            Tab::Tetris => self.tetris.update(&mut self.services),
            Tab::Snake => self.snake.update(&mut self.services),
            Tab::Cards => self.cards.update(&mut self.services),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let enabled = !self.services.audio.enabled();
                self.services.audio.set_enabled(enabled);
                self.services.prefs.set(KEY_SOUND, &enabled);
                return;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.current_tab = Tab::Home;
                    return;
                }
            }
            _ => {}
        }

        // Home screen shortcuts and navigation
        if matches!(self.current_tab, Tab::Home) && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char('1') => { self.current_tab = Tab::Tanks; return; }
                KeyCode::Char('2') => { self.current_tab = Tab::Tetris; return; }
                KeyCode::Char('3') => { self.current_tab = Tab::Snake; return; }
                KeyCode::Char('4') => { self.current_tab = Tab::Cards; return; }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.show_best = !self.show_best;
                    return;
                }
                // Arrow key navigation for the 2x2 tile grid
                KeyCode::Right => {
                    self.selected_game = (self.selected_game + 1) % 4;
                    return;
                }
                KeyCode::Left => {
                    self.selected_game = (self.selected_game + 3) % 4;
                    return;
                }
                KeyCode::Down | KeyCode::Up => {
                    self.selected_game = (self.selected_game + 2) % 4;
                    return;
                }
                // Enter launches the selected game
                KeyCode::Enter => {
                    self.current_tab = match self.selected_game {
                        0 => Tab::Tanks,
                        1 => Tab::Tetris,
                        2 => Tab::Snake,
                        3 => Tab::Cards,
                        _ => Tab::Home,
                    };
                    return;
                }
                _ => {}
            }
        }

        // Forward to active game
        match self.current_tab {
            Tab::Home => {}
            Tab::Tanks => self.tanks.handle_input(key, &mut self.services),
            Tab::Tetris => self.tetris.handle_input(key, &mut self.services),
            Tab::Snake => self.snake.handle_input(key, &mut self.services),
            Tab::Cards => self.cards.handle_input(key, &mut self.services),
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
