pub mod cards;
pub mod snake;
pub mod tanks;
pub mod tetris;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::audio::Audio;
use crate::prefs::Prefs;

/// Shell-owned boundaries handed to every game: the persistent preference
/// store and the audio cue output.
pub struct Services {
    pub prefs: Prefs,
    pub audio: Audio,
}

pub trait Game {
    fn update(&mut self, svc: &mut Services);
    fn handle_input(&mut self, key: KeyEvent, svc: &mut Services);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
}
