pub mod home;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};
use crate::games::Game;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Home => home::render_home(
            frame,
            chunks[1],
            app.selected_game,
            app.show_best,
            &app.services,
        ),
        Tab::Tanks => app.tanks.render(frame, chunks[1]),
        Tab::Tetris => app.tetris.render(frame, chunks[1]),
        Tab::Snake => app.snake.render(frame, chunks[1]),
        Tab::Cards => app.cards.render(frame, chunks[1]),
    }
}
