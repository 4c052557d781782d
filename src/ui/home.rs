use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::cards::PairCount;
use crate::engine::snake::SnakeSpeed;
use crate::games::cards::{best_key as cards_best_key, format_ms, CardsBest};
use crate::games::snake::best_key as snake_best_key;
use crate::games::Services;
use crate::prefs::{KEY_TANKS_BEST, KEY_TETRIS_BEST};

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════════╗
 ║  ███╗   ███╗██╗███╗   ██╗██╗ ██████╗ █████╗ ██████╗ ███████╗     ║
 ║  ████╗ ████║██║████╗  ██║██║██╔════╝██╔══██╗██╔══██╗██╔════╝     ║
 ║  ██╔████╔██║██║██╔██╗ ██║██║██║     ███████║██║  ██║█████╗       ║
 ║  ██║╚██╔╝██║██║██║╚██╗██║██║██║     ██╔══██║██║  ██║██╔══╝       ║
 ║  ██║ ╚═╝ ██║██║██║ ╚████║██║╚██████╗██║  ██║██████╔╝███████╗     ║
 ║  ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝     ║
 ╚══════════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 4] = [
    GameTile { key: "1", icon: "🪖", name: "Tanks", desc: "Defend the base\nfrom tank waves!", color: Color::Rgb(160, 220, 110), border_color: Color::Rgb(70, 110, 50) },
    GameTile { key: "2", icon: "🧩", name: "Tetris", desc: "Stack and clear\nfalling pieces!", color: Color::Rgb(140, 170, 255), border_color: Color::Rgb(60, 80, 140) },
    GameTile { key: "3", icon: "🐍", name: "Snake", desc: "Eat, grow, and\ndodge yourself!", color: Color::Rgb(120, 230, 120), border_color: Color::Rgb(50, 120, 50) },
    GameTile { key: "4", icon: "🃏", name: "Memory", desc: "Match every pair\nin fewest moves!", color: Color::Rgb(255, 190, 120), border_color: Color::Rgb(130, 90, 50) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let mut lines: Vec<Line> = Vec::new();

    // Key + Icon + Name line
    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    lines.push(Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ]));

    // Description lines
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(vec![
            Span::styled(desc_line, Style::default().fg(if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) })),
        ]));
    }

    // Selected indicator
    if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ Enter to play", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn game_controls(game_idx: usize) -> Vec<Line<'static>> {
    match game_idx {
        0 => vec![ // Tanks
            Line::from(""),
            Line::from(vec![
                Span::styled("  🪖 Tanks", Style::default().fg(Color::Rgb(160, 220, 110)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Hold the base, clear the waves!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    ↑ ↓ ← →         ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Move tank", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Space            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Fire", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    C                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Comfort mode", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        1 => vec![ // Tetris
            Line::from(""),
            Line::from(vec![
                Span::styled("  🧩 Tetris", Style::default().fg(Color::Rgb(140, 170, 255)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Clear lines, chase the tempo!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    ← / →            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Move piece", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    ↑ / X            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Rotate", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    ↓                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Soft drop", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Space            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Hard drop", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    C                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Hold piece", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P / R            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause / Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        2 => vec![ // Snake
            Line::from(""),
            Line::from(vec![
                Span::styled("  🐍 Snake", Style::default().fg(Color::Rgb(120, 230, 120)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Three beeps, then you're off!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    Enter            ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Start (3-2-1)", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    ↑ ↓ ← →         ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Steer", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    1 / 2 / 3        ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Speed preset", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pause", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Restart", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        3 => vec![ // Memory
            Line::from(""),
            Line::from(vec![
                Span::styled("  🃏 Memory", Style::default().fg(Color::Rgb(255, 190, 120)).add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled("  Find every pair, beat your best!", Style::default().fg(Color::Rgb(100, 100, 120))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("    ↑ ↓ ← →         ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Select card", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    Enter / Space    ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Flip", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    1 / 2 / 3        ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Pair count", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
            Line::from(vec![
                Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
                Span::styled("Reshuffle", Style::default().fg(Color::Rgb(140, 140, 140))),
            ]),
        ],
        _ => vec![],
    }
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, show_best: bool, services: &Services) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(8),  // Game tiles
            Constraint::Min(10),    // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    // Banner
    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    // Subtitle
    let subtitle = Paragraph::new(Line::from(vec![
        Span::styled(
            "  ⚡ Four Tiny Games, One Terminal ⚡  ",
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    // Games section title block
    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games — ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let tile_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(games_inner);

    for i in 0..4 {
        render_game_tile(frame, tile_cols[i], &GAME_TILES[i], selected_game == i);
    }

    // Controls area: split horizontally - navigation left, game controls right
    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(chunks[3]);

    // Navigation Control (left)
    let controls = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  🔧 Navigation", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    Tab / Shift+Tab  ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Switch tabs", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    1-4              ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Launch game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    ← / →            ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Select game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Enter            ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Play selected", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    Esc              ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Return to Home", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    M                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Sound on/off", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    q / Ctrl+C       ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Quit", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  🎮 Common", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    R                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Restart game", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
        Line::from(vec![
            Span::styled("    P                ", Style::default().fg(Color::Rgb(80, 200, 255))),
            Span::styled("Pause / Unpause", Style::default().fg(Color::Rgb(140, 140, 140))),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    // Game Control (right) - shows controls for the selected game
    let game_ctrl_lines = game_controls(selected_game);
    let game_ctrl = Paragraph::new(game_ctrl_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
                .title(format!(" 🎮 {} Control ", GAME_TILES[selected_game].name))
                .title_style(Style::default().fg(GAME_TILES[selected_game].color).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled("v0.4.0", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" Best Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    // Best scores overlay
    if show_best {
        render_best_overlay(frame, area, services);
    }
}

fn best_line(label: &str, value: Option<String>) -> Line<'static> {
    let label = Span::styled(
        format!("    {label:<10}"),
        Style::default().fg(Color::Rgb(200, 200, 220)),
    );
    match value {
        Some(value) => Line::from(vec![
            label,
            Span::styled(value, Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
        ]),
        None => Line::from(vec![
            label,
            Span::styled("--", Style::default().fg(Color::Rgb(60, 60, 80))),
        ]),
    }
}

fn render_best_overlay(frame: &mut Frame, area: Rect, services: &Services) {
    let overlay_w = 46u16.min(area.width.saturating_sub(4));
    let overlay_h = 22u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Best Scores ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let prefs = &services.prefs;
    let mut lines: Vec<Line> = vec![Line::from("")];

    lines.push(Line::from(vec![
        Span::styled("  🪖 ", Style::default()),
        Span::styled("Tanks", Style::default().fg(Color::Rgb(160, 220, 110)).add_modifier(Modifier::BOLD)),
    ]));
    let tanks_best = prefs.get_u32(KEY_TANKS_BEST, 0);
    lines.push(best_line("Score", (tanks_best > 0).then(|| tanks_best.to_string())));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  🧩 ", Style::default()),
        Span::styled("Tetris", Style::default().fg(Color::Rgb(140, 170, 255)).add_modifier(Modifier::BOLD)),
    ]));
    let tetris_best = prefs.get_u32(KEY_TETRIS_BEST, 0);
    lines.push(best_line("Score", (tetris_best > 0).then(|| tetris_best.to_string())));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  🐍 ", Style::default()),
        Span::styled("Snake", Style::default().fg(Color::Rgb(120, 230, 120)).add_modifier(Modifier::BOLD)),
    ]));
    for speed in SnakeSpeed::all() {
        let best = prefs.get_u32(&snake_best_key(speed), 0);
        lines.push(best_line(speed.label(), (best > 0).then(|| best.to_string())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  🃏 ", Style::default()),
        Span::styled("Memory", Style::default().fg(Color::Rgb(255, 190, 120)).add_modifier(Modifier::BOLD)),
    ]));
    for preset in PairCount::all() {
        let best: Option<CardsBest> = prefs.get(&cards_best_key(preset));
        lines.push(best_line(
            preset.label(),
            best.map(|b| format!("{} moves / {}", b.moves, format_ms(b.time_ms))),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
