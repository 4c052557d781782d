use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::Sound;

pub const ROWS: usize = 20;
pub const COLS: usize = 10;
pub const SHAPE_COUNT: usize = 7;
pub const MAX_LEVEL: u32 = 10;

/// Natural-fall interval per level (level 1 first).
const FALL_INTERVALS_MS: [u64; 10] = [800, 720, 630, 550, 470, 380, 300, 220, 140, 100];

/// Score for 1..=4 simultaneously cleared rows.
const LINE_SCORES: [u32; 4] = [100, 300, 500, 800];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TetrisStatus {
    Running,
    Paused,
    Over,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TetrisAction {
    Left,
    Right,
    SoftDrop,
    HardDrop,
    Rotate,
    Hold,
}

/// The seven tetrominoes as 0/1 matrices in spawn orientation. The matrix
/// index doubles as the piece's color index + 1.
fn base_shape(index: usize) -> Vec<Vec<u8>> {
    match index {
        0 => vec![vec![1, 1, 1, 1]],
        1 => vec![vec![1, 1], vec![1, 1]],
        2 => vec![vec![0, 1, 0], vec![1, 1, 1]],
        3 => vec![vec![0, 1, 1], vec![1, 1, 0]],
        4 => vec![vec![1, 1, 0], vec![0, 1, 1]],
        5 => vec![vec![1, 0, 0], vec![1, 1, 1]],
        _ => vec![vec![0, 0, 1], vec![1, 1, 1]],
    }
}

/// Clockwise 90-degree rotation: out[c][R-1-r] = in[r][c].
pub fn rotate_cw(shape: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let rows = shape.len();
    let cols = shape[0].len();
    let mut out = vec![vec![0u8; rows]; cols];
    for (r, row) in shape.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            out[c][rows - 1 - r] = v;
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct ActivePiece {
    pub shape: Vec<Vec<u8>>,
    pub x: i32,
    pub y: i32,
    pub index: usize,
}

impl ActivePiece {
    fn spawn(index: usize) -> Self {
        let shape = base_shape(index);
        let x = ((COLS - shape[0].len()) / 2) as i32;
        ActivePiece { shape, x, y: 0, index }
    }
}

/// Block-stacking puzzle on a 20x10 board. The active piece lives outside
/// the board until it locks; board cells hold 0 or a color index.
pub struct TetrisGame {
    board: [[u8; COLS]; ROWS],
    active: Option<ActivePiece>,
    next_index: usize,
    held_index: Option<usize>,
    hold_used: bool,
    score: u32,
    lines: u32,
    level: u32,
    status: TetrisStatus,
    fall_acc_ms: u64,
    rng: StdRng,
    sounds: Vec<Sound>,
}

impl TetrisGame {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let first = rng.gen_range(0..SHAPE_COUNT);
        let next = rng.gen_range(0..SHAPE_COUNT);
        let mut game = TetrisGame {
            board: [[0; COLS]; ROWS],
            active: None,
            next_index: next,
            held_index: None,
            hold_used: false,
            score: 0,
            lines: 0,
            level: 1,
            status: TetrisStatus::Running,
            fall_acc_ms: 0,
            rng,
            sounds: Vec::new(),
        };
        game.place_spawned(ActivePiece::spawn(first));
        game
    }

    // --- read model ---

    pub fn status(&self) -> TetrisStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.board[y][x]
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn held_index(&self) -> Option<usize> {
        self.held_index
    }

    pub fn preview_shape(index: usize) -> Vec<Vec<u8>> {
        base_shape(index)
    }

    pub fn fall_interval_ms(&self) -> u64 {
        FALL_INTERVALS_MS[(self.level as usize - 1).min(FALL_INTERVALS_MS.len() - 1)]
    }

    /// Landing row of the active piece. Advisory only.
    pub fn ghost_y(&self) -> Option<i32> {
        let piece = self.active.as_ref()?;
        Some(piece.y + self.drop_distance(piece))
    }

    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    // --- simulation ---

    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.status != TetrisStatus::Running || self.active.is_none() {
            return;
        }
        self.fall_acc_ms += elapsed_ms;
        while self.fall_acc_ms >= self.fall_interval_ms() {
            self.fall_acc_ms -= self.fall_interval_ms();
            self.step_down();
            if self.status != TetrisStatus::Running || self.active.is_none() {
                break;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            TetrisStatus::Running => TetrisStatus::Paused,
            TetrisStatus::Paused => {
                // Resume from a clean interval.
                self.fall_acc_ms = 0;
                TetrisStatus::Running
            }
            TetrisStatus::Over => TetrisStatus::Over,
        };
    }

    pub fn apply(&mut self, action: TetrisAction) {
        if self.status != TetrisStatus::Running {
            return;
        }
        match action {
            TetrisAction::Left => {
                self.try_shift(-1);
            }
            TetrisAction::Right => {
                self.try_shift(1);
            }
            TetrisAction::SoftDrop => self.step_down(),
            TetrisAction::HardDrop => self.hard_drop(),
            TetrisAction::Rotate => self.rotate(),
            TetrisAction::Hold => self.hold(),
        }
    }

    fn collides(&self, shape: &[Vec<u8>], x: i32, y: i32) -> bool {
        for (r, row) in shape.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let cx = x + c as i32;
                let cy = y + r as i32;
                if cx < 0 || cx >= COLS as i32 || cy >= ROWS as i32 {
                    return true;
                }
                if cy >= 0 && self.board[cy as usize][cx as usize] != 0 {
                    return true;
                }
            }
        }
        false
    }

    fn try_shift(&mut self, dx: i32) -> bool {
        let Some(piece) = self.active.as_ref() else {
            return false;
        };
        if self.collides(&piece.shape, piece.x + dx, piece.y) {
            return false;
        }
        self.active.as_mut().unwrap().x += dx;
        true
    }

    fn rotate(&mut self) {
        let Some(piece) = self.active.as_ref() else {
            return;
        };
        let rotated = rotate_cw(&piece.shape);
        if self.collides(&rotated, piece.x, piece.y) {
            return;
        }
        self.active.as_mut().unwrap().shape = rotated;
        self.sounds.push(Sound::Rotate);
    }

    fn step_down(&mut self) {
        let Some(piece) = self.active.as_ref() else {
            return;
        };
        if self.collides(&piece.shape, piece.x, piece.y + 1) {
            self.lock();
        } else {
            self.active.as_mut().unwrap().y += 1;
        }
    }

    fn drop_distance(&self, piece: &ActivePiece) -> i32 {
        let mut dy = 0;
        while !self.collides(&piece.shape, piece.x, piece.y + dy + 1) {
            dy += 1;
        }
        dy
    }

    fn hard_drop(&mut self) {
        let Some(piece) = self.active.as_ref() else {
            return;
        };
        let dy = self.drop_distance(piece);
        self.active.as_mut().unwrap().y += dy;
        self.sounds.push(Sound::HardDrop);
        self.lock();
    }

    /// Merge the active piece into the board, clear full rows, spawn next.
    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        for (r, row) in piece.shape.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let cy = piece.y + r as i32;
                let cx = piece.x + c as i32;
                if cy >= 0 {
                    self.board[cy as usize][cx as usize] = piece.index as u8 + 1;
                }
            }
        }

        let cleared = self.clear_lines();
        if cleared > 0 {
            debug_assert!(cleared <= 4);
            self.score += LINE_SCORES[cleared - 1];
            self.lines += cleared as u32;
            self.level = (1 + self.lines / 10).min(MAX_LEVEL);
            self.sounds.push(Sound::LineClear);
        } else {
            self.sounds.push(Sound::Lock);
        }

        self.spawn_next();
    }

    fn clear_lines(&mut self) -> usize {
        let mut compacted = [[0u8; COLS]; ROWS];
        let mut write = ROWS;
        for y in (0..ROWS).rev() {
            if self.board[y].iter().all(|&c| c != 0) {
                continue;
            }
            write -= 1;
            compacted[write] = self.board[y];
        }
        self.board = compacted;
        // Every dropped row leaves one fresh empty row at the top.
        write
    }

    fn spawn_next(&mut self) {
        let index = self.next_index;
        self.next_index = self.rng.gen_range(0..SHAPE_COUNT);
        self.place_spawned(ActivePiece::spawn(index));
    }

    fn place_spawned(&mut self, piece: ActivePiece) {
        self.hold_used = false;
        self.fall_acc_ms = 0;
        if self.collides(&piece.shape, piece.x, piece.y) {
            self.status = TetrisStatus::Over;
            self.active = Some(piece);
            self.sounds.push(Sound::GameOver);
        } else {
            self.active = Some(piece);
        }
    }

    /// Set the active piece aside. Usable once per spawn; an occupied hold
    /// slot swaps with the active piece at the spawn column.
    fn hold(&mut self) {
        if self.hold_used {
            return;
        }
        let Some(piece) = self.active.take() else {
            return;
        };
        match self.held_index.take() {
            Some(held) => {
                self.held_index = Some(piece.index);
                self.place_spawned(ActivePiece::spawn(held));
            }
            None => {
                self.held_index = Some(piece.index);
                self.spawn_next();
            }
        }
        self.hold_used = true;
    }
}

impl Default for TetrisGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rotations_return_every_shape_to_origin() {
        for index in 0..SHAPE_COUNT {
            let shape = base_shape(index);
            let mut rotated = shape.clone();
            for _ in 0..4 {
                rotated = rotate_cw(&rotated);
            }
            assert_eq!(rotated, shape, "shape {index}");
        }
    }

    #[test]
    fn rotation_is_transpose_and_reverse() {
        let l = base_shape(6);
        let rotated = rotate_cw(&l);
        assert_eq!(rotated, vec![vec![1, 0], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn clear_lines_removes_only_the_full_row() {
        let mut game = TetrisGame::with_seed(1);
        // Bottom row full, row above it incomplete.
        game.board[ROWS - 1] = [1; COLS];
        game.board[ROWS - 2][0] = 2;
        game.board[ROWS - 2][1] = 2;

        let cleared = game.clear_lines();

        assert_eq!(cleared, 1);
        assert_eq!(game.board[ROWS - 1][0], 2);
        assert_eq!(game.board[ROWS - 1][1], 2);
        assert!(game.board[ROWS - 1][2..].iter().all(|&c| c == 0));
        assert!(game.board[0].iter().all(|&c| c == 0));
    }

    #[test]
    fn single_line_clear_scores_one_hundred() {
        let mut game = TetrisGame::with_seed(2);
        for x in 0..COLS {
            game.board[ROWS - 1][x] = 1;
        }
        game.board[ROWS - 2][0] = 2;
        game.board[ROWS - 2][1] = 2;
        // Park the active piece where locking cannot complete another row.
        game.active = Some(ActivePiece {
            shape: vec![vec![1]],
            x: 5,
            y: (ROWS - 2) as i32,
            index: 0,
        });

        game.lock();

        assert_eq!(game.score, 100);
        assert_eq!(game.lines, 1);
        // The incomplete row shifted down by one, piece cell included.
        assert_eq!(game.board[ROWS - 1][0], 2);
        assert_eq!(game.board[ROWS - 1][1], 2);
        assert_eq!(game.board[ROWS - 1][5], 1);
        assert!(game.board[0].iter().all(|&c| c == 0));
    }

    #[test]
    fn multi_line_scores_follow_the_table() {
        for (count, expected) in [(1usize, 100u32), (2, 300), (3, 500), (4, 800)] {
            let mut game = TetrisGame::with_seed(3);
            for y in 0..count {
                game.board[ROWS - 1 - y] = [1; COLS];
            }
            game.active = Some(ActivePiece {
                shape: vec![vec![1]],
                x: 0,
                y: 0,
                index: 0,
            });
            game.lock();
            assert_eq!(game.score, expected, "{count} lines");
        }
    }

    #[test]
    fn hard_drop_locks_in_the_same_tick_and_spawns() {
        let mut game = TetrisGame::with_seed(4);
        let next = game.next_index;

        game.apply(TetrisAction::HardDrop);

        // Old piece merged at the bottom; the preview piece is now active.
        assert!(game.board[ROWS - 1].iter().any(|&c| c != 0));
        let active = game.active().expect("a new piece spawned");
        assert_eq!(active.index, next);
        assert_eq!(active.y, 0);
        assert_eq!(game.status(), TetrisStatus::Running);
    }

    #[test]
    fn hold_is_usable_once_per_spawn() {
        let mut game = TetrisGame::with_seed(5);
        let first = game.active().unwrap().index;
        let next = game.next_index;

        game.apply(TetrisAction::Hold);
        assert_eq!(game.held_index(), Some(first));
        assert_eq!(game.active().unwrap().index, next);

        // Second hold before the next lock is rejected.
        game.apply(TetrisAction::Hold);
        assert_eq!(game.held_index(), Some(first));
        assert_eq!(game.active().unwrap().index, next);

        // After a lock the hold slot swaps with the active piece.
        game.apply(TetrisAction::HardDrop);
        let current = game.active().unwrap().index;
        game.apply(TetrisAction::Hold);
        assert_eq!(game.held_index(), Some(current));
        assert_eq!(game.active().unwrap().index, first);
        assert_eq!(game.active().unwrap().y, 0);
    }

    #[test]
    fn ghost_projection_does_not_mutate_state() {
        let game = TetrisGame::with_seed(6);
        let before_y = game.active().unwrap().y;

        let ghost = game.ghost_y().unwrap();

        assert!(ghost >= before_y);
        assert_eq!(game.active().unwrap().y, before_y);
        // Ghost row is the last non-colliding row.
        let piece = game.active().unwrap();
        assert!(game.collides(&piece.shape, piece.x, ghost + 1));
    }

    #[test]
    fn spawn_collision_ends_the_game() {
        let mut game = TetrisGame::with_seed(7);
        // Block the spawn columns without completing any row.
        for y in 0..2 {
            for x in 3..7 {
                game.board[y][x] = 1;
            }
        }

        game.spawn_next();

        assert_eq!(game.status(), TetrisStatus::Over);
    }

    #[test]
    fn natural_fall_advances_one_row_per_interval() {
        let mut game = TetrisGame::with_seed(8);
        let y0 = game.active().unwrap().y;
        let interval = game.fall_interval_ms();

        game.tick(interval - 1);
        assert_eq!(game.active().unwrap().y, y0);

        game.tick(1);
        assert_eq!(game.active().unwrap().y, y0 + 1);
    }

    #[test]
    fn level_caps_at_ten_and_speeds_up() {
        let mut game = TetrisGame::with_seed(9);
        assert_eq!(game.fall_interval_ms(), 800);
        game.lines = 40;
        game.level = (1 + game.lines / 10).min(MAX_LEVEL);
        assert_eq!(game.level, 5);
        assert_eq!(game.fall_interval_ms(), 470);
        game.lines = 200;
        game.level = (1 + game.lines / 10).min(MAX_LEVEL);
        assert_eq!(game.level, MAX_LEVEL);
        assert_eq!(game.fall_interval_ms(), 100);
    }

    #[test]
    fn paused_game_ignores_ticks_and_input() {
        let mut game = TetrisGame::with_seed(10);
        let y0 = game.active().unwrap().y;
        let x0 = game.active().unwrap().x;
        game.toggle_pause();

        game.tick(10_000);
        game.apply(TetrisAction::Left);

        assert_eq!(game.active().unwrap().y, y0);
        assert_eq!(game.active().unwrap().x, x0);
    }

    #[test]
    fn blocked_rotation_is_a_no_op() {
        let mut game = TetrisGame::with_seed(11);
        // An I piece on the bottom row has no room to stand upright.
        game.active = Some(ActivePiece {
            shape: base_shape(0),
            x: 0,
            y: (ROWS - 1) as i32,
            index: 0,
        });
        let before = game.active().unwrap().shape.clone();

        game.apply(TetrisAction::Rotate);

        assert_eq!(game.active().unwrap().shape, before);
    }
}
