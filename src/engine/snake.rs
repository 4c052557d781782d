use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::Sound;
use crate::engine::{Direction, Point};

pub const GRID_W: i32 = 20;
pub const GRID_H: i32 = 15;
pub const FOOD_SCORE: u32 = 10;
pub const FOOD_KINDS: u8 = 4;

const COUNTDOWN_STEPS: u8 = 3;
const COUNTDOWN_STEP_MS: u64 = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SnakeStatus {
    Idle,
    Countdown(u8),
    Running,
    Paused,
    Ended,
}

/// Discrete movement-interval presets.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SnakeSpeed {
    Relaxed,
    Brisk,
    Blazing,
}

impl SnakeSpeed {
    pub fn interval_ms(self) -> u64 {
        match self {
            SnakeSpeed::Relaxed => 180,
            SnakeSpeed::Brisk => 120,
            SnakeSpeed::Blazing => 80,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnakeSpeed::Relaxed => "Relaxed",
            SnakeSpeed::Brisk => "Brisk",
            SnakeSpeed::Blazing => "Blazing",
        }
    }

    pub fn all() -> [SnakeSpeed; 3] {
        [SnakeSpeed::Relaxed, SnakeSpeed::Brisk, SnakeSpeed::Blazing]
    }

    pub fn index(self) -> usize {
        match self {
            SnakeSpeed::Relaxed => 0,
            SnakeSpeed::Brisk => 1,
            SnakeSpeed::Blazing => 2,
        }
    }
}

/// Classic snake on a 20x15 grid with a 3-2-1 countdown before each run.
pub struct SnakeGame {
    snake: VecDeque<Point>,
    dir: Direction,
    pending_dir: Option<Direction>,
    food: Point,
    food_kind: u8,
    score: u32,
    status: SnakeStatus,
    speed: SnakeSpeed,
    move_acc_ms: u64,
    countdown_acc_ms: u64,
    rng: StdRng,
    sounds: Vec<Sound>,
}

impl SnakeGame {
    pub fn new(speed: SnakeSpeed) -> Self {
        Self::with_seed(rand::random(), speed)
    }

    pub fn with_seed(seed: u64, speed: SnakeSpeed) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let snake = Self::starting_body();
        let food = Self::place_food(&mut rng, &snake);
        let food_kind = rng.gen_range(0..FOOD_KINDS);
        SnakeGame {
            snake,
            dir: Direction::Right,
            pending_dir: None,
            food,
            food_kind,
            score: 0,
            status: SnakeStatus::Idle,
            speed,
            move_acc_ms: 0,
            countdown_acc_ms: 0,
            rng,
            sounds: Vec::new(),
        }
    }

    fn starting_body() -> VecDeque<Point> {
        let y = GRID_H / 2;
        VecDeque::from([Point::new(5, y), Point::new(4, y), Point::new(3, y)])
    }

    fn place_food(rng: &mut StdRng, snake: &VecDeque<Point>) -> Point {
        let free: Vec<Point> = (0..GRID_H)
            .flat_map(|y| (0..GRID_W).map(move |x| Point::new(x, y)))
            .filter(|p| !snake.contains(p))
            .collect();
        free[rng.gen_range(0..free.len())]
    }

    // --- read model ---

    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> SnakeSpeed {
        self.speed
    }

    pub fn body(&self) -> impl Iterator<Item = &Point> {
        self.snake.iter()
    }

    pub fn head(&self) -> Point {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn food_kind(&self) -> u8 {
        self.food_kind
    }

    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    // --- transitions ---

    pub fn start(&mut self) {
        if self.status != SnakeStatus::Idle {
            return;
        }
        self.status = SnakeStatus::Countdown(COUNTDOWN_STEPS);
        self.countdown_acc_ms = 0;
        self.sounds.push(Sound::Countdown(COUNTDOWN_STEPS));
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            SnakeStatus::Running => SnakeStatus::Paused,
            SnakeStatus::Paused => {
                // Resume from a clean interval.
                self.move_acc_ms = 0;
                SnakeStatus::Running
            }
            other => other,
        };
    }

    pub fn reset(&mut self, speed: SnakeSpeed) {
        *self = SnakeGame::with_seed(self.rng.gen(), speed);
    }

    /// Switch movement cadence without touching the run state.
    pub fn set_speed(&mut self, speed: SnakeSpeed) {
        self.speed = speed;
        self.move_acc_ms = 0;
    }

    /// Buffer a heading change. Reversal into the current heading is
    /// rejected outright.
    pub fn set_direction(&mut self, dir: Direction) {
        if dir == self.dir.opposite() {
            return;
        }
        self.pending_dir = Some(dir);
    }

    // --- simulation ---

    pub fn tick(&mut self, elapsed_ms: u64) {
        match self.status {
            SnakeStatus::Countdown(_) => self.tick_countdown(elapsed_ms),
            SnakeStatus::Running => self.tick_running(elapsed_ms),
            SnakeStatus::Idle | SnakeStatus::Paused | SnakeStatus::Ended => {}
        }
    }

    fn tick_countdown(&mut self, elapsed_ms: u64) {
        self.countdown_acc_ms += elapsed_ms;
        while self.countdown_acc_ms >= COUNTDOWN_STEP_MS {
            self.countdown_acc_ms -= COUNTDOWN_STEP_MS;
            let SnakeStatus::Countdown(n) = self.status else {
                return;
            };
            if n > 1 {
                self.status = SnakeStatus::Countdown(n - 1);
                self.sounds.push(Sound::Countdown(n - 1));
            } else {
                self.status = SnakeStatus::Running;
                self.move_acc_ms = 0;
                self.sounds.push(Sound::Go);
                return;
            }
        }
    }

    fn tick_running(&mut self, elapsed_ms: u64) {
        self.move_acc_ms += elapsed_ms;
        while self.move_acc_ms >= self.speed.interval_ms() {
            self.move_acc_ms -= self.speed.interval_ms();
            self.step();
            if self.status != SnakeStatus::Running {
                return;
            }
        }
    }

    fn step(&mut self) {
        if let Some(dir) = self.pending_dir.take() {
            if dir != self.dir.opposite() {
                self.dir = dir;
            }
        }

        let new_head = self.head().step(self.dir);
        if !new_head.in_bounds(GRID_W, GRID_H) || self.snake.contains(&new_head) {
            self.status = SnakeStatus::Ended;
            self.sounds.push(Sound::GameOver);
            return;
        }

        if new_head == self.food {
            // Grow: keep the tail this step.
            self.snake.push_front(new_head);
            self.score += FOOD_SCORE;
            self.food = Self::place_food(&mut self.rng, &self.snake);
            self.food_kind = self.rng.gen_range(0..FOOD_KINDS);
            self.sounds.push(Sound::Eat);
        } else {
            self.snake.push_front(new_head);
            self.snake.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_game(seed: u64) -> SnakeGame {
        let mut game = SnakeGame::with_seed(seed, SnakeSpeed::Brisk);
        game.start();
        game.tick(3 * COUNTDOWN_STEP_MS);
        assert_eq!(game.status(), SnakeStatus::Running);
        game
    }

    #[test]
    fn countdown_runs_three_steps_then_go() {
        let mut game = SnakeGame::with_seed(1, SnakeSpeed::Relaxed);
        assert_eq!(game.status(), SnakeStatus::Idle);

        game.start();
        assert_eq!(game.status(), SnakeStatus::Countdown(3));

        game.tick(COUNTDOWN_STEP_MS);
        assert_eq!(game.status(), SnakeStatus::Countdown(2));
        game.tick(COUNTDOWN_STEP_MS);
        assert_eq!(game.status(), SnakeStatus::Countdown(1));
        game.tick(COUNTDOWN_STEP_MS);
        assert_eq!(game.status(), SnakeStatus::Running);

        let sounds = game.take_sounds();
        let countdowns = sounds
            .iter()
            .filter(|s| matches!(s, Sound::Countdown(_)))
            .count();
        assert_eq!(countdowns, 3);
        assert!(sounds.contains(&Sound::Go));
    }

    #[test]
    fn eating_food_grows_by_exactly_one() {
        let mut game = running_game(2);
        game.snake = VecDeque::from([Point::new(3, 3), Point::new(2, 3), Point::new(1, 3)]);
        game.dir = Direction::Right;
        game.food = Point::new(4, 3);

        game.step();

        let body: Vec<Point> = game.body().copied().collect();
        assert_eq!(
            body,
            vec![
                Point::new(4, 3),
                Point::new(3, 3),
                Point::new(2, 3),
                Point::new(1, 3)
            ]
        );
        assert_eq!(game.score(), FOOD_SCORE);
        assert!(!game.snake.contains(&game.food));
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut game = running_game(3);
        game.snake = VecDeque::from([Point::new(3, 3), Point::new(2, 3), Point::new(1, 3)]);
        game.dir = Direction::Right;
        game.food = Point::new(10, 10);

        game.step();

        assert_eq!(game.len(), 3);
        assert_eq!(game.head(), Point::new(4, 3));
    }

    #[test]
    fn reversal_is_a_no_op() {
        let mut game = running_game(4);
        assert_eq!(game.dir, Direction::Right);

        game.set_direction(Direction::Left);
        assert!(game.pending_dir.is_none());

        game.food = Point::new(0, 0);
        let head = game.head();
        game.step();
        assert_eq!(game.head(), head.step(Direction::Right));
    }

    #[test]
    fn reversal_is_still_rejected_after_a_turn() {
        let mut game = running_game(5);
        game.set_direction(Direction::Up);
        game.step();
        assert_eq!(game.dir, Direction::Up);

        game.set_direction(Direction::Down);
        assert!(game.pending_dir.is_none());
    }

    #[test]
    fn wall_collision_ends_the_run() {
        let mut game = running_game(6);
        game.snake = VecDeque::from([Point::new(GRID_W - 1, 3), Point::new(GRID_W - 2, 3)]);
        game.dir = Direction::Right;

        game.step();

        assert_eq!(game.status(), SnakeStatus::Ended);
    }

    #[test]
    fn body_collision_includes_the_tail() {
        let mut game = running_game(7);
        // A tight 2x2 loop: moving up from (1,3) hits the tail at (1,2).
        game.snake = VecDeque::from([
            Point::new(1, 3),
            Point::new(2, 3),
            Point::new(2, 2),
            Point::new(1, 2),
        ]);
        game.dir = Direction::Up;

        game.step();

        assert_eq!(game.status(), SnakeStatus::Ended);
    }

    #[test]
    fn speed_change_mid_run_keeps_state() {
        let mut game = running_game(8);
        game.score = 50;
        let body: Vec<Point> = game.body().copied().collect();
        game.move_acc_ms = 70;

        game.set_speed(SnakeSpeed::Blazing);

        assert_eq!(game.status(), SnakeStatus::Running);
        assert_eq!(game.score(), 50);
        assert_eq!(game.body().copied().collect::<Vec<_>>(), body);
        assert_eq!(game.move_acc_ms, 0);
        assert_eq!(game.speed(), SnakeSpeed::Blazing);
    }

    #[test]
    fn pause_freezes_movement_and_resume_restarts_cleanly() {
        let mut game = running_game(9);
        let head = game.head();
        game.move_acc_ms = 100;

        game.toggle_pause();
        assert_eq!(game.status(), SnakeStatus::Paused);
        game.tick(10_000);
        assert_eq!(game.head(), head);

        game.toggle_pause();
        assert_eq!(game.status(), SnakeStatus::Running);
        assert_eq!(game.move_acc_ms, 0);
    }

    #[test]
    fn food_never_spawns_on_the_snake() {
        for seed in 0..30 {
            let game = SnakeGame::with_seed(seed, SnakeSpeed::Brisk);
            assert!(!game.snake.contains(&game.food));
        }
    }
}
