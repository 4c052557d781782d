use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::Sound;
use crate::engine::{Direction, Point};

pub const GRID: i32 = 15;
const GRID_U: usize = GRID as usize;

pub const ENEMIES_PER_LEVEL: u32 = 6;
pub const KILLS_PER_LEVEL: u32 = 6;
pub const SHIELD_MAX: u32 = 3;
/// Empirically tuned in the original game; kept as-is.
pub const POWER_UP_DROP_PROB: f64 = 0.35;
pub const ENEMY_KILL_SCORE: u32 = 100;

const BRICK_BASE_PROB: f64 = 0.20;
const STEEL_BASE_PROB: f64 = 0.06;

const FIRE_COOLDOWN_TICKS: u64 = 30;
const RAPID_COOLDOWN_TICKS: u64 = 12;
const RAPID_FIRE_TICKS: u64 = 300;
const RESPAWN_DELAY_TICKS: u64 = 60;
const SPAWN_CHECK_EVERY: u64 = 30;
const RANDOM_TURN_PROB: f64 = 0.10;

const PLAYER_ID: u32 = 0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TerrainCell {
    Empty,
    Brick,
    Steel,
    Base,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TanksStatus {
    Running,
    Paused,
    Over,
}

#[derive(Clone, Copy, Debug)]
pub struct Tank {
    pub id: u32,
    pub pos: Point,
    pub dir: Direction,
    pub faction: Faction,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Bullet {
    pub pos: Point,
    pub dir: Direction,
    pub faction: Faction,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PowerUpKind {
    Shield,
    RapidFire,
}

#[derive(Clone, Copy, Debug)]
pub struct PowerUp {
    pub pos: Point,
    pub kind: PowerUpKind,
}

/// Pacing knobs, expressed in 16 ms shell ticks. Two baseline sets exist
/// (standard and comfort); comfort levels 1-2 use an extra-gentle variant.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TankParams {
    pub player_step_every: u64,
    pub enemy_step_every: u64,
    pub bullet_step_every: u64,
    pub enemy_fire_prob: f64,
    pub enemy_max_active_bullets: usize,
    pub max_concurrent_enemies: usize,
}

impl TankParams {
    pub fn standard() -> Self {
        TankParams {
            player_step_every: 8,
            enemy_step_every: 12,
            bullet_step_every: 4,
            enemy_fire_prob: 0.08,
            enemy_max_active_bullets: 4,
            max_concurrent_enemies: 3,
        }
    }

    pub fn comfort() -> Self {
        TankParams {
            enemy_step_every: 16,
            enemy_fire_prob: 0.05,
            enemy_max_active_bullets: 3,
            max_concurrent_enemies: 2,
            ..Self::standard()
        }
    }

    fn comfort_intro() -> Self {
        TankParams {
            enemy_step_every: 20,
            enemy_fire_prob: 0.03,
            enemy_max_active_bullets: 2,
            max_concurrent_enemies: 1,
            ..Self::comfort()
        }
    }

    pub fn for_level(comfort: bool, level: u32) -> Self {
        if !comfort {
            Self::standard()
        } else if level <= 2 {
            Self::comfort_intro()
        } else {
            Self::comfort()
        }
    }
}

fn player_spawn() -> Point {
    Point::new(GRID / 2 - 2, GRID - 1)
}

fn base_cell() -> Point {
    Point::new(GRID / 2, GRID - 1)
}

fn enemy_spawns() -> [Point; 3] {
    [
        Point::new(0, 0),
        Point::new(GRID - 1, 0),
        Point::new(GRID / 2, 0),
    ]
}

fn random_dir(rng: &mut StdRng) -> Direction {
    match rng.gen_range(0..4) {
        0 => Direction::Up,
        1 => Direction::Right,
        2 => Direction::Down,
        _ => Direction::Left,
    }
}

fn generate_terrain(rng: &mut StdRng, level: u32) -> [[TerrainCell; GRID_U]; GRID_U] {
    let mut terrain = [[TerrainCell::Empty; GRID_U]; GRID_U];

    // Density ramps mildly with the level ladder, eased on early levels.
    let scale = match level {
        1 => 0.5,
        2 => 0.72,
        _ => 1.0,
    };
    let brick_prob = (BRICK_BASE_PROB + 0.01 * level.min(8) as f64) * scale;
    let steel_prob = STEEL_BASE_PROB * scale;

    for row in terrain.iter_mut() {
        for cell in row.iter_mut() {
            let roll: f64 = rng.gen();
            if roll < steel_prob {
                *cell = TerrainCell::Steel;
            } else if roll < steel_prob + brick_prob {
                *cell = TerrainCell::Brick;
            }
        }
    }

    // Keep spawn cells and the fallback center enterable.
    for spawn in enemy_spawns() {
        terrain[spawn.y as usize][spawn.x as usize] = TerrainCell::Empty;
        let below = spawn.step(Direction::Down);
        terrain[below.y as usize][below.x as usize] = TerrainCell::Empty;
    }
    let start = player_spawn();
    terrain[start.y as usize][start.x as usize] = TerrainCell::Empty;
    let above = start.step(Direction::Up);
    terrain[above.y as usize][above.x as usize] = TerrainCell::Empty;
    terrain[GRID_U / 2][GRID_U / 2] = TerrainCell::Empty;

    // One base at bottom-center, wrapped in a destructible ring.
    let base = base_cell();
    for dy in -1..=1 {
        for dx in -1..=1 {
            let p = Point::new(base.x + dx, base.y + dy);
            if p.in_bounds(GRID, GRID) && p != base {
                terrain[p.y as usize][p.x as usize] = TerrainCell::Brick;
            }
        }
    }
    terrain[base.y as usize][base.x as usize] = TerrainCell::Base;

    terrain
}

/// Top-down tank arena: one player tank defending a base at bottom-center
/// against waves of enemy tanks on a destructible 15x15 terrain grid.
pub struct TanksGame {
    terrain: [[TerrainCell; GRID_U]; GRID_U],
    player: Tank,
    enemies: Vec<Tank>,
    bullets: Vec<Bullet>,
    power_ups: Vec<PowerUp>,
    shield: u32,
    rapid_fire_until: u64,
    score: u32,
    lives: u32,
    level: u32,
    kills_this_level: u32,
    spawned_this_level: u32,
    respawn_at: Option<u64>,
    fire_ready_at: u64,
    ticks: u64,
    status: TanksStatus,
    comfort: bool,
    params: TankParams,
    pending_dir: Option<Direction>,
    fire_requested: bool,
    next_tank_id: u32,
    rng: StdRng,
    sounds: Vec<Sound>,
}

impl TanksGame {
    pub fn new(comfort: bool) -> Self {
        Self::with_seed(rand::random(), comfort)
    }

    pub fn with_seed(seed: u64, comfort: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let level = 1;
        let terrain = generate_terrain(&mut rng, level);
        TanksGame {
            terrain,
            player: Tank {
                id: PLAYER_ID,
                pos: player_spawn(),
                dir: Direction::Up,
                faction: Faction::Player,
                alive: true,
            },
            enemies: Vec::new(),
            bullets: Vec::new(),
            power_ups: Vec::new(),
            shield: 0,
            rapid_fire_until: 0,
            score: 0,
            lives: 3,
            level,
            kills_this_level: 0,
            spawned_this_level: 0,
            respawn_at: None,
            fire_ready_at: 0,
            ticks: 0,
            status: TanksStatus::Running,
            comfort,
            params: TankParams::for_level(comfort, level),
            pending_dir: None,
            fire_requested: false,
            next_tank_id: PLAYER_ID + 1,
            rng,
            sounds: Vec::new(),
        }
    }

    // --- input intents (buffered, last-writer-wins) ---

    pub fn press_direction(&mut self, dir: Direction) {
        self.pending_dir = Some(dir);
    }

    pub fn press_fire(&mut self) {
        self.fire_requested = true;
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            TanksStatus::Running => TanksStatus::Paused,
            TanksStatus::Paused => TanksStatus::Running,
            TanksStatus::Over => TanksStatus::Over,
        };
    }

    pub fn set_comfort(&mut self, comfort: bool) {
        self.comfort = comfort;
        self.params = TankParams::for_level(comfort, self.level);
    }

    // --- read model ---

    pub fn status(&self) -> TanksStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn kills_this_level(&self) -> u32 {
        self.kills_this_level
    }

    pub fn shield(&self) -> u32 {
        self.shield
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.ticks < self.rapid_fire_until
    }

    pub fn comfort(&self) -> bool {
        self.comfort
    }

    pub fn terrain_at(&self, p: Point) -> TerrainCell {
        self.terrain[p.y as usize][p.x as usize]
    }

    pub fn player(&self) -> &Tank {
        &self.player
    }

    pub fn enemies(&self) -> &[Tank] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    // --- simulation ---

    pub fn tick(&mut self) {
        if self.status != TanksStatus::Running {
            return;
        }
        self.ticks += 1;

        if let Some(at) = self.respawn_at {
            if self.ticks >= at {
                self.respawn_player();
            }
        }

        if self.player.alive && self.ticks % self.params.player_step_every == 0 {
            if let Some(dir) = self.pending_dir.take() {
                self.move_player(dir);
            }
        }

        if self.fire_requested {
            self.fire_requested = false;
            self.player_fire();
        }

        if self.ticks % self.params.enemy_step_every == 0 {
            self.step_enemies();
        }

        if self.ticks % self.params.bullet_step_every == 0 {
            self.step_bullets();
        }

        if self.ticks % SPAWN_CHECK_EVERY == 0 {
            self.maybe_spawn_enemy();
        }

        if self.status == TanksStatus::Running && self.kills_this_level >= KILLS_PER_LEVEL {
            self.advance_level();
        }
    }

    fn can_enter(&self, p: Point, ignore_id: u32) -> bool {
        if !p.in_bounds(GRID, GRID) {
            return false;
        }
        if self.terrain_at(p) != TerrainCell::Empty {
            return false;
        }
        if self.player.alive && self.player.id != ignore_id && self.player.pos == p {
            return false;
        }
        !self
            .enemies
            .iter()
            .any(|t| t.alive && t.id != ignore_id && t.pos == p)
    }

    fn move_player(&mut self, dir: Direction) {
        self.player.dir = dir;
        let target = self.player.pos.step(dir);
        if self.can_enter(target, PLAYER_ID) {
            self.player.pos = target;
            self.collect_power_up();
        }
    }

    fn collect_power_up(&mut self) {
        let pos = self.player.pos;
        if let Some(idx) = self.power_ups.iter().position(|p| p.pos == pos) {
            let picked = self.power_ups.swap_remove(idx);
            match picked.kind {
                PowerUpKind::Shield => self.shield = (self.shield + 1).min(SHIELD_MAX),
                PowerUpKind::RapidFire => {
                    self.rapid_fire_until = self.ticks + RAPID_FIRE_TICKS;
                }
            }
            self.sounds.push(Sound::PowerUp);
        }
    }

    fn player_fire(&mut self) {
        if !self.player.alive || self.ticks < self.fire_ready_at {
            return;
        }
        let cooldown = if self.rapid_fire_active() {
            RAPID_COOLDOWN_TICKS
        } else {
            FIRE_COOLDOWN_TICKS
        };
        self.fire_ready_at = self.ticks + cooldown;
        self.bullets.push(Bullet {
            pos: self.player.pos,
            dir: self.player.dir,
            faction: Faction::Player,
        });
        self.sounds.push(Sound::Fire);
    }

    fn step_enemies(&mut self) {
        for i in 0..self.enemies.len() {
            if !self.enemies[i].alive {
                continue;
            }
            if self.rng.gen_bool(RANDOM_TURN_PROB) {
                self.enemies[i].dir = random_dir(&mut self.rng);
            }
            let (id, pos, dir) = {
                let t = &self.enemies[i];
                (t.id, t.pos, t.dir)
            };
            let target = pos.step(dir);
            if self.can_enter(target, id) {
                self.enemies[i].pos = target;
            } else {
                self.enemies[i].dir = random_dir(&mut self.rng);
            }

            let active = self
                .bullets
                .iter()
                .filter(|b| b.faction == Faction::Enemy)
                .count();
            if active < self.params.enemy_max_active_bullets
                && self.rng.gen_bool(self.params.enemy_fire_prob)
            {
                let t = &self.enemies[i];
                self.bullets.push(Bullet {
                    pos: t.pos,
                    dir: t.dir,
                    faction: Faction::Enemy,
                });
            }
        }
    }

    fn step_bullets(&mut self) {
        let bullets = std::mem::take(&mut self.bullets);
        for mut b in bullets {
            b.pos = b.pos.step(b.dir);
            if self.resolve_bullet(&b) {
                self.bullets.push(b);
            }
        }
        self.enemies.retain(|t| t.alive);
    }

    /// Resolve a bullet at its new cell. Returns true if it stays in flight.
    fn resolve_bullet(&mut self, b: &Bullet) -> bool {
        if !b.pos.in_bounds(GRID, GRID) {
            return false;
        }

        match self.terrain_at(b.pos) {
            TerrainCell::Steel => return false,
            TerrainCell::Brick => {
                self.terrain[b.pos.y as usize][b.pos.x as usize] = TerrainCell::Empty;
                self.sounds.push(Sound::Explosion);
                return false;
            }
            TerrainCell::Base => {
                // Base loss ends the run no matter how many lives remain.
                self.terrain[b.pos.y as usize][b.pos.x as usize] = TerrainCell::Empty;
                self.status = TanksStatus::Over;
                self.sounds.push(Sound::Explosion);
                self.sounds.push(Sound::GameOver);
                return false;
            }
            TerrainCell::Empty => {}
        }

        if self.player.alive && self.player.pos == b.pos {
            if b.faction != Faction::Player {
                self.hit_player();
            }
            // Same-faction hits destroy the bullet without damage.
            return false;
        }

        if let Some(idx) = self
            .enemies
            .iter()
            .position(|t| t.alive && t.pos == b.pos)
        {
            if b.faction == Faction::Enemy {
                return false;
            }
            self.kill_enemy(idx);
            return false;
        }

        true
    }

    fn hit_player(&mut self) {
        if self.shield > 0 {
            self.shield -= 1;
            self.sounds.push(Sound::ShieldAbsorb);
            return;
        }
        self.player.alive = false;
        self.sounds.push(Sound::Explosion);
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.status = TanksStatus::Over;
            self.sounds.push(Sound::GameOver);
        } else {
            self.respawn_at = Some(self.ticks + RESPAWN_DELAY_TICKS);
        }
    }

    fn kill_enemy(&mut self, idx: usize) {
        let pos = self.enemies[idx].pos;
        self.enemies[idx].alive = false;
        self.score += ENEMY_KILL_SCORE;
        self.kills_this_level += 1;
        self.sounds.push(Sound::Explosion);
        if self.rng.gen_bool(POWER_UP_DROP_PROB) {
            let kind = if self.rng.gen_bool(0.5) {
                PowerUpKind::Shield
            } else {
                PowerUpKind::RapidFire
            };
            self.power_ups.push(PowerUp { pos, kind });
        }
    }

    fn respawn_player(&mut self) {
        self.respawn_at = None;
        let start = player_spawn();
        let candidates = [
            start,
            start.step(Direction::Up),
            start.step(Direction::Left),
            Point::new(GRID / 2, GRID / 2),
        ];
        let pos = candidates
            .into_iter()
            .find(|&p| self.can_enter(p, PLAYER_ID))
            .unwrap_or(Point::new(GRID / 2, GRID / 2));
        self.player.pos = pos;
        self.player.dir = Direction::Up;
        self.player.alive = true;
    }

    fn maybe_spawn_enemy(&mut self) {
        if self.spawned_this_level >= ENEMIES_PER_LEVEL {
            return;
        }
        let alive = self.enemies.iter().filter(|t| t.alive).count();
        if alive >= self.params.max_concurrent_enemies {
            return;
        }
        let pos = enemy_spawns()
            .into_iter()
            .find(|&p| self.can_enter(p, u32::MAX))
            .unwrap_or(Point::new(GRID / 2, GRID / 2));
        if !self.can_enter(pos, u32::MAX) {
            return;
        }
        let id = self.next_tank_id;
        self.next_tank_id += 1;
        self.enemies.push(Tank {
            id,
            pos,
            dir: Direction::Down,
            faction: Faction::Enemy,
            alive: true,
        });
        self.spawned_this_level += 1;
    }

    fn advance_level(&mut self) {
        self.level += 1;
        self.params = TankParams::for_level(self.comfort, self.level);
        self.terrain = generate_terrain(&mut self.rng, self.level);
        self.enemies.clear();
        self.bullets.clear();
        self.power_ups.clear();
        self.kills_this_level = 0;
        self.spawned_this_level = 0;
        self.shield = self.shield.min(SHIELD_MAX);
        self.rapid_fire_until = 0;
        self.respawn_at = None;
        self.player.pos = player_spawn();
        self.player.dir = Direction::Up;
        self.player.alive = true;
        self.sounds.push(Sound::LevelUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_game(seed: u64) -> TanksGame {
        let mut game = TanksGame::with_seed(seed, false);
        // Flatten terrain so movement/bullet tests control the layout.
        for y in 0..GRID_U {
            for x in 0..GRID_U {
                game.terrain[y][x] = TerrainCell::Empty;
            }
        }
        let base = base_cell();
        game.terrain[base.y as usize][base.x as usize] = TerrainCell::Base;
        game
    }

    #[test]
    fn terrain_is_deterministic_for_a_seed() {
        let a = TanksGame::with_seed(7, false);
        let b = TanksGame::with_seed(7, false);
        assert_eq!(a.terrain, b.terrain);
    }

    #[test]
    fn terrain_has_exactly_one_base_at_bottom_center() {
        for seed in 0..20 {
            let game = TanksGame::with_seed(seed, false);
            let mut bases = Vec::new();
            for y in 0..GRID_U {
                for x in 0..GRID_U {
                    if game.terrain[y][x] == TerrainCell::Base {
                        bases.push(Point::new(x as i32, y as i32));
                    }
                }
            }
            assert_eq!(bases, vec![base_cell()]);
        }
    }

    #[test]
    fn spawn_cells_are_clear_after_generation() {
        for seed in 0..20 {
            let game = TanksGame::with_seed(seed, false);
            for p in enemy_spawns() {
                assert_eq!(game.terrain_at(p), TerrainCell::Empty);
            }
            assert_eq!(game.terrain_at(player_spawn()), TerrainCell::Empty);
        }
    }

    #[test]
    fn enemy_bullet_does_not_harm_enemy_tank() {
        let mut game = open_game(1);
        game.enemies.push(Tank {
            id: 10,
            pos: Point::new(5, 5),
            dir: Direction::Down,
            faction: Faction::Enemy,
            alive: true,
        });
        game.bullets.push(Bullet {
            pos: Point::new(5, 3),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });

        game.step_bullets(); // advances to (5,4)
        game.step_bullets(); // advances to (5,5): same faction, no damage

        assert!(game.bullets.is_empty());
        assert_eq!(game.enemies.len(), 1);
        assert!(game.enemies[0].alive);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn player_bullet_kills_enemy_and_scores() {
        let mut game = open_game(2);
        game.enemies.push(Tank {
            id: 10,
            pos: Point::new(5, 5),
            dir: Direction::Down,
            faction: Faction::Enemy,
            alive: true,
        });
        game.bullets.push(Bullet {
            pos: Point::new(5, 6),
            dir: Direction::Up,
            faction: Faction::Player,
        });

        game.step_bullets();

        assert!(game.enemies.is_empty());
        assert_eq!(game.score, ENEMY_KILL_SCORE);
        assert_eq!(game.kills_this_level, 1);
    }

    #[test]
    fn base_hit_ends_the_run_regardless_of_lives() {
        let mut game = open_game(3);
        assert_eq!(game.lives, 3);
        let base = base_cell();
        game.bullets.push(Bullet {
            pos: base.step(Direction::Up),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });

        game.step_bullets();

        assert_eq!(game.status, TanksStatus::Over);
        assert_eq!(game.lives, 3);
    }

    #[test]
    fn shield_charge_absorbs_a_hit() {
        let mut game = open_game(4);
        game.shield = 1;
        game.player.pos = Point::new(2, 2);
        game.bullets.push(Bullet {
            pos: Point::new(2, 1),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });

        game.step_bullets();

        assert!(game.player.alive);
        assert_eq!(game.shield, 0);
        assert_eq!(game.lives, 3);
    }

    #[test]
    fn player_death_schedules_respawn_until_lives_run_out() {
        let mut game = open_game(5);
        game.player.pos = Point::new(2, 2);
        game.bullets.push(Bullet {
            pos: Point::new(2, 1),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });
        game.step_bullets();

        assert!(!game.player.alive);
        assert_eq!(game.lives, 2);
        assert!(game.respawn_at.is_some());
        assert_eq!(game.status, TanksStatus::Running);

        game.lives = 1;
        game.player.alive = true;
        game.player.pos = Point::new(2, 2);
        game.bullets.push(Bullet {
            pos: Point::new(2, 1),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });
        game.step_bullets();

        assert_eq!(game.lives, 0);
        assert_eq!(game.status, TanksStatus::Over);
    }

    #[test]
    fn brick_is_cleared_by_a_bullet_but_steel_is_not() {
        let mut game = open_game(6);
        game.terrain[5][5] = TerrainCell::Brick;
        game.terrain[7][5] = TerrainCell::Steel;
        game.bullets.push(Bullet {
            pos: Point::new(5, 4),
            dir: Direction::Down,
            faction: Faction::Player,
        });
        game.bullets.push(Bullet {
            pos: Point::new(5, 8),
            dir: Direction::Up,
            faction: Faction::Player,
        });

        game.step_bullets();

        assert_eq!(game.terrain[5][5], TerrainCell::Empty);
        assert_eq!(game.terrain[7][5], TerrainCell::Steel);
        assert!(game.bullets.is_empty());
    }

    #[test]
    fn movement_is_blocked_by_terrain() {
        let mut game = open_game(7);
        game.player.pos = Point::new(5, 5);
        game.terrain[4][5] = TerrainCell::Brick;

        game.move_player(Direction::Up);

        assert_eq!(game.player.pos, Point::new(5, 5));
        assert_eq!(game.player.dir, Direction::Up);
    }

    #[test]
    fn shield_pickup_caps_at_three_charges() {
        let mut game = open_game(8);
        game.player.pos = Point::new(5, 5);
        game.shield = SHIELD_MAX;
        game.power_ups.push(PowerUp {
            pos: Point::new(5, 4),
            kind: PowerUpKind::Shield,
        });

        game.move_player(Direction::Up);

        assert_eq!(game.shield, SHIELD_MAX);
        assert!(game.power_ups.is_empty());
    }

    #[test]
    fn rapid_fire_shortens_the_cooldown() {
        let mut game = open_game(9);
        game.ticks = 100;
        game.player_fire();
        assert_eq!(game.fire_ready_at, 100 + FIRE_COOLDOWN_TICKS);

        game.rapid_fire_until = 1_000;
        game.ticks = 200;
        game.fire_ready_at = 0;
        game.player_fire();
        assert_eq!(game.fire_ready_at, 200 + RAPID_COOLDOWN_TICKS);
    }

    #[test]
    fn six_kills_advance_the_level_and_keep_score() {
        let mut game = open_game(10);
        game.score = 600;
        game.kills_this_level = KILLS_PER_LEVEL;
        game.bullets.push(Bullet {
            pos: Point::new(1, 1),
            dir: Direction::Down,
            faction: Faction::Enemy,
        });
        game.power_ups.push(PowerUp {
            pos: Point::new(2, 2),
            kind: PowerUpKind::Shield,
        });

        game.tick();

        assert_eq!(game.level, 2);
        assert_eq!(game.kills_this_level, 0);
        assert_eq!(game.spawned_this_level, 0);
        assert!(game.bullets.is_empty());
        assert!(game.power_ups.is_empty());
        assert_eq!(game.score, 600);
        assert_eq!(game.player.pos, player_spawn());
    }

    #[test]
    fn spawning_stops_at_per_level_total_and_concurrency_cap() {
        let mut game = open_game(11);
        for _ in 0..10 {
            game.maybe_spawn_enemy();
        }
        let alive = game.enemies.iter().filter(|t| t.alive).count();
        assert!(alive <= game.params.max_concurrent_enemies);

        game.spawned_this_level = ENEMIES_PER_LEVEL;
        game.enemies.clear();
        game.maybe_spawn_enemy();
        assert!(game.enemies.is_empty());
    }

    #[test]
    fn comfort_ladder_is_gentler_on_early_levels() {
        let intro = TankParams::for_level(true, 1);
        let baseline = TankParams::for_level(true, 3);
        let standard = TankParams::for_level(false, 1);

        assert!(intro.enemy_fire_prob < baseline.enemy_fire_prob);
        assert!(intro.max_concurrent_enemies < baseline.max_concurrent_enemies);
        assert_eq!(TankParams::for_level(true, 3), TankParams::comfort());
        assert!(baseline.enemy_fire_prob < standard.enemy_fire_prob);
        assert_eq!(standard, TankParams::standard());
    }

    #[test]
    fn paused_game_does_not_advance() {
        let mut game = TanksGame::with_seed(12, false);
        game.toggle_pause();
        let ticks_before = game.ticks;
        game.tick();
        assert_eq!(game.ticks, ticks_before);
        game.toggle_pause();
        game.tick();
        assert_eq!(game.ticks, ticks_before + 1);
    }
}
