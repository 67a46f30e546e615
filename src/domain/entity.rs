/// Entities: Player and Enemy, both built around a shared `Being`.
///
/// The player carries a life count. An enemy carries a decision timer:
/// every few seconds (uniform in [ENEMY_WAIT_MIN, ENEMY_WAIT_MAX)) it
/// becomes ready to pick a new direction.

use rand::Rng;

use super::being::{Being, Direction};
use super::board::Cell;

pub const STARTING_LIVES: i32 = 3;

/// Enemy decision window, seconds.
pub const ENEMY_WAIT_MIN: f32 = 3.0;
pub const ENEMY_WAIT_MAX: f32 = 8.0;

#[derive(Clone, Debug)]
pub struct Player {
    pub being: Being,
    pub lives: i32,
}

impl Player {
    pub fn new() -> Self {
        Player {
            being: Being::new(Cell::APEX),
            lives: STARTING_LIVES,
        }
    }

    pub fn lose_life(&mut self) {
        self.lives -= 1;
    }

    pub fn one_up(&mut self) {
        self.lives += 1;
    }

    pub fn is_dead(&self) -> bool {
        self.lives <= 0
    }

    /// Drop back in on the apex.
    pub fn respawn(&mut self) {
        self.being.respawn();
        self.being.position = Cell::APEX;
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub being: Being,
    /// Seconds since the last decision.
    timer: f32,
    /// Seconds the current decision window lasts.
    time_to_act: f32,
    ready_to_move: bool,
    /// False until the level drops the enemy onto the board.
    placed: bool,
}

impl Enemy {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Enemy {
            being: Being::new(Cell::APEX),
            timer: 0.0,
            time_to_act: draw_wait(rng),
            ready_to_move: false,
            placed: false,
        }
    }

    pub fn is_placed(&self) -> bool { self.placed }
    pub fn ready_to_move(&self) -> bool { self.ready_to_move }

    /// Advance one tick: physics, then the decision timer.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        self.being.update(dt);

        if !self.placed {
            self.being.hit();
            self.time_to_act = draw_wait(rng);
        }

        self.timer += dt;
        if self.timer >= self.time_to_act {
            self.ready_to_move = true;
            self.timer = 0.0;
            self.time_to_act = draw_wait(rng);
        }
    }

    /// Drop in from above `cell`.
    pub fn place(&mut self, cell: Cell) {
        self.being.position = cell;
        self.being.respawn();
        self.placed = true;
    }

    pub fn move_to<R: Rng>(&mut self, dir: Direction, rng: &mut R) {
        self.being.start_hop(dir);
        self.ready_to_move = false;
        self.timer = 0.0;
        self.time_to_act = draw_wait(rng);
    }
}

fn draw_wait<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(ENEMY_WAIT_MIN..ENEMY_WAIT_MAX)
}
