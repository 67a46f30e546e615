/// A single level: two boards, the player, the enemies and the score.
///
/// ## Boards
///   clear_board — cubes flipped by the player; lives as long as the level.
///   enemy_board — cells under standing enemies; rebuilt every tick.
///
/// ## Construction
///   enemies  = level / 3 + 1, all unplaced (they drop in on the first tick)
///   player   = drops onto the apex from MAX_HEIGHT
///
/// The random source is owned here and handed from level to level, so one
/// seed reproduces a whole session.

use log::debug;
use rand::rngs::StdRng;

use crate::domain::being::Direction;
use crate::domain::board::Board;
use crate::domain::entity::{Enemy, Player};
use crate::domain::rules;
use super::event::LevelEvent;
use super::step;

pub struct Level {
    pub number: u32,
    pub score: i32,
    pub clear_board: Board,
    pub enemy_board: Board,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub rng: StdRng,
}

impl Level {
    pub fn new(number: u32, score: i32, rng: StdRng) -> Self {
        Level::with_player(number, score, Player::new(), rng)
    }

    fn with_player(number: u32, score: i32, mut player: Player, mut rng: StdRng) -> Self {
        let enemies: Vec<Enemy> = (0..rules::enemy_count(number))
            .map(|_| Enemy::new(&mut rng))
            .collect();
        player.respawn();
        debug!("level {}: {} enemies, {} points per flip",
            number, enemies.len(), rules::points_per_flip(number));

        Level {
            number,
            score,
            clear_board: Board::new(),
            enemy_board: Board::new(),
            player,
            enemies,
            rng,
        }
    }

    /// The following level. Score, lives and the random source carry over.
    pub fn next(self) -> Level {
        let mut player = Player::new();
        player.lives = self.player.lives;
        Level::with_player(self.number + 1, self.score, player, self.rng)
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32) -> Vec<LevelEvent> {
        step::step(self, dt)
    }

    /// Start a hop. Ignored while the player is already in motion.
    /// Returns true if the hop started.
    pub fn move_player(&mut self, dir: Direction) -> bool {
        if self.player.being.is_moving() {
            return false;
        }
        self.player.being.start_hop(dir);
        true
    }

    pub fn is_completed(&self) -> bool {
        self.clear_board.is_completed()
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.is_dead()
    }
}
