/// Events emitted during a simulation step.
/// The controller reacts to them; the presentation layer plays sounds.

use crate::domain::board::Cell;

/// What happened inside a level during one `update`.
#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum LevelEvent {
    /// The player landed on a cube and changed it.
    PlayerFlipped { cell: Cell, on: bool, points: i32 },
    /// The player landed on a cube without changing it.
    PlayerLanded { cell: Cell },
    PlayerDroppedOff { cell: Cell },
    PlayerHit { cell: Cell },
    PlayerRespawned,
    EnemyRespawned { index: usize, cell: Cell },
    EnemyDroppedOff { index: usize },
    LevelCleared,
}

/// Controller-level events, a superset of level events.
#[derive(Clone, Debug, PartialEq)]
#[allow(dead_code)]
pub enum GameEvent {
    Level(LevelEvent),
    PlayerHopped,
    LifeGained,
    GameOver { score: i32 },
    LevelStarted { number: u32 },
}
