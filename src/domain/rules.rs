/// Scoring and progression rules.
///
/// Pure functions, no side effects. They answer "what happens" for a
/// landing or a level number; the level applies the answer.
///
/// ## Landing on a cube (clear board)
/// ┌────────────┬────────────┬──────────────┬─────────┐
/// │ Level      │ Cell was   │ Cell becomes │ Scores? │
/// ├────────────┼────────────┼──────────────┼─────────┤
/// │ odd        │ off        │ on           │ YES     │
/// │ odd        │ on         │ on           │ no      │
/// │ even       │ off        │ on           │ YES     │
/// │ even       │ on         │ off          │ YES     │
/// └────────────┴────────────┴──────────────┴─────────┘
///
/// ## Level scaling
/// ┌────────────┬───────────────────────┐
/// │ Quantity   │ Formula (integer div) │
/// ├────────────┼───────────────────────┤
/// │ enemies    │ level / 3 + 1         │
/// │ flip score │ 20 × (level / 10 + 1) │
/// └────────────┴───────────────────────┘
///
/// ## Life bonus
/// One extra life each time the score has grown by LIFE_BONUS_STEP since
/// the last bonus (or since the start of the game).

/// Base points for a single flip.
pub const FLIP_POINTS: i32 = 20;
pub const LIFE_BONUS_STEP: i32 = 1000;

/// Outcome of landing on a cell currently holding `was_on`.
/// `None` means the cell is left as it is and nothing is scored.
pub fn flip_cell(level: u32, was_on: bool) -> Option<bool> {
    if level % 2 == 1 {
        if was_on { None } else { Some(true) }
    } else {
        Some(!was_on)
    }
}

pub fn points_per_flip(level: u32) -> i32 {
    FLIP_POINTS * (level as i32 / 10 + 1)
}

pub fn enemy_count(level: u32) -> usize {
    level as usize / 3 + 1
}

/// Has the score grown enough since `last_bonus` to earn a life?
pub fn earns_life(score: i32, last_bonus: i32) -> bool {
    score - last_bonus >= LIFE_BONUS_STEP
}
