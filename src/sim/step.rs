/// The step function: advances a level by one tick.
///
/// Processing order:
///   1. Board refresh (enemy occupancy)
///   2. Enemies: physics, respawn, decisions, landing
///   3. Player: physics, respawn, landing and cube flips
///   4. Collision between the player and standing enemies
///
/// Occupancy is sampled in (1), before anyone moves, so a collision in (4)
/// sees where the enemies stood at the start of the tick.

use log::debug;

use crate::domain::ai;
use crate::domain::board::Cell;
use crate::domain::rules;
use super::event::LevelEvent;
use super::level::Level;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(level: &mut Level, dt: f32) -> Vec<LevelEvent> {
    let mut events: Vec<LevelEvent> = Vec::new();

    resolve_boards(level);
    resolve_enemies(level, dt, &mut events);
    resolve_player(level, dt, &mut events);
    resolve_collisions(level, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Board refresh
// ══════════════════════════════════════════════════════════════

fn resolve_boards(level: &mut Level) {
    level.enemy_board.clear();
    for e in &level.enemies {
        if e.is_placed() && e.being.is_standing() {
            level.enemy_board.set(e.being.position, true);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn resolve_enemies(level: &mut Level, dt: f32, events: &mut Vec<LevelEvent>) {
    for (index, e) in level.enemies.iter_mut().enumerate() {
        e.update(dt, &mut level.rng);

        if e.being.needs_respawn() {
            let cell = ai::random_cell(&level.clear_board, &mut level.rng);
            e.place(cell);
            debug!("enemy {} drops onto ({}, {})", index, cell.row, cell.col);
            events.push(LevelEvent::EnemyRespawned { index, cell });
            continue;
        }

        if e.ready_to_move() && !e.being.is_moving() {
            let dir = ai::random_direction(&mut level.rng);
            e.move_to(dir, &mut level.rng);
        }

        if e.being.landed() && e.being.is_moving() {
            if level.clear_board.is_inside(e.being.position) {
                e.being.land();
            } else {
                e.being.drop_off();
                events.push(LevelEvent::EnemyDroppedOff { index });
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player(level: &mut Level, dt: f32, events: &mut Vec<LevelEvent>) {
    let player = &mut level.player;
    player.being.update(dt);

    if player.being.needs_respawn() {
        player.respawn();
        events.push(LevelEvent::PlayerRespawned);
        return;
    }

    if !(player.being.landed() && player.being.is_moving()) {
        return;
    }

    let cell = player.being.position;
    if !level.clear_board.is_inside(cell) {
        player.being.drop_off();
        player.lose_life();
        events.push(LevelEvent::PlayerDroppedOff { cell });
        return;
    }

    let was_on = level.clear_board.get(cell);
    match rules::flip_cell(level.number, was_on) {
        Some(on) => {
            let points = rules::points_per_flip(level.number);
            level.clear_board.set(cell, on);
            level.score += points;
            events.push(LevelEvent::PlayerFlipped { cell, on, points });
            if on && level.clear_board.is_completed() {
                events.push(LevelEvent::LevelCleared);
            }
        }
        None => events.push(LevelEvent::PlayerLanded { cell }),
    }
    player.being.land();
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(level: &mut Level, events: &mut Vec<LevelEvent>) {
    let player = &mut level.player;
    if player.being.is_moving() { return; }

    let cell = player.being.position;
    if !level.enemy_board.get(cell) { return; }

    player.being.hit();
    player.lose_life();
    events.push(LevelEvent::PlayerHit { cell });

    // Clear the drop-in cell for the respawning player.
    for e in level.enemies.iter_mut() {
        if e.being.position == Cell::APEX {
            e.being.hit();
        }
    }
}
