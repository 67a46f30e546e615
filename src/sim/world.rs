/// WorldState: the game controller above a single level.
///
/// ## Phases
///
///   Title ──New Game──▶ Playing ◀──pause──▶ Paused
///     ▲                  │    │
///     │        cleared ──┘    └── out of lives
///     │                  ▼                ▼
///     │            LevelComplete       GameOver (enter initials)
///     │              │ confirm            │ confirm
///     │              └──▶ Playing         ▼
///     └───────────── confirm ────────  ScoreTable
///
/// Input arrives as discrete `Intent`s, time as `tick(dt)`. Both return the
/// events the presentation layer may want to react to.

use std::path::PathBuf;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::being::Direction;
use crate::domain::rules;
use super::event::GameEvent;
use super::level::Level;
use super::scores::{PlayerRecord, ScoreTable, NAME_LEN};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    Paused,
    LevelComplete,
    GameOver,
    ScoreTable,
}

/// A discrete player request, already decoded from keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    Move(Direction),
    PauseToggle,
    Confirm,
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    Quit,
}

/// Title menu entries, top to bottom.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    NewGame,
    HighScores,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::NewGame, MenuItem::HighScores, MenuItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::NewGame => "NEW GAME",
            MenuItem::HighScores => "HIGH SCORES",
            MenuItem::Quit => "QUIT",
        }
    }
}

pub struct WorldState {
    pub phase: Phase,
    /// The running level; `None` outside a game.
    pub level: Option<Level>,
    pub scores: ScoreTable,
    scores_path: PathBuf,
    /// Seeds every new game's level generator.
    session_rng: StdRng,

    // Title menu
    pub menu_cursor: usize,

    // Game over: initials entry
    pub initials: [u8; NAME_LEN],
    pub initials_cursor: usize,
    pub final_score: i32,

    /// Score at the last life bonus (or game start).
    last_bonus: i32,
    /// Free-running frame counter for blinking text.
    pub anim_tick: u64,
    pub quit: bool,
}

impl WorldState {
    pub fn new(scores_path: PathBuf, seed: Option<u64>) -> Self {
        let session_rng = match seed {
            Some(s) => {
                info!("session seed {}", s);
                StdRng::seed_from_u64(s)
            }
            None => StdRng::from_entropy(),
        };
        let scores = ScoreTable::load(&scores_path);

        WorldState {
            phase: Phase::Title,
            level: None,
            scores,
            scores_path,
            session_rng,
            menu_cursor: 0,
            initials: *b"AAA",
            initials_cursor: 0,
            final_score: 0,
            last_bonus: 0,
            anim_tick: 0,
            quit: false,
        }
    }

    pub fn menu_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_cursor]
    }

    /// Score shown in the HUD and on the game-over screen.
    pub fn score(&self) -> i32 {
        self.level.as_ref().map_or(self.final_score, |l| l.score)
    }

    // ══════════════════════════════════════════════════════════════
    // Input
    // ══════════════════════════════════════════════════════════════

    pub fn apply(&mut self, intent: Intent) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if intent == Intent::Quit {
            info!("quit requested in {:?}", self.phase);
            self.quit = true;
            return events;
        }

        match self.phase {
            Phase::Title => self.apply_title(intent, &mut events),
            Phase::Playing => match intent {
                Intent::Move(dir) => {
                    if let Some(level) = self.level.as_mut() {
                        if level.move_player(dir) {
                            events.push(GameEvent::PlayerHopped);
                        }
                    }
                }
                Intent::PauseToggle => self.phase = Phase::Paused,
                _ => {}
            },
            Phase::Paused => {
                if intent == Intent::PauseToggle {
                    self.phase = Phase::Playing;
                }
            }
            Phase::LevelComplete => {
                if intent == Intent::Confirm {
                    if let Some(level) = self.level.take() {
                        let next = level.next();
                        info!("level {} start, score {}", next.number, next.score);
                        events.push(GameEvent::LevelStarted { number: next.number });
                        self.level = Some(next);
                        self.phase = Phase::Playing;
                    }
                }
            }
            Phase::GameOver => self.apply_initials(intent),
            Phase::ScoreTable => {
                if intent == Intent::Confirm {
                    self.phase = Phase::Title;
                }
            }
        }

        events
    }

    fn apply_title(&mut self, intent: Intent, events: &mut Vec<GameEvent>) {
        let n = MenuItem::ALL.len();
        match intent {
            Intent::MenuUp => self.menu_cursor = (self.menu_cursor + n - 1) % n,
            Intent::MenuDown => self.menu_cursor = (self.menu_cursor + 1) % n,
            Intent::Confirm => match self.menu_item() {
                MenuItem::NewGame => {
                    self.start_new_game();
                    events.push(GameEvent::LevelStarted { number: 1 });
                }
                MenuItem::HighScores => self.phase = Phase::ScoreTable,
                MenuItem::Quit => self.quit = true,
            },
            _ => {}
        }
    }

    fn apply_initials(&mut self, intent: Intent) {
        let letter = &mut self.initials[self.initials_cursor];
        match intent {
            Intent::MenuUp => *letter = if *letter >= b'Z' { b'A' } else { *letter + 1 },
            Intent::MenuDown => *letter = if *letter <= b'A' { b'Z' } else { *letter - 1 },
            Intent::MenuLeft => self.initials_cursor = self.initials_cursor.saturating_sub(1),
            Intent::MenuRight => {
                self.initials_cursor = (self.initials_cursor + 1).min(NAME_LEN - 1);
            }
            Intent::Confirm => self.submit_score(),
            _ => {}
        }
    }

    fn start_new_game(&mut self) {
        let rng = StdRng::seed_from_u64(self.session_rng.gen());
        self.level = Some(Level::new(1, 0, rng));
        self.last_bonus = 0;
        self.final_score = 0;
        self.phase = Phase::Playing;
        info!("new game");
    }

    fn submit_score(&mut self) {
        let record = PlayerRecord::new(self.initials, self.final_score);
        info!("high score {} {}", record.name(), record.score());
        self.scores.insert(record);
        if let Err(e) = self.scores.save(&self.scores_path) {
            warn!("cannot save high scores to {}: {}", self.scores_path.display(), e);
        }
        self.phase = Phase::ScoreTable;
    }

    // ══════════════════════════════════════════════════════════════
    // Time
    // ══════════════════════════════════════════════════════════════

    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if self.phase != Phase::Playing {
            return vec![];
        }
        let level = match self.level.as_mut() {
            Some(l) => l,
            None => return vec![],
        };

        let mut events: Vec<GameEvent> = level.update(dt).into_iter().map(GameEvent::Level).collect();

        if rules::earns_life(level.score, self.last_bonus) {
            level.player.one_up();
            self.last_bonus = level.score;
            info!("extra life at {} points, {} lives", level.score, level.player.lives);
            events.push(GameEvent::LifeGained);
        }

        if level.is_player_dead() {
            let score = level.score;
            info!("game over on level {} with {} points", level.number, score);
            self.final_score = score;
            self.level = None;
            self.initials = *b"AAA";
            self.initials_cursor = 0;
            self.phase = Phase::GameOver;
            events.push(GameEvent::GameOver { score });
        } else if level.is_completed() {
            info!("level {} cleared, score {}", level.number, level.score);
            self.phase = Phase::LevelComplete;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Cell;

    const DT: f32 = 1.0 / 60.0;

    fn temp_scores(tag: &str) -> PathBuf {
        let p = std::env::temp_dir()
            .join(format!("pyramid_hop_world_{}_{}.dat", tag, std::process::id()));
        let _ = std::fs::remove_file(&p);
        p
    }

    fn new_game(tag: &str) -> WorldState {
        let mut w = WorldState::new(temp_scores(tag), Some(42));
        w.apply(Intent::Confirm);
        assert_eq!(w.phase, Phase::Playing);
        w
    }

    fn level(w: &mut WorldState) -> &mut Level {
        w.level.as_mut().expect("level running")
    }

    #[test]
    fn title_menu_wraps() {
        let mut w = WorldState::new(temp_scores("menu"), Some(1));
        assert_eq!(w.menu_item(), MenuItem::NewGame);
        w.apply(Intent::MenuUp);
        assert_eq!(w.menu_item(), MenuItem::Quit);
        w.apply(Intent::MenuDown);
        w.apply(Intent::MenuDown);
        assert_eq!(w.menu_item(), MenuItem::HighScores);
        w.apply(Intent::Confirm);
        assert_eq!(w.phase, Phase::ScoreTable);
        w.apply(Intent::Confirm);
        assert_eq!(w.phase, Phase::Title);
    }

    #[test]
    fn quit_from_menu_and_anywhere() {
        let mut w = WorldState::new(temp_scores("quit"), Some(1));
        w.apply(Intent::MenuUp);
        w.apply(Intent::Confirm);
        assert!(w.quit);

        let mut w = new_game("quit2");
        w.apply(Intent::Quit);
        assert!(w.quit);
    }

    #[test]
    fn new_game_starts_level_one() {
        let mut w = new_game("start");
        let l = level(&mut w);
        assert_eq!(l.number, 1);
        assert_eq!(l.score, 0);
        assert_eq!(l.player.lives, 3);
    }

    #[test]
    fn pause_freezes_simulation() {
        let mut w = new_game("pause");
        w.tick(DT);
        let h = level(&mut w).player.being.height();
        w.apply(Intent::PauseToggle);
        assert_eq!(w.phase, Phase::Paused);
        for _ in 0..10 {
            assert!(w.tick(DT).is_empty());
        }
        assert_eq!(level(&mut w).player.being.height(), h);
        w.apply(Intent::Move(Direction::SE));
        w.apply(Intent::PauseToggle);
        assert_eq!(w.phase, Phase::Playing);
        w.tick(DT);
        assert!(level(&mut w).player.being.height() < h);
    }

    #[test]
    fn hop_reports_only_when_started() {
        let mut w = new_game("hop");
        // Still dropping in.
        assert!(w.apply(Intent::Move(Direction::SE)).is_empty());
        level(&mut w).enemies.clear();
        for _ in 0..30 {
            w.tick(DT);
        }
        assert_eq!(w.apply(Intent::Move(Direction::SE)), vec![GameEvent::PlayerHopped]);
    }

    #[test]
    fn life_bonus_once_per_thousand() {
        let mut w = new_game("bonus");
        level(&mut w).enemies.clear();
        level(&mut w).score = 1000;
        let events = w.tick(DT);
        assert!(events.contains(&GameEvent::LifeGained));
        assert_eq!(level(&mut w).player.lives, 4);

        let events = w.tick(DT);
        assert!(!events.contains(&GameEvent::LifeGained));

        level(&mut w).score = 1999;
        assert!(!w.tick(DT).contains(&GameEvent::LifeGained));
        level(&mut w).score = 2000;
        assert!(w.tick(DT).contains(&GameEvent::LifeGained));
        assert_eq!(level(&mut w).player.lives, 5);
    }

    #[test]
    fn cleared_level_waits_for_confirm() {
        let mut w = new_game("clear");
        {
            let l = level(&mut w);
            l.enemies.clear();
            let rest: Vec<Cell> = l.clear_board.cells().filter(|&c| c != Cell::APEX).collect();
            for c in rest {
                l.clear_board.set(c, true);
            }
        }
        for _ in 0..30 {
            w.tick(DT);
        }
        assert_eq!(w.phase, Phase::LevelComplete);
        let score = w.score();
        assert_eq!(score, 20);

        assert!(w.tick(DT).is_empty());
        let events = w.apply(Intent::Confirm);
        assert_eq!(events, vec![GameEvent::LevelStarted { number: 2 }]);
        assert_eq!(w.phase, Phase::Playing);
        let l = level(&mut w);
        assert_eq!(l.number, 2);
        assert_eq!(l.score, score);
        assert_eq!(l.player.lives, 3);
    }

    #[test]
    fn game_over_enters_initials_and_saves() {
        let path = temp_scores("over");
        let mut w = WorldState::new(path.clone(), Some(42));
        w.apply(Intent::Confirm);
        level(&mut w).score = 340;
        level(&mut w).player.lives = 0;

        let events = w.tick(DT);
        assert!(events.contains(&GameEvent::GameOver { score: 340 }));
        assert_eq!(w.phase, Phase::GameOver);
        assert!(w.level.is_none());
        assert_eq!(w.score(), 340);

        // "BZA": up on B, right, down wraps A to Z, right, right (clamped).
        w.apply(Intent::MenuUp);
        w.apply(Intent::MenuRight);
        w.apply(Intent::MenuDown);
        w.apply(Intent::MenuRight);
        w.apply(Intent::MenuRight);
        assert_eq!(w.initials_cursor, 2);
        w.apply(Intent::MenuLeft);
        w.apply(Intent::MenuLeft);
        w.apply(Intent::MenuLeft);
        assert_eq!(w.initials_cursor, 0);
        assert_eq!(&w.initials, b"BZA");

        w.apply(Intent::Confirm);
        assert_eq!(w.phase, Phase::ScoreTable);
        assert_eq!(w.scores.best(), Some(340));

        let reloaded = ScoreTable::load(&path);
        let _ = std::fs::remove_file(&path);
        let top = reloaded.iter().next().map(|r| (r.name(), r.score()));
        assert_eq!(top, Some(("BZA".to_string(), 340)));
    }

    #[test]
    fn letters_wrap_upward() {
        let mut w = new_game("wrap");
        level(&mut w).player.lives = 0;
        w.tick(DT);
        w.apply(Intent::MenuDown);
        assert_eq!(w.initials[0], b'Z');
        w.apply(Intent::MenuUp);
        assert_eq!(w.initials[0], b'A');
    }

    #[test]
    fn bonus_baseline_resets_each_game() {
        let mut w = new_game("reset");
        level(&mut w).score = 1500;
        w.tick(DT);
        level(&mut w).player.lives = 0;
        w.tick(DT);
        w.apply(Intent::Confirm);
        w.apply(Intent::Confirm);
        assert_eq!(w.phase, Phase::Title);
        w.apply(Intent::Confirm);
        level(&mut w).score = 1000;
        assert!(w.tick(DT).contains(&GameEvent::LifeGained));
    }
}
