/// Input: terminal key events → edge-triggered `Intent`s.
///
/// Only fresh presses produce intents. Terminals without Release events
/// send auto-repeat Presses while a key is held; a key counts as held until
/// HOLD_TIMEOUT passes without another event, so holding a key hops once.
///
/// ## Key map
///   Q / 7  hop NW        W / 9  hop NE
///   A / 1  hop SW        S / 3  hop SE
///   arrows menu / initials entry
///   P      pause         Enter / Space  confirm
///   Esc, Ctrl+C          quit

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::being::Direction;
use crate::sim::world::Intent;

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Intents from keys pressed since the previous drain.
    intents: Vec<Intent>,

    /// Whether to honor Release events (keyboard enhancement available).
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            intents: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) -> &[Intent] {
        self.intents.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        &self.intents
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.last_active
                    .get(&key.code)
                    .map_or(false, |t| now.duration_since(*t) < HOLD_TIMEOUT);
                self.last_active.insert(key.code, now);
                if was_held { return; }
                if let Some(intent) = intent_for(key) {
                    self.intents.push(intent);
                }
            }
        }
    }
}

/// The intent a single key press stands for, if any.
pub fn intent_for(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Intent::Quit),
            _ => None,
        };
    }
    let intent = match key.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' | '7' => Intent::Move(Direction::NW),
            'w' | '9' => Intent::Move(Direction::NE),
            's' | '3' => Intent::Move(Direction::SE),
            'a' | '1' => Intent::Move(Direction::SW),
            'p' => Intent::PauseToggle,
            ' ' => Intent::Confirm,
            _ => return None,
        },
        KeyCode::Enter => Intent::Confirm,
        KeyCode::Up => Intent::MenuUp,
        KeyCode::Down => Intent::MenuDown,
        KeyCode::Left => Intent::MenuLeft,
        KeyCode::Right => Intent::MenuRight,
        KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}
