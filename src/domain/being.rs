/// Being: the hop state machine shared by the player and the enemies.
///
/// ## Jump lifecycle
///
///   Idle ──move(dir)──▶ *Up* phase ──height ≥ MAX_HEIGHT──▶ *Down* phase
///     ▲                                                        │
///     └──────────────── land() ◀── height < 0 (landed) ◀───────┘
///
/// Physics advances once per tick with fixed deltas; `dt` only drives the
/// animation clock. While a jump is in flight the offset accumulator carries
/// the sub-cell progress used for drawing. The discrete position changes
/// exactly once, when the being drops below the board surface.
///
/// A being that was dropped off the board keeps descending until it passes
/// `RESPAWN_DEPTH` and then asks to be respawned.

use super::board::Cell;

/// Apex height of a hop.
pub const MAX_HEIGHT: f32 = 100.0;
/// Height change per tick.
pub const DELTA_HEIGHT: f32 = 4.0;
/// Sub-cell progress per tick along the jump axis.
pub const DELTA_MOVEMENT: f32 = 0.02;
/// Below this height a falling being is gone for good.
pub const RESPAWN_DEPTH: f32 = -300.0;

/// Animation: frames per strip and playback rate.
pub const ANIMATION_FRAMES: usize = 8;
pub const ANIMATION_FPS: f32 = 8.0;

/// Hop direction, named after the screen diagonal it travels along.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    NW,
    NE,
    SE,
    SW,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::NW, Direction::NE, Direction::SE, Direction::SW];

    /// Per-tick (row, col) offset delta for this direction.
    pub fn slice(self) -> (f32, f32) {
        match self {
            Direction::NW => (-DELTA_MOVEMENT, 0.0),
            Direction::NE => (0.0, -DELTA_MOVEMENT),
            Direction::SE => (DELTA_MOVEMENT, 0.0),
            Direction::SW => (0.0, DELTA_MOVEMENT),
        }
    }

    /// The ascending phase a hop in this direction starts with.
    pub fn launch_phase(self) -> JumpPhase {
        match self {
            Direction::NW => JumpPhase::BackUpLeft,
            Direction::NE => JumpPhase::BackUpRight,
            Direction::SE => JumpPhase::FrontUpRight,
            Direction::SW => JumpPhase::FrontUpLeft,
        }
    }
}

/// Idle, or one half of a hop.
/// Front/Back: toward or away from the viewer. Up/Down: ascending or
/// descending half. Left/Right: screen side.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JumpPhase {
    Idle,
    FrontUpRight,
    FrontUpLeft,
    FrontDownRight,
    FrontDownLeft,
    BackUpLeft,
    BackUpRight,
    BackDownLeft,
    BackDownRight,
}

impl JumpPhase {
    pub fn is_ascending(self) -> bool {
        matches!(
            self,
            JumpPhase::FrontUpRight | JumpPhase::FrontUpLeft
                | JumpPhase::BackUpLeft | JumpPhase::BackUpRight
        )
    }

    pub fn is_descending(self) -> bool {
        matches!(
            self,
            JumpPhase::FrontDownRight | JumpPhase::FrontDownLeft
                | JumpPhase::BackDownLeft | JumpPhase::BackDownRight
        )
    }

    /// Descending counterpart of an ascending phase; other phases unchanged.
    pub fn apex(self) -> JumpPhase {
        match self {
            JumpPhase::FrontUpRight => JumpPhase::FrontDownRight,
            JumpPhase::FrontUpLeft => JumpPhase::FrontDownLeft,
            JumpPhase::BackUpLeft => JumpPhase::BackDownLeft,
            JumpPhase::BackUpRight => JumpPhase::BackDownRight,
            other => other,
        }
    }

    /// Sprite strip for this phase. Both halves of a diagonal share one.
    pub fn animation(self) -> Animation {
        match self {
            JumpPhase::Idle => Animation::Idle,
            JumpPhase::FrontUpRight | JumpPhase::FrontDownRight => Animation::FrontRight,
            JumpPhase::FrontUpLeft | JumpPhase::FrontDownLeft => Animation::FrontLeft,
            JumpPhase::BackUpRight | JumpPhase::BackDownRight => Animation::BackRight,
            JumpPhase::BackUpLeft | JumpPhase::BackDownLeft => Animation::BackLeft,
        }
    }
}

/// The five sprite strips a being can show.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Animation {
    Idle,
    FrontRight,
    FrontLeft,
    BackRight,
    BackLeft,
}

#[derive(Clone, Debug)]
pub struct Being {
    pub position: Cell,
    phase: JumpPhase,
    /// Per-tick (row, col) delta of the current hop.
    slice: (f32, f32),
    /// Accumulated (row, col) progress of the current hop.
    offset: (f32, f32),
    height: f32,
    state_time: f32,
    moving: bool,
    landed: bool,
    falling: bool,
    needs_respawn: bool,
}

impl Being {
    pub fn new(position: Cell) -> Self {
        Being {
            position,
            phase: JumpPhase::Idle,
            slice: (0.0, 0.0),
            offset: (0.0, 0.0),
            height: 0.0,
            state_time: 0.0,
            moving: false,
            landed: true,
            falling: false,
            needs_respawn: false,
        }
    }

    // ── Queries ──

    pub fn phase(&self) -> JumpPhase { self.phase }
    pub fn height(&self) -> f32 { self.height }
    pub fn offset(&self) -> (f32, f32) { self.offset }
    pub fn is_standing(&self) -> bool { self.phase == JumpPhase::Idle }
    pub fn is_moving(&self) -> bool { self.moving }
    pub fn landed(&self) -> bool { self.landed }
    pub fn is_falling(&self) -> bool { self.falling }
    pub fn needs_respawn(&self) -> bool { self.needs_respawn }

    /// Current sprite strip and frame within it.
    pub fn animation_frame(&self) -> (Animation, usize) {
        let frame = (self.state_time * ANIMATION_FPS) as usize % ANIMATION_FRAMES;
        (self.phase.animation(), frame)
    }

    // ── Commands ──

    /// Start a hop. The caller decides whether a hop is allowed.
    pub fn start_hop(&mut self, dir: Direction) {
        self.moving = true;
        self.landed = false;
        self.slice = dir.slice();
        self.offset = (0.0, 0.0);
        self.phase = dir.launch_phase();
        self.state_time = 0.0;
    }

    /// Advance one tick.
    pub fn update(&mut self, dt: f32) {
        self.state_time += dt;

        if self.phase.is_ascending() {
            self.height += DELTA_HEIGHT;
        } else if self.phase.is_descending() {
            self.height -= DELTA_HEIGHT;
        } else {
            self.height = 0.0;
        }

        if self.height >= MAX_HEIGHT {
            self.phase = self.phase.apex();
        }

        self.offset.0 += self.slice.0;
        self.offset.1 += self.slice.1;

        if !self.falling && self.height < 0.0 {
            self.position.row += commit(self.offset.0);
            self.position.col += commit(self.offset.1);
            self.landed = true;
        }

        if self.height <= RESPAWN_DEPTH {
            self.needs_respawn = true;
        }
    }

    /// Settle on the current cell.
    pub fn land(&mut self) {
        if self.height <= 0.0 {
            self.height = 0.0;
            self.phase = JumpPhase::Idle;
        }
        self.reset_motion();
        self.moving = false;
    }

    /// Drop in from above the current cell.
    pub fn respawn(&mut self) {
        self.height = MAX_HEIGHT;
        self.phase = JumpPhase::FrontDownRight;
        self.landed = false;
        self.moving = true;
        self.falling = false;
        self.needs_respawn = false;
        self.state_time = 0.5;
    }

    /// Knocked out: respawn on the next tick.
    pub fn hit(&mut self) {
        self.needs_respawn = true;
        self.moving = true;
        self.reset_motion();
    }

    /// Landed beside the pyramid: fall until out of sight.
    pub fn drop_off(&mut self) {
        self.reset_motion();
        self.falling = true;
        self.landed = false;
    }

    fn reset_motion(&mut self) {
        self.offset = (0.0, 0.0);
        self.slice = (0.0, 0.0);
    }
}

/// Whole-cell step carried by an offset accumulator.
fn commit(offset: f32) -> i32 {
    if offset >= 1.0 {
        1
    } else if offset <= -1.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// Ticks until `landed()` flips on, capped.
    fn ticks_to_land(b: &mut Being) -> usize {
        for n in 1..=200 {
            b.update(DT);
            if b.landed() { return n; }
        }
        panic!("being never landed");
    }

    #[test]
    fn starts_idle_on_ground() {
        let b = Being::new(Cell::new(2, 1));
        assert_eq!(b.phase(), JumpPhase::Idle);
        assert!(b.landed());
        assert!(!b.is_moving());
        assert_eq!(b.height(), 0.0);
    }

    #[test]
    fn idle_update_keeps_height_zero() {
        let mut b = Being::new(Cell::APEX);
        for _ in 0..10 { b.update(DT); }
        assert_eq!(b.height(), 0.0);
        assert_eq!(b.position, Cell::APEX);
        assert!(b.is_standing());
    }

    #[test]
    fn direction_launch_phases() {
        assert_eq!(Direction::NW.launch_phase(), JumpPhase::BackUpLeft);
        assert_eq!(Direction::NE.launch_phase(), JumpPhase::BackUpRight);
        assert_eq!(Direction::SE.launch_phase(), JumpPhase::FrontUpRight);
        assert_eq!(Direction::SW.launch_phase(), JumpPhase::FrontUpLeft);
    }

    #[test]
    fn ascending_flips_at_apex() {
        let mut b = Being::new(Cell::APEX);
        b.start_hop(Direction::SE);
        for _ in 0..24 { b.update(DT); }
        assert_eq!(b.phase(), JumpPhase::FrontUpRight);
        b.update(DT);
        assert_eq!(b.height(), MAX_HEIGHT);
        assert_eq!(b.phase(), JumpPhase::FrontDownRight);
    }

    #[test]
    fn full_hop_cycle() {
        let mut b = Being::new(Cell::APEX);
        b.start_hop(Direction::SE);
        assert!(b.is_moving());
        assert!(!b.landed());

        // 25 up, 25 down to zero, one more below the surface.
        assert_eq!(ticks_to_land(&mut b), 51);
        assert_eq!(b.position, Cell::new(1, 0));

        b.land();
        assert_eq!(b.height(), 0.0);
        assert_eq!(b.phase(), JumpPhase::Idle);
        assert_eq!(b.offset(), (0.0, 0.0));
        assert!(!b.is_moving());
    }

    #[test]
    fn each_direction_moves_one_axis() {
        let cases = [
            (Direction::NW, Cell::new(1, 2)),
            (Direction::NE, Cell::new(2, 1)),
            (Direction::SE, Cell::new(3, 2)),
            (Direction::SW, Cell::new(2, 3)),
        ];
        for (dir, expected) in cases {
            let mut b = Being::new(Cell::new(2, 2));
            b.start_hop(dir);
            ticks_to_land(&mut b);
            assert_eq!(b.position, expected, "{dir:?}");
        }
    }

    #[test]
    fn offset_tracks_progress_midair() {
        let mut b = Being::new(Cell::APEX);
        b.start_hop(Direction::NE);
        for _ in 0..25 { b.update(DT); }
        let (dr, dc) = b.offset();
        assert_eq!(dr, 0.0);
        assert!((dc + 0.5).abs() < 1e-4);
        assert_eq!(b.position, Cell::APEX);
    }

    #[test]
    fn dropped_off_falls_until_respawn() {
        let mut b = Being::new(Cell::new(0, 0));
        b.start_hop(Direction::NW);
        ticks_to_land(&mut b);
        assert_eq!(b.position, Cell::new(-1, 0));

        b.drop_off();
        assert!(b.is_falling());
        assert!(!b.landed());
        assert!(b.is_moving());

        let mut ticks = 0;
        while !b.needs_respawn() {
            b.update(DT);
            ticks += 1;
            assert!(!b.landed(), "falling being must not land");
            assert!(ticks < 200);
        }
        assert!(b.height() <= RESPAWN_DEPTH);
        assert_eq!(b.position, Cell::new(-1, 0));
    }

    #[test]
    fn respawn_drops_in_from_apex_height() {
        let mut b = Being::new(Cell::APEX);
        b.hit();
        assert!(b.needs_respawn());
        b.respawn();
        assert!(!b.needs_respawn());
        assert!(!b.is_falling());
        assert!(b.is_moving());
        assert_eq!(b.height(), MAX_HEIGHT);
        assert_eq!(b.phase(), JumpPhase::FrontDownRight);

        // Straight down: 26 ticks to pass the surface, no cell change.
        assert_eq!(ticks_to_land(&mut b), 26);
        assert_eq!(b.position, Cell::APEX);
    }

    #[test]
    fn land_above_surface_keeps_phase() {
        let mut b = Being::new(Cell::APEX);
        b.start_hop(Direction::SW);
        for _ in 0..5 { b.update(DT); }
        b.land();
        assert!(!b.is_moving());
        assert_eq!(b.phase(), JumpPhase::FrontUpLeft);
        assert!(b.height() > 0.0);
    }

    #[test]
    fn animation_strips() {
        let mut b = Being::new(Cell::APEX);
        assert_eq!(b.animation_frame(), (Animation::Idle, 0));
        b.start_hop(Direction::NW);
        assert_eq!(b.animation_frame().0, Animation::BackLeft);
        for _ in 0..30 { b.update(DT); }
        assert_eq!(b.phase(), JumpPhase::BackDownLeft);
        assert_eq!(b.animation_frame().0, Animation::BackLeft);
    }

    #[test]
    fn animation_frame_loops() {
        let mut b = Being::new(Cell::APEX);
        b.update(0.125 * 3.0);
        assert_eq!(b.animation_frame().1, 3);
        b.update(0.125 * 6.0);
        assert_eq!(b.animation_frame().1, 1);
    }
}
