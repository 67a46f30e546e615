/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into the `front` buffer (array of Glyph)
///   2. Compare each glyph with the `back` buffer (previous frame)
///   3. Emit terminal commands only for glyphs that changed
///   4. Batch everything with `queue!` and flush once
///   5. Swap front/back
///
/// ## Projection
///
/// Board cell (row, col) maps to the top-left of its cube:
///
///   x = origin_x + (row - col) * HALF_W
///   y = origin_y + (row + col) * ROW_H
///
/// so SE (row + 1) steps down-right, SW (col + 1) down-left, NW up-left and
/// NE up-right. A cube is a CUBE_W wide top face with a two-tone side row
/// below it. Beings sit one row above the top face and rise by one row per
/// HEIGHT_PER_ROW units of jump height.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::being::{Animation, Being};
use crate::domain::board::Board;
use crate::sim::level::Level;
use crate::sim::world::{MenuItem, Phase, WorldState};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const TOP_ON: Color = Color::Rgb { r: 34, g: 255, b: 136 };
const TOP_OFF: Color = Color::Rgb { r: 255, g: 34, b: 136 };
const SIDE_LEFT: Color = Color::Rgb { r: 222, g: 173, b: 190 };
const SIDE_RIGHT: Color = Color::Rgb { r: 102, g: 119, b: 136 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 150, b: 40 };
const ENEMY_FG: Color = Color::Rgb { r: 190, g: 80, b: 255 };
const TEXT_FG: Color = Color::Rgb { r: 220, g: 220, b: 230 };
const DIM_FG: Color = Color::Rgb { r: 120, g: 120, b: 140 };
const ACCENT_FG: Color = Color::Rgb { r: 255, g: 220, b: 80 };

// ── Geometry ──

const CUBE_W: i32 = 6;
const HALF_W: i32 = CUBE_W / 2;
const ROW_H: i32 = 2;
const HEIGHT_PER_ROW: f32 = 25.0;
const HUD_ROW: i32 = 0;
const BOARD_TOP: i32 = 6;

// ── Glyph: the unit of the back buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    const BLANK: Glyph = Glyph { ch: ' ', fg: TEXT_FG, bg: BASE_BG };

    /// Never equal to a drawn glyph; forces a full repaint.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    /// Signed coordinates; anything off-screen is clipped.
    fn set(&mut self, x: i32, y: i32, g: Glyph) {
        if x < 0 || y < 0 { return; }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, Glyph { ch, fg, bg });
        }
    }

    /// Horizontally centred text.
    fn put_centered(&mut self, y: i32, s: &str, fg: Color) {
        let x = (self.width as i32 - s.chars().count() as i32) / 2;
        self.put_str(x, y, s, fg, BASE_BG);
    }

    fn fill(&mut self, x: i32, y: i32, w: i32, bg: Color) {
        for dx in 0..w {
            self.set(x + dx, y, Glyph { ch: ' ', fg: bg, bg });
        }
    }
}

// ── Projection ──

/// Screen position of the top-left corner of a cube at fractional (row, col).
fn project(origin_x: i32, row: f32, col: f32) -> (i32, i32) {
    let x = origin_x as f32 + (row - col) * HALF_W as f32;
    let y = BOARD_TOP as f32 + (row + col) * ROW_H as f32;
    (x.round() as i32, y.round() as i32)
}

/// Screen position of a being's sprite (two columns wide).
fn sprite_pos(origin_x: i32, b: &Being) -> (i32, i32) {
    let (dr, dc) = b.offset();
    let row = b.position.row as f32 + dr;
    let col = b.position.col as f32 + dc;
    let (x, y) = project(origin_x, row, col);
    let lift = (b.height() / HEIGHT_PER_ROW).round() as i32;
    (x + HALF_W - 1, y - 1 - lift)
}

/// Two-character sprite for an animation frame. Frames 0-3 and 4-7 alternate.
fn sprite(anim: Animation, frame: usize) -> &'static str {
    let alt = frame >= 4;
    match (anim, alt) {
        (Animation::Idle, false) => "()",
        (Animation::Idle, true) => "{}",
        (Animation::FrontRight, false) => "(>",
        (Animation::FrontRight, true) => "(\u{25B8}",
        (Animation::FrontLeft, false) => "<)",
        (Animation::FrontLeft, true) => "\u{25C2})",
        (Animation::BackRight, false) => "/>",
        (Animation::BackRight, true) => "/\u{25B8}",
        (Animation::BackLeft, false) => "<\\",
        (Animation::BackLeft, true) => "\u{25C2}\\",
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Pick up the terminal size; on change, invalidate the back buffer.
    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        self.sync_size()?;

        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Glyph::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        compose(&mut self.front, world);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = TEXT_FG;
        let mut last_bg = BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ══════════════════════════════════════════════════════════════
// Compose: build front buffer content
// ══════════════════════════════════════════════════════════════

fn compose(buf: &mut FrameBuffer, w: &WorldState) {
    match w.phase {
        Phase::Title => compose_title(buf, w),
        Phase::Playing | Phase::Paused | Phase::LevelComplete => {
            if let Some(level) = w.level.as_ref() {
                compose_game(buf, level);
            }
            match w.phase {
                Phase::Paused => compose_banner(buf, "PAUSED", "[P] resume"),
                Phase::LevelComplete => {
                    let number = w.level.as_ref().map_or(0, |l| l.number);
                    let title = format!("LEVEL {} COMPLETED", number);
                    compose_banner(buf, &title, "[Enter] next level");
                }
                _ => {}
            }
        }
        Phase::GameOver => compose_game_over(buf, w),
        Phase::ScoreTable => compose_score_table(buf, w),
    }
}

fn compose_title(buf: &mut FrameBuffer, w: &WorldState) {
    let mid = buf.height as i32 / 2;
    buf.put_centered(mid - 6, "P Y R A M I D   H O P", ACCENT_FG);
    buf.put_centered(mid - 4, "flip every cube, dodge the hoppers", DIM_FG);

    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let selected = i == w.menu_cursor;
        let label = if selected {
            format!("> {} <", item.label())
        } else {
            item.label().to_string()
        };
        let fg = if selected { ACCENT_FG } else { TEXT_FG };
        buf.put_centered(mid - 1 + i as i32 * 2, &label, fg);
    }

    if let Some(best) = w.scores.best() {
        buf.put_centered(mid + 6, &format!("BEST {}", best), DIM_FG);
    }
    buf.put_centered(buf.height as i32 - 2, "Q/W/A/S hop   P pause   Esc quit", DIM_FG);
}

fn compose_game(buf: &mut FrameBuffer, level: &Level) {
    let origin_x = buf.width as i32 / 2 - HALF_W;

    let hearts: String = "\u{2665}".repeat(level.player.lives.max(0) as usize);
    let board = &level.clear_board;
    let flipped = board.cells().filter(|&c| board.get(c)).count();
    let hud = format!(
        " SCORE {:<8} LEVEL {:<3} CUBES {:>2}/{:<2}  LIVES {}",
        level.score, level.number, flipped, board.size(), hearts,
    );
    buf.put_str(0, HUD_ROW, &hud, TEXT_FG, BASE_BG);

    let target = if level.number % 2 == 1 { "TARGET" } else { "TARGET (toggles)" };
    buf.put_str(1, HUD_ROW + 2, target, DIM_FG, BASE_BG);
    buf.fill(1 + target.len() as i32 + 1, HUD_ROW + 2, CUBE_W, TOP_ON);

    // Falling beings go behind the pyramid.
    for e in level.enemies.iter().filter(|e| e.is_placed() && e.being.is_falling()) {
        draw_being(buf, origin_x, &e.being, ENEMY_FG);
    }
    if level.player.being.is_falling() {
        draw_being(buf, origin_x, &level.player.being, PLAYER_FG);
    }

    draw_board(buf, origin_x, &level.clear_board);

    for e in level.enemies.iter().filter(|e| e.is_placed() && !e.being.is_falling()) {
        draw_being(buf, origin_x, &e.being, ENEMY_FG);
    }
    if !level.player.being.is_falling() {
        draw_being(buf, origin_x, &level.player.being, PLAYER_FG);
    }
}

fn draw_board(buf: &mut FrameBuffer, origin_x: i32, board: &Board) {
    for cell in board.cells() {
        let (x, y) = project(origin_x, cell.row as f32, cell.col as f32);
        let top = if board.get(cell) { TOP_ON } else { TOP_OFF };
        buf.fill(x, y, CUBE_W, top);
        buf.fill(x, y + 1, HALF_W, SIDE_LEFT);
        buf.fill(x + HALF_W, y + 1, HALF_W, SIDE_RIGHT);
    }
}

fn draw_being(buf: &mut FrameBuffer, origin_x: i32, b: &Being, fg: Color) {
    let (x, y) = sprite_pos(origin_x, b);
    let (anim, frame) = b.animation_frame();
    for (i, ch) in sprite(anim, frame).chars().enumerate() {
        // Keep whatever colour is underneath so sprites sit on cube tops.
        let under = buf.get(x.max(0) as usize + i, y.max(0) as usize).bg;
        buf.set(x + i as i32, y, Glyph { ch, fg, bg: under });
    }
}

fn compose_banner(buf: &mut FrameBuffer, title: &str, hint: &str) {
    let y = BOARD_TOP - 3;
    let width = title.len().max(hint.len()) as i32 + 6;
    let x = (buf.width as i32 - width) / 2;
    for dy in 0..4 {
        buf.fill(x, y + dy, width, BASE_BG);
    }
    buf.put_centered(y + 1, title, ACCENT_FG);
    buf.put_centered(y + 2, hint, DIM_FG);
}

fn compose_game_over(buf: &mut FrameBuffer, w: &WorldState) {
    let mid = buf.height as i32 / 2;
    buf.put_centered(mid - 5, "G A M E   O V E R", TOP_OFF);
    buf.put_centered(mid - 3, &format!("SCORE {}", w.score()), TEXT_FG);
    buf.put_centered(mid - 1, "ENTER YOUR INITIALS", DIM_FG);

    let x0 = buf.width as i32 / 2 - 3;
    for (i, &letter) in w.initials.iter().enumerate() {
        let selected = i == w.initials_cursor;
        let blink = selected && (w.anim_tick / 15) % 2 == 0;
        let (fg, bg) = if blink { (BASE_BG, ACCENT_FG) } else { (ACCENT_FG, BASE_BG) };
        buf.put_str(x0 + i as i32 * 2, mid + 1, &(letter as char).to_string(), fg, bg);
    }
    buf.put_centered(mid + 4, "\u{2191}/\u{2193} letter   \u{2190}/\u{2192} move   Enter save", DIM_FG);
}

fn compose_score_table(buf: &mut FrameBuffer, w: &WorldState) {
    let top = buf.height as i32 / 2 - 7;
    buf.put_centered(top, "H I G H   S C O R E S", ACCENT_FG);
    if w.scores.is_empty() {
        buf.put_centered(top + 3, "no scores yet", DIM_FG);
    }
    for (i, r) in w.scores.iter().enumerate() {
        let line = format!("{:>2}.  {}  {:>8}", i + 1, r.name(), r.score());
        buf.put_centered(top + 2 + i as i32, &line, TEXT_FG);
    }
    buf.put_centered(top + 12, "[Enter] back", DIM_FG);
}
