/// Triangular board of cube tops.
///
/// Row `r` (counted from the apex) holds `BOARD_SIZE - r` cells:
///
///   row 0: 6 cells
///   row 1: 5 cells
///   ...
///   row 5: 1 cell
///
/// A cell is either activated (flipped to the target color) or not.
/// Out-of-range access never fails: reads are `false`, writes are ignored.

/// Number of rows (and length of row 0).
pub const BOARD_SIZE: usize = 6;

/// A board coordinate. Signed, because beings can hop off the pyramid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const APEX: Cell = Cell { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    rows: Vec<Vec<bool>>,
}

impl Board {
    pub fn new() -> Self {
        let mut board = Board { rows: Vec::with_capacity(BOARD_SIZE) };
        board.clear();
        board
    }

    /// Rebuild every row at its triangular length, all cells off.
    pub fn clear(&mut self) {
        self.rows.clear();
        for r in 0..BOARD_SIZE {
            self.rows.push(vec![false; BOARD_SIZE - r]);
        }
    }

    /// Number of rows.
    pub fn width(&self) -> usize {
        self.rows.len()
    }

    /// Length of a row, 0 for rows outside the board.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn is_inside(&self, pos: Cell) -> bool {
        pos.row >= 0
            && (pos.row as usize) < self.rows.len()
            && pos.col >= 0
            && (pos.col as usize) < self.rows[pos.row as usize].len()
    }

    #[inline]
    pub fn get(&self, pos: Cell) -> bool {
        if self.is_inside(pos) {
            self.rows[pos.row as usize][pos.col as usize]
        } else {
            false
        }
    }

    #[inline]
    pub fn set(&mut self, pos: Cell, value: bool) {
        if self.is_inside(pos) {
            self.rows[pos.row as usize][pos.col as usize] = value;
        }
    }

    /// Every cell activated? Stops at the first cell that isn't.
    pub fn is_completed(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&on| on))
    }

    /// All valid positions, apex first, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            (0..row.len()).map(move |c| Cell::new(r as i32, c as i32))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
