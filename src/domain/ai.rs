/// Enemy AI: no pathfinding, just uniform random choices.
///
/// Direction: one of the four diagonals, equally likely.
/// Placement: a random row first, then a random column within that row.
/// This favours the short rows near the bottom of the triangle.

use rand::Rng;

use super::being::Direction;
use super::board::{Board, Cell};

pub fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

/// A random valid cell of `board`.
pub fn random_cell<R: Rng>(board: &Board, rng: &mut R) -> Cell {
    let row = rng.gen_range(0..board.width());
    let col = rng.gen_range(0..board.row_len(row));
    Cell::new(row as i32, col as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_cells_are_inside() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert!(board.is_inside(random_cell(&board, &mut rng)));
        }
    }

    #[test]
    fn every_row_reachable() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[random_cell(&board, &mut rng).row as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn all_directions_drawn() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(random_direction(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }
}
