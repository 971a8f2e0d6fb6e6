use std::collections::HashSet;

use rand::thread_rng;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Grid coordinate as `(row, col)`, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub usize, pub usize);

impl Cell {
    // l-inf norm; two distinct cells are adjacent exactly when this is 1
    pub fn distance(&self, other: &Cell) -> usize {
        let dr = (self.0 as i64 - other.0 as i64).abs();
        let dc = (self.1 as i64 - other.1 as i64).abs();
        dr.max(dc) as usize
    }
}

/// Board geometry, shared by the board and the agent. Carries no game state,
/// so handing it to the agent leaks nothing about the mines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub height: usize,
    pub width: usize,
}

impl GridSize {
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        cell.0 < self.height && cell.1 < self.width
    }

    pub fn cell_from_index(&self, x: usize) -> Option<Cell> {
        if x >= self.area() {
            return None;
        }
        Some(Cell(x / self.width, x % self.width))
    }

    /// Every cell of the grid, in row-major order.
    pub fn cells(&self) -> Vec<Cell> {
        (0..self.area())
            .filter_map(|x| self.cell_from_index(x))
            .collect()
    }

    /// In-bounds cells within one row and one column of `cell`, excluding
    /// `cell` itself. No wraparound at the edges.
    pub fn neighbors(&self, cell: &Cell) -> Vec<Cell> {
        let mut offsets = Vec::with_capacity(8);
        for i in -1..2 {
            for j in -1..2 {
                if i != 0 || j != 0 {
                    offsets.push((i, j));
                }
            }
        }
        offsets
            .iter()
            .map(|(i, j)| (i + cell.0 as i64, j + cell.1 as i64))
            .filter(|(r, c)| *r >= 0 && *c >= 0)
            .map(|(r, c)| Cell(r as usize, c as usize))
            .filter(|candidate| self.contains(candidate))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{mine_count} mines cannot fit on a {height}x{width} board")]
    InvalidConfiguration {
        height: usize,
        width: usize,
        mine_count: usize,
    },
    #[error("cell {0:?} is outside the board")]
    OutOfBounds(Cell),
}

/// Ground truth: where the mines are. The mine set is fixed at construction
/// and never exposed; callers only get per-cell queries.
#[derive(Debug)]
pub struct Board {
    pub size: GridSize,
    mines: HashSet<Cell>,
    flagged: HashSet<Cell>,
}

impl Board {
    /// Place `mine_count` mines uniformly at random without replacement.
    pub fn new(height: usize, width: usize, mine_count: usize) -> Result<Board, BoardError> {
        let size = GridSize { height, width };
        if mine_count > size.area() {
            return Err(BoardError::InvalidConfiguration {
                height,
                width,
                mine_count,
            });
        }
        let mut rng = thread_rng();
        let mut mines = HashSet::with_capacity(mine_count);
        while mines.len() < mine_count {
            // rejection sampling: a repeated draw leaves the set unchanged
            // and gets redrawn; the guard above keeps this finite
            mines.insert(Cell(rng.gen_range(0, height), rng.gen_range(0, width)));
        }
        debug!(height, width, mine_count, "generated board");
        Ok(Board {
            size,
            mines,
            flagged: HashSet::new(),
        })
    }

    /// Deterministic placement from an explicit mine set, for harnesses and
    /// replays. Every mine must sit on the grid.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: HashSet<Cell>,
    ) -> Result<Board, BoardError> {
        let size = GridSize { height, width };
        for cell in &mines {
            if !size.contains(cell) {
                return Err(BoardError::OutOfBounds(*cell));
            }
        }
        Ok(Board {
            size,
            mines,
            flagged: HashSet::new(),
        })
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    fn check_bounds(&self, cell: &Cell) -> Result<(), BoardError> {
        match self.size.contains(cell) {
            true => Ok(()),
            false => Err(BoardError::OutOfBounds(*cell)),
        }
    }

    pub fn is_mine(&self, cell: &Cell) -> Result<bool, BoardError> {
        self.check_bounds(cell)?;
        Ok(self.mines.contains(cell))
    }

    /// Mines among the neighbors of `cell`, not counting `cell` itself.
    pub fn count_adjacent_mines(&self, cell: &Cell) -> Result<usize, BoardError> {
        self.check_bounds(cell)?;
        Ok(self
            .size
            .neighbors(cell)
            .iter()
            .filter(|neighbor| self.mines.contains(*neighbor))
            .count())
    }

    pub fn flag_mine(&mut self, cell: &Cell) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        self.flagged.insert(*cell);
        Ok(())
    }

    /// True exactly when the flagged set equals the mine set. A flagged
    /// non-mine keeps this false even with every mine flagged.
    pub fn won(&self) -> bool {
        self.flagged == self.mines
    }
}

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
mod grid_tests {
    use super::*;
    use itertools::Itertools;

    fn cell_fits(cell: &Cell, size: &GridSize) -> bool {
        cell.0 < size.height && cell.1 < size.width
    }

    proptest! {
        #[test]
        fn area_correctness(width in 0..1000usize, height in 0..1000usize) {
            prop_assert_eq!(GridSize { height, width }.area(), width * height);
        }

        #[test]
        fn cell_from_index_correctness(x in any::<usize>(),
                                       width in 1..1000usize, height in 1..1000usize) {
            let size = GridSize { height, width };
            match size.cell_from_index(x) {
                None => prop_assert!(x >= size.area()),
                Some(cell) => {
                    prop_assert_eq!(cell, Cell(x / width, x % width));
                    prop_assert!(cell_fits(&cell, &size));
                }
            }
        }

        #[test]
        fn cells_cover_the_grid(width in 0..60usize, height in 0..60usize) {
            let size = GridSize { height, width };
            let cells = size.cells();
            prop_assert_eq!(cells.len(), size.area());
            prop_assert!(cells.iter().all(|cell| cell_fits(cell, &size)));
            prop_assert_eq!(cells.iter().dedup().count(), size.area());
        }

        #[test]
        fn neighbors_are_adjacent_and_in_bounds(width in 1..40usize, height in 1..40usize,
                                                r in 0..40usize, c in 0..40usize) {
            let size = GridSize { height, width };
            let cell = Cell(r % height, c % width);
            let neighbors = size.neighbors(&cell);

            let low_r = cell.0.saturating_sub(1);
            let high_r = (cell.0 + 1).min(height - 1);
            let low_c = cell.1.saturating_sub(1);
            let high_c = (cell.1 + 1).min(width - 1);
            let expected = (high_r - low_r + 1) * (high_c - low_c + 1) - 1;

            prop_assert_eq!(neighbors.len(), expected);
            prop_assert!(neighbors.iter().all(|n| cell_fits(n, &size)));
            prop_assert!(neighbors.iter().all(|n| cell.distance(n) == 1));
        }

        #[test]
        fn distance_is_symmetric(r1 in 0..1000usize, c1 in 0..1000usize,
                                 r2 in 0..1000usize, c2 in 0..1000usize) {
            let a = Cell(r1, c1);
            let b = Cell(r2, c2);
            prop_assert_eq!(a.distance(&b), b.distance(&a));
            prop_assert_eq!(a.distance(&a), 0);
        }
    }
}
