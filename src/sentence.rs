use std::collections::HashSet;

use super::board::Cell;

/// One unit of knowledge: exactly `count` of `cells` are mines. Both marking
/// operations shrink the cell set, so a sentence only ever gets stronger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    cells: HashSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: HashSet<Cell>, count: usize) -> Sentence {
        Sentence { cells, count }
    }

    pub fn cells(&self) -> &HashSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    // an empty sentence is trivially true and carries no information
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every cell, when the count pins them all as mines; empty otherwise.
    pub fn known_mines(&self) -> HashSet<Cell> {
        match self.count == self.cells.len() {
            true => self.cells.clone(),
            false => HashSet::new(),
        }
    }

    /// Every cell, when the count pins them all as safe; empty otherwise.
    pub fn known_safes(&self) -> HashSet<Cell> {
        match self.count == 0 {
            true => self.cells.clone(),
            false => HashSet::new(),
        }
    }

    /// Restate the sentence given that `cell` is a mine: it leaves the cell
    /// set and takes one count with it. No-op for cells not mentioned here.
    pub fn mark_mine(&mut self, cell: &Cell) {
        if self.cells.remove(cell) {
            self.count -= 1;
        }
    }

    /// Restate the sentence given that `cell` is safe: it leaves the cell
    /// set and the count stands. No-op for cells not mentioned here.
    pub fn mark_safe(&mut self, cell: &Cell) {
        self.cells.remove(cell);
    }

    pub fn is_proper_subset_of(&self, other: &Sentence) -> bool {
        !self.cells.is_empty()
            && self.cells.len() < other.cells.len()
            && self.cells.is_subset(&other.cells)
    }

    /// What this sentence says about the cells `other` does not cover. Only
    /// sound when `other.is_proper_subset_of(self)` holds.
    pub fn difference(&self, other: &Sentence) -> Sentence {
        Sentence {
            cells: self.cells.difference(&other.cells).copied().collect(),
            count: self.count - other.count,
        }
    }
}

#[cfg(test)]
use proptest::prelude::*;
