use std::collections::HashSet;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::{debug, trace};

use super::board::{BoardError, Cell, GridSize};
use super::sentence::Sentence;

/// Knowledge-based player. Consumes probe results and grows its record of
/// which cells are certainly safe and which are certainly mined. It never
/// sees the board's mine set, only the counts it is fed.
pub struct Agent {
    pub size: GridSize,
    moves_made: HashSet<Cell>,
    known_safes: HashSet<Cell>,
    known_mines: HashSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Agent {
        Agent {
            size: GridSize { height, width },
            moves_made: HashSet::new(),
            known_safes: HashSet::new(),
            known_mines: HashSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn known_safes(&self) -> &HashSet<Cell> {
        &self.known_safes
    }

    pub fn known_mines(&self) -> &HashSet<Cell> {
        &self.known_mines
    }

    fn check_bounds(&self, cell: &Cell) -> Result<(), BoardError> {
        match self.size.contains(cell) {
            true => Ok(()),
            false => Err(BoardError::OutOfBounds(*cell)),
        }
    }

    /// Accept an externally certain mine, then close the knowledge base
    /// over whatever that unlocks.
    pub fn record_mine(&mut self, cell: &Cell) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        self.mark_mine(cell);
        self.saturate();
        Ok(())
    }

    /// Accept an externally certain safe cell; counterpart of `record_mine`.
    pub fn record_safe(&mut self, cell: &Cell) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        self.mark_safe(cell);
        self.saturate();
        Ok(())
    }

    // every certainty flows through these two choke points: the global set
    // and every stored sentence are updated together, so no sentence keeps
    // a stale claim about a resolved cell
    fn mark_mine(&mut self, cell: &Cell) {
        if self.known_mines.insert(*cell) {
            debug!(?cell, "cell is a mine");
        }
        for sentence in &mut self.knowledge {
            sentence.mark_mine(cell);
        }
    }

    fn mark_safe(&mut self, cell: &Cell) {
        if self.known_safes.insert(*cell) {
            debug!(?cell, "cell is safe");
        }
        for sentence in &mut self.knowledge {
            sentence.mark_safe(cell);
        }
    }

    /// Feed one probe result: `cell` was revealed and `count` of its
    /// neighbors are mines.
    pub fn observe(&mut self, cell: &Cell, count: usize) -> Result<(), BoardError> {
        self.check_bounds(cell)?;
        debug!(?cell, count, "observed");
        self.moves_made.insert(*cell);
        self.mark_safe(cell);

        // the new sentence only speaks about undetermined neighbors: cells
        // already proven safe drop out unchanged, cells already proven mined
        // drop out and surrender their share of the count
        let neighbors = self.size.neighbors(cell);
        let mined = neighbors
            .iter()
            .filter(|n| self.known_mines.contains(*n))
            .count();
        let unknown: HashSet<Cell> = neighbors
            .into_iter()
            .filter(|n| !self.known_mines.contains(n))
            .filter(|n| !self.known_safes.contains(n) && !self.moves_made.contains(n))
            .collect();
        if !unknown.is_empty() {
            self.knowledge.push(Sentence::new(unknown, count - mined));
        }

        self.saturate();
        Ok(())
    }

    /// Run resolution and subset elimination to a fixed point. Conclusions
    /// are gathered over a snapshot of the base and applied afterwards, so
    /// no pass ever mutates the sentences it is scanning.
    ///
    /// Termination: marking a concluded cell empties the sentences that
    /// concluded it and strips the cell from every other sentence, and a
    /// derived sentence is only kept when the base has never seen it. Both
    /// stores are bounded by the grid, so every pass makes real progress.
    fn saturate(&mut self) {
        loop {
            self.knowledge.retain(|sentence| !sentence.is_empty());

            let mut mines: Vec<Cell> = Vec::new();
            let mut safes: Vec<Cell> = Vec::new();
            for sentence in &self.knowledge {
                mines.extend(sentence.known_mines());
                safes.extend(sentence.known_safes());
            }
            let resolved = mines.len() + safes.len();
            for cell in &mines {
                self.mark_mine(cell);
            }
            for cell in &safes {
                self.mark_safe(cell);
            }

            // subset elimination over every ordered pair, buffered the same
            // way; duplicates are dropped here or the loop would re-derive
            // the same sentence forever
            let mut derived: Vec<Sentence> = Vec::new();
            for (small, big) in self.knowledge.iter().cartesian_product(self.knowledge.iter()) {
                if !small.is_proper_subset_of(big) {
                    continue;
                }
                let inferred = big.difference(small);
                if self.knowledge.contains(&inferred) || derived.contains(&inferred) {
                    continue;
                }
                derived.push(inferred);
            }
            let inferred = derived.len();
            self.knowledge.extend(derived);

            trace!(resolved, inferred, sentences = self.knowledge.len(), "saturation pass");
            if resolved == 0 && inferred == 0 {
                break;
            }
        }
    }

    /// Any cell already proven safe and not yet probed.
    pub fn choose_safe_move(&self) -> Option<Cell> {
        self.known_safes
            .iter()
            .find(|&cell| !self.moves_made.contains(cell))
            .copied()
    }

    /// Uniform pick among the cells neither probed nor proven mined, or
    /// `None` once the board is exhausted.
    pub fn choose_random_move(&self) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .size
            .cells()
            .into_iter()
            .filter(|cell| !self.moves_made.contains(cell) && !self.known_mines.contains(cell))
            .collect();
        candidates.choose(&mut thread_rng()).copied()
    }
}

#[cfg(test)]
use proptest::prelude::*;
