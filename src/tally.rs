//! Per-generation neighbour counting.
//!
//! Rather than scanning a grid, only cells that can change are looked at: every alive cell, and
//! every cell touching one. Each alive cell adds one to the count of each of its neighbours, so
//! once every alive cell has been visited a candidate's count is exactly its number of alive
//! neighbours in the current generation.

use std::collections::HashMap;

use tracing::trace;

use crate::CellOffset;
use crate::cell::Cell;
use crate::cell_set::CellSet;

/// Every alive cell can contribute itself plus eight neighbours.
pub const CANDIDATES_PER_CELL: usize = 9;

/// The most neighbours a cell can have.
pub const MAX_NEIGHBORS: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub cell: Cell,

    /// Alive neighbours, never counting the cell itself. Lives in `0..=8`.
    pub count: u8,
}

/// Scratch table of candidates for one generation.
///
/// Positions are unique within a pass. The table is bounded by `capacity`; candidates past the
/// bound are dropped, which [`CandidateTally::is_full`] reports.
#[derive(Debug, Clone)]
pub struct CandidateTally {
    candidates: Vec<Candidate>,
    index: HashMap<Cell, usize>,
    capacity: usize,
}

impl CandidateTally {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// A tally sized for the worst case of the given active set.
    pub fn for_cells(cells: &CellSet) -> Self {
        Self::with_capacity(cells.capacity().saturating_mul(CANDIDATES_PER_CELL))
    }

    /// Recount from scratch against `cells`.
    pub fn tally(&mut self, cells: &CellSet) {
        self.clear();

        for cell in cells {
            self.ensure(cell);

            for n in cell.neighbors() {
                self.bump(n);
            }
        }
    }

    /// Make `cell` a candidate with count 0 unless it already is one.
    fn ensure(&mut self, cell: Cell) {
        if !self.index.contains_key(&cell) {
            self.push(Candidate { cell, count: 0 });
        }
    }

    /// Add one alive neighbour to `cell`, making it a candidate if needed.
    fn bump(&mut self, cell: Cell) {
        match self.index.get(&cell) {
            Some(&i) => {
                let c = &mut self.candidates[i];
                if c.count < MAX_NEIGHBORS {
                    c.count += 1;
                }
            }
            None => self.push(Candidate { cell, count: 1 }),
        }
    }

    fn push(&mut self, candidate: Candidate) {
        if self.is_full() {
            trace!(
                x = candidate.cell.x,
                y = candidate.cell.y,
                "candidate tally full, dropping candidate"
            );
            return;
        }

        self.index.insert(candidate.cell, self.candidates.len());
        self.candidates.push(candidate);
    }

    /// The neighbour count of `(x, y)`, if it is a candidate this pass.
    pub fn count(&self, x: CellOffset, y: CellOffset) -> Option<u8> {
        self.get(Cell::new(x, y)).map(|c| c.count)
    }

    pub fn get(&self, cell: Cell) -> Option<Candidate> {
        self.index.get(&cell).map(|&i| self.candidates[i])
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.capacity
    }

    /// Candidates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.candidates.iter().copied()
    }
}
