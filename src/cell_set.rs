use std::collections::HashMap;

use tracing::trace;

use crate::CellOffset;
use crate::cell::Cell;

/// Default number of cells that may be alive at once.
pub const DEFAULT_CAPACITY: usize = 1024;

/// The sparse set of alive cells.
///
/// Cells live densely in `cells`; `index` maps each cell to its slot so that membership is a
/// single lookup. Removal swaps the last cell into the hole, so iteration order carries no
/// meaning.
///
/// The set never grows past `capacity`. Inserting into a full set does nothing; use
/// [`CellSet::is_full`] to detect it.
#[derive(Debug, Clone)]
pub struct CellSet {
    cells: Vec<Cell>,
    index: HashMap<Cell, usize>,
    capacity: usize,
}

impl Default for CellSet {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl CellSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn is_alive(&self, x: CellOffset, y: CellOffset) -> bool {
        self.contains(Cell::new(x, y))
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }

    /// Bring the cell at `(x, y)` to life. Returns `true` if it was inserted.
    pub fn place(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.insert(Cell::new(x, y))
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.contains(cell) {
            return false;
        }

        if self.is_full() {
            trace!(x = cell.x, y = cell.y, "cell set full, dropping insert");
            return false;
        }

        self.index.insert(cell, self.cells.len());
        self.cells.push(cell);

        true
    }

    /// Kill the cell at `(x, y)`. Returns `true` if it was alive.
    pub fn kill(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.remove(Cell::new(x, y))
    }

    pub fn remove(&mut self, cell: Cell) -> bool {
        let Some(i) = self.index.remove(&cell) else {
            return false;
        };

        self.cells.swap_remove(i);

        // the old last cell now sits in the hole
        if let Some(&moved) = self.cells.get(i) {
            self.index.insert(moved, i);
        }

        true
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.cells.len() >= self.capacity
    }

    /// Alive cells, in no meaningful order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = Cell;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Cell>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}
