use crate::CellOffset;

/// Offsets of the eight cells surrounding a cell.
///
/// ```notrust
///   (-1, -1) ( 0, -1) ( 1, -1)
///   (-1,  0)          ( 1,  0)
///   (-1,  1) ( 0,  1) ( 1,  1)
/// ```
pub const NEIGHBORHOOD: [(CellOffset, CellOffset); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A position on the simulation grid. `y` grows downwards, like screen rows.
///
/// A `Cell` carries no state of its own: whether it is alive is decided by its membership in a
/// [`CellSet`](crate::cell_set::CellSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: CellOffset,
    pub y: CellOffset,
}

impl Cell {
    pub const fn new(x: CellOffset, y: CellOffset) -> Self {
        Self { x, y }
    }

    /// The cell at `(x + dx, y + dy)`, or `None` if it falls outside the representable grid.
    pub fn offset(self, dx: CellOffset, dy: CellOffset) -> Option<Self> {
        let x = self.x.checked_add(dx)?;
        let y = self.y.checked_add(dy)?;

        Some(Self { x, y })
    }

    /// Iterate over the (up to) eight neighbours of this cell.
    ///
    /// Cells on the edge of the `i16` range have fewer neighbours. The grid does not wrap.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        NEIGHBORHOOD
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(CellOffset, CellOffset)> for Cell {
    fn from((x, y): (CellOffset, CellOffset)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;

    #[test]
    fn interior_cell_has_eight_distinct_neighbors() {
        let mut n: Vec<Cell> = Cell::new(0, 0).neighbors().collect();
        n.sort();
        n.dedup();

        assert_eq!(n.len(), 8);
        assert!(!n.contains(&Cell::new(0, 0)));
    }

    #[test]
    fn edge_cells_do_not_wrap() {
        let corner = Cell::new(i16::MAX, i16::MIN);
        let n: Vec<Cell> = corner.neighbors().collect();

        assert_eq!(n.len(), 3);
        assert!(n.iter().all(|c| c.x >= i16::MAX - 1 && c.y <= i16::MIN + 1));
    }

    #[test]
    fn offset_overflow_is_none() {
        assert_eq!(Cell::new(i16::MAX, 0).offset(1, 0), None);
        assert_eq!(Cell::new(3, -4).offset(-3, 4), Some(Cell::new(0, 0)));
    }
}
