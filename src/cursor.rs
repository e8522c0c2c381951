use crate::CellOffset;
use crate::ViewOffset;
use crate::cell::Cell;
use crate::viewport::Viewport;
use crate::world::World;

/// The editing cursor: a square of `size x size` cells whose top-left corner is `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: CellOffset,
    pub y: CellOffset,
    size: CellOffset,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { x: 0, y: 0, size: 1 }
    }
}

impl Cursor {
    pub fn new(x: CellOffset, y: CellOffset, size: CellOffset) -> Self {
        Self {
            x,
            y,
            size: size.max(1),
        }
    }

    pub fn origin(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    pub fn size(&self) -> CellOffset {
        self.size
    }

    pub fn move_by(&mut self, dx: CellOffset, dy: CellOffset) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Grow or shrink the square. It never gets smaller than a single cell.
    pub fn resize_by(&mut self, delta: CellOffset) {
        self.size = self.size.saturating_add(delta).max(1);
    }

    /// Cells covered by the cursor, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let origin = self.origin();

        (0..self.size)
            .flat_map(move |i| (0..self.size).map(move |j| (i, j)))
            .filter_map(move |(i, j)| origin.offset(i, j))
    }

    /// Bring every cell under the cursor to life.
    pub fn fill(&self, world: &mut World) {
        for cell in self.cells() {
            world.cells_mut().insert(cell);
        }
    }

    /// Kill every cell under the cursor.
    pub fn erase(&self, world: &mut World) {
        for cell in self.cells() {
            world.cells_mut().remove(cell);
        }
    }

    /// Keep the cursor on a `width x height` screen.
    ///
    /// A square taller or wider than the screen is shrunk to fit. A cursor past the top or
    /// left edge snaps to it; one touching or past the bottom or right edge snaps back so its
    /// far side sits on that edge.
    pub fn lock_to_screen(&mut self, viewport: &Viewport, width: ViewOffset, height: ViewOffset) {
        let zoom = viewport.zoom();

        let span = ViewOffset::from(self.size) * zoom;
        if span > width.min(height) {
            let fit = width.min(height) / zoom;
            self.size = fit.clamp(1, ViewOffset::from(CellOffset::MAX)) as CellOffset;
        }

        let (vx, vy) = viewport.sim_to_view(self.x, self.y);
        let (left, top) = viewport.view_to_sim(0, 0);

        if vx < 0 {
            self.x = left;
        }
        if vy < 0 {
            self.y = top;
        }

        let span = ViewOffset::from(self.size) * zoom;
        let (right, bottom) = viewport.view_to_sim(width - span, height - span);

        if vx + span >= width {
            self.x = right;
        }
        if vy + span >= height {
            self.y = bottom;
        }
    }
}
