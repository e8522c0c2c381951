use thiserror::Error;

use crate::CellOffset;
use crate::ViewOffset;

/// Largest zoom. Any cell offset from the pan, times this, fits in a `ViewOffset`.
pub const MAX_ZOOM: ViewOffset = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("Zoom must be between 1 and {}, got {zoom}", MAX_ZOOM)]
    InvalidZoom { zoom: ViewOffset },
}

/// Pan and zoom between simulation space and view space.
///
/// A simulation cell covers a `zoom x zoom` square of view pixels, with the cell at
/// `(pan_x, pan_y)` drawn at the view origin. Zoom is always in `1..=MAX_ZOOM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pan_x: CellOffset,
    pan_y: CellOffset,
    zoom: ViewOffset,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0,
            pan_y: 0,
            zoom: 1,
        }
    }
}

impl Viewport {
    pub fn new(
        pan_x: CellOffset,
        pan_y: CellOffset,
        zoom: ViewOffset,
    ) -> Result<Self, ViewportError> {
        let mut viewport = Self {
            pan_x,
            pan_y,
            ..Self::default()
        };
        viewport.set_zoom(zoom)?;

        Ok(viewport)
    }

    pub fn pan(&self) -> (CellOffset, CellOffset) {
        (self.pan_x, self.pan_y)
    }

    pub fn zoom(&self) -> ViewOffset {
        self.zoom
    }

    pub fn set_pan(&mut self, pan_x: CellOffset, pan_y: CellOffset) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    pub fn set_zoom(&mut self, zoom: ViewOffset) -> Result<(), ViewportError> {
        if !(1..=MAX_ZOOM).contains(&zoom) {
            return Err(ViewportError::InvalidZoom { zoom });
        }

        self.zoom = zoom;

        Ok(())
    }

    /// Move the pan offset, saturating at the edges of the grid.
    pub fn pan_by(&mut self, dx: CellOffset, dy: CellOffset) {
        self.pan_x = self.pan_x.saturating_add(dx);
        self.pan_y = self.pan_y.saturating_add(dy);
    }

    pub fn reset_pan(&mut self) {
        self.set_pan(0, 0);
    }

    /// Change the zoom by `delta`, clamped to `1..=max`. `max` itself is capped at `MAX_ZOOM`.
    pub fn zoom_by(&mut self, delta: ViewOffset, max: ViewOffset) {
        self.zoom = self
            .zoom
            .saturating_add(delta)
            .clamp(1, max.clamp(1, MAX_ZOOM));
    }

    /// Position in view space of the top-left corner of a simulation cell.
    pub fn sim_to_view(&self, x: CellOffset, y: CellOffset) -> (ViewOffset, ViewOffset) {
        let vx = (ViewOffset::from(x) - ViewOffset::from(self.pan_x)) * self.zoom;
        let vy = (ViewOffset::from(y) - ViewOffset::from(self.pan_y)) * self.zoom;

        (vx, vy)
    }

    /// The simulation cell under a view position.
    ///
    /// Division truncates toward zero, so this is only exact for view positions that are
    /// multiples of the zoom. Results that leave the `i16` range wrap, the way narrowing casts
    /// do.
    pub fn view_to_sim(&self, vx: ViewOffset, vy: ViewOffset) -> (CellOffset, CellOffset) {
        let x = (vx / self.zoom).saturating_add(ViewOffset::from(self.pan_x));
        let y = (vy / self.zoom).saturating_add(ViewOffset::from(self.pan_y));

        (x as CellOffset, y as CellOffset)
    }
}
