use crate::CellOffset;
use crate::ViewOffset;

pub enum Event {
    Engine(Command),
    App(AppEvent),
}

/// Commands understood by the simulation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PlaceCell {
        x: CellOffset,
        y: CellOffset,
    },
    KillCell {
        x: CellOffset,
        y: CellOffset,
    },
    ToggleRunning,

    /// Advance exactly one generation, running or not
    AdvanceGeneration,

    /// Replace the brush in `slot` with the `width x height` rectangle at `(x, y)`
    CaptureBrush {
        slot: usize,
        x: CellOffset,
        y: CellOffset,
        width: u16,
        height: u16,
    },
    StampBrush {
        slot: usize,
        x: CellOffset,
        y: CellOffset,
    },
    SetViewport {
        pan_x: CellOffset,
        pan_y: CellOffset,
        zoom: ViewOffset,
    },
}

/// Editor actions, resolved against the cursor and screen by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Move the cursor by `(dx, dy)` times the speed
    MoveCursor { dx: CellOffset, dy: CellOffset },

    /// Grow or shrink the cursor square
    ResizeCursor(CellOffset),

    /// Bring every cell under the cursor to life
    Fill,

    /// Kill every cell under the cursor
    Erase,

    /// Capture the cursor square into a brush slot
    Capture(usize),

    /// Stamp a brush slot at the cursor
    Stamp(usize),

    Pan { dx: CellOffset, dy: CellOffset },
    Zoom(ViewOffset),
    ResetPan,

    SpeedUp,
    SpeedDown,
    ResetSpeed,

    /// The screen is now `width x height` view pixels
    Resize { width: ViewOffset, height: ViewOffset },

    /// Exit the application
    Exit,
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
