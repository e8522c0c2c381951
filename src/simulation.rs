use thiserror::Error;
use tracing::debug;

use crate::CellOffset;
use crate::ViewOffset;
use crate::brush::BrushError;
use crate::brush::Brushes;
use crate::cell::Cell;
use crate::config::Limits;
use crate::events::Command;
use crate::viewport::Viewport;
use crate::viewport::ViewportError;
use crate::world::RunState;
use crate::world::World;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error(transparent)]
    Brush(#[from] BrushError),

    #[error(transparent)]
    Viewport(#[from] ViewportError),
}

/// Everything the editor works on: the world, the brush slots and the viewport.
///
/// There is exactly one writer; every command runs to completion before the next.
pub struct Simulation {
    world: World,
    brushes: Brushes,
    viewport: Viewport,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl Simulation {
    pub fn new(limits: Limits) -> Self {
        Self {
            world: World::with_capacity(limits.active_cells),
            brushes: Brushes::with_capacity(limits.brush_cells),
            viewport: Viewport::default(),
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<(), SimulationError> {
        match command {
            Command::PlaceCell { x, y } => {
                self.place_cell(x, y);
            }
            Command::KillCell { x, y } => {
                self.kill_cell(x, y);
            }
            Command::ToggleRunning => {
                self.toggle_running();
            }
            Command::AdvanceGeneration => self.advance_generation(),
            Command::CaptureBrush {
                slot,
                x,
                y,
                width,
                height,
            } => self.capture_brush(slot, x, y, width, height)?,
            Command::StampBrush { slot, x, y } => self.stamp_brush(slot, x, y)?,
            Command::SetViewport { pan_x, pan_y, zoom } => self.set_viewport(pan_x, pan_y, zoom)?,
        }

        Ok(())
    }

    pub fn place_cell(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.world.place(x, y)
    }

    pub fn kill_cell(&mut self, x: CellOffset, y: CellOffset) -> bool {
        self.world.kill(x, y)
    }

    pub fn toggle_running(&mut self) -> RunState {
        self.world.toggle_running()
    }

    pub fn advance_generation(&mut self) {
        self.world.advance();
    }

    /// Advance one generation if running. Called once per frame.
    pub fn tick(&mut self) -> bool {
        self.world.tick()
    }

    pub fn capture_brush(
        &mut self,
        slot: usize,
        x: CellOffset,
        y: CellOffset,
        width: u16,
        height: u16,
    ) -> Result<(), SimulationError> {
        let brush = self.brushes.get_mut(slot)?;
        brush.capture(Cell::new(x, y), width, height, self.world.cells());

        debug!(slot, cells = brush.len(), "brush captured");

        Ok(())
    }

    pub fn stamp_brush(
        &mut self,
        slot: usize,
        x: CellOffset,
        y: CellOffset,
    ) -> Result<(), SimulationError> {
        let brush = self.brushes.get(slot)?;
        brush.stamp(Cell::new(x, y), self.world.cells_mut());

        Ok(())
    }

    /// Replace the viewport. On error the previous viewport is kept.
    pub fn set_viewport(
        &mut self,
        pan_x: CellOffset,
        pan_y: CellOffset,
        zoom: ViewOffset,
    ) -> Result<(), SimulationError> {
        self.viewport = Viewport::new(pan_x, pan_y, zoom)?;

        Ok(())
    }

    pub fn is_alive(&self, x: CellOffset, y: CellOffset) -> bool {
        self.world.is_alive(x, y)
    }

    pub fn alive_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.world.iter()
    }

    pub fn sim_to_view(&self, x: CellOffset, y: CellOffset) -> (ViewOffset, ViewOffset) {
        self.viewport.sim_to_view(x, y)
    }

    pub fn view_to_sim(&self, vx: ViewOffset, vy: ViewOffset) -> (CellOffset, CellOffset) {
        self.viewport.view_to_sim(vx, vy)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn brushes(&self) -> &Brushes {
        &self.brushes
    }

    pub fn brushes_mut(&mut self) -> &mut Brushes {
        &mut self.brushes
    }

    pub fn population(&self) -> usize {
        self.world.population()
    }

    pub fn generation(&self) -> u64 {
        self.world.generation()
    }

    pub fn run_state(&self) -> RunState {
        self.world.state()
    }
}
