use tracing::debug;
use tracing::info;

use crate::CellOffset;
use crate::ViewOffset;
use crate::config::Config;
use crate::cursor::Cursor;
use crate::events::AppEvent;
use crate::events::Command;
use crate::events::Event;
use crate::events::Flow;
use crate::simulation::Simulation;
use crate::simulation::SimulationError;

pub const MIN_SPEED: CellOffset = 1;
pub const MAX_SPEED: CellOffset = 20;

/// The interactive editor: a simulation, a cursor, and the screen they are shown on.
pub struct App {
    sim: Simulation,
    cursor: Cursor,

    /// Multiplier for cursor and pan movement
    speed: CellOffset,

    /// Screen size, in view pixels
    width: ViewOffset,
    height: ViewOffset,

    max_zoom: ViewOffset,
}

impl App {
    pub fn new(
        config: &Config,
        width: ViewOffset,
        height: ViewOffset,
    ) -> Result<Self, SimulationError> {
        let mut sim = Simulation::new(config.limits);
        sim.set_viewport(0, 0, config.zoom)?;

        let mut app = Self {
            sim,
            cursor: Cursor::default(),
            speed: MIN_SPEED,
            width,
            height,
            max_zoom: config.max_zoom,
        };
        app.lock_cursor();

        Ok(app)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn speed(&self) -> CellOffset {
        self.speed
    }

    pub fn screen(&self) -> (ViewOffset, ViewOffset) {
        (self.width, self.height)
    }

    /// Advance the simulation by one frame.
    pub fn frame(&mut self) -> bool {
        self.sim.tick()
    }

    pub fn handle(&mut self, event: Event) -> Result<Flow, SimulationError> {
        match event {
            Event::Engine(Command::SetViewport { pan_x, pan_y, zoom }) => {
                // same ceiling as the zoom keys; zooms below 1 are still refused
                let zoom = if zoom >= 1 { zoom.min(self.max_zoom) } else { zoom };

                self.sim.set_viewport(pan_x, pan_y, zoom)?;
            }
            Event::Engine(command) => {
                self.sim.apply(command)?;
            }
            Event::App(AppEvent::Exit) => {
                info!(generation = self.sim.generation(), "exiting");

                return Ok(Flow::Exit);
            }
            Event::App(event) => self.handle_app(event)?,
        }

        self.lock_cursor();

        Ok(Flow::Continue)
    }

    fn handle_app(&mut self, event: AppEvent) -> Result<(), SimulationError> {
        match event {
            AppEvent::MoveCursor { dx, dy } => {
                self.cursor
                    .move_by(dx.saturating_mul(self.speed), dy.saturating_mul(self.speed));
            }
            AppEvent::ResizeCursor(delta) => self.cursor.resize_by(delta),
            AppEvent::Fill => self.cursor.fill(self.sim.world_mut()),
            AppEvent::Erase => self.cursor.erase(self.sim.world_mut()),
            AppEvent::Capture(slot) => {
                let size = self.cursor.size() as u16;
                let (x, y) = (self.cursor.x, self.cursor.y);

                self.sim.capture_brush(slot, x, y, size, size)?;
            }
            AppEvent::Stamp(slot) => {
                self.sim.stamp_brush(slot, self.cursor.x, self.cursor.y)?;
            }
            AppEvent::Pan { dx, dy } => {
                self.sim
                    .viewport_mut()
                    .pan_by(dx.saturating_mul(self.speed), dy.saturating_mul(self.speed));
            }
            AppEvent::Zoom(delta) => {
                self.sim.viewport_mut().zoom_by(delta, self.max_zoom);
                debug!(zoom = self.sim.viewport().zoom(), "zoom changed");
            }
            AppEvent::ResetPan => self.sim.viewport_mut().reset_pan(),
            AppEvent::SpeedUp => self.speed = (self.speed + 1).min(MAX_SPEED),
            AppEvent::SpeedDown => self.speed = (self.speed - 1).max(MIN_SPEED),
            AppEvent::ResetSpeed => self.speed = MIN_SPEED,
            AppEvent::Resize { width, height } => {
                self.width = width;
                self.height = height;
                debug!(width, height, "screen resized");
            }
            AppEvent::Exit => {}
        }

        Ok(())
    }

    fn lock_cursor(&mut self) {
        self.cursor
            .lock_to_screen(self.sim.viewport(), self.width, self.height);
    }
}
