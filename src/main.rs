use std::fs::File;
use std::io::Write;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CrossTermEvent;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sparselife::app::App;
use sparselife::brush::Brush;
use sparselife::camera::Camera;
use sparselife::config::Config;
use sparselife::events::Flow;

mod io;

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(std::env::args().skip(1)).context("Invalid arguments")?;

    if let Some(path) = &config.log {
        init_logging(path)?;
    }

    let pattern = config
        .pattern
        .as_deref()
        .map(|path| load_pattern(path, config.limits.brush_cells))
        .transpose()?;

    let (cols, rows) = terminal::size().context("Failed to read the terminal size")?;
    let (width, height) = io::screen_pixels(cols, rows);

    let mut app = App::new(&config, width, height)?;
    if let Some(brush) = pattern {
        app.simulation_mut()
            .brushes_mut()
            .set(config.pattern_slot, brush)?;
    }

    let mut cam = Camera::new(cols, io::picture_rows(rows));
    let frame_time = Duration::from_secs(1) / config.fps.max(1);

    let mut stdout = stdout();

    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    // the terminal is restored whatever happened in the loop
    let res = run(&mut app, &mut cam, frame_time);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    res
}

/// Log to `path`. The terminal belongs to the picture, so nothing is logged to it.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn load_pattern(path: &Path, capacity: usize) -> anyhow::Result<Brush> {
    let data = std::fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let brush = Brush::from_rle(&data, capacity)
        .with_context(|| format!("Failed to read pattern {}", path.display()))?;

    info!(path = %path.display(), cells = brush.len(), "pattern loaded");

    Ok(brush)
}

fn run(app: &mut App, cam: &mut Camera, frame_time: Duration) -> anyhow::Result<()> {
    loop {
        let start = Instant::now();

        // Handle events for as long as the frame lasts
        while event::poll(frame_time.saturating_sub(start.elapsed()))? {
            let event = event::read()?;

            if let CrossTermEvent::Resize(cols, rows) = event {
                cam.resize(cols, io::picture_rows(rows));
            }

            let Some(event) = io::convert_event(event) else {
                continue;
            };

            match app.handle(event) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(e) => warn!("{e}"),
            }
        }

        app.frame();
        draw(app, cam)?;
    }
}

fn draw(app: &App, cam: &mut Camera) -> anyhow::Result<()> {
    let sim = app.simulation();

    cam.reset();
    cam.draw(sim);
    cam.draw_cursor(app.cursor(), sim.viewport());

    let mut stdout = stdout();
    queue!(stdout, cursor::MoveTo(0, 0))?;

    for line in cam.render().lines() {
        queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
    }

    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(status_line(app)),
    )?;

    stdout.flush()?;

    Ok(())
}

fn status_line(app: &App) -> String {
    let sim = app.simulation();
    let cursor = app.cursor();

    format!(
        "gen {} | cells {}/{} | {:?} | zoom {} | speed {} | cursor ({}, {}) x{}",
        sim.generation(),
        sim.population(),
        sim.world().cells().capacity(),
        sim.run_state(),
        sim.viewport().zoom(),
        app.speed(),
        cursor.x,
        cursor.y,
        cursor.size(),
    )
}
