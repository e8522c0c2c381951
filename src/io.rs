use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use sparselife::ViewOffset;
use sparselife::events::AppEvent;
use sparselife::events::Command;
use sparselife::events::Event;

/// Terminal rows kept for the status line
pub const STATUS_ROWS: u16 = 1;

/// Rows left for the picture on a terminal with `rows` rows.
pub fn picture_rows(rows: u16) -> u16 {
    rows.saturating_sub(STATUS_ROWS)
}

/// Size in view pixels of the picture on a `cols x rows` terminal.
pub fn screen_pixels(cols: u16, rows: u16) -> (ViewOffset, ViewOffset) {
    (
        ViewOffset::from(cols) * 2,
        ViewOffset::from(picture_rows(rows)) * 4,
    )
}

/// Converts a crossterm event into a sparselife event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            convert_key(key_event)
        }
        CrossTermEvent::Resize(cols, rows) => {
            let (width, height) = screen_pixels(cols, rows);

            Some(Event::App(AppEvent::Resize { width, height }))
        }
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    let KeyEvent {
        code, modifiers, ..
    } = key_event;

    if let Some(command) = convert_command(code) {
        return Some(Event::Engine(command));
    }

    let app = match (code, modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => AppEvent::Exit,

        // camera
        (KeyCode::Left, KeyModifiers::SHIFT) | (KeyCode::Char('h'), _) => {
            AppEvent::Pan { dx: -1, dy: 0 }
        }
        (KeyCode::Down, KeyModifiers::SHIFT) | (KeyCode::Char('j'), _) => {
            AppEvent::Pan { dx: 0, dy: 1 }
        }
        (KeyCode::Up, KeyModifiers::SHIFT) | (KeyCode::Char('k'), _) => {
            AppEvent::Pan { dx: 0, dy: -1 }
        }
        (KeyCode::Right, KeyModifiers::SHIFT) | (KeyCode::Char('l'), _) => {
            AppEvent::Pan { dx: 1, dy: 0 }
        }
        (KeyCode::Char('K'), _) => AppEvent::Zoom(1),
        (KeyCode::Char('J'), _) => AppEvent::Zoom(-1),
        (KeyCode::Char('r'), _) => AppEvent::ResetPan,

        // cursor
        (KeyCode::Left, _) => AppEvent::MoveCursor { dx: -1, dy: 0 },
        (KeyCode::Down, _) => AppEvent::MoveCursor { dx: 0, dy: 1 },
        (KeyCode::Up, _) => AppEvent::MoveCursor { dx: 0, dy: -1 },
        (KeyCode::Right, _) => AppEvent::MoveCursor { dx: 1, dy: 0 },
        (KeyCode::Char('+' | '='), _) => AppEvent::ResizeCursor(1),
        (KeyCode::Char('-'), _) => AppEvent::ResizeCursor(-1),
        (KeyCode::Enter, _) => AppEvent::Fill,
        (KeyCode::Backspace | KeyCode::Delete, _) => AppEvent::Erase,

        // speed
        (KeyCode::Char(']'), _) => AppEvent::SpeedUp,
        (KeyCode::Char('['), _) => AppEvent::SpeedDown,
        (KeyCode::Char('\\'), _) => AppEvent::ResetSpeed,

        // brushes
        (KeyCode::Char(c), _) if c.is_ascii_digit() => AppEvent::Stamp(slot_of(c)?),
        (KeyCode::Char(c), _) => AppEvent::Capture(shifted_slot_of(c)?),

        _ => return None,
    };

    Some(Event::App(app))
}

fn convert_command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char(' ') => Some(Command::ToggleRunning),
        KeyCode::Char('n') | KeyCode::Tab => Some(Command::AdvanceGeneration),
        _ => None,
    }
}

fn slot_of(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| d as usize)
}

/// The slot under a shifted digit on a US layout.
fn shifted_slot_of(c: char) -> Option<usize> {
    let slot = match c {
        ')' => 0,
        '!' => 1,
        '@' => 2,
        '#' => 3,
        '$' => 4,
        '%' => 5,
        '^' => 6,
        '&' => 7,
        '*' => 8,
        '(' => 9,
        _ => return None,
    };

    Some(slot)
}
