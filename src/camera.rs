use crate::ViewOffset;
use crate::cursor::Cursor;
use crate::simulation::Simulation;
use crate::viewport::Viewport;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// A terminal framebuffer. Every character is a 2x4 grid of braille dots, and every dot is one
/// view pixel.
pub struct Camera {
    /// The pixel buffer
    cb: Vec<bool>,

    /// The frame buffer.
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width of the pixel buffer
    w: usize,

    /// Height of the pixel buffer
    h: usize,
}

impl Camera {
    /// A camera covering `cols x rows` terminal characters.
    pub fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize * 2, rows as usize * 4);

        // For each braille character, we need 3 bytes:
        //  - The leader byte:     0b11100010
        //  - Continuation byte 1: 0b101000xx
        //  - Continuation byte 2: 0b10xxxxxx
        // For each newline, we need one byte: 0b00001010
        let (bw, bh) = (cols as usize, rows as usize);

        Self {
            cb: vec![false; w * h],
            fb: String::with_capacity(3 * (bw * bh) + bh),
            cp: vec![BRAILLE_EMPTY; bw * bh],
            w,
            h,
        }
    }

    /// Width in view pixels
    pub fn width(&self) -> usize {
        self.w
    }

    /// Height in view pixels
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Self::new(cols, rows);
    }

    /// Reset the pixel buffer
    pub fn reset(&mut self) {
        self.cb.fill(false);
    }

    /// Turns on a single pixel. Pixels off the screen are ignored.
    pub fn draw_pixel(&mut self, x: ViewOffset, y: ViewOffset) {
        if let Some(i) = self.index(x, y) {
            self.cb[i] = true;
        }
    }

    /// Turns on a `w x h` rectangle of pixels, clipped to the screen.
    pub fn draw_rect(&mut self, x: ViewOffset, y: ViewOffset, w: ViewOffset, h: ViewOffset) {
        let (x0, x1) = (x.max(0), x.saturating_add(w).min(self.w as ViewOffset));
        let (y0, y1) = (y.max(0), y.saturating_add(h).min(self.h as ViewOffset));

        for y in y0..y1 {
            for x in x0..x1 {
                self.draw_pixel(x, y);
            }
        }
    }

    /// Turns on the border of a `w x h` rectangle, clipped to the screen.
    pub fn draw_outline(&mut self, x: ViewOffset, y: ViewOffset, w: ViewOffset, h: ViewOffset) {
        if w <= 0 || h <= 0 {
            return;
        }

        self.draw_rect(x, y, w, 1);
        self.draw_rect(x, y + h - 1, w, 1);
        self.draw_rect(x, y, 1, h);
        self.draw_rect(x + w - 1, y, 1, h);
    }

    /// Draw every alive cell as a `zoom x zoom` square.
    pub fn draw(&mut self, sim: &Simulation) {
        let zoom = sim.viewport().zoom();

        for cell in sim.alive_cells() {
            let (x, y) = sim.sim_to_view(cell.x, cell.y);

            self.draw_rect(x, y, zoom, zoom);
        }
    }

    pub fn draw_cursor(&mut self, cursor: &Cursor, viewport: &Viewport) {
        let (x, y) = viewport.sim_to_view(cursor.x, cursor.y);
        let span = ViewOffset::from(cursor.size()) * viewport.zoom();

        self.draw_outline(x, y, span, span);
    }

    /// Fundamentally, we have a framebuffer of every pixel on our screen, and we ask ourselves "Is
    /// this pixel on or off?".
    pub fn render(&mut self) -> &str {
        let bw = self.w / 2;

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        for (n, &px) in self.cb.iter().enumerate() {
            if px {
                let (x, y) = (n % self.w, n / self.w);
                self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
            }
        }

        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or('\u{2800}'));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn index(&self, x: ViewOffset, y: ViewOffset) -> Option<usize> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);

        (x < self.w && y < self.h).then(|| y * self.w + x)
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}
