//! Raster text without system fonts.
//!
//! `plotters` built without a font feature can size text but cannot rasterize
//! it, so bitmap output would panic on the first label. [`GlyphTextBackend`]
//! wraps any backend and draws text itself from a small built-in 5x7 font,
//! scaled to the requested size. Everything that is not text is forwarded.

use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

const GLYPH_HEIGHT: u32 = 7;
const SPACE_WIDTH: u32 = 3;
/// Font size (in points) that maps to one pixel per glyph cell
const POINTS_PER_SCALE: f64 = 12.0;

/// Backend adapter that renders text with the built-in glyph set
pub struct GlyphTextBackend<DB> {
    inner: DB,
}

impl<DB> GlyphTextBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for GlyphTextBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = scale_for(style.size());
        let (width, height) = text_extent(text, scale);
        let (width, height) = (width as i32, height as i32);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0,
            HPos::Center => -width / 2,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => 0,
            VPos::Center => -height / 2,
            VPos::Bottom => -height,
        };
        let transform = style.transform();
        let scale = scale as i32;

        let mut cursor = 0;
        for ch in text.chars() {
            let Some(glyph) = glyph_for(ch) else {
                cursor += SPACE_WIDTH as i32 * scale;
                continue;
            };
            for (row, bits) in glyph.rows.iter().enumerate() {
                for col in 0..glyph.width {
                    if bits & (1 << (glyph.width - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = dx + cursor + col as i32 * scale;
                    let y0 = dy + row as i32 * scale;
                    for sx in 0..scale {
                        for sy in 0..scale {
                            let (rx, ry) = rotate(&transform, x0 + sx, y0 + sy);
                            self.inner.draw_pixel((pos.0 + rx, pos.1 + ry), color)?;
                        }
                    }
                }
            }
            cursor += (glyph.width as i32 + 1) * scale;
        }
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        Ok(text_extent(text, scale_for(style.size())))
    }
}

fn rotate(transform: &FontTransform, x: i32, y: i32) -> (i32, i32) {
    match transform {
        FontTransform::None => (x, y),
        FontTransform::Rotate90 => (-y, x),
        FontTransform::Rotate180 => (-x, -y),
        FontTransform::Rotate270 => (y, -x),
    }
}

fn scale_for(size: f64) -> u32 {
    (size / POINTS_PER_SCALE).round().max(1.0) as u32
}

/// Unrotated width and height of `text` at `scale`
fn text_extent(text: &str, scale: u32) -> (u32, u32) {
    let mut width = 0;
    let mut glyphs = 0;
    for ch in text.chars() {
        match glyph_for(ch) {
            Some(glyph) => {
                width += glyph.width as u32;
                glyphs += 1;
            }
            None => width += SPACE_WIDTH,
        }
    }
    // one column of spacing between consecutive glyphs
    width += glyphs.max(1) - 1;
    (width * scale, GLYPH_HEIGHT * scale)
}

#[derive(Debug, Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT as usize],
}

const fn g(width: u8, rows: [u8; GLYPH_HEIGHT as usize]) -> Glyph {
    Glyph { width, rows }
}

fn glyph_for(ch: char) -> Option<Glyph> {
    let glyph = match ch {
        'A' => g(5, [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => g(5, [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => g(5, [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => g(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => g(5, [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => g(5, [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => g(5, [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => g(3, [0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => g(5, [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => g(5, [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => g(5, [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => g(5, [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => g(5, [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
        'O' => g(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => g(5, [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => g(5, [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => g(5, [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => g(5, [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => g(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => g(5, [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => g(5, [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
        'X' => g(5, [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => g(5, [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
        'Z' => g(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        'a' => g(5, [0, 0, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111]),
        'b' => g(5, [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110]),
        'c' => g(5, [0, 0, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110]),
        'd' => g(5, [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111]),
        'e' => g(5, [0, 0, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
        'f' => g(4, [0b0011, 0b0100, 0b1110, 0b0100, 0b0100, 0b0100, 0b0100]),
        'g' => g(5, [0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
        'h' => g(5, [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
        'i' => g(3, [0b010, 0, 0b110, 0b010, 0b010, 0b010, 0b111]),
        'j' => g(4, [0b0001, 0, 0b0011, 0b0001, 0b0001, 0b1001, 0b0110]),
        'k' => g(4, [0b1000, 0b1000, 0b1001, 0b1010, 0b1100, 0b1010, 0b1001]),
        'l' => g(3, [0b110, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'm' => g(5, [0, 0, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001]),
        'n' => g(5, [0, 0, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
        'o' => g(5, [0, 0, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
        'p' => g(5, [0, 0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000]),
        'q' => g(5, [0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001]),
        'r' => g(5, [0, 0, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
        's' => g(5, [0, 0, 0b01111, 0b10000, 0b01110, 0b00001, 0b11110]),
        't' => g(4, [0b0100, 0b0100, 0b1110, 0b0100, 0b0100, 0b0101, 0b0010]),
        'u' => g(5, [0, 0, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101]),
        'v' => g(5, [0, 0, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'w' => g(5, [0, 0, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
        'x' => g(5, [0, 0, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
        'y' => g(5, [0, 0b10001, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
        'z' => g(5, [0, 0, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
        '0' => g(5, [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => g(3, [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => g(5, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => g(5, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => g(5, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => g(5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => g(5, [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => g(5, [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => g(5, [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => g(5, [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        '.' => g(1, [0, 0, 0, 0, 0, 0, 1]),
        ',' => g(2, [0, 0, 0, 0, 0, 0b01, 0b10]),
        ':' => g(1, [0, 0, 1, 0, 0, 1, 0]),
        '-' => g(3, [0, 0, 0, 0b111, 0, 0, 0]),
        '_' => g(5, [0, 0, 0, 0, 0, 0, 0b11111]),
        '+' => g(5, [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0]),
        '/' => g(5, [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000]),
        '%' => g(5, [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
        '(' => g(3, [0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
        ')' => g(3, [0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
        _ => return None,
    };
    Some(glyph)
}
