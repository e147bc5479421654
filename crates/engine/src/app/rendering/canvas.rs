use super::font::{glyph_for, Glyph, BLANK_GLYPH, GLYPH_ADVANCE, GLYPH_WIDTH, LINE_ADVANCE};
use super::palette::Color;

/// Indexed-colour drawing surface over an RGBA8 frame buffer.
///
/// Every primitive clips against the canvas bounds, so callers may pass
/// coordinates that are partly or entirely off-canvas.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cls(&mut self, color: Color) {
        let rgba = color.rgba();
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(w).min(self.width as i32);
        let end_y = y.saturating_add(h).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }

        let rgba = color.rgba();
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.write_pixel(px, py, rgba);
            }
        }
    }

    /// Draws `text` with its top-left corner at (x, y). `'\n'` starts a new line.
    pub fn text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        let rgba = color.rgba();
        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = x;
                cursor_y = cursor_y.saturating_add(LINE_ADVANCE);
                continue;
            }
            let glyph = glyph_for(ch).unwrap_or(BLANK_GLYPH);
            self.draw_glyph(cursor_x, cursor_y, glyph, rgba);
            cursor_x = cursor_x.saturating_add(GLYPH_ADVANCE);
        }
    }

    #[cfg(test)]
    fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.byte_offset(x, y)?;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(rgba)
    }

    fn draw_glyph(&mut self, x: i32, y: i32, glyph: Glyph, rgba: [u8; 4]) {
        for (row_index, row_bits) in glyph.rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                    continue;
                }
                self.write_pixel(
                    x.saturating_add(col),
                    y.saturating_add(row_index as i32),
                    rgba,
                );
            }
        }
    }

    fn write_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        let Some(offset) = self.byte_offset(x, y) else {
            return;
        };
        self.frame[offset..offset + 4].copy_from_slice(&rgba);
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let byte_offset = pixel_offset.checked_mul(4)?;
        if byte_offset.checked_add(4)? > self.frame.len() {
            return None;
        }
        Some(byte_offset)
    }
}
