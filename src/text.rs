//! Bitmap text.

use crate::raster::{Canvas, Rasterizer};

/// Largest glyph block sent in one transaction: 32x32 pixels of RGB565.
const GLYPH_BUF: usize = 32 * 32 * 2;

/// Fixed-width 1bpp font.
///
/// Each glyph is `height` rows of `(width + 7) / 8` bytes, MSB first, and
/// glyphs are stored back to back starting at code point `first`.
#[derive(Clone, Copy, Debug)]
pub struct Font<'a> {
    pub width: u16,
    pub height: u16,
    pub first: u32,
    pub bitmap: &'a [u8],
}

impl<'a> Font<'a> {
    pub const fn new(width: u16, height: u16, first: u32, bitmap: &'a [u8]) -> Self {
        Self {
            width,
            height,
            first,
            bitmap,
        }
    }

    /// Bytes per glyph row.
    pub const fn stride(&self) -> usize {
        (self.width as usize + 7) / 8
    }

    pub const fn glyph_size(&self) -> usize {
        self.stride() * self.height as usize
    }

    pub fn glyph_count(&self) -> usize {
        match self.glyph_size() {
            0 => 0,
            size => self.bitmap.len() / size,
        }
    }

    /// Whether the pixel at `(col, row)` of `ch` is set.
    ///
    /// Characters outside the font read whatever the arithmetic lands on;
    /// bytes past the end of the bitmap read as clear.
    pub fn is_set(&self, ch: char, col: u16, row: u16) -> bool {
        let glyph = (ch as u32).wrapping_sub(self.first) as usize;
        let byte = glyph
            .checked_mul(self.glyph_size())
            .and_then(|base| base.checked_add(row as usize * self.stride() + col as usize / 8))
            .and_then(|idx| self.bitmap.get(idx))
            .copied()
            .unwrap_or(0);
        (byte >> (7 - col % 8)) & 1 != 0
    }
}

impl<'a, C: Canvas + ?Sized> Rasterizer<'a, C> {
    /// Draw `s` with its top-left corner at `(x, y)`.
    ///
    /// The whole text box is cleared to `bg` first, then each glyph goes out
    /// as one window. Returns the x coordinate just past the last glyph.
    pub fn text(
        &mut self,
        s: &str,
        x: i32,
        y: i32,
        font: &Font<'_>,
        fg: u16,
        bg: u16,
    ) -> Result<i32, C::Error> {
        let advance = font.width as i32;
        let count = s.chars().count() as i32;
        self.fill_rect(x, y, advance * count, font.height as i32, bg)?;

        let mut cursor = x;
        for ch in s.chars() {
            self.glyph(ch, cursor, y, font, fg, bg)?;
            cursor += advance;
        }
        Ok(cursor)
    }

    fn glyph(
        &mut self,
        ch: char,
        x: i32,
        y: i32,
        font: &Font<'_>,
        fg: u16,
        bg: u16,
    ) -> Result<(), C::Error> {
        let (width, height) = self.canvas().size();
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + font.width as i32).min(width);
        let y1 = (y + font.height as i32).min(height);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let visible = (x1 - x0) as usize;
        let band = (GLYPH_BUF / (visible * 2)).max(1) as i32;
        let mut buf = [0u8; GLYPH_BUF];

        let mut top = y0;
        while top < y1 {
            let bottom = (top + band).min(y1);
            let mut n = 0;
            for py in top..bottom {
                for px in x0..x1 {
                    let on = font.is_set(ch, (px - x) as u16, (py - y) as u16);
                    let color = if on { fg } else { bg };
                    buf[n..n + 2].copy_from_slice(&color.to_be_bytes());
                    n += 2;
                }
            }
            self.canvas().blit_buffer(
                &buf[..n],
                x0 as u16,
                top as u16,
                visible as u16,
                (bottom - top) as u16,
            )?;
            top = bottom;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use super::*;
    use crate::raster::testing::{Call, RecordingCanvas};

    // 'A' is a box outline, 'B' is solid.
    const BOX_FONT: [u8; 16] = [
        0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF, //
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ];

    fn font() -> Font<'static> {
        Font::new(8, 8, 'A' as u32, &BOX_FONT)
    }

    fn blits(canvas: &RecordingCanvas) -> Vec<(i32, i32, i32, i32, Vec<u8>)> {
        canvas
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Blit(x, y, w, h, data) => Some((*x, *y, *w, *h, data.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn font_geometry() {
        let f = font();
        assert_eq!(f.stride(), 1);
        assert_eq!(f.glyph_size(), 8);
        assert_eq!(f.glyph_count(), 2);
        let wide = Font::new(12, 16, 32, &[]);
        assert_eq!(wide.stride(), 2);
        assert_eq!(wide.glyph_count(), 0);
    }

    #[test]
    fn bits_are_msb_first() {
        let f = font();
        assert!(f.is_set('A', 0, 1));
        assert!(!f.is_set('A', 1, 1));
        assert!(f.is_set('A', 7, 1));
        assert!(f.is_set('B', 3, 3));
    }

    #[test]
    fn text_clears_box_then_blits_each_glyph() {
        let mut canvas = RecordingCanvas::new(240, 320);
        let end = Rasterizer::new(&mut canvas)
            .text("AB", 10, 20, &font(), 0xFFFF, 0x0000)
            .unwrap();
        assert_eq!(end, 26);
        assert_eq!(canvas.calls[0], Call::Fill(10, 20, 16, 8, 0x0000));

        let blits = blits(&canvas);
        assert_eq!(blits.len(), 2);
        let (x, y, w, h, data) = &blits[0];
        assert_eq!((*x, *y, *w, *h), (10, 20, 8, 8));
        assert_eq!(data.len(), 8 * 8 * 2);
        // second row of the box: set, 6 clear, set
        let row: Vec<u8> = data[16..32].to_vec();
        let mut expected = vec![0xFF, 0xFF];
        expected.extend([0x00; 12]);
        expected.extend([0xFF, 0xFF]);
        assert_eq!(row, expected);

        let (x, _, _, _, data) = &blits[1];
        assert_eq!(*x, 18);
        assert!(data.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn glyphs_clip_to_screen() {
        let mut canvas = RecordingCanvas::new(20, 20);
        Rasterizer::new(&mut canvas)
            .text("BB", -4, 16, &font(), 0x1234, 0)
            .unwrap();
        let blits = blits(&canvas);
        assert_eq!(blits.len(), 2);
        assert_eq!((blits[0].0, blits[0].1, blits[0].2, blits[0].3), (0, 16, 4, 4));
        assert_eq!(blits[0].4.len(), 4 * 4 * 2);
        assert_eq!((blits[1].0, blits[1].2), (4, 8));
    }

    #[test]
    fn unknown_characters_do_not_panic() {
        let mut canvas = RecordingCanvas::new(240, 320);
        Rasterizer::new(&mut canvas)
            .text("~\u{1F600}", 0, 0, &font(), 0xFFFF, 0x0000)
            .unwrap();
        let blits = blits(&canvas);
        assert_eq!(blits.len(), 2);
        assert!(blits.iter().all(|b| b.4.iter().all(|&v| v == 0)));
    }

    #[test]
    fn large_glyphs_go_out_in_bands() {
        static BIG: [u8; 5 * 40] = [0xAA; 5 * 40];
        let font = Font::new(40, 40, 'x' as u32, &BIG);
        let mut canvas = RecordingCanvas::new(240, 320);
        Rasterizer::new(&mut canvas)
            .text("x", 0, 0, &font, 1, 2)
            .unwrap();
        let blits = blits(&canvas);
        // 2048 / 80 = 25 rows per band
        assert_eq!(blits.len(), 2);
        assert_eq!((blits[0].1, blits[0].3), (0, 25));
        assert_eq!((blits[1].1, blits[1].3), (25, 15));
        let rows: i32 = blits.iter().map(|b| b.3).sum();
        assert_eq!(rows, 40);
    }
}
