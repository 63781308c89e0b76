// filepath: src/draw.rs
//! Drawing utilities for hypr-showcase
//!
//! Everything is rasterized in software into a `wl_shm` ARGB8888 buffer
//! (premultiplied, little endian). Pixels are sampled at their centers.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::layout::Label;
use crate::mask::{MaskPath, Stroke};
use crate::showcase::Overlay;
use crate::text::{FontSpec, TextMeasure};

/// Canvas over a raw pixel buffer
pub struct Canvas<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    /// Create a new canvas from a raw buffer of `width * height * 4` bytes
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            buffer,
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

    /// Premultiplied ARGB8888 bytes at (x, y), `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut px = [0; 4];
        px.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(px)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        (idx + 3 < self.buffer.len()).then_some(idx)
    }

    /// Fill the whole canvas, replacing what was there
    pub fn clear(&mut self, color: Color) {
        let px = color.to_argb8888();
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&px);
        }
    }

    /// Blend `color` onto one pixel
    pub fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        if let Some(idx) = self.index(x, y) {
            color.blend_onto(&mut self.buffer[idx..idx + 4], coverage);
        }
    }

    /// Pixel range covered by `rect`, clipped to the canvas
    fn pixel_span(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x_start = rect.left().floor().max(0.0) as u32;
        let y_start = rect.top().floor().max(0.0) as u32;
        let x_end = (rect.right().ceil().max(0.0) as u32).min(self.width);
        let y_end = (rect.bottom().ceil().max(0.0) as u32).min(self.height);
        if x_end <= x_start || y_end <= y_start {
            return None;
        }
        Some((x_start, y_start, x_end, y_end))
    }

    /// Blend a filled rectangle
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    /// Blend every pixel whose center the path covers
    pub fn fill_path(&mut self, path: &MaskPath, color: Color) {
        for y in 0..self.height {
            for x in 0..self.width {
                if path.contains(Point::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }

    pub fn stroke(&mut self, stroke: &Stroke, color: Color) {
        let area = stroke.path.bounds().inflate(stroke.width / 2.0 + 1.0);
        let Some((x0, y0, x1, y1)) = self.pixel_span(area) else {
            return;
        };
        let color = color.with_opacity(stroke.opacity);
        for y in y0..y1 {
            for x in x0..x1 {
                let coverage = stroke.coverage(Point::new(x as f32 + 0.5, y as f32 + 0.5));
                self.blend(x, y, color, coverage);
            }
        }
    }

    /// Draw one line of text with its line box's top-left at `origin`.
    /// Without glyph bitmaps each visible character becomes a solid box.
    pub fn draw_text(
        &mut self,
        measure: &dyn TextMeasure,
        origin: Point,
        text: &str,
        font: &FontSpec,
        color: Color,
    ) {
        let baseline = origin.y + measure.ascent(font);
        let mut pen = origin.x;
        for ch in text.chars() {
            let advance = measure.advance(ch, font);
            match measure.rasterize(ch, font) {
                Some(glyph) => {
                    let left = pen.round() as i32 + glyph.xmin;
                    let top = baseline.round() as i32 - glyph.ymin - glyph.height as i32;
                    for row in 0..glyph.height {
                        for col in 0..glyph.width {
                            let (x, y) = (left + col as i32, top + row as i32);
                            if x < 0 || y < 0 {
                                continue;
                            }
                            let coverage = glyph.coverage[row * glyph.width + col] as f32 / 255.0;
                            self.blend(x as u32, y as u32, color, coverage);
                        }
                    }
                }
                None if !ch.is_whitespace() => {
                    let cap = font.size * 0.7;
                    self.fill_rect(
                        Rect::new(pen + advance * 0.1, baseline - cap, advance * 0.8, cap),
                        color,
                    );
                }
                None => {}
            }
            pen += advance;
        }
    }

    fn draw_label(&mut self, measure: &dyn TextMeasure, label: &Label, font: &FontSpec, color: Color) {
        for line in &label.lines {
            self.draw_text(measure, line.origin, &line.text, font, color);
        }
    }

    /// Render a composed overlay: backdrop, outline strokes, then text.
    pub fn draw_overlay(&mut self, overlay: &Overlay, measure: &dyn TextMeasure) {
        let style = &overlay.style;
        self.clear(Color::TRANSPARENT);
        self.fill_path(
            &overlay.mask,
            style.background_color.with_opacity(style.mask_opacity),
        );
        for stroke in &overlay.outline {
            self.stroke(stroke, style.highlight_color);
        }
        self.draw_label(measure, &overlay.text.title, &style.title_font, style.title_color);
        self.draw_label(
            measure,
            &overlay.text.details,
            &style.details_font,
            style.details_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Subpath;
    use crate::text::FixedMetrics;

    #[test]
    fn fill_path_skips_the_hole() {
        let mut buf = vec![0u8; 10 * 10 * 4];
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        let mask = MaskPath::backdrop(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Some(Subpath::rect(Rect::new(2.0, 2.0, 4.0, 4.0))),
        );
        canvas.fill_path(&mask, Color::BLACK);
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(6, 6), Some([0, 0, 0, 255]));
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut buf = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut buf, 4, 4);
        canvas.fill_rect(Rect::new(-10.0, 2.0, 100.0, 100.0), Color::WHITE);
        assert_eq!(canvas.pixel(0, 1), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(3, 3), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn placeholder_glyphs_mark_visible_characters() {
        let mut buf = vec![0u8; 40 * 20 * 4];
        let mut canvas = Canvas::new(&mut buf, 40, 20);
        let font = FontSpec::regular(16.0);
        canvas.draw_text(&FixedMetrics, Point::new(0.0, 0.0), "a b", &font, Color::WHITE);
        // 'a' box spans x 0.8..7.2 and sits on the baseline at y 12.8
        assert_eq!(canvas.pixel(4, 10), Some([255, 255, 255, 255]));
        // the space is left untouched
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0]));
    }
}
