use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    mono_font::{MonoFont, MonoTextStyleBuilder},
    pixelcolor::{raw::RawU16, Rgb565},
    prelude::*,
    primitives::{
        Arc, Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment, Triangle,
    },
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Pixel,
};
use profont::{PROFONT_10_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use crate::conditions::WeatherIcon;
use crate::layout::{SCREEN_COUNT, SCREEN_SIZE};
use crate::views::{Datum, Font, Surface, TextStyle};

/// Rows per panel transfer chunk.
pub const CHUNK_LINES: u32 = 20;

/// RGB565 framebuffer for one panel.
pub struct Framebuffer {
    buf: Vec<u16>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: vec![0; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn clear_color(&mut self, color: Rgb565) {
        let raw = RawU16::from(color).into_inner();
        self.buf.fill(raw);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let raw = self.buf[(y * self.width + x) as usize];
        Some(Rgb565::from(RawU16::new(raw)))
    }

    /// Copy rows `[row_start, row_end)` into `out` as big-endian RGB565,
    /// the byte order the panels expect. Returns the bytes written.
    pub fn write_rows_be(&self, row_start: u32, row_end: u32, out: &mut [u8]) -> usize {
        let row_end = row_end.min(self.height);
        let from = (row_start * self.width) as usize;
        let to = (row_end * self.width) as usize;
        let mut n = 0;
        for (pixel, dst) in self.buf[from..to].iter().zip(out.chunks_exact_mut(2)) {
            dst.copy_from_slice(&pixel.to_be_bytes());
            n += 2;
        }
        n
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.width;
        let h = self.height;
        for Pixel(point, color) in pixels {
            let x = point.x;
            let y = point.y;
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                let idx = (y as u32 * w + x as u32) as usize;
                self.buf[idx] = RawU16::from(color).into_inner();
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let raw = RawU16::from(color).into_inner();
        let area = area.intersection(&self.bounding_box());
        let w = self.width;
        for y in area.rows() {
            let row_start = (y as u32 * w) as usize;
            for x in area.columns() {
                self.buf[row_start + x as usize] = raw;
            }
        }
        Ok(())
    }
}

// ── Screen bank ─────────────────────────────────────────────────────

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Small => &PROFONT_10_POINT,
        Font::Medium => &PROFONT_14_POINT,
        Font::Large => &PROFONT_18_POINT,
        Font::Huge => &PROFONT_24_POINT,
    }
}

/// One framebuffer per round panel, with a selected screen and a dirty
/// bit per screen so the device loop only flushes what was redrawn.
pub struct ScreenBank {
    screens: Vec<Framebuffer>,
    current: usize,
    dirty: [bool; SCREEN_COUNT],
}

impl ScreenBank {
    pub fn new() -> Self {
        Self {
            screens: (0..SCREEN_COUNT)
                .map(|_| Framebuffer::new(SCREEN_SIZE, SCREEN_SIZE))
                .collect(),
            current: 0,
            dirty: [false; SCREEN_COUNT],
        }
    }

    pub fn screen(&self, index: usize) -> Option<&Framebuffer> {
        self.screens.get(index)
    }

    pub fn selected(&self) -> usize {
        self.current
    }

    /// Indices drawn to since the last call, clearing the dirty bits.
    pub fn take_dirty(&mut self) -> Vec<usize> {
        let out = (0..SCREEN_COUNT).filter(|&i| self.dirty[i]).collect();
        self.dirty = [false; SCREEN_COUNT];
        out
    }

    fn target(&mut self) -> &mut Framebuffer {
        self.dirty[self.current] = true;
        &mut self.screens[self.current]
    }
}

impl Default for ScreenBank {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for ScreenBank {
    fn select_screen(&mut self, index: usize) {
        if index < SCREEN_COUNT {
            self.current = index;
        } else {
            log::warn!("screen {} out of range", index);
        }
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.target().clear_color(color);
    }

    fn fill_rect(&mut self, top_left: Point, width: u32, height: u32, color: Rgb565) {
        Rectangle::new(top_left, Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self.target())
            .ok();
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgb565) {
        Triangle::new(a, b, c)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self.target())
            .ok();
    }

    fn draw_arc(
        &mut self,
        center: Point,
        outer_radius: u32,
        inner_radius: u32,
        start_deg: f32,
        sweep_deg: f32,
        color: Rgb565,
    ) {
        let style = PrimitiveStyleBuilder::new()
            .stroke_color(color)
            .stroke_width(outer_radius.saturating_sub(inner_radius).max(1))
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        // Odd diameter keeps the centre on a pixel.
        let diameter = outer_radius * 2 + 1;
        if sweep_deg >= 360.0 {
            Circle::with_center(center, diameter)
                .into_styled(style)
                .draw(self.target())
                .ok();
        } else {
            Arc::with_center(
                center,
                diameter,
                start_deg.deg(),
                sweep_deg.deg(),
            )
            .into_styled(style)
            .draw(self.target())
            .ok();
        }
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        Circle::with_center(center, radius * 2 + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(self.target())
            .ok();
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        let mut builder = MonoTextStyleBuilder::new()
            .font(mono_font(style.font))
            .text_color(style.color);
        if let Some(bg) = style.background {
            builder = builder.background_color(bg);
        }
        let alignment = match style.datum {
            Datum::MiddleLeft => Alignment::Left,
            Datum::MiddleCenter => Alignment::Center,
            Datum::MiddleRight => Alignment::Right,
        };
        let layout = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, anchor, builder.build(), layout)
            .draw(self.target())
            .ok();
    }

    fn text_width(&self, text: &str, font: Font) -> u32 {
        let f = mono_font(font);
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * f.character_size.width + (n - 1) * f.character_spacing
    }

    fn font_height(&self, font: Font) -> u32 {
        mono_font(font).character_size.height
    }

    fn draw_icon(&mut self, icon: WeatherIcon, top_left: Point, scale: u8) {
        // No bitmaps on board: the icon box gets its label instead.
        let side = (SCREEN_SIZE / scale.max(1) as u32) as i32;
        let font = if scale <= 1 { Font::Large } else { Font::Small };
        let center = top_left + Point::new(side / 2, side / 2);
        let color = self.target().pixel(
            center.x.clamp(0, SCREEN_SIZE as i32 - 1) as u32,
            center.y.clamp(0, SCREEN_SIZE as i32 - 1) as u32,
        );
        let ink = match color {
            Some(bg) if bg == Rgb565::WHITE => Rgb565::BLACK,
            _ => Rgb565::WHITE,
        };
        self.draw_text(icon.label(), center, TextStyle::new(font, ink));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BLACK, RED, WHITE};

    #[test]
    fn fill_rect_is_clipped_to_the_panel() {
        let mut bank = ScreenBank::new();
        bank.select_screen(2);
        bank.fill_screen(BLACK);
        bank.fill_rect(Point::new(230, 230), 40, 40, RED);
        let fb = bank.screen(2).unwrap();
        assert_eq!(fb.pixel(239, 239), Some(RED));
        assert_eq!(fb.pixel(229, 229), Some(BLACK));
        assert_eq!(fb.pixel(240, 0), None);
    }

    #[test]
    fn dirty_screens_are_reported_once() {
        let mut bank = ScreenBank::new();
        bank.select_screen(1);
        bank.fill_screen(WHITE);
        bank.select_screen(4);
        bank.fill_circle(Point::new(120, 120), 10, RED);
        assert_eq!(bank.take_dirty(), vec![1, 4]);
        assert!(bank.take_dirty().is_empty());
    }

    #[test]
    fn out_of_range_select_keeps_current_screen() {
        let mut bank = ScreenBank::new();
        bank.select_screen(3);
        bank.select_screen(SCREEN_COUNT);
        assert_eq!(bank.selected(), 3);
    }

    #[test]
    fn rows_are_written_big_endian() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear_color(RED);
        let mut out = [0u8; 8];
        assert_eq!(fb.write_rows_be(0, 1, &mut out), 8);
        assert_eq!(&out[..2], &[0xF8, 0x00]);
    }

    #[test]
    fn text_metrics_follow_the_mono_font() {
        let bank = ScreenBank::new();
        let w1 = bank.text_width("7", Font::Huge);
        let w2 = bank.text_width("77", Font::Huge);
        assert!(w2 > w1);
        assert_eq!(bank.text_width("", Font::Small), 0);
        assert!(bank.font_height(Font::Huge) > bank.font_height(Font::Small));
    }

    #[test]
    fn ring_leaves_centre_untouched() {
        let mut bank = ScreenBank::new();
        bank.select_screen(0);
        bank.fill_screen(BLACK);
        bank.draw_arc(Point::new(120, 120), 120, 118, 0.0, 360.0, RED);
        let fb = bank.screen(0).unwrap();
        assert_eq!(fb.pixel(120, 120), Some(BLACK));
        assert_eq!(fb.pixel(120, 0), Some(RED));
        assert_eq!(fb.pixel(0, 120), Some(RED));
        assert_eq!(fb.pixel(239, 120), Some(RED));
        assert_eq!(fb.pixel(120, 239), Some(RED));
        assert_eq!(fb.pixel(120, 2), Some(BLACK));
        assert_eq!(fb.pixel(2, 120), Some(BLACK));
    }
}
