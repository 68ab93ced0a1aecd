pub mod stock;
pub mod weather;
pub mod wrap;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

use crate::conditions::WeatherIcon;

/// Font sizes available on the panels, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Medium,
    Large,
    Huge,
}

/// Which point of the text box sits on the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datum {
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Rgb565,
    pub background: Option<Rgb565>,
    pub datum: Datum,
}

impl TextStyle {
    pub const fn new(font: Font, color: Rgb565) -> Self {
        Self {
            font,
            color,
            background: None,
            datum: Datum::MiddleCenter,
        }
    }

    pub const fn on(mut self, background: Rgb565) -> Self {
        self.background = Some(background);
        self
    }

    pub const fn datum(mut self, datum: Datum) -> Self {
        self.datum = datum;
        self
    }
}

/// Drawing primitives of the multi-panel display.
///
/// Exactly one screen is selected at a time; every render routine selects
/// its target before drawing.
pub trait Surface {
    fn select_screen(&mut self, index: usize);
    fn fill_screen(&mut self, color: Rgb565);
    fn fill_rect(&mut self, top_left: Point, width: u32, height: u32, color: Rgb565);
    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgb565);
    /// Ring segment between `inner_radius` and `outer_radius`, angles in degrees.
    fn draw_arc(
        &mut self,
        center: Point,
        outer_radius: u32,
        inner_radius: u32,
        start_deg: f32,
        sweep_deg: f32,
        color: Rgb565,
    );
    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565);
    fn draw_text(&mut self, text: &str, anchor: Point, style: TextStyle);
    fn text_width(&self, text: &str, font: Font) -> u32;
    fn font_height(&self, font: Font) -> u32;
    /// Draw an icon with its top-left at `top_left`, shrunk by `scale` (1 = full size).
    fn draw_icon(&mut self, icon: WeatherIcon, top_left: Point, scale: u8);
}
