use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// Convert 8-bit RGB to Rgb565.
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// ── Colors ──────────────────────────────────────────────────────────

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;
pub const RED: Rgb565 = Rgb565::RED;
pub const GREEN: Rgb565 = Rgb565::GREEN;
pub const LIGHT_GREY: Rgb565 = rgb(211, 211, 211);

// ── Panel geometry ──────────────────────────────────────────────────

/// Round 240x240 panels, one per screen index.
pub const SCREEN_SIZE: u32 = 240;
pub const SCREEN_COUNT: usize = 5;
pub const CENTRE: i32 = (SCREEN_SIZE / 2) as i32;

// Weather screen assignment
pub const SCREEN_CLOCK: usize = 0;
pub const SCREEN_DESCRIPTION: usize = 1;
pub const SCREEN_ICON: usize = 2;
pub const SCREEN_TEMPERATURE: usize = 3;
pub const SCREEN_FORECAST: usize = 4;
