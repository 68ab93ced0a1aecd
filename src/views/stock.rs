use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use log::info;

use crate::layout::*;
use crate::model::StockQuote;
use crate::views::{Font, Surface, TextStyle};

const ARROW_OFFSET_Y: i32 = -109;
const RING_OUTER: u32 = 120;
const RING_INNER: u32 = 118;

/// Paint one stock on screen `display_index`. Does nothing for a quote
/// that was never fetched.
pub fn draw_stock(
    surface: &mut dyn Surface,
    display_index: usize,
    symbol: &str,
    quote: &StockQuote,
    background: Rgb565,
    text: Rgb565,
) {
    info!("displayStock - {} ~ {:.2}", symbol, quote.current_price);
    if !quote.has_data() {
        return;
    }
    surface.select_screen(display_index);
    surface.fill_screen(background);

    // Ticker band
    surface.fill_rect(Point::new(0, 70), SCREEN_SIZE, 49, WHITE);
    surface.fill_rect(Point::new(0, 111), SCREEN_SIZE, 20, LIGHT_GREY);

    // 52 week range
    let small = TextStyle::new(Font::Small, text).on(background);
    let cur = &quote.currency_symbol;
    surface.draw_text("52 Week:", Point::new(CENTRE, 185), small);
    surface.draw_text(
        &format!("H: {}{:.2}", cur, quote.fifty_two_week_high),
        Point::new(CENTRE, 200),
        small,
    );
    surface.draw_text(
        &format!("L: {}{:.2}", cur, quote.fifty_two_week_low),
        Point::new(CENTRE, 215),
        small,
    );

    let company = TextStyle::new(Font::Small, BLACK).on(LIGHT_GREY);
    surface.draw_text(&quote.company_name, Point::new(CENTRE, 121), company);

    // Direction arrow + ring
    let trend = if quote.is_falling() { RED } else { GREEN };
    let (tip_y, base_y) = if quote.is_falling() {
        (132 + ARROW_OFFSET_Y, 120 + ARROW_OFFSET_Y)
    } else {
        (120 + ARROW_OFFSET_Y, 132 + ARROW_OFFSET_Y)
    };
    surface.fill_triangle(
        Point::new(110, base_y),
        Point::new(130, base_y),
        Point::new(120, tip_y),
        trend,
    );
    surface.draw_arc(
        Point::new(CENTRE, CENTRE),
        RING_OUTER,
        RING_INNER,
        0.0,
        360.0,
        trend,
    );
    surface.draw_text(
        &format!("{:.2}%", quote.percent_change * 100.0),
        Point::new(CENTRE, 48),
        TextStyle::new(Font::Huge, trend).on(background),
    );

    surface.draw_text(
        &quote.ticker_display,
        Point::new(CENTRE, 92),
        TextStyle::new(Font::Huge, BLACK).on(WHITE),
    );
    surface.draw_text(
        &format!("{}{:.2}", cur, quote.current_price),
        Point::new(CENTRE, 155),
        TextStyle::new(Font::Huge, text).on(background),
    );
}
