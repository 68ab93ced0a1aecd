use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;
use log::warn;

use crate::clock::LocalTime;
use crate::conditions::Condition;
use crate::config::Units;
use crate::layout::*;
use crate::model::{WeatherReport, FORECAST_DAYS};
use crate::views::wrap::{wrap_text, LINE_COUNT, LINE_WIDTH};
use crate::views::{Datum, Font, Surface, TextStyle};

/// Which temperature the three-day screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastMode {
    #[default]
    Highs,
    Lows,
}

impl ForecastMode {
    pub fn next(self) -> ForecastMode {
        match self {
            ForecastMode::Highs => ForecastMode::Lows,
            ForecastMode::Lows => ForecastMode::Highs,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ForecastMode::Highs => "highs",
            ForecastMode::Lows => "lows",
        }
    }
}

// ── Clock ───────────────────────────────────────────────────────────

pub fn draw_clock(
    surface: &mut dyn Surface,
    display_index: usize,
    time: &LocalTime,
    units: Units,
    background: Rgb565,
    color: Rgb565,
) {
    const CLOCK_Y: i32 = 94;
    const DAY_OF_WEEK_Y: i32 = 160;
    const DATE_Y: i32 = 197;

    surface.select_screen(display_index);
    surface.fill_screen(background);

    let date = match units {
        Units::Metric => format!("{} {}", time.day, time.month_name()),
        Units::Imperial => format!("{} {}", time.month_name(), time.day),
    };
    surface.draw_text(
        &date,
        Point::new(CENTRE, DATE_Y),
        TextStyle::new(Font::Medium, color),
    );
    surface.draw_text(
        time.weekday_name(),
        Point::new(CENTRE, DAY_OF_WEEK_Y),
        TextStyle::new(Font::Large, color),
    );

    let digits = TextStyle::new(Font::Huge, color);
    surface.draw_text(
        &time.hour_padded(),
        Point::new(CENTRE - 5, CLOCK_Y),
        digits.datum(Datum::MiddleRight),
    );
    surface.draw_text(":", Point::new(CENTRE, CLOCK_Y), digits);
    surface.draw_text(
        &time.minute_padded(),
        Point::new(CENTRE + 5, CLOCK_Y),
        digits.datum(Datum::MiddleLeft),
    );
}

// ── City + description ──────────────────────────────────────────────

pub fn draw_description(
    surface: &mut dyn Surface,
    display_index: usize,
    report: &WeatherReport,
    background: Rgb565,
    color: Rgb565,
) {
    if !report.has_data() {
        return;
    }
    let lines = wrap_text(&report.condition_text, LINE_WIDTH, LINE_COUNT);

    surface.select_screen(display_index);
    surface.fill_screen(background);
    surface.draw_text(
        report.short_city(),
        Point::new(CENTRE, 84),
        TextStyle::new(Font::Large, color),
    );

    let body = TextStyle::new(Font::Medium, color);
    let mut y = 118;
    for line in &lines {
        surface.draw_text(line.trim_end(), Point::new(CENTRE, y), body);
        y += 21;
    }
}

// ── Icons ───────────────────────────────────────────────────────────

/// Draw the icon for `condition`; unknown codes draw nothing. Returns
/// whether an icon was drawn.
pub fn draw_condition_icon(
    surface: &mut dyn Surface,
    condition: &Condition,
    display_index: usize,
    top_left: Point,
    scale: u8,
) -> bool {
    match condition.icon() {
        Some(icon) => {
            surface.select_screen(display_index);
            surface.draw_icon(icon, top_left, scale);
            true
        }
        None => {
            warn!("unknown weather icon: {:?}", condition.code());
            false
        }
    }
}

pub fn draw_current_icon(
    surface: &mut dyn Surface,
    display_index: usize,
    report: &WeatherReport,
    background: Rgb565,
) {
    if !report.has_data() {
        return;
    }
    surface.select_screen(display_index);
    surface.fill_screen(background);
    draw_condition_icon(
        surface,
        &report.current_condition,
        display_index,
        Point::zero(),
        1,
    );
}

// ── Temperatures ────────────────────────────────────────────────────

fn whole_degrees(t: f32) -> String {
    format!("{:.0}", t)
}

/// Number with a degree ring after it. Returns the width used.
#[allow(clippy::too_many_arguments)]
fn draw_degrees(
    surface: &mut dyn Surface,
    number: &str,
    anchor: Point,
    font: Font,
    outer_radius: u32,
    inner_radius: u32,
    color: Rgb565,
    background: Rgb565,
) -> i32 {
    let text_width = surface.text_width(number, font) as i32;
    let font_height = surface.font_height(font) as i32;
    let offset = (font_height as f32 * 0.15).ceil() as i32;
    let ring = Point::new(
        text_width / 2 + anchor.x + offset,
        anchor.y - font_height / 2 + font_height / 10,
    );

    surface.draw_text(number, anchor, TextStyle::new(font, color));
    surface.fill_circle(ring, outer_radius, color);
    surface.fill_circle(ring, inner_radius, background);

    text_width + offset
}

pub fn draw_current_temperature(
    surface: &mut dyn Surface,
    display_index: usize,
    report: &WeatherReport,
    background: Rgb565,
    color: Rgb565,
) {
    if !report.has_data() {
        return;
    }
    surface.select_screen(display_index);
    surface.fill_screen(background);

    draw_degrees(
        surface,
        &whole_degrees(report.current_temperature),
        Point::new(CENTRE, 108),
        Font::Huge,
        15,
        8,
        color,
        background,
    );

    surface.fill_rect(Point::new(0, 170), SCREEN_SIZE, 70, BLACK);
    surface.fill_rect(Point::new(CENTRE - 1, 170), 2, SCREEN_SIZE, WHITE);

    let label = TextStyle::new(Font::Medium, WHITE);
    surface.draw_text("high", Point::new(80, 190), label);
    surface.draw_text("low", Point::new(160, 190), label);
    draw_degrees(
        surface,
        &whole_degrees(report.today_high),
        Point::new(80, 216),
        Font::Medium,
        4,
        2,
        WHITE,
        BLACK,
    );
    draw_degrees(
        surface,
        &whole_degrees(report.today_low),
        Point::new(160, 216),
        Font::Medium,
        4,
        2,
        WHITE,
        BLACK,
    );
}

// ── Three-day forecast ──────────────────────────────────────────────

pub fn draw_forecast(
    surface: &mut dyn Surface,
    display_index: usize,
    report: &WeatherReport,
    mode: ForecastMode,
    today: &LocalTime,
) {
    const COLUMN_SIZE: i32 = 75;
    const HIGH_LOW_Y: i32 = 199;

    if !report.has_data() {
        return;
    }
    surface.select_screen(display_index);
    surface.fill_screen(WHITE);
    surface.fill_rect(Point::new(0, 170), SCREEN_SIZE, 70, BLACK);
    surface.draw_text(
        mode.label(),
        Point::new(CENTRE, HIGH_LOW_Y),
        TextStyle::new(Font::Medium, WHITE),
    );

    let temps: Vec<String> = report
        .days
        .iter()
        .map(|d| {
            whole_degrees(match mode {
                ForecastMode::Highs => d.high,
                ForecastMode::Lows => d.low,
            })
        })
        .collect();
    // Three-character values do not fit the big digits.
    let font = if temps.iter().any(|t| t.chars().count() > 2) {
        Font::Large
    } else {
        Font::Huge
    };

    let day_style = TextStyle::new(Font::Medium, BLACK);
    for (i, (day, temp)) in report.days.iter().zip(&temps).enumerate().take(FORECAST_DAYS) {
        let x = (CENTRE - COLUMN_SIZE) + i as i32 * COLUMN_SIZE;

        draw_condition_icon(surface, &day.condition, display_index, Point::new(x - 30, 40), 4);
        draw_degrees(surface, temp, Point::new(x, 122), font, 7, 4, BLACK, WHITE);
        surface.draw_text(
            today.short_weekday_after(i as u32 + 1),
            Point::new(x, 154),
            day_style,
        );
    }
}
