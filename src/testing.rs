//! Fakes for the collaborator traits, shared by the unit tests.

use std::cell::Cell;
use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::Point;

use crate::clock::{Clock, LocalTime};
use crate::conditions::WeatherIcon;
use crate::http_client::{HttpGet, HttpResponse};
use crate::views::{Font, Surface, TextStyle};

// ── Surface ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Select(usize),
    FillScreen(Rgb565),
    Rect {
        top_left: Point,
        width: u32,
        height: u32,
        color: Rgb565,
    },
    Triangle {
        a: Point,
        b: Point,
        c: Point,
        color: Rgb565,
    },
    Arc {
        center: Point,
        outer: u32,
        inner: u32,
        color: Rgb565,
    },
    Circle {
        center: Point,
        radius: u32,
        color: Rgb565,
    },
    Text {
        text: String,
        anchor: Point,
        font: Font,
        color: Rgb565,
    },
    Icon {
        icon: WeatherIcon,
        top_left: Point,
        scale: u8,
    },
}

/// Records every primitive instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Screens selected, in order.
    pub fn selected(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Select(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn select_screen(&mut self, index: usize) {
        self.ops.push(Op::Select(index));
    }

    fn fill_screen(&mut self, color: Rgb565) {
        self.ops.push(Op::FillScreen(color));
    }

    fn fill_rect(&mut self, top_left: Point, width: u32, height: u32, color: Rgb565) {
        self.ops.push(Op::Rect {
            top_left,
            width,
            height,
            color,
        });
    }

    fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: Rgb565) {
        self.ops.push(Op::Triangle { a, b, c, color });
    }

    fn draw_arc(
        &mut self,
        center: Point,
        outer_radius: u32,
        inner_radius: u32,
        _start_deg: f32,
        _sweep_deg: f32,
        color: Rgb565,
    ) {
        self.ops.push(Op::Arc {
            center,
            outer: outer_radius,
            inner: inner_radius,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: u32, color: Rgb565) {
        self.ops.push(Op::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: TextStyle) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            anchor,
            font: style.font,
            color: style.color,
        });
    }

    fn text_width(&self, text: &str, font: Font) -> u32 {
        text.chars().count() as u32 * self.font_height(font) / 2
    }

    fn font_height(&self, font: Font) -> u32 {
        match font {
            Font::Small => 12,
            Font::Medium => 16,
            Font::Large => 22,
            Font::Huge => 30,
        }
    }

    fn draw_icon(&mut self, icon: WeatherIcon, top_left: Point, scale: u8) {
        self.ops.push(Op::Icon {
            icon,
            top_left,
            scale,
        });
    }
}

// ── HTTP ────────────────────────────────────────────────────────────

/// Replays queued responses in order; an exhausted queue fails the request
/// unless a fallback response was set.
#[derive(Debug, Default)]
pub struct ScriptedHttp {
    queue: VecDeque<Option<HttpResponse>>,
    fallback: Option<HttpResponse>,
    requests: Vec<String>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails at the transport level.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn respond(mut self, status: i32, body: &str) -> Self {
        self.queue.push_back(Some(HttpResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    /// Queue one transport failure.
    pub fn fail_once(mut self) -> Self {
        self.queue.push_back(None);
        self
    }

    /// Response used once the queue runs dry.
    pub fn always(mut self, status: i32, body: &str) -> Self {
        self.fallback = Some(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl HttpGet for ScriptedHttp {
    fn get(&mut self, url: &str) -> Result<HttpResponse> {
        self.requests.push(url.to_string());
        match self.queue.pop_front() {
            Some(Some(resp)) => Ok(resp),
            Some(None) => Err(anyhow!("scripted transport failure")),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| anyhow!("no scripted response for {}", url)),
        }
    }
}

// ── Clock ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
    time: Cell<LocalTime>,
}

impl ManualClock {
    pub fn new(time: LocalTime) -> Self {
        Self {
            now_ms: Cell::new(0),
            time: Cell::new(time),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn set_time(&self, time: LocalTime) {
        self.time.set(time);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    fn local_time(&self) -> LocalTime {
        self.time.get()
    }
}
