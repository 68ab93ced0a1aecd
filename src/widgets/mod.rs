pub mod stock;
pub mod weather;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::button::{ButtonId, ButtonState};
use crate::http_client::HttpGet;
use crate::views::Surface;

/// Collaborators borrowed for the duration of one widget call.
pub struct Devices<'a> {
    pub http: &'a mut dyn HttpGet,
    pub surface: &'a mut dyn Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Idle,
    Fetching,
    Rendering,
}

/// Shared "fetch in progress" bit, readable from another thread.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn set(&self, busy: bool) {
        self.0.store(busy, Ordering::Relaxed);
    }
}

/// When a widget last refreshed and when it is next due.
#[derive(Debug)]
pub struct PollState {
    last_update_ms: Option<u64>,
    not_before_ms: u64,
    interval_ms: u64,
    busy: BusyFlag,
    state: WidgetState,
}

impl PollState {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            last_update_ms: None,
            not_before_ms: 0,
            interval_ms,
            busy: BusyFlag::default(),
            state: WidgetState::Idle,
        }
    }

    /// Hold off the first refresh until `now_ms + delay_ms`.
    pub fn defer_first(&mut self, now_ms: u64, delay_ms: u64) {
        self.not_before_ms = now_ms + delay_ms;
    }

    pub fn is_due(&self, now_ms: u64, force: bool) -> bool {
        if force {
            return true;
        }
        match self.last_update_ms {
            None => now_ms >= self.not_before_ms,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.busy.set(true);
        self.state = WidgetState::Fetching;
    }

    pub fn finish_fetch(&mut self, now_ms: u64) {
        self.busy.set(false);
        self.last_update_ms = Some(now_ms);
        self.state = WidgetState::Idle;
    }

    pub fn begin_render(&mut self) {
        self.state = WidgetState::Rendering;
    }

    pub fn finish_render(&mut self) {
        self.state = WidgetState::Idle;
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }
}

/// A self-updating set of screens.
pub trait Widget {
    fn name(&self) -> &'static str;

    fn setup(&mut self) {}

    /// Refresh the model when due or forced. Blocks on the network.
    fn update(&mut self, http: &mut dyn HttpGet, force: bool);

    /// Repaint screens whose data changed, or all of them when forced.
    fn draw(&mut self, surface: &mut dyn Surface, force: bool);

    fn change_mode(&mut self, devices: &mut Devices<'_>);

    fn button_pressed(&mut self, devices: &mut Devices<'_>, button: ButtonId, state: ButtonState) {
        if button == ButtonId::Ok && state == ButtonState::Short {
            self.change_mode(devices);
        }
    }

    fn state(&self) -> WidgetState;

    fn busy_flag(&self) -> BusyFlag;

    fn is_busy(&self) -> bool {
        self.busy_flag().get()
    }
}
