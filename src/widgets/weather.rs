use std::rc::Rc;

use log::{info, warn};

use crate::clock::Clock;
use crate::config::{Config, Units};
use crate::http_client::HttpGet;
use crate::layout::*;
use crate::model::{Tracked, WeatherReport};
use crate::views::weather::{
    draw_clock, draw_current_icon, draw_current_temperature, draw_description, draw_forecast,
    ForecastMode,
};
use crate::views::Surface;
use crate::weather::fetch_weather;
use crate::widgets::{BusyFlag, Devices, PollState, Widget, WidgetState};

/// Extra attempts a forced refresh makes after a failed fetch.
pub const MAX_RETRIES: u32 = 3;
const FIRST_FETCH_DELAY_MS: u64 = 1000;

/// Clock, description, icon, temperature and three-day forecast across
/// the five screens.
pub struct WeatherWidget {
    api_key: String,
    location: String,
    units: Units,
    report: Tracked<WeatherReport>,
    mode: ForecastMode,
    clock_stamp: Option<u32>,
    poll: PollState,
    clock: Rc<dyn Clock>,
}

impl WeatherWidget {
    pub fn new(
        api_key: impl Into<String>,
        location: impl Into<String>,
        units: Units,
        interval_ms: u64,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            location: location.into(),
            units,
            report: Tracked::default(),
            mode: ForecastMode::default(),
            clock_stamp: None,
            poll: PollState::new(interval_ms),
            clock,
        }
    }

    pub fn from_config(config: &Config, clock: Rc<dyn Clock>) -> Self {
        Self::new(
            config.weather_api_key.as_str(),
            config.weather_location.as_str(),
            config.units,
            config.weather_interval_ms,
            clock,
        )
    }

    pub fn report(&self) -> &Tracked<WeatherReport> {
        &self.report
    }

    pub fn mode(&self) -> ForecastMode {
        self.mode
    }

    fn fetch_once(&mut self, http: &mut dyn HttpGet) -> bool {
        match fetch_weather(http, &self.api_key, &self.location, self.units) {
            Ok(report) => {
                self.report.apply(report);
                true
            }
            Err(e) => {
                warn!("weather {}: {}", self.location, e);
                false
            }
        }
    }
}

impl Widget for WeatherWidget {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn setup(&mut self) {
        self.poll.defer_first(self.clock.now_ms(), FIRST_FETCH_DELAY_MS);
        info!("weather widget: {} ({})", self.location, self.units.as_str());
    }

    fn update(&mut self, http: &mut dyn HttpGet, force: bool) {
        if !self.poll.is_due(self.clock.now_ms(), force) {
            return;
        }
        self.poll.begin_fetch();
        if force {
            let mut retry = 0;
            while !self.fetch_once(http) && retry < MAX_RETRIES {
                retry += 1;
            }
        } else {
            self.fetch_once(http);
        }
        self.poll.finish_fetch(self.clock.now_ms());
    }

    fn draw(&mut self, surface: &mut dyn Surface, force: bool) {
        self.poll.begin_render();

        let now = self.clock.local_time();
        let stamp = now.clock_stamp();
        if force || self.clock_stamp != Some(stamp) {
            draw_clock(surface, SCREEN_CLOCK, &now, self.units, BLACK, WHITE);
            self.clock_stamp = Some(stamp);
        }

        if force || self.report.is_changed() {
            let report = self.report.value();
            draw_description(surface, SCREEN_DESCRIPTION, report, BLACK, WHITE);
            draw_current_icon(surface, SCREEN_ICON, report, BLACK);
            draw_current_temperature(surface, SCREEN_TEMPERATURE, report, BLACK, WHITE);
            draw_forecast(surface, SCREEN_FORECAST, report, self.mode, &now);
            self.report.set_changed(false);
        }

        self.poll.finish_render();
    }

    /// Toggle the forecast between highs and lows.
    fn change_mode(&mut self, devices: &mut Devices<'_>) {
        self.mode = self.mode.next();
        self.draw(devices.surface, true);
    }

    fn state(&self) -> WidgetState {
        self.poll.state()
    }

    fn busy_flag(&self) -> BusyFlag {
        self.poll.busy_flag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonId, ButtonState};
    use crate::clock::LocalTime;
    use crate::testing::{ManualClock, RecordingSurface, ScriptedHttp};
    use crate::weather::tests::TIMELINE;

    fn morning() -> LocalTime {
        LocalTime {
            hour: 8,
            minute: 30,
            day: 19,
            month: 10,
            weekday: 1,
        }
    }

    fn widget() -> (WeatherWidget, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(morning()));
        let w = WeatherWidget::new("key", "Austin", Units::Imperial, 600_000, clock.clone());
        (w, clock)
    }

    #[test]
    fn forced_update_retries_at_most_max_retries_times() {
        let (mut w, _clock) = widget();
        let mut http = ScriptedHttp::failing();
        w.update(&mut http, true);
        assert_eq!(http.requests().len(), MAX_RETRIES as usize + 1);
        assert!(!w.is_busy());
        assert!(!w.report().value().has_data());
    }

    #[test]
    fn retry_stops_at_first_success() {
        let (mut w, _clock) = widget();
        let mut http = ScriptedHttp::new().fail_once().respond(200, TIMELINE);
        w.update(&mut http, true);
        assert_eq!(http.requests().len(), 2);
        assert_eq!(w.report().value().current_temperature, 71.3);
        assert!(w.report().is_changed());
    }

    #[test]
    fn scheduled_update_does_not_retry() {
        let (mut w, _clock) = widget();
        let mut http = ScriptedHttp::failing();
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 1);
    }

    #[test]
    fn setup_defers_first_fetch() {
        let (mut w, clock) = widget();
        w.setup();
        let mut http = ScriptedHttp::new().always(200, TIMELINE);
        w.update(&mut http, false);
        assert!(http.requests().is_empty());
        clock.advance(1_000);
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 1);
    }

    #[test]
    fn draw_paints_changed_screens_once() {
        let (mut w, clock) = widget();
        let mut http = ScriptedHttp::new().respond(200, TIMELINE);
        w.update(&mut http, false);

        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);
        let mut screens = surface.selected();
        screens.dedup();
        assert_eq!(screens, [0, 1, 2, 3, 4]);

        surface.clear();
        w.draw(&mut surface, false);
        assert!(surface.ops.is_empty());

        clock.set_time(LocalTime {
            minute: 31,
            ..morning()
        });
        w.draw(&mut surface, false);
        assert_eq!(surface.selected(), [0]);
    }

    #[test]
    fn identical_refetch_repaints_the_data_screens() {
        let (mut w, clock) = widget();
        let mut http = ScriptedHttp::new().always(200, TIMELINE);
        w.update(&mut http, false);
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);
        assert!(!w.report().is_changed());

        clock.advance(600_000);
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 2);
        assert!(w.report().is_changed());

        surface.clear();
        w.draw(&mut surface, false);
        assert!(surface.selected().contains(&SCREEN_FORECAST));
    }

    #[test]
    fn sentinel_report_only_draws_the_clock() {
        let (mut w, _clock) = widget();
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, true);
        assert_eq!(surface.selected(), [0]);
    }

    #[test]
    fn mode_button_toggles_and_redraws() {
        let (mut w, _clock) = widget();
        let mut http = ScriptedHttp::new().respond(200, TIMELINE);
        w.update(&mut http, false);
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);
        surface.clear();

        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            w.button_pressed(&mut devices, ButtonId::Ok, ButtonState::Short);
        }
        assert_eq!(w.mode(), ForecastMode::Lows);
        assert!(surface.texts().contains(&"lows".to_string()));
        assert!(surface.selected().contains(&SCREEN_CLOCK));

        let mut devices = Devices {
            http: &mut http,
            surface: &mut surface,
        };
        w.change_mode(&mut devices);
        assert_eq!(w.mode(), ForecastMode::Highs);
        assert_eq!(http.requests().len(), 1);
    }
}
