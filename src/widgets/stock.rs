use std::rc::Rc;

use heapless::Vec as BoundedVec;
use log::{info, warn};

use crate::clock::Clock;
use crate::config::{Config, MAX_STOCKS};
use crate::error::ConfigError;
use crate::http_client::HttpGet;
use crate::layout::{BLACK, WHITE};
use crate::model::StockEntry;
use crate::stock::fetch_quote;
use crate::views::stock::draw_stock;
use crate::views::Surface;
use crate::widgets::{BusyFlag, Devices, PollState, Widget, WidgetState};

/// One stock per screen, screen index = position in the symbol list.
pub struct StockWidget {
    api_key: String,
    entries: BoundedVec<StockEntry, MAX_STOCKS>,
    poll: PollState,
    clock: Rc<dyn Clock>,
}

impl StockWidget {
    pub fn new(
        symbols: &[String],
        api_key: impl Into<String>,
        interval_ms: u64,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let mut entries = BoundedVec::new();
        for symbol in symbols {
            entries
                .push(StockEntry::new(symbol.as_str()))
                .map_err(|_| ConfigError::TooManySymbols {
                    max: MAX_STOCKS,
                    found: symbols.len(),
                })?;
        }
        Ok(Self {
            api_key: api_key.into(),
            entries,
            poll: PollState::new(interval_ms),
            clock,
        })
    }

    pub fn from_config(config: &Config, clock: Rc<dyn Clock>) -> Result<Self, ConfigError> {
        let symbols = config.ticker_symbols()?;
        Self::new(
            &symbols,
            config.stock_api_key.as_str(),
            config.stock_interval_ms,
            clock,
        )
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// Fetch every symbol once; a failed symbol keeps its last quote.
    fn refresh_all(&mut self, http: &mut dyn HttpGet) {
        for entry in self.entries.iter_mut() {
            match fetch_quote(http, &self.api_key, entry.symbol()) {
                Ok(quote) => {
                    entry.quote.apply(quote);
                }
                Err(e) => warn!("stock {}: {}", entry.symbol(), e),
            }
        }
    }
}

impl Widget for StockWidget {
    fn name(&self) -> &'static str {
        "stocks"
    }

    fn setup(&mut self) {
        if self.entries.is_empty() {
            warn!("No stock tickers available");
            return;
        }
        info!("stock widget: {} symbols", self.entries.len());
    }

    fn update(&mut self, http: &mut dyn HttpGet, force: bool) {
        if !self.poll.is_due(self.clock.now_ms(), force) {
            return;
        }
        self.poll.begin_fetch();
        self.refresh_all(http);
        self.poll.finish_fetch(self.clock.now_ms());
    }

    fn draw(&mut self, surface: &mut dyn Surface, force: bool) {
        self.poll.begin_render();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if force || entry.quote.is_changed() {
                draw_stock(surface, i, entry.symbol(), entry.quote.value(), BLACK, WHITE);
                entry.quote.set_changed(false);
            }
        }
        self.poll.finish_render();
    }

    /// Stocks have a single view; the mode button forces a refresh.
    fn change_mode(&mut self, devices: &mut Devices<'_>) {
        self.update(devices.http, true);
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
    use crate::testing::{ManualClock, Op, RecordingSurface, ScriptedHttp};

    const AAPL: &str = r#"{"symbol":"AAPL","name":"Apple Inc","currency":"USD",
        "close":"189.25","change":"2.10","percent_change":"1.12",
        "fifty_two_week":{"low":"164.08","high":"199.62"}}"#;
    const MSFT: &str = r#"{"symbol":"MSFT","name":"Microsoft Corp","currency":"USD",
        "close":"402.50","change":"-1.00","percent_change":"-0.25",
        "fifty_two_week":{"low":"309.45","high":"430.82"}}"#;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn widget(list: &[&str]) -> (StockWidget, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(LocalTime::default()));
        let w = StockWidget::new(&symbols(list), "key", 60_000, clock.clone()).unwrap();
        (w, clock)
    }

    #[test]
    fn too_many_symbols_is_rejected() {
        let clock: Rc<dyn Clock> = Rc::new(ManualClock::default());
        let err = StockWidget::new(
            &symbols(&["A", "B", "C", "D", "E", "F"]),
            "key",
            1,
            clock,
        )
        .err()
        .unwrap();
        assert_eq!(err, ConfigError::TooManySymbols { max: 5, found: 6 });
    }

    #[test]
    fn successful_fetch_updates_price_and_marks_changed() {
        let (mut w, _clock) = widget(&["AAPL"]);
        let mut http = ScriptedHttp::new().respond(200, AAPL);
        w.update(&mut http, false);
        let q = &w.entries()[0].quote;
        assert_eq!(q.value().current_price, 189.25);
        assert!(q.is_changed());
        assert!(!w.is_busy());
        assert_eq!(w.state(), WidgetState::Idle);
    }

    #[test]
    fn every_symbol_fetched_once_even_after_a_failure() {
        let (mut w, _clock) = widget(&["AAPL", "BAD", "MSFT"]);
        let mut http = ScriptedHttp::new()
            .respond(200, AAPL)
            .fail_once()
            .respond(200, MSFT);
        w.update(&mut http, true);
        assert_eq!(http.requests().len(), 3);
        assert!(http.requests()[1].ends_with("symbol=BAD"));
        assert_eq!(w.entries()[0].quote.value().current_price, 189.25);
        assert!(!w.entries()[1].quote.value().has_data());
        assert_eq!(w.entries()[2].quote.value().current_price, 402.5);
    }

    #[test]
    fn identical_refetch_still_marks_changed() {
        let (mut w, clock) = widget(&["AAPL"]);
        let mut http = ScriptedHttp::new().always(200, AAPL);
        w.update(&mut http, false);
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);
        assert!(!w.entries()[0].quote.is_changed());

        clock.advance(60_000);
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 2);
        let q = &w.entries()[0].quote;
        assert_eq!(q.value().current_price, 189.25);
        assert!(q.is_changed());
    }

    #[test]
    fn zero_close_leaves_model_untouched() {
        let (mut w, clock) = widget(&["AAPL"]);
        let mut http = ScriptedHttp::new().respond(200, AAPL);
        w.update(&mut http, false);
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);

        clock.advance(60_000);
        let mut http = ScriptedHttp::new().respond(200, r#"{"symbol":"AAPL","close":"0"}"#);
        w.update(&mut http, false);
        let q = &w.entries()[0].quote;
        assert_eq!(q.value().current_price, 189.25);
        assert!(!q.is_changed());
    }

    #[test]
    fn update_respects_interval() {
        let (mut w, clock) = widget(&["AAPL"]);
        let mut http = ScriptedHttp::new().always(200, AAPL);
        w.update(&mut http, false);
        clock.advance(59_999);
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 1);
        clock.advance(1);
        w.update(&mut http, false);
        assert_eq!(http.requests().len(), 2);
    }

    #[test]
    fn draw_without_changes_emits_nothing() {
        let (mut w, _clock) = widget(&["AAPL", "MSFT"]);
        let mut http = ScriptedHttp::new().respond(200, AAPL).respond(200, MSFT);
        w.update(&mut http, false);

        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);
        assert_eq!(surface.selected(), [0, 1]);

        surface.clear();
        w.draw(&mut surface, false);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn forced_draw_repaints_every_fetched_symbol() {
        let (mut w, _clock) = widget(&["AAPL", "MSFT"]);
        let mut http = ScriptedHttp::new().respond(200, AAPL).respond(200, MSFT);
        w.update(&mut http, false);
        let mut surface = RecordingSurface::new();
        w.draw(&mut surface, false);

        surface.clear();
        w.draw(&mut surface, true);
        assert_eq!(surface.selected(), [0, 1]);
        assert!(surface.ops.contains(&Op::FillScreen(BLACK)));
    }

    #[test]
    fn ok_short_press_forces_refresh() {
        let (mut w, _clock) = widget(&["AAPL"]);
        let mut http = ScriptedHttp::new().always(200, AAPL);
        let mut surface = RecordingSurface::new();
        w.update(&mut http, false);
        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            w.button_pressed(&mut devices, ButtonId::Ok, ButtonState::Short);
            w.button_pressed(&mut devices, ButtonId::Ok, ButtonState::Long);
            w.button_pressed(&mut devices, ButtonId::Left, ButtonState::Short);
        }
        assert_eq!(http.requests().len(), 2);
    }
}
