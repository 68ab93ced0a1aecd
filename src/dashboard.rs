//! Widget rotation and per-tick driving.

use log::info;

use crate::button::{ButtonId, ButtonState};
use crate::layout::{BLACK, SCREEN_COUNT};
use crate::views::Surface;
use crate::widgets::{BusyFlag, Devices, Widget};

/// Owns every widget; one is shown at a time.
pub struct Dashboard {
    widgets: Vec<Box<dyn Widget>>,
    active: usize,
    force_draw: bool,
    /// Blank every screen before the next draw so a widget that leaves
    /// screens untouched never shows the previous widget's content.
    clear_screens: bool,
}

impl Dashboard {
    pub fn new(widgets: Vec<Box<dyn Widget>>) -> Self {
        Self {
            widgets,
            active: 0,
            force_draw: true,
            clear_screens: true,
        }
    }

    pub fn setup(&mut self) {
        for widget in self.widgets.iter_mut() {
            widget.setup();
        }
        if let Some(w) = self.widgets.get(self.active) {
            info!("dashboard: {} widgets, showing {}", self.widgets.len(), w.name());
        }
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.widgets.get(self.active).map(|w| w.name())
    }

    /// One loop iteration: refresh the active widget if due, then draw it.
    pub fn tick(&mut self, devices: &mut Devices<'_>) {
        let force = std::mem::take(&mut self.force_draw);
        if std::mem::take(&mut self.clear_screens) {
            clear_all(devices.surface);
        }
        if let Some(widget) = self.widgets.get_mut(self.active) {
            widget.update(devices.http, false);
            widget.draw(devices.surface, force);
        }
    }

    /// Left/Right short presses rotate widgets; everything else goes to the
    /// active widget.
    pub fn handle_button(&mut self, devices: &mut Devices<'_>, button: ButtonId, state: ButtonState) {
        let count = self.widgets.len();
        if count == 0 {
            return;
        }
        match (button, state) {
            (ButtonId::Left, ButtonState::Short) => self.show((self.active + count - 1) % count),
            (ButtonId::Right, ButtonState::Short) => self.show((self.active + 1) % count),
            _ => self.widgets[self.active].button_pressed(devices, button, state),
        }
    }

    fn show(&mut self, index: usize) {
        if index != self.active {
            self.active = index;
            self.clear_screens = true;
            info!("dashboard: showing {}", self.widgets[index].name());
        }
        self.force_draw = true;
    }

    pub fn is_busy(&self) -> bool {
        self.widgets.iter().any(|w| w.is_busy())
    }

    /// Busy handles of every widget, for a watchdog thread.
    pub fn busy_flags(&self) -> Vec<BusyFlag> {
        self.widgets.iter().map(|w| w.busy_flag()).collect()
    }
}

fn clear_all(surface: &mut dyn Surface) {
    for index in 0..SCREEN_COUNT {
        surface.select_screen(index);
        surface.fill_screen(BLACK);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::clock::{Clock, LocalTime};
    use crate::config::Units;
    use crate::testing::{ManualClock, Op, RecordingSurface, ScriptedHttp};
    use crate::widgets::stock::StockWidget;
    use crate::widgets::weather::WeatherWidget;

    fn dashboard() -> Dashboard {
        let clock: Rc<dyn Clock> = Rc::new(ManualClock::new(LocalTime {
            hour: 12,
            ..Default::default()
        }));
        let stocks = StockWidget::new(&["AAPL".to_string()], "k", 60_000, clock.clone()).unwrap();
        let weather = WeatherWidget::new("k", "Austin", Units::Metric, 60_000, clock);
        Dashboard::new(vec![Box::new(weather), Box::new(stocks)])
    }

    #[test]
    fn rotation_wraps_both_ways_and_forces_redraw() {
        let mut d = dashboard();
        let mut http = ScriptedHttp::failing();
        let mut surface = RecordingSurface::new();
        let mut devices = Devices {
            http: &mut http,
            surface: &mut surface,
        };

        d.tick(&mut devices);
        assert_eq!(d.active_name(), Some("weather"));

        d.handle_button(&mut devices, ButtonId::Left, ButtonState::Short);
        assert_eq!(d.active_name(), Some("stocks"));
        d.handle_button(&mut devices, ButtonId::Right, ButtonState::Short);
        assert_eq!(d.active_name(), Some("weather"));
        assert!(d.force_draw);

        d.tick(&mut devices);
        assert!(!d.force_draw);
    }

    #[test]
    fn switching_widgets_blanks_every_screen() {
        let mut d = dashboard();
        let mut http = ScriptedHttp::failing();
        let mut surface = RecordingSurface::new();
        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            d.tick(&mut devices);
        }
        surface.clear();

        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            d.handle_button(&mut devices, ButtonId::Right, ButtonState::Short);
            d.tick(&mut devices);
        }
        assert_eq!(d.active_name(), Some("stocks"));
        assert_eq!(surface.selected(), [0, 1, 2, 3, 4]);
        let fills = surface
            .ops
            .iter()
            .filter(|op| **op == Op::FillScreen(BLACK))
            .count();
        assert_eq!(fills, SCREEN_COUNT);

        surface.clear();
        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            d.tick(&mut devices);
        }
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn first_tick_blanks_then_forces_the_clock_screen() {
        let mut d = dashboard();
        let mut http = ScriptedHttp::failing();
        let mut surface = RecordingSurface::new();
        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            d.tick(&mut devices);
        }
        assert_eq!(surface.selected(), [0, 1, 2, 3, 4, 0]);
        assert!(!d.is_busy());
        assert_eq!(d.busy_flags().len(), 2);
    }

    #[test]
    fn long_press_reaches_active_widget_only() {
        let mut d = dashboard();
        let mut http = ScriptedHttp::failing();
        let mut surface = RecordingSurface::new();
        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut surface,
            };
            d.handle_button(&mut devices, ButtonId::Right, ButtonState::Long);
        }
        assert_eq!(d.active_name(), Some("weather"));
        assert!(surface.ops.is_empty());
    }
}
