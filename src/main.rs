use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs};
use log::info;

use infodeck::button::{ButtonId, ButtonTracker};
use infodeck::clock::{Clock, SystemClock};
use infodeck::config::{self, Config};
use infodeck::dashboard::Dashboard;
use infodeck::framebuffer::ScreenBank;
use infodeck::http_client::EspHttpClient;
use infodeck::layout::{BLACK, CENTRE, SCREEN_COUNT, WHITE};
use infodeck::panel::{self, PanelBank};
use infodeck::supervisor::{Heartbeat, Supervisor, Verdict};
use infodeck::time_sync;
use infodeck::views::{Font, Surface, TextStyle};
use infodeck::widgets::stock::StockWidget;
use infodeck::widgets::weather::WeatherWidget;
use infodeck::widgets::{Devices, Widget};
use infodeck::wifi;

// ── Buttons (active low, internal pull-up) ──────────────────────────
const PIN_BUTTON_LEFT: i32 = 26;
const PIN_BUTTON_OK: i32 = 27;
const PIN_BUTTON_RIGHT: i32 = 14;

// ── Timing ──────────────────────────────────────────────────────────
const TICK_MS: u64 = 100;
const WIFI_RETRY_INTERVAL_MS: u64 = 300_000;
const SUPERVISOR_POLL_SECS: u64 = 5;

fn button_pin(id: ButtonId) -> i32 {
    match id {
        ButtonId::Left => PIN_BUTTON_LEFT,
        ButtonId::Ok => PIN_BUTTON_OK,
        ButtonId::Right => PIN_BUTTON_RIGHT,
    }
}

fn init_buttons() {
    let mask = ButtonId::ALL
        .iter()
        .fold(0u64, |m, &id| m | 1u64 << (button_pin(id) as u64));
    unsafe {
        let io_conf = esp_idf_sys::gpio_config_t {
            pin_bit_mask: mask,
            mode: esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: esp_idf_sys::gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: esp_idf_sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: esp_idf_sys::gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        esp_idf_sys::gpio_config(&io_conf);
    }
}

fn button_is_low(id: ButtonId) -> bool {
    unsafe { esp_idf_sys::gpio_get_level(button_pin(id)) == 0 }
}

fn draw_splash(screens: &mut ScreenBank, status: &str) {
    for i in 0..SCREEN_COUNT {
        screens.select_screen(i);
        screens.fill_screen(BLACK);
    }
    screens.select_screen(0);
    let pos = embedded_graphics::prelude::Point::new(CENTRE, CENTRE);
    screens.draw_text("infodeck", pos, TextStyle::new(Font::Large, WHITE));
    screens.select_screen(1);
    screens.draw_text(status, pos, TextStyle::new(Font::Medium, WHITE));
}

/// Restart the chip if the main loop goes silent for longer than a fetch
/// could explain.
fn supervise(supervisor: Supervisor, clock: SystemClock) {
    loop {
        std::thread::sleep(Duration::from_secs(SUPERVISOR_POLL_SECS));
        match supervisor.check(clock.now_ms()) {
            Verdict::Healthy => {}
            Verdict::Fetching => info!("supervisor: fetch still in progress"),
            Verdict::Stalled => {
                log::error!("supervisor: main loop stalled, restarting");
                unsafe { esp_idf_sys::esp_restart() };
            }
        }
    }
}

fn main() -> Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("BOOT infodeck v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Panels + splash ──
    let mut panels = PanelBank::init()?;
    let mut screens = ScreenBank::new();
    draw_splash(&mut screens, "connecting...");
    panels.flush(&mut screens);
    panel::enable_backlight();

    // ── 2. Peripherals + NVS config ──
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let nvs = EspNvs::new(nvs_partition, config::NS, true)?;
    let cfg = Config::load(&nvs);
    cfg.log_summary();

    // ── 3. WiFi + time ──
    let mut link = wifi::connect_wifi(
        peripherals.modem,
        sysloop.clone(),
        &cfg.wifi_ssid,
        &cfg.wifi_pass,
    )?;
    let _sntp = time_sync::sync_time(&cfg.timezone)?;
    if let Some(ip) = &link.ip_address {
        info!("online at {}", ip);
    }

    // ── 4. Widgets ──
    let system_clock = SystemClock::new();
    let clock: Rc<dyn Clock> = Rc::new(system_clock);
    let mut widgets: Vec<Box<dyn Widget>> =
        vec![Box::new(WeatherWidget::from_config(&cfg, clock.clone()))];
    match StockWidget::from_config(&cfg, clock.clone()) {
        Ok(stocks) => widgets.push(Box::new(stocks)),
        Err(e) => log::warn!("stock widget disabled: {}", e),
    }
    let mut dashboard = Dashboard::new(widgets);
    dashboard.setup();

    let heartbeat = Heartbeat::default();
    let supervisor = Supervisor::new(heartbeat.clone(), dashboard.busy_flags());
    std::thread::Builder::new()
        .name("supervisor".into())
        .stack_size(4096)
        .spawn(move || supervise(supervisor, system_clock))?;

    init_buttons();
    let mut buttons = [ButtonTracker::new(), ButtonTracker::new(), ButtonTracker::new()];
    let mut http = EspHttpClient;
    let mut last_wifi_retry_ms = clock.now_ms();

    loop {
        let t = clock.now_ms();
        heartbeat.beat(t);

        for (tracker, id) in buttons.iter_mut().zip(ButtonId::ALL) {
            if let Some(state) = tracker.sample(button_is_low(id), t) {
                info!("button {:?} {:?}", id, state);
                let mut devices = Devices {
                    http: &mut http,
                    surface: &mut screens,
                };
                dashboard.handle_button(&mut devices, id, state);
            }
        }

        // Periodic reconnect when the station dropped
        if t.saturating_sub(last_wifi_retry_ms) >= WIFI_RETRY_INTERVAL_MS {
            last_wifi_retry_ms = t;
            if !link.wifi.is_connected().unwrap_or(false) {
                match wifi::reconnect_existing(&mut link.wifi, sysloop.clone()) {
                    Ok(Some(ip)) => link.ip_address = Some(ip),
                    Ok(None) => log::warn!("WiFi reconnect failed"),
                    Err(e) => log::warn!("WiFi reconnect error: {}", e),
                }
            }
        }

        {
            let mut devices = Devices {
                http: &mut http,
                surface: &mut screens,
            };
            dashboard.tick(&mut devices);
        }
        panels.flush(&mut screens);

        std::thread::sleep(Duration::from_millis(TICK_MS));
    }
}
