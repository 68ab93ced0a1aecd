use log::{info, warn};

use crate::error::ConfigError;

/// One stock per panel.
pub const MAX_STOCKS: usize = 5;

const DEFAULT_WIFI_SSID: &str = "YOUR_WIFI_SSID";
const DEFAULT_WIFI_PASS: &str = "";
const DEFAULT_STOCK_API_KEY: &str = "YOUR_TWELVEDATA_KEY";
const DEFAULT_WEATHER_API_KEY: &str = "YOUR_VISUALCROSSING_KEY";
const DEFAULT_WEATHER_LOCATION: &str = "New York, NY";
const DEFAULT_TICKERS: &str = "AAPL,MSFT,GOOG";
const DEFAULT_UNITS: &str = "imperial";
const DEFAULT_TIMEZONE: &str = "EST5EDT,M3.2.0,M11.1.0";

pub const DEFAULT_STOCK_INTERVAL_MS: u64 = 15 * 60 * 1000;
pub const DEFAULT_WEATHER_INTERVAL_MS: u64 = 10 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "us" | "f" | "fahrenheit" => Ok(Units::Imperial),
            other => Err(ConfigError::UnknownUnits(other.to_string())),
        }
    }

    /// `unitGroup` query value for the weather API.
    pub fn unit_group(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "us",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub wifi_ssid: String,
    pub wifi_pass: String,
    pub stock_api_key: String,
    pub weather_api_key: String,
    pub weather_location: String,
    /// Comma-separated ticker symbols, at most `MAX_STOCKS`.
    pub tickers: String,
    pub units: Units,
    /// POSIX TZ string for the local clock.
    pub timezone: String,
    pub stock_interval_ms: u64,
    pub weather_interval_ms: u64,
}

impl Default for Config {
    /// Compile-time defaults, overridden by `secrets.local.rs` via build.rs.
    fn default() -> Self {
        let units_text = option_env!("LOCAL_WEATHER_UNITS").unwrap_or(DEFAULT_UNITS);
        let units = Units::parse(units_text).unwrap_or_else(|e| {
            warn!("{}; using imperial", e);
            Units::Imperial
        });
        Config {
            wifi_ssid: option_env!("LOCAL_WIFI_SSID")
                .unwrap_or(DEFAULT_WIFI_SSID)
                .to_string(),
            wifi_pass: option_env!("LOCAL_WIFI_PASS")
                .unwrap_or(DEFAULT_WIFI_PASS)
                .to_string(),
            stock_api_key: option_env!("LOCAL_TWELVEDATA_API_KEY")
                .unwrap_or(DEFAULT_STOCK_API_KEY)
                .to_string(),
            weather_api_key: option_env!("LOCAL_VISUALCROSSING_API_KEY")
                .unwrap_or(DEFAULT_WEATHER_API_KEY)
                .to_string(),
            weather_location: option_env!("LOCAL_WEATHER_LOCATION")
                .unwrap_or(DEFAULT_WEATHER_LOCATION)
                .to_string(),
            tickers: option_env!("LOCAL_STOCK_TICKER_LIST")
                .unwrap_or(DEFAULT_TICKERS)
                .to_string(),
            units,
            timezone: option_env!("LOCAL_TIMEZONE")
                .unwrap_or(DEFAULT_TIMEZONE)
                .to_string(),
            stock_interval_ms: DEFAULT_STOCK_INTERVAL_MS,
            weather_interval_ms: DEFAULT_WEATHER_INTERVAL_MS,
        }
    }
}

impl Config {
    pub fn ticker_symbols(&self) -> Result<Vec<String>, ConfigError> {
        parse_ticker_list(&self.tickers, MAX_STOCKS)
    }

    pub fn log_summary(&self) {
        info!("config wifi_ssid = {:?}", self.wifi_ssid);
        info!("config wifi_pass = <{} chars>", self.wifi_pass.len());
        info!("config stock_api_key = <{} chars>", self.stock_api_key.len());
        info!("config weather_api_key = <{} chars>", self.weather_api_key.len());
        info!("config weather_location = {:?}", self.weather_location);
        info!("config tickers = {:?}", self.tickers);
        info!("config units = {}", self.units.as_str());
        info!("config timezone = {:?}", self.timezone);
    }
}

/// Split a comma-separated symbol list, trimming blanks. More than `max`
/// symbols is an error rather than a silent truncation.
pub fn parse_ticker_list(list: &str, max: usize) -> Result<Vec<String>, ConfigError> {
    let symbols: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if symbols.len() > max {
        return Err(ConfigError::TooManySymbols {
            max,
            found: symbols.len(),
        });
    }
    Ok(symbols)
}

// ── NVS overrides (device only) ─────────────────────────────────────

#[cfg(feature = "espidf")]
pub use nvs::NS;

#[cfg(feature = "espidf")]
mod nvs {
    use esp_idf_svc::nvs::{EspNvs, NvsDefault};
    use log::{info, warn};

    use super::{Config, Units};

    pub const NS: &str = "infodeck";

    const KEY_WIFI_SSID: &str = "wifi_ssid";
    const KEY_WIFI_PASS: &str = "wifi_pass";
    const KEY_STOCK_API_KEY: &str = "td_api_key";
    const KEY_WEATHER_API_KEY: &str = "vc_api_key";
    const KEY_WEATHER_LOCATION: &str = "wx_location";
    const KEY_TICKERS: &str = "tickers";
    const KEY_UNITS: &str = "units";
    const KEY_TIMEZONE: &str = "timezone";

    /// Read a string from NVS, returning None if the key is absent or on error.
    fn nvs_get_str(nvs: &EspNvs<NvsDefault>, key: &str) -> Option<String> {
        let len = match nvs.str_len(key) {
            Ok(Some(len)) => len,
            _ => return None,
        };

        let mut buf = vec![0u8; len];
        match nvs.get_str(key, &mut buf) {
            Ok(Some(val)) => {
                let s = val.trim_end_matches('\0').to_string();
                if s.is_empty() { None } else { Some(s) }
            }
            _ => None,
        }
    }

    impl Config {
        /// Compile-time defaults with any keys present in NVS applied on top.
        pub fn load(nvs: &EspNvs<NvsDefault>) -> Config {
            let mut cfg = Config::default();
            let overrides: [(&str, &mut String); 7] = [
                (KEY_WIFI_SSID, &mut cfg.wifi_ssid),
                (KEY_WIFI_PASS, &mut cfg.wifi_pass),
                (KEY_STOCK_API_KEY, &mut cfg.stock_api_key),
                (KEY_WEATHER_API_KEY, &mut cfg.weather_api_key),
                (KEY_WEATHER_LOCATION, &mut cfg.weather_location),
                (KEY_TICKERS, &mut cfg.tickers),
                (KEY_TIMEZONE, &mut cfg.timezone),
            ];
            for (key, field) in overrides {
                if let Some(v) = nvs_get_str(nvs, key) {
                    info!("NVS override {}", key);
                    *field = v;
                }
            }
            if let Some(v) = nvs_get_str(nvs, KEY_UNITS) {
                match Units::parse(&v) {
                    Ok(units) => cfg.units = units,
                    Err(e) => warn!("NVS {}: {}", KEY_UNITS, e),
                }
            }
            cfg
        }
    }
}
