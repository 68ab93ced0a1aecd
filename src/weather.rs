use log::info;
use serde::Deserialize;
use url::Url;

use crate::conditions::Condition;
use crate::config::Units;
use crate::error::FetchError;
use crate::http_client::{redact, HttpGet};
use crate::json::{lenient_f32, lenient_string};
use crate::model::{DayForecast, WeatherReport, FORECAST_DAYS};

const TIMELINE_ENDPOINT: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

// ── Visual Crossing JSON structures ─────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcTimeline {
    #[serde(default, deserialize_with = "lenient_string")]
    resolved_address: String,
    current_conditions: Option<VcConditions>,
    #[serde(default)]
    days: Vec<VcDay>,
}

#[derive(Deserialize)]
struct VcConditions {
    #[serde(default, deserialize_with = "lenient_f32")]
    temp: f32,
    #[serde(default, deserialize_with = "lenient_string")]
    icon: String,
}

#[derive(Deserialize)]
struct VcDay {
    #[serde(default, deserialize_with = "lenient_f32")]
    tempmax: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    tempmin: f32,
    #[serde(default, deserialize_with = "lenient_string")]
    icon: String,
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
}

/// Today plus the three days after it.
const DAYS_REQUIRED: usize = FORECAST_DAYS + 1;

pub fn timeline_url(api_key: &str, location: &str, units: Units) -> Result<Url, FetchError> {
    let mut url = Url::parse(TIMELINE_ENDPOINT)?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidData(format!("{} takes no path", TIMELINE_ENDPOINT)))?
        .push(location)
        .push("next3days");
    url.query_pairs_mut()
        .append_pair("key", api_key)
        .append_pair("unitGroup", units.unit_group())
        .append_pair("include", "days,current")
        .append_pair("iconSet", "icons1");
    Ok(url)
}

// ── Parsing ─────────────────────────────────────────────────────────

pub fn parse_timeline(json: &str) -> Result<WeatherReport, FetchError> {
    let root: VcTimeline = serde_json::from_str(json)?;

    let current = root
        .current_conditions
        .ok_or_else(|| FetchError::InvalidData("no currentConditions".to_string()))?;
    if root.days.len() < DAYS_REQUIRED {
        return Err(FetchError::InvalidData(format!(
            "{} forecast days, need {}",
            root.days.len(),
            DAYS_REQUIRED
        )));
    }

    let mut days = root.days.into_iter();
    let Some(today) = days.next() else {
        return Err(FetchError::InvalidData("no forecast days".to_string()));
    };
    let mut next: [DayForecast; FORECAST_DAYS] = Default::default();
    for (slot, day) in next.iter_mut().zip(days) {
        *slot = DayForecast {
            condition: Condition::parse(&day.icon),
            high: day.tempmax,
            low: day.tempmin,
        };
    }

    let report = WeatherReport {
        city_name: root.resolved_address,
        current_temperature: current.temp,
        condition_text: today.description,
        current_condition: Condition::parse(&current.icon),
        today_high: today.tempmax,
        today_low: today.tempmin,
        days: next,
    };

    info!(
        "weather: {} {:.1}° icon={} high={:.0} low={:.0}",
        report.short_city(),
        report.current_temperature,
        report.current_condition.code(),
        report.today_high,
        report.today_low
    );
    Ok(report)
}

/// One GET + parse of the timeline for `location`.
pub fn fetch_weather(
    http: &mut dyn HttpGet,
    api_key: &str,
    location: &str,
    units: Units,
) -> Result<WeatherReport, FetchError> {
    let url = timeline_url(api_key, location, units)?;
    let url = url.as_str();
    let response = http
        .get(url)
        .map_err(|e| FetchError::Transport(format!("{}: {:#}", redact(url), e)))?;
    if response.status <= 0 {
        return Err(FetchError::Transport(format!(
            "{}: status {}",
            redact(url),
            response.status
        )));
    }
    parse_timeline(&response.body)
}
