/// Icon assets the panels can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WeatherIcon {
    MoonCloud = 0,
    SunClouds = 1,
    Sun = 2,
    Moon = 3,
    Snow = 4,
    Rain = 5,
    Clouds = 6,
}

impl WeatherIcon {
    /// Short text label for fallback display.
    pub fn label(self) -> &'static str {
        match self {
            Self::MoonCloud => "Cloudy Night",
            Self::SunClouds => "Partly Cloudy",
            Self::Sun => "Sunny",
            Self::Moon => "Clear Night",
            Self::Snow => "Snow",
            Self::Rain => "Rain",
            Self::Clouds => "Cloudy",
        }
    }
}

/// Condition codes of the Visual Crossing `icons1` set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Condition {
    PartlyCloudyNight,
    PartlyCloudyDay,
    ClearDay,
    ClearNight,
    Snow,
    Rain,
    Fog,
    Wind,
    Cloudy,
    /// Anything else; keeps the raw code for logging.
    Unknown(String),
    /// No code at all (nothing fetched yet).
    #[default]
    Missing,
}

impl Condition {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "partly-cloudy-night" => Self::PartlyCloudyNight,
            "partly-cloudy-day" => Self::PartlyCloudyDay,
            "clear-day" => Self::ClearDay,
            "clear-night" => Self::ClearNight,
            "snow" => Self::Snow,
            "rain" => Self::Rain,
            "fog" => Self::Fog,
            "wind" => Self::Wind,
            "cloudy" => Self::Cloudy,
            "" => Self::Missing,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn icon(&self) -> Option<WeatherIcon> {
        match self {
            Self::PartlyCloudyNight => Some(WeatherIcon::MoonCloud),
            Self::PartlyCloudyDay => Some(WeatherIcon::SunClouds),
            Self::ClearDay => Some(WeatherIcon::Sun),
            Self::ClearNight => Some(WeatherIcon::Moon),
            Self::Snow => Some(WeatherIcon::Snow),
            Self::Rain => Some(WeatherIcon::Rain),
            Self::Fog | Self::Wind | Self::Cloudy => Some(WeatherIcon::Clouds),
            Self::Unknown(_) | Self::Missing => None,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::PartlyCloudyNight => "partly-cloudy-night",
            Self::PartlyCloudyDay => "partly-cloudy-day",
            Self::ClearDay => "clear-day",
            Self::ClearNight => "clear-night",
            Self::Snow => "snow",
            Self::Rain => "rain",
            Self::Fog => "fog",
            Self::Wind => "wind",
            Self::Cloudy => "cloudy",
            Self::Unknown(code) => code,
            Self::Missing => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip_through_parse() {
        for c in [
            Condition::PartlyCloudyNight,
            Condition::PartlyCloudyDay,
            Condition::ClearDay,
            Condition::ClearNight,
            Condition::Snow,
            Condition::Rain,
            Condition::Fog,
            Condition::Wind,
            Condition::Cloudy,
        ] {
            assert_eq!(Condition::parse(c.code()), c);
            assert!(c.icon().is_some());
        }
    }

    #[test]
    fn fog_wind_and_cloudy_share_an_icon() {
        assert_eq!(Condition::Fog.icon(), Some(WeatherIcon::Clouds));
        assert_eq!(Condition::Wind.icon(), Some(WeatherIcon::Clouds));
        assert_eq!(Condition::Cloudy.icon(), Some(WeatherIcon::Clouds));
    }

    #[test]
    fn unknown_codes_have_no_icon() {
        let c = Condition::parse("thunder-showers-day");
        assert_eq!(c, Condition::Unknown("thunder-showers-day".into()));
        assert_eq!(c.icon(), None);
        assert_eq!(Condition::parse(""), Condition::Missing);
    }
}
