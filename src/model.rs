use crate::conditions::Condition;

// ── Change tracking ─────────────────────────────────────────────────

/// A cached record plus the "changed since last render" bit.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    value: T,
    changed: bool,
}

impl<T: PartialEq> Tracked<T> {
    /// Replace the whole record and mark the model changed, even when the
    /// new record equals the old one. Returns whether the contents differed.
    pub fn apply(&mut self, value: T) -> bool {
        let differs = self.value != value;
        self.value = value;
        self.changed = true;
        differs
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }
}

// ── Stocks ──────────────────────────────────────────────────────────

/// Fields of one successful quote fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockQuote {
    pub current_price: f32,
    /// Fraction, not percent: 0.0125 is +1.25%.
    pub percent_change: f32,
    pub price_change: f32,
    pub fifty_two_week_high: f32,
    pub fifty_two_week_low: f32,
    pub company_name: String,
    pub ticker_display: String,
    pub currency_symbol: String,
}

impl StockQuote {
    /// A zero price means nothing was ever fetched.
    pub fn has_data(&self) -> bool {
        self.current_price != 0.0
    }

    pub fn is_falling(&self) -> bool {
        self.percent_change < 0.0
    }
}

#[derive(Debug, Clone)]
pub struct StockEntry {
    symbol: String,
    pub quote: Tracked<StockQuote>,
}

impl StockEntry {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            quote: Tracked::default(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Display symbol for an ISO 4217 currency code.
pub fn currency_symbol(code: &str) -> String {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" | "HKD" | "SGD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" | "GBp" => "£".to_string(),
        "JPY" | "CNY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        "" => String::new(),
        other => format!("{} ", other),
    }
}

// ── Weather ─────────────────────────────────────────────────────────

pub const FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayForecast {
    pub condition: Condition,
    pub high: f32,
    pub low: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub city_name: String,
    pub current_temperature: f32,
    pub condition_text: String,
    pub current_condition: Condition,
    pub today_high: f32,
    pub today_low: f32,
    pub days: [DayForecast; FORECAST_DAYS],
}

impl WeatherReport {
    /// A temperature of exactly zero is the "never fetched" sentinel.
    pub fn has_data(&self) -> bool {
        self.current_temperature != 0.0
    }

    /// City part of the resolved address ("Austin, TX, United States" → "Austin").
    pub fn short_city(&self) -> &str {
        match self.city_name.find(',') {
            Some(i) => &self.city_name[..i],
            None => &self.city_name,
        }
    }
}
