use log::{info, warn};
use serde::Deserialize;
use url::Url;

use crate::error::FetchError;
use crate::http_client::{redact, HttpGet};
use crate::json::{lenient_f32, lenient_string};
use crate::model::{currency_symbol, StockQuote};

const QUOTE_ENDPOINT: &str = "https://api.twelvedata.com/quote";

// ── Twelve Data JSON structures ─────────────────────────────────────

#[derive(Deserialize)]
struct TdQuote {
    #[serde(default, deserialize_with = "lenient_f32")]
    close: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    percent_change: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    change: f32,
    #[serde(default)]
    fifty_two_week: Option<TdRange>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    symbol: String,
    #[serde(default, deserialize_with = "lenient_string")]
    currency: String,
}

#[derive(Deserialize, Default)]
struct TdRange {
    #[serde(default, deserialize_with = "lenient_f32")]
    high: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    low: f32,
}

pub fn quote_url(api_key: &str, symbol: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(QUOTE_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("apikey", api_key)
        .append_pair("symbol", symbol);
    Ok(url)
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a quote body. A non-positive `close` is an error so a bad
/// response never overwrites the last good quote.
pub fn parse_quote(json: &str) -> Result<StockQuote, FetchError> {
    let root: TdQuote = serde_json::from_str(json)?;

    if root.close <= 0.0 {
        return Err(FetchError::InvalidData(format!(
            "close price {} for {:?}",
            root.close, root.symbol
        )));
    }

    let range = root.fifty_two_week.unwrap_or_default();
    Ok(StockQuote {
        current_price: root.close,
        percent_change: root.percent_change / 100.0,
        price_change: root.change,
        fifty_two_week_high: range.high,
        fifty_two_week_low: range.low,
        company_name: root.name,
        ticker_display: root.symbol,
        currency_symbol: currency_symbol(&root.currency),
    })
}

/// One GET + parse for `symbol`.
pub fn fetch_quote(
    http: &mut dyn HttpGet,
    api_key: &str,
    symbol: &str,
) -> Result<StockQuote, FetchError> {
    let url = quote_url(api_key, symbol)?;
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

    match parse_quote(&response.body) {
        Ok(quote) => {
            info!(
                "quote: {} {}{:.2} ({:+.2}%)",
                symbol,
                quote.currency_symbol,
                quote.current_price,
                quote.percent_change * 100.0
            );
            Ok(quote)
        }
        Err(FetchError::InvalidData(why)) => {
            warn!("skipping invalid data for: {}", symbol);
            Err(FetchError::InvalidData(why))
        }
        Err(e) => Err(e),
    }
}
