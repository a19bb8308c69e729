//! TSETMC closing-price provider.
//!
//! Fetches the full daily closing-price history of one instrument from the
//! exchange's public CDN API. One request per instrument, no retries: a
//! failed request surfaces as a [`FetchError`] and the caller's boundary
//! turns it into zero records.
//!
//! The API is loosely typed. Numeric fields arrive as JSON numbers, numeric
//! strings or nulls, so every field is decoded leniently and anything that
//! does not read as a number becomes `None`.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::catalog::CatalogEntry;
use super::provider::{FetchError, RecordProvider};
use crate::domain::{DateKey, InstrumentId, RawRecord};

pub const DEFAULT_BASE_URL: &str = "https://cdn.tsetmc.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0";

/// `GetClosingPriceDailyList` response body.
#[derive(Debug, Deserialize)]
struct ClosingPriceResponse {
    #[serde(rename = "closingPriceDaily", default)]
    closing_price_daily: Option<Vec<ClosingPriceRow>>,
}

#[derive(Debug, Deserialize)]
struct ClosingPriceRow {
    #[serde(rename = "insCode", default)]
    ins_code: Option<Value>,
    #[serde(rename = "dEven", default)]
    d_even: Option<Value>,
    #[serde(rename = "priceMin", default)]
    price_min: Option<Value>,
    #[serde(rename = "priceMax", default)]
    price_max: Option<Value>,
    #[serde(rename = "priceYesterday", default)]
    price_yesterday: Option<Value>,
    #[serde(rename = "priceFirst", default)]
    price_first: Option<Value>,
    #[serde(rename = "pClosing", default)]
    p_closing: Option<Value>,
    #[serde(rename = "pDrCotVal", default)]
    p_dr_cot_val: Option<Value>,
    #[serde(rename = "zTotTran", default)]
    z_tot_tran: Option<Value>,
    #[serde(rename = "qTotTran5J", default)]
    q_tot_tran_5j: Option<Value>,
    #[serde(rename = "qTotCap", default)]
    q_tot_cap: Option<Value>,
}

/// Connection settings for [`TsetmcProvider`].
#[derive(Debug, Clone)]
pub struct TsetmcSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TsetmcSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// TSETMC daily closing-price provider.
pub struct TsetmcProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TsetmcProvider {
    pub fn new(settings: TsetmcSettings) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()
            .map_err(|e| FetchError::NetworkUnreachable(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url,
        })
    }

    /// Build the closing-price URL for an instrument.
    fn closing_price_url(&self, id: &InstrumentId) -> String {
        format!(
            "{}/api/ClosingPrice/GetClosingPriceDailyList/{id}/0",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Parse the API response into RawRecords. Rows without a usable date
    /// are dropped; every other field degrades to `None` on its own.
    fn parse_response(entry: &CatalogEntry, resp: ClosingPriceResponse) -> Vec<RawRecord> {
        let rows = resp.closing_price_daily.unwrap_or_default();
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let date = match row.d_even.as_ref().and_then(to_date_key) {
                Some(date) => date,
                None => {
                    debug!(
                        symbol = %entry.symbol,
                        raw = ?row.d_even,
                        "skipping row without a valid dEven"
                    );
                    continue;
                }
            };

            let instrument_id = row
                .ins_code
                .as_ref()
                .and_then(to_identifier)
                .unwrap_or_else(|| entry.id.clone());

            records.push(RawRecord {
                symbol: entry.symbol.clone(),
                instrument_id,
                date,
                min: to_numeric(row.price_min.as_ref()),
                max: to_numeric(row.price_max.as_ref()),
                previous_close: to_numeric(row.price_yesterday.as_ref()),
                first: to_numeric(row.price_first.as_ref()),
                close: to_numeric(row.p_closing.as_ref()),
                last: to_numeric(row.p_dr_cot_val.as_ref()),
                trades_count: to_numeric(row.z_tot_tran.as_ref()),
                volume: to_numeric(row.q_tot_tran_5j.as_ref()),
                value: to_numeric(row.q_tot_cap.as_ref()),
            });
        }

        records
    }
}

impl RecordProvider for TsetmcProvider {
    fn name(&self) -> &str {
        "tsetmc"
    }

    fn fetch(&self, entry: &CatalogEntry) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.closing_price_url(&entry.id);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                id: entry.id.to_string(),
                status: status.as_u16(),
            });
        }

        let body: ClosingPriceResponse = resp.json().map_err(|e| {
            FetchError::ResponseFormatChanged(format!(
                "failed to parse response for {}: {e}",
                entry.id
            ))
        })?;

        Ok(Self::parse_response(entry, body))
    }
}

/// Lenient numeric decoding: finite numbers and numeric strings, else `None`.
///
/// `"NaN"` and `"inf"` count as missing; JSON has no encoding for them.
fn to_numeric(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn to_date_key(value: &Value) -> Option<DateKey> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .and_then(|v| DateKey::new(v).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn to_identifier(value: &Value) -> Option<InstrumentId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(InstrumentId::new(s.trim())),
        Value::Number(n) => Some(InstrumentId::new(n.to_string())),
        _ => None,
    }
}
