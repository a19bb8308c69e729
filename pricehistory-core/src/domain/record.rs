//! Per-day price records, raw and adjusted.

use serde::{Deserialize, Serialize};

use super::date_key::DateKey;
use super::ids::InstrumentId;

/// One instrument-day observation as delivered by the provider.
///
/// Numeric fields are `None` when the provider omitted them or sent
/// something non-numeric; `None` is never conflated with `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub symbol: String,
    #[serde(rename = "id")]
    pub instrument_id: InstrumentId,
    pub date: DateKey,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    /// Reference close the day's return is measured against.
    #[serde(rename = "yesterday", default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub first: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub last: Option<f64>,
    #[serde(default)]
    pub trades_count: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawRecord {
    /// A record carrying only the fields the adjuster reads.
    pub fn new(
        symbol: impl Into<String>,
        instrument_id: InstrumentId,
        date: DateKey,
        close: Option<f64>,
        previous_close: Option<f64>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            instrument_id,
            date,
            min: None,
            max: None,
            previous_close,
            first: None,
            close,
            last: None,
            trades_count: None,
            volume: None,
            value: None,
        }
    }
}

/// A raw record plus the back-adjustment columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,
    /// Single-day multiplicative return, `close / previous_close`.
    pub ret: f64,
    /// Running product of `ret` from the latest day back to this one.
    pub cumprod: f64,
    pub adj_price: f64,
}

impl AdjustedRecord {
    pub fn instrument_id(&self) -> &InstrumentId {
        &self.raw.instrument_id
    }

    pub fn date(&self) -> DateKey {
        self.raw.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_keys_with_nulls() {
        let json = r#"{
            "symbol": "FOLD",
            "id": "46348559193224090",
            "date": 20230521,
            "yesterday": null,
            "close": 5120.0
        }"#;
        let rec: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.instrument_id, InstrumentId::new("46348559193224090"));
        assert_eq!(rec.previous_close, None);
        assert_eq!(rec.close, Some(5120.0));
        assert_eq!(rec.volume, None);
    }

    #[test]
    fn adjusted_record_flattens_raw_fields() {
        let raw = RawRecord::new(
            "FOLD",
            InstrumentId::new("1"),
            DateKey::new(20230521).unwrap(),
            Some(10.0),
            Some(8.0),
        );
        let adj = AdjustedRecord {
            raw,
            ret: 1.25,
            cumprod: 1.25,
            adj_price: 10.0,
        };
        let value = serde_json::to_value(&adj).unwrap();
        assert_eq!(value["id"], "1");
        assert_eq!(value["yesterday"], 8.0);
        assert_eq!(value["adj_price"], 10.0);
        assert!(value.get("raw").is_none());
    }
}
