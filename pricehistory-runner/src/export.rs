//! Export and import of record sets.
//!
//! - **JSON**: array of records with the provider's field names; adjusted
//!   records add `ret`, `cumprod` and `adj_price`
//! - **CSV**: one row per record plus a `jdate` column with the Jalali date
//!
//! Raw JSON import accepts either a raw or an adjusted export, so a saved
//! dataset can be re-adjusted offline.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use pricehistory_core::{AdjustedRecord, RawRecord};

/// Output encoding for adjusted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn render(self, records: &[AdjustedRecord]) -> Result<String> {
        match self {
            Self::Json => export_json(records),
            Self::Csv => export_csv(records),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

/// Serialize adjusted records to pretty JSON.
pub fn export_json(records: &[AdjustedRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize records to JSON")
}

/// Deserialize raw records from a JSON array.
pub fn import_raw_json(json: &str) -> Result<Vec<RawRecord>> {
    let records: Vec<RawRecord> =
        serde_json::from_str(json).context("failed to deserialize records from JSON")?;
    Ok(records)
}

/// Read raw records from a JSON file.
pub fn load_raw_json(path: &Path) -> Result<Vec<RawRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_raw_json(&json).with_context(|| format!("in {}", path.display()))
}

// ─── CSV ────────────────────────────────────────────────────────────

const CSV_HEADER: [&str; 16] = [
    "symbol",
    "id",
    "date",
    "jdate",
    "min",
    "max",
    "yesterday",
    "first",
    "close",
    "last",
    "trades_count",
    "volume",
    "value",
    "ret",
    "cumprod",
    "adj_price",
];

/// Export adjusted records as CSV. Missing values are empty cells.
pub fn export_csv(records: &[AdjustedRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for r in records {
        let raw = &r.raw;
        wtr.write_record([
            raw.symbol.clone(),
            raw.instrument_id.to_string(),
            raw.date.to_string(),
            raw.date.to_jalali().to_string(),
            cell(raw.min),
            cell(raw.max),
            cell(raw.previous_close),
            cell(raw.first),
            cell(raw.close),
            cell(raw.last),
            cell(raw.trades_count),
            cell(raw.volume),
            cell(raw.value),
            r.ret.to_string(),
            r.cumprod.to_string(),
            r.adj_price.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ─── Output ─────────────────────────────────────────────────────────

/// Write `contents` to `path`, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            if path.is_dir() {
                bail!("output path {} is a directory", path.display());
            }
            std::fs::write(path, contents)
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
                .context("failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricehistory_core::{adjust_group, DateKey, InstrumentId};

    fn sample() -> Vec<AdjustedRecord> {
        let mut first = RawRecord::new(
            "FOLD",
            InstrumentId::new("46348559193224090"),
            DateKey::new(20230321).unwrap(),
            Some(100.0),
            Some(100.0),
        );
        first.volume = Some(1_500.0);
        let second = RawRecord::new(
            "FOLD",
            InstrumentId::new("46348559193224090"),
            DateKey::new(20230322).unwrap(),
            Some(110.0),
            None,
        );
        adjust_group(vec![first, second])
    }

    #[test]
    fn format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::parse("parquet"), None);
    }

    #[test]
    fn csv_has_header_and_jalali_column() {
        let csv = export_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[1].starts_with("FOLD,46348559193224090,20230321,1402-01-01,"));
        assert!(lines[2].contains(",20230322,1402-01-02,"));
    }

    #[test]
    fn csv_missing_values_are_empty_cells() {
        let csv = export_csv(&sample()).unwrap();
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        // yesterday column on the second row
        assert_eq!(&rows[1][6], "");
        assert_eq!(&rows[0][11], "1500");
    }

    #[test]
    fn adjusted_json_reimports_as_raw() {
        let adjusted = sample();
        let json = export_json(&adjusted).unwrap();
        assert!(json.contains("\"adj_price\""));
        assert!(json.contains("\"yesterday\""));

        let raw = import_raw_json(&json).unwrap();
        assert_eq!(raw.len(), adjusted.len());
        for (r, a) in raw.iter().zip(&adjusted) {
            assert_eq!(r, &a.raw);
        }
    }

    #[test]
    fn import_rejects_non_array() {
        assert!(import_raw_json("{\"symbol\": \"FOLD\"}").is_err());
        assert!(import_raw_json("not json").is_err());
    }

    #[test]
    fn write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output(Some(&path), "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(write_output(Some(dir.path()), "[]").is_err());
    }
}
