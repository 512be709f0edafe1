use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::labels::{DataError, clean_label};
use super::model::{CpihDataset, Observation, YearMonth};

const LABEL_COLUMN: &str = "Aggregate";
const PERIOD_COLUMN: &str = "Time";
const VALUE_COLUMN: &str = "v4_0";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a local CSV export in the ONS layout.
pub fn load_file(path: &Path) -> Result<CpihDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file).with_context(|| format!("parsing {}", path.display()))
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse CSV bytes as downloaded from the catalog.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<CpihDataset> {
    parse_csv(bytes)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Only `Aggregate`, `Time` and
/// `v4_0` are read; every other column is ignored.
pub fn parse_csv<R: Read>(input: R) -> Result<CpihDataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataError::MissingColumn(name))
    };
    let label_idx = column(LABEL_COLUMN)?;
    let period_idx = column(PERIOD_COLUMN)?;
    let value_idx = column(VALUE_COLUMN)?;

    let mut observations = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let raw_label = record.get(label_idx).unwrap_or("").trim();
        let category = clean_label(raw_label).ok_or_else(|| DataError::MalformedLabel {
            row: row_no,
            label: raw_label.to_string(),
        })?;

        let period_text = record.get(period_idx).unwrap_or("");
        let period = YearMonth::parse(period_text).ok_or_else(|| DataError::BadPeriod {
            row: row_no,
            value: period_text.to_string(),
        })?;

        let value = parse_value(record.get(value_idx).unwrap_or(""), row_no)?;

        observations.push(Observation {
            raw_label: raw_label.to_string(),
            category: category.to_string(),
            period,
            value,
        });
    }

    Ok(CpihDataset::from_observations(observations)?)
}

fn parse_value(s: &str, row: usize) -> Result<Option<f64>, DataError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| DataError::BadValue {
            row,
            value: s.to_string(),
        })
}
