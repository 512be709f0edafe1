//! Writes a synthetic CPIH export in the ONS CSV layout, for use with
//! File → Open… when the API is unreachable.
//!
//! Usage: `generate_sample [output.csv] [months]`

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};

/// (code, name, yearly drift, monthly noise)
const CATEGORIES: &[(&str, &str, f64, f64)] = &[
    ("CP00", "Overall Index", 0.030, 0.002),
    ("CP01", "01 Food and non-alcoholic beverages", 0.045, 0.004),
    ("CP02", "02 Alcohol and tobacco", 0.050, 0.003),
    ("CP03", "03 Clothing and footwear", 0.010, 0.010),
    ("CP04", "04 Housing, water, electricity, gas and other fuels", 0.060, 0.006),
    ("CP07", "07 Transport", 0.025, 0.008),
    ("CP09", "09 Recreation and culture", 0.020, 0.004),
    ("CP12", "12 Miscellaneous goods and services", 0.028, 0.002),
];

/// SplitMix64: tiny, deterministic, good enough for fake price noise.
struct Noise(u64);

impl Noise {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Roughly normal in `[-scale * 2, scale * 2]` (sum of four uniforms).
    fn jitter(&mut self, scale: f64) -> f64 {
        let sum: f64 = (0..4)
            .map(|_| (self.next() >> 11) as f64 / (1u64 << 53) as f64)
            .sum();
        (sum - 2.0) * scale
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_cpih.csv".to_string());
    let months: u32 = match args.next() {
        Some(m) => m.parse().with_context(|| format!("'{m}' is not a month count"))?,
        None => 120,
    };

    let start = NaiveDate::from_ymd_opt(2015, 1, 1).context("invalid start month")?;
    let mut noise_source = Noise(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "v4_0",
        "mmm-yy",
        "Time",
        "uk-only",
        "Geography",
        "cpih1dim1aggid",
        "Aggregate",
    ])?;

    let mut rows = 0usize;
    for &(code, label, drift, noise) in CATEGORIES {
        let mut index = 100.0;
        for m in 0..months {
            let date = start
                .checked_add_months(Months::new(m))
                .context("month out of range")?;
            let period = date.format("%b-%y").to_string();

            // Seasonal wobble plus noise around a steady yearly drift.
            let seasonal = 0.001 * (date.month() as f64 * std::f64::consts::PI / 6.0).sin();
            index *= 1.0 + drift / 12.0 + seasonal + noise_source.jitter(noise);

            writer.write_record([
                format!("{index:.1}"),
                period.clone(),
                period,
                "K02000001".to_string(),
                "United Kingdom".to_string(),
                code.to_string(),
                label.to_string(),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} rows ({} categories × {months} months) to {output_path}",
        CATEGORIES.len()
    );
    Ok(())
}
