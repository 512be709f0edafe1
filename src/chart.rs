use std::collections::BTreeSet;

use crate::data::model::{CpihDataset, YearMonth};
use crate::data::rate::inflation_rate;

/// Categories currently ticked in the selector.
pub type Selection = BTreeSet<String>;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub category: String,
    /// Year-over-year rate as a fraction, ascending by month.
    pub points: Vec<(YearMonth, f64)>,
}

impl Series {
    pub fn latest(&self) -> Option<(YearMonth, f64)> {
        self.points.last().copied()
    }
}

/// Everything the plot needs to draw, independent of egui.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub series: Vec<Series>,
}

impl Chart {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Span of months covered by any series.
    pub fn x_range(&self) -> Option<(YearMonth, YearMonth)> {
        let months = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        months.fold(None, |acc: Option<(YearMonth, YearMonth)>, m| {
            Some(match acc {
                None => (m, m),
                Some((lo, hi)) => (lo.min(m), hi.max(m)),
            })
        })
    }
}

/// Compute one series per selected category, in dataset category order.
///
/// Categories not present in the dataset still get an (empty) series so the
/// legend reflects the selection.
pub fn build_chart(dataset: &CpihDataset, selection: &Selection) -> Chart {
    let known = dataset
        .categories
        .iter()
        .filter(|c| selection.contains(c.as_str()));
    let unknown = selection.iter().filter(|c| !dataset.has_category(c));

    let series = known
        .chain(unknown)
        .map(|category| Series {
            category: category.clone(),
            points: inflation_rate(dataset, category),
        })
        .collect();

    Chart { series }
}

/// Fixed percentage axis format: `0.0123` → `"1.23%"`.
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
