use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::labels::{DataError, SENTINEL_CATEGORY};

// ---------------------------------------------------------------------------
// YearMonth – one point on the monthly time axis
// ---------------------------------------------------------------------------

/// A calendar month. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month (1 = January).
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    /// Parse an ONS period such as `"Jan-22"` (`%b-%y`).
    pub fn parse(s: &str) -> Option<Self> {
        // chrono needs a day to build a date, so pin it to the 1st.
        let date = NaiveDate::parse_from_str(&format!("01-{}", s.trim()), "%d-%b-%y").ok()?;
        YearMonth::new(date.year(), date.month())
    }

    /// Months since year 0, handy as a plot x coordinate.
    pub fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        YearMonth {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn minus_months(self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() - months)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => write!(f, "{}", d.format("%b %Y")),
            None => write!(f, "{:04}-{:02}", self.year, self.month),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the ONS CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Label as published, e.g. `"01 Food and non-alcoholic beverages"`.
    pub raw_label: String,
    /// Label with the numeric code stripped.
    pub category: String,
    pub period: YearMonth,
    /// Index value (`v4_0`). Blank cells are `None`.
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// CpihDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed dataset. Immutable once built; shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CpihDataset {
    pub observations: Vec<Observation>,
    /// Distinct cleaned categories in order of first appearance.
    pub categories: Vec<String>,
}

impl CpihDataset {
    /// Build the category index, rejecting raw labels that clean to the same name.
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self, DataError> {
        let mut raw_by_category: BTreeMap<&str, &str> = BTreeMap::new();
        let mut categories = Vec::new();

        for obs in &observations {
            match raw_by_category.get(obs.category.as_str()) {
                Some(existing) if *existing != obs.raw_label => {
                    return Err(DataError::LabelCollision {
                        category: obs.category.clone(),
                        first: existing.to_string(),
                        second: obs.raw_label.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    raw_by_category.insert(&obs.category, &obs.raw_label);
                    categories.push(obs.category.clone());
                }
            }
        }

        Ok(CpihDataset {
            observations,
            categories,
        })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// The selection shown on first load: the overall index when present.
    pub fn default_selection(&self) -> BTreeSet<String> {
        let mut selection = BTreeSet::new();
        if self.has_category(SENTINEL_CATEGORY) {
            selection.insert(SENTINEL_CATEGORY.to_string());
        }
        selection
    }

    /// First and last month present in the table.
    pub fn period_range(&self) -> Option<(YearMonth, YearMonth)> {
        let min = self.observations.iter().map(|o| o.period).min()?;
        let max = self.observations.iter().map(|o| o.period).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(raw: &str, category: &str, period: YearMonth) -> Observation {
        Observation {
            raw_label: raw.to_string(),
            category: category.to_string(),
            period,
            value: Some(100.0),
        }
    }

    #[test]
    fn parses_ons_periods() {
        assert_eq!(YearMonth::parse("Jan-22"), YearMonth::new(2022, 1));
        assert_eq!(YearMonth::parse("Dec-99"), YearMonth::new(1999, 12));
        assert_eq!(YearMonth::parse(" Sep-05 "), YearMonth::new(2005, 9));
        assert_eq!(YearMonth::parse("2022-01"), None);
        assert_eq!(YearMonth::parse("Foo-22"), None);
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        let jan = YearMonth::new(2022, 1).unwrap();
        assert_eq!(jan.minus_months(12), YearMonth::new(2021, 1).unwrap());
        assert_eq!(jan.minus_months(1), YearMonth::new(2021, 12).unwrap());
        assert_eq!(YearMonth::from_ordinal(jan.ordinal()), jan);
        assert_eq!(jan.to_string(), "Jan 2022");
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let p = YearMonth::new(2022, 1).unwrap();
        let ds = CpihDataset::from_observations(vec![
            obs("Overall Index", "Overall Index", p),
            obs("02 Alcohol", "Alcohol", p),
            obs("01 Food", "Food", p),
            obs("02 Alcohol", "Alcohol", p.minus_months(1)),
        ])
        .unwrap();
        assert_eq!(ds.categories, vec!["Overall Index", "Alcohol", "Food"]);
        assert_eq!(ds.default_selection().len(), 1);
        assert_eq!(ds.period_range(), Some((p.minus_months(1), p)));
    }

    #[test]
    fn rejects_colliding_labels() {
        let p = YearMonth::new(2022, 1).unwrap();
        let err = CpihDataset::from_observations(vec![
            obs("01 Food", "Food", p),
            obs("01.1 Food", "Food", p),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::LabelCollision { .. }));
    }

    #[test]
    fn default_selection_empty_without_sentinel() {
        let p = YearMonth::new(2022, 1).unwrap();
        let ds = CpihDataset::from_observations(vec![obs("01 Food", "Food", p)]).unwrap();
        assert!(ds.default_selection().is_empty());
    }
}
