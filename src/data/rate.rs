use std::collections::BTreeMap;

use super::model::{CpihDataset, YearMonth};

/// Months between a reading and the one it is compared against.
pub const YEAR_LAG_MONTHS: i64 = 12;

/// One category's index values keyed by month, ascending.
///
/// If a month appears more than once the last row wins, blank or not.
pub fn category_series(
    dataset: &CpihDataset,
    category: &str,
) -> BTreeMap<YearMonth, Option<f64>> {
    dataset
        .observations
        .iter()
        .filter(|o| o.category == category)
        .map(|o| (o.period, o.value))
        .collect()
}

/// Year-over-year change of a monthly series, as a fraction (0.05 = 5%).
///
/// Each month is compared with the same calendar month a year earlier.
/// Points are dropped when either month is absent or blank, when the
/// earlier value is zero, or when the result is not finite.
pub fn year_over_year(series: &BTreeMap<YearMonth, Option<f64>>) -> Vec<(YearMonth, f64)> {
    series
        .iter()
        .filter_map(|(&period, &value)| {
            let value = value?;
            let lagged = (*series.get(&period.minus_months(YEAR_LAG_MONTHS))?)?;
            if lagged == 0.0 {
                return None;
            }
            let rate = (value - lagged) / lagged;
            rate.is_finite().then_some((period, rate))
        })
        .collect()
}

/// Filter, sort, align and divide for one category.
pub fn inflation_rate(dataset: &CpihDataset, category: &str) -> Vec<(YearMonth, f64)> {
    year_over_year(&category_series(dataset, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn start() -> YearMonth {
        YearMonth::new(2020, 1).unwrap()
    }

    fn dataset(category: &str, values: &[f64]) -> CpihDataset {
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation {
                raw_label: format!("01 {category}"),
                category: category.to_string(),
                period: YearMonth::from_ordinal(start().ordinal() + i as i64),
                value: Some(v),
            })
            .collect();
        CpihDataset::from_observations(observations).unwrap()
    }

    #[test]
    fn fewer_than_thirteen_months_is_empty() {
        let ds = dataset("Food", &[100.0; 12]);
        assert!(inflation_rate(&ds, "Food").is_empty());
    }

    #[test]
    fn unknown_category_is_empty() {
        let ds = dataset("Food", &[100.0; 24]);
        assert!(inflation_rate(&ds, "Transport").is_empty());
    }

    #[test]
    fn constant_series_has_zero_rate() {
        let ds = dataset("Food", &[100.0; 24]);
        let rates = inflation_rate(&ds, "Food");
        assert_eq!(rates.len(), 12);
        assert_eq!(rates[0].0, YearMonth::new(2021, 1).unwrap());
        assert!(rates.iter().all(|&(_, r)| r == 0.0));
    }

    #[test]
    fn doubling_over_a_year_is_one_hundred_percent() {
        let mut values = vec![50.0; 12];
        values.push(100.0);
        let ds = dataset("Food", &values);
        let rates = inflation_rate(&ds, "Food");
        assert_eq!(rates, vec![(YearMonth::new(2021, 1).unwrap(), 1.0)]);
    }

    #[test]
    fn zero_lag_is_dropped() {
        let mut values = vec![0.0];
        values.extend([100.0; 13]);
        let ds = dataset("Food", &values);
        let rates = inflation_rate(&ds, "Food");
        // Jan-21 compares with the zero in Jan-20 and disappears.
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0], (YearMonth::new(2021, 2).unwrap(), 0.0));
    }

    #[test]
    fn alignment_is_by_calendar_month() {
        let mut series = BTreeMap::new();
        let jan20 = start();
        series.insert(jan20, Some(100.0));
        // Feb-20 missing.
        series.insert(YearMonth::new(2020, 3).unwrap(), Some(100.0));
        series.insert(YearMonth::new(2021, 1).unwrap(), Some(110.0));
        series.insert(YearMonth::new(2021, 2).unwrap(), Some(120.0));
        series.insert(YearMonth::new(2021, 3).unwrap(), Some(105.0));

        let rates = year_over_year(&series);
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].0, YearMonth::new(2021, 1).unwrap());
        assert!((rates[0].1 - 0.10).abs() < 1e-12);
        assert_eq!(rates[1].0, YearMonth::new(2021, 3).unwrap());
        assert!((rates[1].1 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn unsorted_rows_are_ordered_by_month() {
        let mut ds = dataset("Food", &[100.0; 14]);
        ds.observations.reverse();
        let rates = inflation_rate(&ds, "Food");
        assert!(rates.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn blank_values_drop_dependent_points() {
        let mut ds = dataset("Food", &[100.0; 14]);
        ds.observations[0].value = None;
        let rates = inflation_rate(&ds, "Food");
        assert_eq!(rates, vec![(YearMonth::new(2021, 2).unwrap(), 0.0)]);
    }

    #[test]
    fn blank_last_row_for_a_month_wins() {
        let month = |year, m| YearMonth::new(year, m).unwrap();
        let row = |period, value| Observation {
            raw_label: "01 Food".to_string(),
            category: "Food".to_string(),
            period,
            value,
        };
        let ds = CpihDataset::from_observations(vec![
            row(month(2021, 1), Some(100.0)),
            row(month(2021, 1), None),
            row(month(2022, 1), Some(110.0)),
        ])
        .unwrap();

        assert_eq!(category_series(&ds, "Food").get(&month(2021, 1)), Some(&None));
        assert!(inflation_rate(&ds, "Food").is_empty());
    }

    #[test]
    fn later_duplicate_value_replaces_earlier() {
        let month = |year, m| YearMonth::new(year, m).unwrap();
        let row = |period, value| Observation {
            raw_label: "01 Food".to_string(),
            category: "Food".to_string(),
            period,
            value: Some(value),
        };
        let ds = CpihDataset::from_observations(vec![
            row(month(2021, 1), 50.0),
            row(month(2021, 1), 100.0),
            row(month(2022, 1), 110.0),
        ])
        .unwrap();

        let rates = inflation_rate(&ds, "Food");
        assert_eq!(rates.len(), 1);
        assert!((rates[0].1 - 0.10).abs() < 1e-12);
    }
}
