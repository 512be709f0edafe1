use thiserror::Error;

/// The one aggregate published without a numeric code prefix.
pub const SENTINEL_CATEGORY: &str = "Overall Index";

/// Errors raised while turning the raw CSV into a [`CpihDataset`](super::model::CpihDataset).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV missing '{0}' column")]
    MissingColumn(&'static str),

    #[error("row {row}: label '{label}' has no '<code> <name>' prefix")]
    MalformedLabel { row: usize, label: String },

    #[error("row {row}: '{value}' is not a month in Mon-YY form")]
    BadPeriod { row: usize, value: String },

    #[error("row {row}: '{value}' is not a number")]
    BadValue { row: usize, value: String },

    #[error("labels '{first}' and '{second}' both clean to '{category}'")]
    LabelCollision {
        category: String,
        first: String,
        second: String,
    },
}

/// Strip the leading `"<code> "` from an aggregate label.
///
/// `"01 Food and non-alcoholic beverages"` becomes
/// `"Food and non-alcoholic beverages"`; the sentinel passes through.
/// Returns `None` when there is nothing to strip.
pub fn clean_label(raw: &str) -> Option<&str> {
    if raw == SENTINEL_CATEGORY {
        return Some(raw);
    }
    let (_code, name) = raw.split_once(' ')?;
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numeric_prefix() {
        assert_eq!(
            clean_label("01 Food and non-alcoholic beverages"),
            Some("Food and non-alcoholic beverages")
        );
        assert_eq!(clean_label("04.1 Actual rentals"), Some("Actual rentals"));
        assert_eq!(
            clean_label("12.5.2 Other insurance"),
            Some("Other insurance")
        );
    }

    #[test]
    fn sentinel_passes_through() {
        assert_eq!(clean_label(SENTINEL_CATEGORY), Some("Overall Index"));
    }

    #[test]
    fn label_without_prefix_is_rejected() {
        assert_eq!(clean_label("Food"), None);
        assert_eq!(clean_label("01 "), None);
        assert_eq!(clean_label(""), None);
    }
}
