//! Threshold classification of peak forces.

use crate::config::CategoryRange;
use crate::core::loaders::PartReading;

/// Label assigned when no configured range contains the value.
pub const UNMATCHED_CATEGORY: &str = "uncategorized";

/// A part reading with its assigned category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedReading {
    pub part_id: String,
    pub peak_force: f64,
    pub category: String,
}

impl ClassifiedReading {
    /// Classify `reading` against the ordered `ranges`.
    pub fn from_reading(reading: PartReading, ranges: &[CategoryRange]) -> Self {
        let category = classify(reading.peak_force, ranges).to_string();
        Self {
            part_id: reading.part_id,
            peak_force: reading.peak_force,
            category,
        }
    }

    /// True when no range matched.
    #[inline]
    pub fn is_unmatched(&self) -> bool {
        self.category == UNMATCHED_CATEGORY
    }
}

/// Return the label of the first range with `low < value < high`.
///
/// Values equal to a limit fall outside that range. When nothing matches
/// the result is [`UNMATCHED_CATEGORY`].
pub fn classify(value: f64, ranges: &[CategoryRange]) -> &str {
    ranges
        .iter()
        .find(|range| range.contains(value))
        .map_or(UNMATCHED_CATEGORY, |range| range.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_ranges() -> Vec<CategoryRange> {
        vec![
            CategoryRange::new("low", 0.0, 0.1),
            CategoryRange::new("mid", 0.1, 0.3),
            CategoryRange::new("high", 0.3, 100.0),
        ]
    }

    #[test]
    fn test_classify_three_ranges() {
        let ranges = three_ranges();
        assert_eq!(classify(0.05, &ranges), "low");
        assert_eq!(classify(0.2, &ranges), "mid");
        assert_eq!(classify(0.5, &ranges), "high");
    }

    #[test]
    fn test_boundary_matches_nothing() {
        let ranges = three_ranges();
        assert_eq!(classify(0.3, &ranges), UNMATCHED_CATEGORY);
        assert_eq!(classify(0.1, &ranges), UNMATCHED_CATEGORY);
        assert_eq!(classify(0.0, &ranges), UNMATCHED_CATEGORY);
        assert_eq!(classify(100.0, &ranges), UNMATCHED_CATEGORY);
    }

    #[test]
    fn test_out_of_range_and_nan() {
        let ranges = three_ranges();
        assert_eq!(classify(-1.0, &ranges), UNMATCHED_CATEGORY);
        assert_eq!(classify(250.0, &ranges), UNMATCHED_CATEGORY);
        assert_eq!(classify(f64::NAN, &ranges), UNMATCHED_CATEGORY);
    }

    #[test]
    fn test_first_declared_range_wins() {
        let ranges = vec![
            CategoryRange::new("wide", 0.0, 10.0),
            CategoryRange::new("narrow", 1.0, 2.0),
        ];
        assert_eq!(classify(1.5, &ranges), "wide");
    }

    #[test]
    fn test_no_ranges() {
        assert_eq!(classify(0.5, &[]), UNMATCHED_CATEGORY);
    }

    #[test]
    fn test_from_reading() {
        let reading = PartReading {
            part_id: "EBE123456".to_string(),
            peak_force: 0.2,
            peak_row: 17,
        };
        let classified = ClassifiedReading::from_reading(reading, &three_ranges());
        assert_eq!(classified.part_id, "EBE123456");
        assert_eq!(classified.peak_force, 0.2);
        assert_eq!(classified.category, "mid");
        assert!(!classified.is_unmatched());
    }
}
