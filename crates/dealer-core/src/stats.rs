//! # Statistics & Aggregation
//!
//! Descriptive statistics for the report pages and grouping of untyped
//! records (invoices, cash-flow entries) by a key or by a calendar period.
//!
//! Records arrive as `serde_json::Value` because the report pages pass
//! backend rows straight through; field names are chosen by the caller.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::dates::{date_from_value, period_label};
use crate::types::{number_field, sanitize, Period};

// =============================================================================
// Descriptive Statistics
// =============================================================================

/// Sum of all values; non-finite values count as 0.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().copied().map(sanitize).sum()
}

/// Arithmetic mean, or 0 for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

/// Median, or 0 for an empty slice.
///
/// Even-length input averages the two middle values.
///
/// ## Example
/// ```rust
/// use dealer_core::stats::median;
///
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
/// assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&[]), 0.0);
/// ```
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<f64> = values.iter().copied().map(sanitize).collect();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Smallest value, or 0 for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .map(sanitize)
        .reduce(f64::min)
        .unwrap_or(0.0)
}

/// Largest value, or 0 for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .map(sanitize)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Change from `old_value` to `new_value` in percent; 0 if `old_value` is 0.
pub fn percentage_change(old_value: f64, new_value: f64) -> f64 {
    let old = sanitize(old_value);
    if old == 0.0 {
        return 0.0;
    }
    (sanitize(new_value) - old) / old * 100.0
}

// =============================================================================
// Grouped Sums
// =============================================================================

/// Ordered `label → sum` mapping.
///
/// Keeps labels in a defined order (first occurrence for [`group_sum`],
/// chronological for [`aggregate_by_period`]) and serializes as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSums {
    entries: Vec<(String, f64)>,
}

impl GroupedSums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `label`, appending the label if it is new.
    pub fn add(&mut self, label: &str, amount: f64) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((label.to_string(), amount)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, total)| *total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, total)| (key.as_str(), *total))
    }

    fn sort_by_label(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
}

impl Serialize for GroupedSums {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, total) in &self.entries {
            map.serialize_entry(label, total)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a GroupedSums {
    type Item = &'a (String, f64);
    type IntoIter = std::slice::Iter<'a, (String, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Text label of a grouping field value.
///
/// Strings are used verbatim, other scalars via their JSON text, and a
/// missing field groups under `"undefined"`.
fn group_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}

/// Sums `sum_field` per distinct `group_field`, in order of first occurrence.
///
/// ## Example
/// ```rust
/// use dealer_core::stats::group_sum;
/// use serde_json::json;
///
/// let rows = vec![
///     json!({"cat": "A", "amt": 10}),
///     json!({"cat": "B", "amt": 5}),
///     json!({"cat": "A", "amt": 3}),
/// ];
/// let sums = group_sum(&rows, "cat", "amt");
/// assert_eq!(sums.get("A"), Some(13.0));
/// assert_eq!(sums.get("B"), Some(5.0));
/// ```
pub fn group_sum(items: &[Value], group_field: &str, sum_field: &str) -> GroupedSums {
    let mut sums = GroupedSums::new();
    for item in items {
        let label = group_label(item.get(group_field));
        sums.add(&label, number_field(item, sum_field));
    }
    sums
}

/// Sums `value_field` per calendar period of `date_field`.
///
/// Labels are `YYYY-MM-DD`, `YYYY-MM` or `YYYY` and come back in
/// chronological order. Dates are read in UTC (see [`crate::dates`]);
/// records whose date is missing or unparseable are skipped.
pub fn aggregate_by_period(
    items: &[Value],
    date_field: &str,
    value_field: &str,
    period: Period,
) -> GroupedSums {
    let mut sums = GroupedSums::new();
    for item in items {
        let Some(date) = item.get(date_field).and_then(date_from_value) else {
            continue;
        };
        sums.add(&period_label(date, period), number_field(item, value_field));
    }
    sums.sort_by_label();
    sums
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sum_and_average() {
        assert_eq!(sum(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(average(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(average(&[]), 0.0);
        assert_eq!(sum(&[1.0, f64::NAN]), 1.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(median(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min(&[3.0, -1.0, 2.0]), -1.0);
        assert_eq!(max(&[3.0, -1.0, 2.0]), 3.0);
        assert_eq!(min(&[]), 0.0);
        assert_eq!(max(&[]), 0.0);
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(percentage_change(100.0, 150.0), 50.0);
        assert_eq!(percentage_change(200.0, 100.0), -50.0);
        assert_eq!(percentage_change(0.0, 100.0), 0.0);
    }

    #[test]
    fn test_group_sum_keeps_first_occurrence_order() {
        let rows = vec![
            json!({"cat": "B", "amt": 5}),
            json!({"cat": "A", "amt": 10}),
            json!({"cat": "B", "amt": "2"}),
            json!({"cat": "A", "amt": 3}),
        ];
        let sums = group_sum(&rows, "cat", "amt");

        assert_eq!(sums.labels().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(sums.get("A"), Some(13.0));
        assert_eq!(sums.get("B"), Some(7.0));
    }

    #[test]
    fn test_group_sum_missing_fields() {
        let rows = vec![json!({"amt": 4}), json!({"cat": 7, "amt": null})];
        let sums = group_sum(&rows, "cat", "amt");

        assert_eq!(sums.get("undefined"), Some(4.0));
        assert_eq!(sums.get("7"), Some(0.0));
    }

    #[test]
    fn test_group_sum_serializes_in_order() {
        let rows = vec![json!({"cat": "Z", "amt": 1}), json!({"cat": "A", "amt": 2})];
        let json = serde_json::to_string(&group_sum(&rows, "cat", "amt")).unwrap();
        assert_eq!(json, r#"{"Z":1.0,"A":2.0}"#);
    }

    #[test]
    fn test_aggregate_by_period() {
        let rows = vec![
            json!({"date": "2026-02-10", "total": 100}),
            json!({"date": "2026-01-31T20:00:00Z", "total": 50}),
            json!({"date": "2026-02-10T08:00:00Z", "total": 25}),
            json!({"date": "garbage", "total": 1000}),
            json!({"total": 1000}),
        ];

        let by_day = aggregate_by_period(&rows, "date", "total", Period::Day);
        assert_eq!(
            by_day.labels().collect::<Vec<_>>(),
            vec!["2026-01-31", "2026-02-10"]
        );
        assert_eq!(by_day.get("2026-02-10"), Some(125.0));

        let by_month = aggregate_by_period(&rows, "date", "total", Period::Month);
        assert_eq!(by_month.get("2026-01"), Some(50.0));
        assert_eq!(by_month.get("2026-02"), Some(125.0));

        let by_year = aggregate_by_period(&rows, "date", "total", Period::Year);
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year.get("2026"), Some(175.0));
    }
}
