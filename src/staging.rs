// Date Staging Buffer - pre-commit set of selected calendar dates
// Accumulates range-by-weekday expansions; cleared only on successful commit.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{LedgerError, Result};

/// Render a date the way the channel and the operator see it:
/// `YYYY-MM-DD (Abbrev)`. The zero-padded prefix keeps the labels
/// lexicographically date-ordered.
pub fn date_label(date: NaiveDate) -> String {
    format!("{} ({})", date.format("%Y-%m-%d"), date.format("%a"))
}

/// Parse a label produced by `date_label` (or a bare `YYYY-MM-DD`) back into
/// a date. Operator-facing deselection hands labels back to us.
pub fn parse_label(label: &str) -> Option<NaiveDate> {
    let bare = label.split_whitespace().next()?;
    NaiveDate::parse_from_str(bare, "%Y-%m-%d").ok()
}

/// Expand `[start, end]` to every date whose weekday is in `weekdays`.
/// Weekday comparison is identity on `chrono::Weekday`; no numbering scheme
/// leaks in here.
pub fn expand_range(start: NaiveDate, end: NaiveDate, weekdays: &[Weekday]) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| weekdays.contains(&d.weekday()))
        .collect()
}

/// Deduplicated, date-ordered set of staged dates.
#[derive(Debug, Clone, Default)]
pub struct DateBuffer {
    dates: BTreeSet<NaiveDate>,
}

impl DateBuffer {
    pub fn new() -> Self {
        DateBuffer {
            dates: BTreeSet::new(),
        }
    }

    /// Union one range-by-weekday expansion into the buffer.
    ///
    /// Returns how many dates the expansion matched; zero means "no such
    /// weekday in range" and is a warning for the operator, not an error.
    /// Already-staged dates are no-ops, so staging overlapping ranges twice
    /// is idempotent.
    pub fn stage(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        weekdays: &[Weekday],
    ) -> Result<usize> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        if weekdays.is_empty() {
            return Err(LedgerError::EmptyWeekdays);
        }

        let matched = expand_range(start, end, weekdays);
        let count = matched.len();
        self.dates.extend(matched);
        Ok(count)
    }

    /// Replace the buffer with exactly the given dates. Used when the
    /// operator deselects staged entries; passing the current contents is a
    /// harmless no-op.
    pub fn retain_only(&mut self, keep: &[NaiveDate]) {
        self.dates = keep.iter().copied().collect();
    }

    /// Empty the buffer. Called automatically after a successful commit,
    /// never implicitly before.
    pub fn clear(&mut self) {
        self.dates.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Staged dates in ascending calendar order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.dates.iter().copied().collect()
    }

    /// Staged dates as operator-facing labels, ascending.
    pub fn labels(&self) -> Vec<String> {
        self.dates.iter().map(|d| date_label(*d)).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_stage_march_2025_saturdays() {
        // 2025-03-01 is a Saturday on the real calendar.
        let mut buffer = DateBuffer::new();
        let count = buffer
            .stage(d("2025-03-01"), d("2025-03-31"), &[Weekday::Sat])
            .unwrap();
        assert_eq!(count, 5);
        assert_eq!(
            buffer.dates(),
            vec![
                d("2025-03-01"),
                d("2025-03-08"),
                d("2025-03-15"),
                d("2025-03-22"),
                d("2025-03-29"),
            ]
        );
    }

    #[test]
    fn test_stage_overlapping_ranges_is_idempotent() {
        let mut buffer = DateBuffer::new();
        buffer
            .stage(d("2025-03-01"), d("2025-03-15"), &[Weekday::Sat])
            .unwrap();
        buffer
            .stage(d("2025-03-01"), d("2025-03-31"), &[Weekday::Sat])
            .unwrap();
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_stage_keeps_ascending_order_across_calls() {
        let mut buffer = DateBuffer::new();
        buffer
            .stage(d("2025-03-10"), d("2025-03-12"), &[Weekday::Mon, Weekday::Tue, Weekday::Wed])
            .unwrap();
        buffer
            .stage(d("2025-03-03"), d("2025-03-03"), &[Weekday::Mon])
            .unwrap();
        let dates = buffer.dates();
        assert_eq!(dates.first(), Some(&d("2025-03-03")));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stage_rejects_inverted_range() {
        let mut buffer = DateBuffer::new();
        let err = buffer
            .stage(d("2025-03-31"), d("2025-03-01"), &[Weekday::Sat])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidDateRange { .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_stage_rejects_empty_weekday_set() {
        let mut buffer = DateBuffer::new();
        let err = buffer.stage(d("2025-03-01"), d("2025-03-31"), &[]).unwrap_err();
        assert!(matches!(err, LedgerError::EmptyWeekdays));
    }

    #[test]
    fn test_stage_no_matching_weekday_is_zero_not_error() {
        let mut buffer = DateBuffer::new();
        // 2025-03-03..05 is Mon..Wed; no Saturday in range.
        let count = buffer
            .stage(d("2025-03-03"), d("2025-03-05"), &[Weekday::Sat])
            .unwrap();
        assert_eq!(count, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_retain_only_deselects() {
        let mut buffer = DateBuffer::new();
        buffer
            .stage(d("2025-03-01"), d("2025-03-31"), &[Weekday::Sat])
            .unwrap();
        buffer.retain_only(&[d("2025-03-08"), d("2025-03-22")]);
        assert_eq!(buffer.dates(), vec![d("2025-03-08"), d("2025-03-22")]);
    }

    #[test]
    fn test_labels_carry_weekday_abbrev() {
        let mut buffer = DateBuffer::new();
        buffer
            .stage(d("2025-03-01"), d("2025-03-01"), &[Weekday::Sat])
            .unwrap();
        assert_eq!(buffer.labels(), vec!["2025-03-01 (Sat)"]);
    }

    #[test]
    fn test_label_round_trip() {
        let date = d("2025-03-01");
        assert_eq!(parse_label(&date_label(date)), Some(date));
        assert_eq!(parse_label("2025-03-01"), Some(date));
        assert_eq!(parse_label("not a date"), None);
    }
}
