// Calendar Projector - read-only month grid over the ledger
// One column per weekday (configurable start, default Sunday), one entry per
// product per in-month day. Styling is carried as CSS class names.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::ledger::{Ledger, SaleStatus};

/// Which value the grid renders per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarView {
    Price,
    Stock,
}

// ============================================================================
// MONTH CURSOR
// ============================================================================

/// Stateful "current month" for calendar navigation. Stepping past December
/// wraps into January of the next year, and the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Self {
        MonthCursor {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        MonthCursor {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is clamped to 1..=12 at construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("cursor month in range")
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// GRID CELLS
// ============================================================================

/// One product line inside a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEntry {
    pub product: String,
    /// Rendered value: a thousands-separated price, or a stock count.
    pub display: String,
    /// CSS class for the value span. Sold-out wins over the plain stock
    /// class; the suspended badge is carried separately.
    pub css_class: &'static str,
    pub sold_out: bool,
    pub suspended: bool,
}

/// A cell of the 7-column grid. `Outside` cells pad the leading and trailing
/// weekdays of the month and never carry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayCell {
    Outside,
    Day { day: u32, entries: Vec<CellEntry> },
}

impl DayCell {
    pub fn css_class(&self) -> &'static str {
        match self {
            DayCell::Outside => "other-month",
            DayCell::Day { .. } => "",
        }
    }
}

/// A month of weeks, each exactly seven cells wide.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub start_of_week: Weekday,
    pub weeks: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    /// Header weekdays in display order, starting from `start_of_week`.
    pub fn weekday_headers(&self) -> [Weekday; 7] {
        weekday_headers(self.start_of_week)
    }
}

pub fn weekday_headers(start: Weekday) -> [Weekday; 7] {
    let mut headers = [start; 7];
    for i in 1..7 {
        headers[i] = headers[i - 1].succ();
    }
    headers
}

pub fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Thousands-separated integer, e.g. 100000 -> "100,000".
pub fn format_price(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn offset_from_week_start(day: Weekday, start: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - start.num_days_from_monday()) % 7
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let mut next = MonthCursor::new(year, month);
    next.next_month();
    next.first_day()
        .pred_opt()
        .map(|d| d.day())
        .unwrap_or(31)
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Project one hotel's ledger rows for `cursor`'s month onto a weekday grid.
///
/// Every week overlapping the month appears; cells outside the month are
/// `Outside` placeholders. In-month cells get one entry per matching ledger
/// row, in catalog product order.
pub fn project(
    ledger: &Ledger,
    hotel: &str,
    cursor: MonthCursor,
    view: CalendarView,
    start_of_week: Weekday,
    product_order: &[String],
) -> MonthGrid {
    let rows = ledger.rows_for_month(hotel, cursor.year(), cursor.month(), product_order);

    let first = cursor.first_day();
    let leading = offset_from_week_start(first.weekday(), start_of_week) as usize;
    let day_count = days_in_month(cursor.year(), cursor.month()) as usize;
    let week_count = (leading + day_count).div_ceil(7);

    let mut cells = Vec::with_capacity(week_count * 7);
    cells.resize(leading, DayCell::Outside);

    for day in 1..=day_count as u32 {
        let entries = rows
            .iter()
            .filter(|r| r.date.day() == day)
            .map(|r| {
                let (display, css_class) = match view {
                    CalendarView::Price => (format_price(r.price), "price-tag"),
                    CalendarView::Stock if r.stock == 0 => ("0 (sold out)".to_string(), "stock-zero"),
                    CalendarView::Stock => (r.stock.to_string(), "stock-tag"),
                };
                CellEntry {
                    product: r.product.clone(),
                    display,
                    css_class,
                    sold_out: r.stock == 0,
                    suspended: r.status == SaleStatus::Suspended,
                }
            })
            .collect();
        cells.push(DayCell::Day { day, entries });
    }

    cells.resize(week_count * 7, DayCell::Outside);

    let weeks = cells
        .chunks(7)
        .map(|week| week.to_vec())
        .collect();

    MonthGrid {
        year: cursor.year(),
        month: cursor.month(),
        start_of_week,
        weeks,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RateRow;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        for (date, product, price, stock, status) in [
            ("2025-03-01", "Deluxe", 100_000u32, 3u32, SaleStatus::Open),
            ("2025-03-01", "Suite", 180_000, 0, SaleStatus::Open),
            ("2025-03-08", "Deluxe", 90_000, 2, SaleStatus::Suspended),
        ] {
            ledger.upsert(RateRow {
                date: d(date),
                hotel: "Seaside Resort".to_string(),
                product: product.to_string(),
                price,
                stock,
                status,
            });
        }
        ledger
    }

    fn order() -> Vec<String> {
        vec!["Deluxe".to_string(), "Suite".to_string()]
    }

    fn day_cell(grid: &MonthGrid, day: u32) -> &DayCell {
        grid.weeks
            .iter()
            .flatten()
            .find(|c| matches!(c, DayCell::Day { day: d, .. } if *d == day))
            .unwrap()
    }

    #[test]
    fn test_cursor_wraps_december_to_january() {
        let mut cursor = MonthCursor::new(2025, 12);
        cursor.next_month();
        assert_eq!((cursor.year(), cursor.month()), (2026, 1));
        cursor.prev_month();
        assert_eq!((cursor.year(), cursor.month()), (2025, 12));

        let mut january = MonthCursor::new(2025, 1);
        january.prev_month();
        assert_eq!((january.year(), january.month()), (2024, 12));
    }

    #[test]
    fn test_grid_shape_march_2025_sunday_start() {
        // 2025-03-01 is a Saturday: six leading placeholders, then 31 days,
        // then five trailing placeholders in week six.
        let grid = project(
            &Ledger::new(),
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Price,
            Weekday::Sun,
            &[],
        );
        assert_eq!(grid.weeks.len(), 6);
        assert!(grid.weeks.iter().all(|w| w.len() == 7));

        let cells: Vec<&DayCell> = grid.weeks.iter().flatten().collect();
        assert!(cells[..6].iter().all(|c| **c == DayCell::Outside));
        assert!(matches!(cells[6], DayCell::Day { day: 1, .. }));
        assert!(cells[37..].iter().all(|c| **c == DayCell::Outside));
    }

    #[test]
    fn test_grid_start_of_week_is_configurable() {
        let grid = project(
            &Ledger::new(),
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Price,
            Weekday::Mon,
            &[],
        );
        // Monday-first: Saturday the 1st sits five cells in.
        let cells: Vec<&DayCell> = grid.weeks.iter().flatten().collect();
        assert!(cells[..5].iter().all(|c| **c == DayCell::Outside));
        assert!(matches!(cells[5], DayCell::Day { day: 1, .. }));
        assert_eq!(grid.weekday_headers()[0], Weekday::Mon);
        assert_eq!(grid.weekday_headers()[6], Weekday::Sun);
    }

    #[test]
    fn test_price_view_formats_with_separators() {
        let grid = project(
            &create_test_ledger(),
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Price,
            Weekday::Sun,
            &order(),
        );
        let DayCell::Day { entries, .. } = day_cell(&grid, 1) else {
            panic!("expected in-month cell");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product, "Deluxe");
        assert_eq!(entries[0].display, "100,000");
        assert_eq!(entries[0].css_class, "price-tag");
        assert_eq!(entries[1].display, "180,000");
    }

    #[test]
    fn test_stock_view_marks_sold_out() {
        let grid = project(
            &create_test_ledger(),
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Stock,
            Weekday::Sun,
            &order(),
        );
        let DayCell::Day { entries, .. } = day_cell(&grid, 1) else {
            panic!("expected in-month cell");
        };
        let suite = &entries[1];
        assert!(suite.sold_out);
        assert_eq!(suite.css_class, "stock-zero");
        assert_eq!(suite.display, "0 (sold out)");

        let deluxe = &entries[0];
        assert!(!deluxe.sold_out);
        assert_eq!(deluxe.css_class, "stock-tag");
        assert_eq!(deluxe.display, "3");
    }

    #[test]
    fn test_suspended_badge_is_independent_of_sold_out() {
        let mut ledger = create_test_ledger();
        // Make the sold-out suite suspended as well.
        ledger.edit_row(RateRow {
            date: d("2025-03-01"),
            hotel: "Seaside Resort".to_string(),
            product: "Suite".to_string(),
            price: 180_000,
            stock: 0,
            status: SaleStatus::Suspended,
        });

        let grid = project(
            &ledger,
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Stock,
            Weekday::Sun,
            &order(),
        );
        let DayCell::Day { entries, .. } = day_cell(&grid, 1) else {
            panic!("expected in-month cell");
        };
        let suite = &entries[1];
        // Both flags apply; sold-out keeps the visual class.
        assert!(suite.sold_out && suite.suspended);
        assert_eq!(suite.css_class, "stock-zero");

        // The suspended day-8 row with stock left shows both the count and
        // the badge.
        let DayCell::Day { entries, .. } = day_cell(&grid, 8) else {
            panic!("expected in-month cell");
        };
        assert!(entries[0].suspended);
        assert!(!entries[0].sold_out);
        assert_eq!(entries[0].css_class, "stock-tag");
    }

    #[test]
    fn test_placeholder_cells_have_no_data() {
        let grid = project(
            &create_test_ledger(),
            "Seaside Resort",
            MonthCursor::new(2025, 3),
            CalendarView::Price,
            Weekday::Sun,
            &order(),
        );
        for cell in grid.weeks.iter().flatten() {
            if let DayCell::Outside = cell {
                assert_eq!(cell.css_class(), "other-month");
            }
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(999), "999");
        assert_eq!(format_price(1_000), "1,000");
        assert_eq!(format_price(100_000), "100,000");
        assert_eq!(format_price(12_345_678), "12,345,678");
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
