// Ledger - canonical table of dated price/stock/status facts
// One row per (date, hotel, product); commits upsert with last-write-wins.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Stock applied when the operator leaves the field untouched.
pub const DEFAULT_STOCK: u32 = 5;

// ============================================================================
// SALE STATUS
// ============================================================================

/// Whether a row is on sale. The external channel encodes this as Y/N;
/// that encoding stays at the store/export boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
    Open,
    Suspended,
}

impl SaleStatus {
    /// Channel wire flag: `Y` = open for sale, `N` = suspended.
    pub fn channel_flag(&self) -> &'static str {
        match self {
            SaleStatus::Open => "Y",
            SaleStatus::Suspended => "N",
        }
    }

    pub fn from_channel_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "Y" | "y" => Some(SaleStatus::Open),
            "N" | "n" => Some(SaleStatus::Suspended),
            _ => None,
        }
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Open
    }
}

// ============================================================================
// RATE ROW
// ============================================================================

/// One ledger fact: the rate and remaining stock of a product on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRow {
    pub date: NaiveDate,
    pub hotel: String,
    pub product: String,
    pub price: u32,
    pub stock: u32,
    pub status: SaleStatus,
}

impl RateRow {
    fn key(&self) -> (NaiveDate, &str, &str) {
        (self.date, self.hotel.as_str(), self.product.as_str())
    }
}

/// Per-product input for a bulk commit. Price stays optional until
/// validation; stock defaults to `DEFAULT_STOCK` like the entry form does.
#[derive(Debug, Clone)]
pub struct ProductSetting {
    pub product: String,
    pub price: Option<u32>,
    pub stock: u32,
    pub status: SaleStatus,
}

impl ProductSetting {
    pub fn new(product: &str) -> Self {
        ProductSetting {
            product: product.to_string(),
            price: None,
            stock: DEFAULT_STOCK,
            status: SaleStatus::Open,
        }
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// LEDGER
// ============================================================================

/// Canonical fact table. Key uniqueness is an invariant: the only write
/// paths are keyed upserts, and bulk replacement collapses duplicates.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    rows: Vec<RateRow>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger { rows: Vec::new() }
    }

    /// Insert-or-replace by (date, hotel, product). Replacement is whole-row;
    /// there is no partial-field merge.
    pub fn upsert(&mut self, row: RateRow) {
        match self.rows.iter_mut().find(|r| r.key() == row.key()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Merge staged dates and per-product settings into the ledger.
    ///
    /// Validation runs completely before any mutation: dates present,
    /// products present, every price filled in. On success every
    /// (date, product) pair is upserted and the number of rows written is
    /// returned.
    pub fn commit(
        &mut self,
        hotel: &str,
        dates: &[NaiveDate],
        settings: &[ProductSetting],
    ) -> Result<usize> {
        if dates.is_empty() {
            return Err(LedgerError::MissingDates);
        }
        if settings.is_empty() {
            return Err(LedgerError::MissingProducts);
        }
        let mut resolved = Vec::with_capacity(settings.len());
        for s in settings {
            match s.price {
                Some(price) => resolved.push((s, price)),
                None => return Err(LedgerError::MissingPrice(s.product.clone())),
            }
        }

        for date in dates {
            for (s, price) in &resolved {
                self.upsert(RateRow {
                    date: *date,
                    hotel: hotel.to_string(),
                    product: s.product.clone(),
                    price: *price,
                    stock: s.stock,
                    status: s.status,
                });
            }
        }
        Ok(dates.len() * resolved.len())
    }

    /// Direct single-row edit from the list view. Same upsert rule as
    /// commit; the price-required business rule is not re-checked here,
    /// only the field types constrain the values.
    pub fn edit_row(&mut self, row: RateRow) {
        self.upsert(row);
    }

    /// All rows for one hotel, ordered by (date, catalog product position).
    /// Rows whose product is missing from `product_order` sort after the
    /// known ones on their date.
    pub fn rows_for(&self, hotel: &str, product_order: &[String]) -> Vec<RateRow> {
        let mut rows: Vec<RateRow> = self
            .rows
            .iter()
            .filter(|r| r.hotel == hotel)
            .cloned()
            .collect();
        sort_rows(&mut rows, product_order);
        rows
    }

    /// `rows_for` narrowed to a single month; feeds the calendar projector.
    pub fn rows_for_month(
        &self,
        hotel: &str,
        year: i32,
        month: u32,
        product_order: &[String],
    ) -> Vec<RateRow> {
        self.rows_for(hotel, product_order)
            .into_iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .collect()
    }

    /// Replace every row of one hotel with rows from the external store.
    /// The store enforces nothing, so residual duplicate keys are collapsed
    /// here keeping the last occurrence (the most recently written row).
    pub fn replace_hotel_rows(&mut self, hotel: &str, rows: Vec<RateRow>) {
        self.rows.retain(|r| r.hotel != hotel);
        for row in rows {
            self.upsert(row);
        }
    }

    /// Purge every row of a hotel. Returns how many were dropped.
    pub fn remove_hotel_rows(&mut self, hotel: &str) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.hotel != hotel);
        before - self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Order rows by (date ascending, catalog position ascending). Unknown
/// products get the maximum position so they land after known ones; the
/// sort is stable so their relative order by date survives.
pub fn sort_rows(rows: &mut [RateRow], product_order: &[String]) {
    rows.sort_by_key(|r| {
        let position = product_order
            .iter()
            .position(|name| name == &r.product)
            .unwrap_or(usize::MAX);
        (r.date, position)
    });
}

// ============================================================================
// TESTS
// ============================================================================
