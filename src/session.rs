// Operator session - one explicit application-state struct per session
// Owns Catalog, Ledger, staging buffer, calendar cursor, and the store
// handle. Every operator command is a method; mutations that change
// persisted state flush the affected table. A failed flush surfaces as a
// Persistence error and leaves in-memory state ahead of the store; the
// operator retries the action.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Weekday};

use crate::calendar::{self, CalendarView, MonthCursor, MonthGrid};
use crate::catalog::{Catalog, MoveDirection, Product};
use crate::error::{LedgerError, Result};
use crate::export;
use crate::ledger::{Ledger, ProductSetting, RateRow, SaleStatus};
use crate::staging::DateBuffer;
use crate::store::{self, TableStore};

/// What the operator is looking at. The two calendar modes project the
/// ledger through the calendar module; the list view edits rows directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    PriceCalendar,
    StockCalendar,
}

impl ViewMode {
    pub fn calendar_view(&self) -> Option<CalendarView> {
        match self {
            ViewMode::List => None,
            ViewMode::PriceCalendar => Some(CalendarView::Price),
            ViewMode::StockCalendar => Some(CalendarView::Stock),
        }
    }
}

pub struct Session<S: TableStore> {
    store: S,
    catalog: Catalog,
    ledger: Ledger,
    buffer: DateBuffer,
    cursor: MonthCursor,
    view: ViewMode,
    week_start: Weekday,
    current_hotel: Option<String>,
}

impl<S: TableStore> Session<S> {
    /// Fresh session with nothing loaded. `today` seeds the calendar cursor.
    pub fn new(store: S, today: NaiveDate) -> Self {
        Session {
            store,
            catalog: Catalog::new(),
            ledger: Ledger::new(),
            buffer: DateBuffer::new(),
            cursor: MonthCursor::for_date(today),
            view: ViewMode::List,
            week_start: Weekday::Sun,
            current_hotel: None,
        }
    }

    /// Session hydrated from the store: catalog tables plus one ledger
    /// table per known hotel. Missing tables come back empty.
    pub fn load(store: S, today: NaiveDate) -> Result<Self> {
        let mut session = Session::new(store, today);
        session.catalog = store::load_catalog(&mut session.store)?;
        for hotel in session.catalog.hotels().to_vec() {
            let rows = store::load_ledger_rows(&mut session.store, &hotel)?;
            session.ledger.replace_hotel_rows(&hotel, rows);
        }
        Ok(session)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ------------------------------------------------------------------
    // Hotel selection
    // ------------------------------------------------------------------

    pub fn select_hotel(&mut self, name: &str) -> Result<()> {
        if !self.catalog.has_hotel(name) {
            return Err(LedgerError::HotelNotFound(name.to_string()));
        }
        self.current_hotel = Some(name.to_string());
        Ok(())
    }

    pub fn current_hotel(&self) -> Option<&str> {
        self.current_hotel.as_deref()
    }

    fn require_hotel(&self) -> Result<String> {
        self.current_hotel
            .clone()
            .ok_or(LedgerError::NoHotelSelected)
    }

    // ------------------------------------------------------------------
    // Catalog commands
    // ------------------------------------------------------------------

    pub fn add_hotel(&mut self, name: &str) -> Result<()> {
        self.catalog.add_hotel(name)?;
        store::save_hotels(&mut self.store, &self.catalog)
    }

    /// Remove a hotel, its products, and (operator-level cascade) its
    /// ledger rows, then flush all three tables.
    pub fn remove_hotel(&mut self, name: &str) -> Result<()> {
        self.catalog.remove_hotel(name)?;
        self.ledger.remove_hotel_rows(name);
        if self.current_hotel.as_deref() == Some(name) {
            self.current_hotel = None;
        }
        store::save_hotels(&mut self.store, &self.catalog)?;
        store::save_products(&mut self.store, &self.catalog)?;
        store::save_ledger_rows(&mut self.store, name, &[])
    }

    pub fn add_product(&mut self, name: &str, code: Option<String>) -> Result<()> {
        let hotel = self.require_hotel()?;
        self.catalog.add_product(&hotel, name, code)?;
        store::save_products(&mut self.store, &self.catalog)
    }

    pub fn move_product(&mut self, index: usize, direction: MoveDirection) -> Result<bool> {
        let hotel = self.require_hotel()?;
        let moved = self.catalog.move_product(&hotel, index, direction);
        if moved {
            store::save_products(&mut self.store, &self.catalog)?;
        }
        Ok(moved)
    }

    pub fn remove_product(&mut self, index: usize) -> Result<bool> {
        let hotel = self.require_hotel()?;
        let removed = self.catalog.remove_product(&hotel, index);
        if removed {
            store::save_products(&mut self.store, &self.catalog)?;
        }
        Ok(removed)
    }

    /// Products of the selected hotel, display order. Empty when no hotel
    /// is selected.
    pub fn products(&self) -> Vec<&Product> {
        match &self.current_hotel {
            Some(hotel) => self.catalog.products_for(hotel),
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Date staging
    // ------------------------------------------------------------------

    pub fn stage_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        weekdays: &[Weekday],
    ) -> Result<usize> {
        self.buffer.stage(start, end, weekdays)
    }

    /// Deselect staged dates by replacing the buffer with `keep`.
    pub fn unstage(&mut self, keep: &[NaiveDate]) {
        self.buffer.retain_only(keep);
    }

    pub fn staged_dates(&self) -> Vec<NaiveDate> {
        self.buffer.dates()
    }

    pub fn staged_labels(&self) -> Vec<String> {
        self.buffer.labels()
    }

    // ------------------------------------------------------------------
    // Ledger commands
    // ------------------------------------------------------------------

    /// Merge the staged dates with per-product settings into the ledger,
    /// flush the hotel's table, and clear the buffer.
    ///
    /// The buffer survives a failed flush so the operator can retry the
    /// commit; the in-memory ledger keeps the new rows either way.
    pub fn commit(&mut self, settings: &[ProductSetting]) -> Result<usize> {
        let hotel = self.require_hotel()?;
        let dates = self.buffer.dates();
        let written = self.ledger.commit(&hotel, &dates, settings)?;
        self.flush_ledger(&hotel)?;
        self.buffer.clear();
        Ok(written)
    }

    /// Direct edit from the list view. The product column is immutable
    /// there, so the full key comes in and only the values change.
    pub fn edit_row(
        &mut self,
        date: NaiveDate,
        product: &str,
        price: u32,
        stock: u32,
        status: SaleStatus,
    ) -> Result<()> {
        let hotel = self.require_hotel()?;
        self.ledger.edit_row(RateRow {
            date,
            hotel: hotel.clone(),
            product: product.to_string(),
            price,
            stock,
            status,
        });
        self.flush_ledger(&hotel)
    }

    fn flush_ledger(&mut self, hotel: &str) -> Result<()> {
        let order = self.catalog.product_order(hotel);
        let rows = self.ledger.rows_for(hotel, &order);
        store::save_ledger_rows(&mut self.store, hotel, &rows)
    }

    /// Ledger rows of the selected hotel in list order. Empty when no
    /// hotel is selected.
    pub fn rows(&self) -> Vec<RateRow> {
        match &self.current_hotel {
            Some(hotel) => {
                let order = self.catalog.product_order(hotel);
                self.ledger.rows_for(hotel, &order)
            }
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Views and calendar navigation
    // ------------------------------------------------------------------

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_week_start(&mut self, weekday: Weekday) {
        self.week_start = weekday;
    }

    pub fn next_month(&mut self) {
        self.cursor.next_month();
    }

    pub fn prev_month(&mut self) {
        self.cursor.prev_month();
    }

    pub fn month_label(&self) -> String {
        self.cursor.label()
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    /// Project the selected hotel's rows for the cursor month.
    pub fn month_grid(&self, view: CalendarView) -> Result<MonthGrid> {
        let hotel = self.require_hotel()?;
        let order = self.catalog.product_order(&hotel);
        Ok(calendar::project(
            &self.ledger,
            &hotel,
            self.cursor,
            view,
            self.week_start,
            &order,
        ))
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Write the selected hotel's upload file into `dir`.
    pub fn export_to(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        let hotel = self.require_hotel()?;
        export::write_export_file(dir, &self.rows(), &self.catalog, &hotel, today)
    }
}

// ============================================================================
// TESTS
// ============================================================================
