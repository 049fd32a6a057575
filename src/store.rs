// Persistence Adapter - mirrors Catalog and Ledger into a tabular store
// One named table per hotel for ledger rows plus two global catalog tables.
// The store enforces no schema and has no transactions; every save is a
// full clear-and-rewrite of one table.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ledger::{RateRow, SaleStatus};

pub const HOTELS_TABLE: &str = "hotels";
pub const PRODUCTS_TABLE: &str = "products";

pub const HOTELS_HEADER: &[&str] = &["hotel"];
pub const PRODUCTS_HEADER: &[&str] = &["hotel", "name", "code"];
pub const LEDGER_HEADER: &[&str] = &["date", "hotel", "product", "price", "stock", "status"];

/// Name of a hotel's ledger table.
pub fn ledger_table(hotel: &str) -> String {
    format!("ledger_{hotel}")
}

// ============================================================================
// TABLE STORE
// ============================================================================

/// A store of named tables of string rows.
///
/// `read_table` lazily creates a missing table (header only) and returns an
/// empty row set; missing tables are never an error, only connection-level
/// failures are. `write_table` is a full replace: clear the table, rewrite
/// header and rows. A failure mid-write can leave the table truncated; that
/// risk is part of the contract and is not papered over here.
pub trait TableStore {
    /// Data rows of the table, header excluded. Creates the table with
    /// `header` if it does not exist yet.
    fn read_table(&mut self, name: &str, header: &[&str]) -> Result<Vec<Vec<String>>>;

    /// Replace the whole table with `header` + `rows`.
    fn write_table(&mut self, name: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()>;
}

// ============================================================================
// CSV-BACKED STORE
// ============================================================================

/// Table store backed by one CSV file per table inside a data directory.
pub struct CsvTableStore {
    dir: PathBuf,
}

impl CsvTableStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(CsvTableStore { dir })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn table_path(&self, name: &str) -> PathBuf {
        // Table names embed hotel names; keep anything filename-safe and
        // map the rest to '_'.
        let file: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.csv"))
    }
}

impl TableStore for CsvTableStore {
    fn read_table(&mut self, name: &str, header: &[&str]) -> Result<Vec<Vec<String>>> {
        let path = self.table_path(name);
        if !path.exists() {
            self.write_table(name, header, &[])?;
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    fn write_table(&mut self, name: &str, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(self.table_path(name))?;
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// CATALOG MAPPING
// ============================================================================

/// Load the hotel and product tables into a Catalog. Rows the store cannot
/// account for (blank name, too few columns) are skipped: the tables are
/// schemaless and a bad row must not take the whole catalog down.
pub fn load_catalog(store: &mut impl TableStore) -> Result<Catalog> {
    let hotel_rows = store.read_table(HOTELS_TABLE, HOTELS_HEADER)?;
    let hotels: Vec<String> = hotel_rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter(|name| !name.is_empty())
        .collect();

    let product_rows = store.read_table(PRODUCTS_TABLE, PRODUCTS_HEADER)?;
    let products: Vec<(String, String, Option<String>)> = product_rows
        .into_iter()
        .filter_map(|row| {
            let mut cells = row.into_iter();
            let hotel = cells.next()?;
            let name = cells.next()?;
            if hotel.is_empty() || name.is_empty() {
                return None;
            }
            let code = cells.next().filter(|c| !c.is_empty());
            Some((hotel, name, code))
        })
        .collect();

    let mut catalog = Catalog::new();
    catalog.replace(hotels, products);
    Ok(catalog)
}

pub fn save_hotels(store: &mut impl TableStore, catalog: &Catalog) -> Result<()> {
    let rows: Vec<Vec<String>> = catalog
        .hotels()
        .iter()
        .map(|h| vec![h.clone()])
        .collect();
    store.write_table(HOTELS_TABLE, HOTELS_HEADER, &rows)
}

pub fn save_products(store: &mut impl TableStore, catalog: &Catalog) -> Result<()> {
    let mut rows = Vec::new();
    for hotel in catalog.hotels() {
        for product in catalog.products_for(hotel) {
            rows.push(vec![
                product.hotel.clone(),
                product.name.clone(),
                product.code.clone().unwrap_or_default(),
            ]);
        }
    }
    store.write_table(PRODUCTS_TABLE, PRODUCTS_HEADER, &rows)
}

pub fn save_catalog(store: &mut impl TableStore, catalog: &Catalog) -> Result<()> {
    save_hotels(store, catalog)?;
    save_products(store, catalog)
}

// ============================================================================
// LEDGER MAPPING
// ============================================================================

fn parse_ledger_row(cells: &[String]) -> Option<RateRow> {
    if cells.len() < 6 {
        return None;
    }
    Some(RateRow {
        date: NaiveDate::parse_from_str(&cells[0], "%Y-%m-%d").ok()?,
        hotel: cells[1].clone(),
        product: cells[2].clone(),
        price: cells[3].parse().ok()?,
        stock: cells[4].parse().ok()?,
        status: SaleStatus::from_channel_flag(&cells[5])?,
    })
}

/// Load one hotel's ledger table. Unparseable rows are skipped, in keeping
/// with the schemaless store; a missing table comes back as zero rows.
pub fn load_ledger_rows(store: &mut impl TableStore, hotel: &str) -> Result<Vec<RateRow>> {
    let rows = store.read_table(&ledger_table(hotel), LEDGER_HEADER)?;
    Ok(rows.iter().filter_map(|r| parse_ledger_row(r)).collect())
}

/// Full-replace one hotel's ledger table.
pub fn save_ledger_rows(store: &mut impl TableStore, hotel: &str, rows: &[RateRow]) -> Result<()> {
    let records: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.date.format("%Y-%m-%d").to_string(),
                r.hotel.clone(),
                r.product.clone(),
                r.price.to_string(),
                r.stock.to_string(),
                r.status.channel_flag().to_string(),
            ]
        })
        .collect();
    store.write_table(&ledger_table(hotel), LEDGER_HEADER, &records)
}

// ============================================================================
// TESTS
// ============================================================================
