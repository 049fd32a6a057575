// Rate & Inventory Ledger - Core Library
// Daily price/stock records for lodging products, published to an external
// booking channel as a fixed-column spreadsheet.

pub mod error;
pub mod catalog;
pub mod staging;
pub mod ledger;
pub mod calendar;
pub mod store;
pub mod export;
pub mod session;

// Re-export commonly used types
pub use error::{ErrorKind, LedgerError, Result};
pub use catalog::{Catalog, MoveDirection, Product};
pub use staging::{date_label, expand_range, parse_label, DateBuffer};
pub use ledger::{Ledger, ProductSetting, RateRow, SaleStatus, DEFAULT_STOCK};
pub use calendar::{
    format_price, weekday_abbrev, CalendarView, CellEntry, DayCell, MonthCursor, MonthGrid,
};
pub use store::{
    ledger_table, load_catalog, load_ledger_rows, save_catalog, save_hotels, save_ledger_rows,
    save_products, CsvTableStore, TableStore,
};
pub use export::{export_file_name, export_rows, write_export, EXPORT_COLUMNS, EXPORT_HEADER};
pub use session::{Session, ViewMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
