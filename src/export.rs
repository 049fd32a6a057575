// Export Formatter - fixed 13-column upload layout for the booking channel
// The column positions are a hard external contract: 1 date+weekday,
// 2 product, 7 price, 9 stock, 10 code, 13 Y/N status. Everything else blank.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::ledger::RateRow;
use crate::staging::date_label;

pub const EXPORT_COLUMNS: usize = 13;

/// Header row with the channel's column letters, as the upload template
/// labels them.
pub const EXPORT_HEADER: [&str; EXPORT_COLUMNS] = [
    "Date(A)",
    "Product(B)",
    "C",
    "D",
    "E",
    "F",
    "Price(G)",
    "H",
    "Stock(I)",
    "Code(J)",
    "K",
    "L",
    "Status(M)",
];

/// Map one ledger row into the 13 positional columns.
pub fn export_row(row: &RateRow, code: Option<&str>) -> [String; EXPORT_COLUMNS] {
    let mut cells: [String; EXPORT_COLUMNS] = Default::default();
    cells[0] = date_label(row.date);
    cells[1] = row.product.clone();
    cells[6] = row.price.to_string();
    cells[8] = row.stock.to_string();
    cells[9] = code.unwrap_or_default().to_string();
    cells[12] = row.status.channel_flag().to_string();
    cells
}

/// Map a hotel's ledger rows (already in list order) to export rows,
/// resolving product codes from the catalog.
pub fn export_rows(
    rows: &[RateRow],
    catalog: &Catalog,
    hotel: &str,
) -> Vec<[String; EXPORT_COLUMNS]> {
    let codes: HashMap<&str, &str> = catalog
        .products_for(hotel)
        .into_iter()
        .filter_map(|p| Some((p.name.as_str(), p.code.as_deref()?)))
        .collect();

    rows.iter()
        .map(|row| export_row(row, codes.get(row.product.as_str()).copied()))
        .collect()
}

/// Serialize export rows as CSV (header + data) into any writer.
pub fn write_export<W: Write>(
    writer: W,
    rows: &[RateRow],
    catalog: &Catalog,
    hotel: &str,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for record in export_rows(rows, catalog, hotel) {
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Download filename convention: `[<hotel>]_upload_<date>.csv`.
pub fn export_file_name(hotel: &str, today: NaiveDate) -> String {
    format!("[{hotel}]_upload_{}.csv", today.format("%Y-%m-%d"))
}

/// Write the upload file into `dir` and return its path.
pub fn write_export_file(
    dir: &Path,
    rows: &[RateRow],
    catalog: &Catalog,
    hotel: &str,
    today: NaiveDate,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(hotel, today));
    let file = std::fs::File::create(&path)?;
    write_export(file, rows, catalog, hotel)?;
    Ok(path)
}

// ============================================================================
// TESTS
// ============================================================================
