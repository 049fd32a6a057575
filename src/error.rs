// Error taxonomy for the rate ledger
// Three recovery families: validation (operator fixes input), not-found
// (lazily created), persistence (operator retries the action).

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no weekdays selected")]
    EmptyWeekdays,

    #[error("no dates staged for commit")]
    MissingDates,

    #[error("no products selected for commit")]
    MissingProducts,

    #[error("price missing for product '{0}'")]
    MissingPrice(String),

    #[error("hotel '{0}' already exists")]
    DuplicateHotel(String),

    #[error("product '{0}' already registered for this hotel")]
    DuplicateProduct(String),

    #[error("hotel '{0}' not found")]
    HotelNotFound(String),

    #[error("no hotel selected")]
    NoHotelSelected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Recovery family of an error, per the session's error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad operator input. Reported, nothing mutated.
    Validation,
    /// Missing structure. Recovered by creating it empty.
    NotFound,
    /// External store failure. In-memory state may now be ahead of the
    /// persisted state; the operator retries the triggering action.
    Persistence,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidDateRange { .. }
            | LedgerError::EmptyWeekdays
            | LedgerError::MissingDates
            | LedgerError::MissingProducts
            | LedgerError::MissingPrice(_)
            | LedgerError::DuplicateHotel(_)
            | LedgerError::DuplicateProduct(_)
            | LedgerError::NoHotelSelected => ErrorKind::Validation,
            LedgerError::HotelNotFound(_) => ErrorKind::NotFound,
            LedgerError::Io(_) | LedgerError::Csv(_) => ErrorKind::Persistence,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
