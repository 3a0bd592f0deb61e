//! Export layer: tabular rendering of parsed results and the on-disk artifact store.

pub mod csv_format;
pub mod storage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub use csv_format::format_csv;
pub use storage::OutputStore;
