use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Could not load CSV: {0}")]
    Load(String),

    #[error("Unknown column: {0}")]
    Column(String),

    #[error("Amount in data row {row} is not a number: {value:?}")]
    Parse { row: usize, value: String },

    #[error("Sum of amounts overflowed at data row {row}")]
    Overflow { row: usize },

    #[error("{field} count must be a whole number of 0 or more, got {value:?}")]
    Validation { field: &'static str, value: String },

    #[error("No CSV loaded. Load a file before reconciling.")]
    NoDataset,

    #[error("Invalid date: {0} (expected DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, TallyError>;
