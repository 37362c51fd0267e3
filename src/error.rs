// error.rs - Error kinds shared by the alignment and clustering engine

use thiserror::Error;

/// Errors raised by alignment, distance and clustering operations
#[derive(Debug, Error)]
pub enum Error {
    /// Empty sequence where one is required, too few sequences, bad type tag, ...
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The traceback matrix is inconsistent with the sequences it was built for.
    /// Signals a bug upstream, never bad user input.
    #[error("corrupt traceback at row {row}, column {col}: {reason}")]
    CorruptTraceback {
        row: usize,
        col: usize,
        reason: String,
    },

    /// A symbol outside the active alphabet or scoring model
    #[error("unknown symbol '{symbol}' ({context})")]
    UnknownSymbol { symbol: char, context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read sequence table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn corrupt(row: usize, col: usize, reason: impl Into<String>) -> Self {
        Error::CorruptTraceback {
            row,
            col,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_symbol(symbol: u8, context: impl Into<String>) -> Self {
        Error::UnknownSymbol {
            symbol: symbol as char,
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
