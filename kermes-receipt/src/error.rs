//! Error types for receipt printing

use kermes_printer::PrintError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Cart JSON on stdin could not be parsed
    #[error("Invalid cart input: {0}")]
    Input(#[from] serde_json::Error),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;
