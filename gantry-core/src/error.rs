//! Core error types

use thiserror::Error;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by corpus loading and results persistence
#[derive(Error, Debug)]
pub enum CoreError {
    /// IO error reading the corpus or writing the results table
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed corpus row or results serialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The corpus header is missing a mandatory column
    #[error("Corpus is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// The corpus parsed cleanly but contains no records
    #[error("Corpus contains no records")]
    EmptyCorpus,
}
