//! Corpus loading

use std::path::Path;

use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::product::ProductRecord;

/// Load the product corpus from a CSV file.
///
/// The header must contain all twelve [`ProductRecord`] columns; order is
/// irrelevant and extra columns are ignored. A missing column or a malformed
/// row is fatal rather than recoverable — downstream statistics assume a
/// complete, trustworthy corpus.
pub fn load_corpus(path: impl AsRef<Path>) -> CoreResult<Vec<ProductRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    for column in ProductRecord::COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CoreError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: ProductRecord = row?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(CoreError::EmptyCorpus);
    }

    info!(
        "Loaded {} corpus records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}
