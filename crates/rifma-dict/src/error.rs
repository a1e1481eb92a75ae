//! Typed error surfaces for the ingester and the record store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read dictionary file {path:?}: {source}")]
    Io { path: std::path::PathBuf, source: std::io::Error },
    #[error("dictionary file is not valid Windows-1251 text")]
    Decode,
    #[error("malformed line {line} in article #{article}: {reason}")]
    MalformedLine { line: usize, article: usize, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("record not found")]
    NotFound,
}
