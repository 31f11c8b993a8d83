//! Error types for the config store.

/// Errors produced by config store reads and writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: &'static str },
}
