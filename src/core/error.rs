use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, emitting or reading an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UblError {
    /// Attachment source could not be read.
    #[error("failed to read attachment {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML generation or decoding error.
    #[error("XML error: {0}")]
    Xml(String),

    /// A numeric or date field could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A broken rollup invariant reported by [`Invoice::check_totals`](crate::core::Invoice::check_totals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsMismatch {
    /// Name of the figure that disagrees (e.g. "TaxInclusiveAmount").
    pub field: &'static str,
    /// Human-readable description including both values.
    pub message: String,
}

impl std::fmt::Display for TotalsMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
