// ⚠️ Errors - Malformed input fails fast, everything else degrades silently

use crate::accounts::AccountCode;
use crate::snapshot::Collection;
use std::path::PathBuf;
use thiserror::Error;

/// Snapshot shape errors
///
/// Calculators never return these. They come from loading and routing, where
/// a malformed record means upstream data cannot be safely approximated.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {collection} record {record}: {reason}")]
    MalformedRecord {
        collection: Collection,
        /// Position plus id when one could be read, e.g. `#3 (id=P001)`
        record: String,
        reason: String,
    },

    #[error("collection {0} must be an array of records")]
    NotAnArray(Collection),

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("snapshot is not a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Rejected journal postings and sale bookings
#[derive(Debug, Error, PartialEq)]
pub enum PostingError {
    #[error("posting amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("debit and credit both reference account {0}")]
    SameAccount(AccountCode),

    #[error("sale quantity must be positive, got {0}")]
    NonPositiveQuantity(f64),

    #[error("product '{0}' not found")]
    UnknownProduct(String),
}
