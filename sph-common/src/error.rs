//! Common error types for the SPH bridge

use thiserror::Error;

/// Common result type for SPH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds raised while processing one sample notification
#[derive(Error, Debug)]
pub enum Error {
    /// Instrument label did not split into two integer tokens
    #[error("Label format error: {0:?} is not '<order_number> <sample_id>'")]
    LabelFormat(String),

    /// No order/sample row for the key
    #[error("Not found: no order context for order {order_number} sample {sample_id}")]
    NotFound { order_number: i64, sample_id: i64 },

    /// More than one order/sample row for the key
    #[error("Ambiguous match: {rows} order context rows for order {order_number} sample {sample_id}")]
    AmbiguousMatch {
        order_number: i64,
        sample_id: i64,
        rows: usize,
    },

    /// Size descriptor has no entry in the selected volume table
    #[error("Lookup key error: size {descriptor:?} (key {key:?}) not in {bucket} table")]
    LookupKey {
        bucket: &'static str,
        descriptor: String,
        key: String,
    },

    /// No decision-tree branch matched the order context
    #[error("Unclassified sample: service {service_type:?}, DNA type {dna_type:?}, size {sample_size:?}")]
    UnclassifiedSample {
        service_type: String,
        dna_type: String,
        sample_size: String,
    },

    /// Could not connect or authenticate against the relational store
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    /// Update statement matched no row
    #[error("No matching record to update for order {order_number} sample {sample_id}")]
    NoMatchingRecord { order_number: i64, sample_id: i64 },

    /// Statement failed on an established connection
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Sample fetch from the instrument failed
    #[error("Instrument error: {0}")]
    Instrument(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable short name of the failure kind, used in status lines
    pub fn kind(&self) -> &'static str {
        match self {
            Error::LabelFormat(_) => "label-format",
            Error::NotFound { .. } => "not-found",
            Error::AmbiguousMatch { .. } => "ambiguous-match",
            Error::LookupKey { .. } => "lookup-key",
            Error::UnclassifiedSample { .. } => "unclassified-sample",
            Error::StoreUnavailable(_) => "store-unavailable",
            Error::NoMatchingRecord { .. } => "no-matching-record",
            Error::Database(_) => "database",
            Error::Instrument(_) => "instrument",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_are_distinct() {
        let errors = [
            Error::LabelFormat("abc 1".to_string()),
            Error::NotFound { order_number: 1, sample_id: 2 },
            Error::AmbiguousMatch { order_number: 1, sample_id: 2, rows: 2 },
            Error::LookupKey { bucket: "pcr", descriptor: "x".to_string(), key: String::new() },
            Error::UnclassifiedSample {
                service_type: "SeqOther".to_string(),
                dna_type: String::new(),
                sample_size: String::new(),
            },
            Error::NoMatchingRecord { order_number: 1, sample_id: 2 },
            Error::Instrument("timeout".to_string()),
            Error::Config("bad".to_string()),
        ];

        let mut kinds: Vec<&str> = errors.iter().map(Error::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_display_names_key() {
        let err = Error::NotFound { order_number: 960254, sample_id: 1 };
        let msg = err.to_string();
        assert!(msg.contains("960254"));
        assert!(msg.contains("sample 1"));
    }
}
