use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoNearbyError {
    /// Malformed or out-of-range point data, reported when building or importing an index.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed query parameters.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A search was requested before any point set was loaded.
    #[error("No data loaded. Please upload points first.")]
    NoIndex,
}

pub type Result<T> = std::result::Result<T, GeoNearbyError>;
