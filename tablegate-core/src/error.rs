//! Error types for filter construction

use thiserror::Error;

/// Errors raised while building a [`crate::FilterSpec`] from its wire form.
///
/// Compilation itself never fails; malformed input is rejected here, before
/// a spec exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Filter spec must be a JSON object, got {found}")]
    NotAnObject { found: String },

    #[error("Numeric filter on {field} has non-numeric value {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Filter spec is not valid JSON: {reason}")]
    Json { reason: String },
}

pub type FilterResult<T> = Result<T, FilterError>;
