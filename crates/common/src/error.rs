use thiserror::Error;

/// Canonical ColumnFlow error taxonomy used across crates.
///
/// Classification guidance:
/// - [`CflError::Planning`]: query shape/name/type issues discovered before execution
/// - [`CflError::Layout`]: catalog metadata inconsistency (corrupt or mismatched schema state)
/// - [`CflError::InvalidConfig`]: catalog/config/environment contract violations
/// - [`CflError::Unsupported`]: syntactically valid but intentionally unimplemented behavior
/// - [`CflError::Io`]: raw filesystem IO failures from std APIs
#[derive(Debug, Error)]
pub enum CflError {
    /// Invalid or inconsistent configuration/catalog state.
    ///
    /// Examples:
    /// - malformed catalog JSON
    /// - invalid option values
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Query planning failures.
    ///
    /// Examples:
    /// - unknown table
    /// - plan shape does not match what the compiler expects
    #[error("planning error: {0}")]
    Planning(String),

    /// Physical layout derivation failures.
    ///
    /// Raised when an index references a column ordinal with no corresponding
    /// declared column. This signals corrupt metadata, not bad user input; it
    /// is never retried.
    #[error("layout error: {0}")]
    Layout(String),

    /// Transparent std IO failures.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Valid request for a feature/shape not implemented in current version.
    ///
    /// Examples:
    /// - DML operations other than INSERT handed to the append compiler
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Standard ColumnFlow result alias.
pub type Result<T> = std::result::Result<T, CflError>;
