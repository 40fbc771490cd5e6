use std::path::PathBuf;

/// Why a single data line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    #[error("expected {expected} columns, found more")]
    TooManyColumns { expected: usize },

    #[error("key column is empty or not valid UTF-8")]
    InvalidKey,

    #[error("invalid decimal value {0:?}")]
    InvalidValue(String),

    #[error(transparent)]
    Overflow(#[from] TotalOverflow),
}

/// Adding a value would push a running total past `Decimal::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("running total would overflow")]
pub struct TotalOverflow;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("input {} unavailable: {source}", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in {}: {reason}", path.display())]
    MalformedLine {
        path: PathBuf,
        line: u64,
        #[source]
        reason: LineError,
    },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("merged total for key {0} would overflow")]
    Overflow(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
