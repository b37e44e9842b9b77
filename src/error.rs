//! Error types for h5value operations.

use thiserror::Error;

/// Errors that can abort a conversion.
///
/// Every variant aborts the whole conversion; no partial value is returned.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input failed. Displays the operating system's message.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The parser adapter could not produce a tree.
    #[error("Failed to parse")]
    ParseFailure,

    /// The source tree broke the adapter contract.
    #[error("Invalid node type: {0}")]
    InvalidNode(String),

    /// Elements nest deeper than the configured limit.
    #[error("element nesting too deep: depth {depth} exceeds limit {limit}")]
    NestingTooDeep { depth: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
