//! Error type for the fallible surface of the crate: reading input and validating settings.
//!
//! Broken structural invariants inside the engines are bugs and panic instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// malformed hypergraph file, `line` is 1-based
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        Error::Parse {
            line,
            msg: msg.into(),
        }
    }
}
