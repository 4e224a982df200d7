//! Contract-violation errors raised by the runtime containers.

use thiserror::Error;

/// Result type alias using `RuntimeError`.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Every variant is detected before the operation mutates anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// pop/first/last on an empty list, or a codepoint taken from an empty string
    #[error("can't {operation} from an empty container")]
    EmptyContainer { operation: &'static str },

    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },

    #[error("key not found from mapping")]
    KeyNotFound,

    #[error("item not found from list")]
    ItemNotFound,

    /// find_only/delete_only matched more than once
    #[error("expected exactly one match, found {count}")]
    DuplicateMatch { count: usize },

    #[error("invalid utf-8 at byte {position}")]
    InvalidEncoding { position: usize },

    #[error("slice boundary {index} falls inside a codepoint")]
    MidCodepointSlice { index: usize },

    #[error("invalid number: {input:?}")]
    InvalidNumber { input: String },
}

impl RuntimeError {
    pub(crate) fn empty(operation: &'static str) -> Self {
        RuntimeError::EmptyContainer { operation }
    }

    pub(crate) fn index(index: i64, length: usize) -> Self {
        RuntimeError::IndexOutOfRange { index, length }
    }

    pub(crate) fn invalid_number(input: impl Into<String>) -> Self {
        RuntimeError::InvalidNumber {
            input: input.into(),
        }
    }
}
