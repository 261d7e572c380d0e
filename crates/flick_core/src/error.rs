//! Error types for the Flick engine

use thiserror::Error;

/// Errors that can occur in Flick public operations
///
/// The animation path itself never errors: numeric guards saturate and
/// degenerate inputs settle immediately. These variants cover the fallible
/// control-plane operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An item index was outside the carousel's item range
    #[error("item index {index} out of range ({len} items)")]
    ItemOutOfRange { index: usize, len: usize },

    /// The target view has already been torn down
    #[error("view has been torn down")]
    ViewDetached,

    /// Configuration rejected at construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Flick operations
pub type Result<T> = std::result::Result<T, Error>;
