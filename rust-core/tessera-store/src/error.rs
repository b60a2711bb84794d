// SPDX-License-Identifier: MIT
//! Store error types.

use thiserror::Error;

/// Errors that can occur at the storage boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock protecting store state was poisoned by a panicking
    /// writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The backend rejected or failed an operation.
    #[error("backend error: {0}")]
    Backend(String),

    /// An I/O error occurred in the underlying storage layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
