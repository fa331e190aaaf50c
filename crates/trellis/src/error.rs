//! Error type for table construction and rendering.
//!
//! Invalid arguments and sink failures are reported through [`Error`];
//! group-chart linkage violations are caller contract bugs and panic instead
//! (see [`crate::Table::group_lines`] for the linkage rules).

use thiserror::Error;

/// Error type for all fallible table operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A handle does not resolve: the entity was removed, or the handle
    /// belongs to another table.
    #[error("stale handle: {0}")]
    StaleHandle(&'static str),

    /// An argument violates the data-model invariants (bad index, conflicting
    /// parent/group link, empty table, ...). The operation left no partial
    /// mutation behind.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Writing to the output sink failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
