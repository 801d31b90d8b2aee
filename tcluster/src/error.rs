//! Error taxonomy for the triality cluster sampler.

use thiserror::Error;

/// Catch-all error for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A lattice or run configuration was rejected before any state was
    /// allocated.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An invariant re-derived by the validators disagreed with the
    /// incrementally maintained counter. This indicates a defect in the
    /// update kernel, not a user error.
    #[error("invariant violation: {name} (expected {expected}, observed {observed})")]
    Invariant {
        /// Name of the invariant that failed, e.g. `"quark conservation"`.
        name: &'static str,
        /// The value the invariant was supposed to hold.
        expected: i64,
        /// The value actually recounted from primary state.
        observed: i64,
    },
    /// An output file could not be written.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// Path of the file that failed.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
