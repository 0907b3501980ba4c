//! Error taxonomy for the simulation domain and the ledger boundary.

use std::io;

use thiserror::Error;

/// Errors raised by entity constructors, setters, and manager operations.
///
/// All variants are reported synchronously to the caller; none are
/// retried internally. A failed operation leaves the receiver unchanged.
#[derive(Debug, Error)]
pub enum EnergyError {
    /// A constructor or setter received an out-of-range or malformed value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A negative energy quantity was passed where only `>= 0` is allowed.
    #[error("negative energy quantity not allowed: {0}")]
    NegativeQuantity(f64),

    /// A battery discharge request exceeded the stored level.
    #[error("discharge exceeds available level: {requested:.2} > {available:.2}")]
    DischargeExceedsLevel {
        /// Quantity the caller asked to discharge.
        requested: f64,
        /// Level available at the time of the request.
        available: f64,
    },

    /// A multiplicative consumption adjustment factor was not strictly positive.
    #[error("adjustment factor must be > 0, got {0}")]
    InvalidFactor(f64),

    /// The manager was asked to operate on an entity that does not exist
    /// or does not support the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// I/O failures surfaced at the ledger boundary.
///
/// Ledger errors are values, never panics: the in-memory buffer is
/// retained so the caller can retry the flush later.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Reading or writing the ledger file failed.
    #[error("ledger {op} failed for \"{path}\": {source}")]
    Io {
        /// Operation that failed (`"flush"`, `"load"`, `"clear"`).
        op: &'static str,
        /// File path involved.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl LedgerError {
    pub(crate) fn io(op: &'static str, path: &std::path::Path, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.display().to_string(),
            source,
        }
    }
}
