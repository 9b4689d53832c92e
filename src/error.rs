//! Error definitions.
use thiserror::Error;

/// Errors surfaced by [`OpenAddressingMap`](crate::OpenAddressingMap).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Capacity was negative. Only reachable through untyped inputs, see
    /// [`Config`](crate::Config)'s `TryFrom<(i64, f64)>`.
    #[error("Illegal capacity: {0}")]
    InvalidCapacity(i64),

    /// Load factor was zero, negative, NaN or infinite.
    #[error("Illegal load factor: {0}")]
    InvalidLoadFactor(f64),

    /// A probe walk visited `attempts` buckets without reaching the key or an empty slot.
    ///
    /// Means the probing strategy's capacity rule does not produce a full permutation of the
    /// buckets.
    #[error("Probe sequence exhausted after {attempts} attempts on a table of capacity {capacity}")]
    InvariantViolation { attempts: usize, capacity: usize },
}

impl Error {
    /// Whether the error was caused by an invalid table configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidCapacity(_) | Error::InvalidLoadFactor(_))
    }
}

/// Map result.
pub type Result<T> = std::result::Result<T, Error>;
