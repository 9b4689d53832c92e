//! Table sizing parameters.

use crate::error::{Error, Result};

/// Capacity used when none is given, and the floor for any requested capacity.
pub const DEFAULT_CAPACITY: usize = 7;

/// Fraction of buckets (live or tombstoned) that may be used before the table grows.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.65;

/// Initial capacity and load factor of a map.
///
/// The capacity is a request: it is raised to [`DEFAULT_CAPACITY`] and then adjusted by the
/// probing strategy, so [`OpenAddressingMap::capacity`](crate::OpenAddressingMap::capacity)
/// may report a larger number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub capacity: usize,
    pub load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Rejects load factors that are not finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }

    /// Requested capacity raised to the default floor.
    pub(crate) fn min_capacity(&self) -> usize {
        self.capacity.max(DEFAULT_CAPACITY)
    }
}

/// Builds a validated config from raw `(capacity, load_factor)` values.
impl TryFrom<(i64, f64)> for Config {
    type Error = Error;

    fn try_from((capacity, load_factor): (i64, f64)) -> Result<Self> {
        let capacity = usize::try_from(capacity).map_err(|_| Error::InvalidCapacity(capacity))?;
        let config = Config {
            capacity,
            load_factor,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Number of used buckets that triggers a resize.
///
/// Never reaches `capacity`, so at least one bucket stays empty and every probe walk can stop.
pub(crate) fn threshold(capacity: usize, load_factor: f64) -> usize {
    let t = (capacity as f64 * load_factor).round();
    let limit = capacity.saturating_sub(1);
    if t >= limit as f64 {
        limit
    } else {
        t as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.capacity, 7);
        assert_eq!(c.load_factor, 0.65);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn illegal_raw_inputs_are_configuration_errors() {
        for raw in [(-3i64, 0.5), (5, f64::INFINITY), (6, -0.5), (6, 0.0), (6, f64::NAN)] {
            let err = Config::try_from(raw).unwrap_err();
            assert!(err.is_configuration(), "{raw:?} -> {err:?}");
        }
        assert_eq!(
            Config::try_from((-3i64, 0.5)).unwrap_err(),
            Error::InvalidCapacity(-3)
        );
    }

    #[test]
    fn legal_raw_inputs_round_trip() {
        let c = Config::try_from((12i64, 0.5)).unwrap();
        assert_eq!(c, Config::new().capacity(12).load_factor(0.5));
    }

    #[test]
    fn min_capacity_floor() {
        assert_eq!(Config::new().capacity(0).min_capacity(), DEFAULT_CAPACITY);
        assert_eq!(Config::new().capacity(100).min_capacity(), 100);
    }

    #[test]
    fn threshold_rounds_and_keeps_an_empty_bucket() {
        assert_eq!(threshold(7, 0.65), 5);
        assert_eq!(threshold(11, 0.5), 6);
        assert_eq!(threshold(8, 1.0), 7);
        assert_eq!(threshold(8, 10.0), 7);
    }
}
