//! # Global engine configuration.
//!
//! Provides [`Config`] centralized settings for the visualizer core.
//!
//! Config is used in three places:
//! 1. **Visualizer creation**: `Visualizer::builder(config)`
//! 2. **Array validation**: every generate / custom array is checked against `max_size`
//! 3. **Pacing**: `step` seeds the live [`Speed`](crate::Speed) handle
//!
//! ## Sentinel values
//! - `step = 0s` → no sleep between primitive steps (the run still yields)

use std::ops::Range;
use std::time::Duration;

use crate::error::SortError;

/// Global configuration for the visualizer core.
///
/// ## Field semantics
/// - `max_size`: Largest accepted array (`>= 1`)
/// - `default_size`: Size used by [`Visualizer::request_generate_default`](crate::Visualizer::request_generate_default)
/// - `value_range`: Half-open range random values are drawn from
/// - `step`: Initial pause between primitive steps (`0s` = yield only)
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of bars.
    pub max_size: usize,

    /// Array size used when none is given.
    pub default_size: usize,

    /// Range of randomly generated values.
    ///
    /// Values are bar heights; the lower bound keeps every bar visible.
    pub value_range: Range<u32>,

    /// Initial step interval, adjustable at runtime through `Speed`.
    pub step: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Every comparison produces several events; slow listeners that lag behind
    /// more than `bus_capacity` messages skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Checks a requested array length against `1..=max_size`.
    pub fn validate_size(&self, len: usize) -> Result<(), SortError> {
        if len == 0 || len > self.max_size {
            return Err(SortError::InvalidSize {
                len,
                max: self.max_size,
            });
        }
        Ok(())
    }

    /// Returns the value range, widened to a single value if it is empty.
    #[inline]
    pub fn value_range_checked(&self) -> Range<u32> {
        if self.value_range.is_empty() {
            self.value_range.start..self.value_range.start.saturating_add(1)
        } else {
            self.value_range.clone()
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_size = 200`
    /// - `default_size = 50`
    /// - `value_range = 10..360`
    /// - `step = 50ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_size: 200,
            default_size: 50,
            value_range: 10..360,
            step: Duration::from_millis(50),
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size_bounds() {
        let cfg = Config::default();
        assert!(cfg.validate_size(1).is_ok());
        assert!(cfg.validate_size(200).is_ok());
        assert_eq!(
            cfg.validate_size(0),
            Err(SortError::InvalidSize { len: 0, max: 200 })
        );
        assert_eq!(
            cfg.validate_size(201),
            Err(SortError::InvalidSize { len: 201, max: 200 })
        );
    }

    #[test]
    fn test_empty_value_range_widens() {
        let cfg = Config {
            value_range: 7..7,
            ..Config::default()
        };
        assert_eq!(cfg.value_range_checked(), 7..8);
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
