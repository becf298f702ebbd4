//! Tuning knobs for map generation.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use skirmish_core::{GRID_COLUMNS, GRID_ROWS};
use thiserror::Error;

/// Largest open-area window that fits the grid.
pub const MAX_WINDOW_SIZE: u32 = if GRID_ROWS < GRID_COLUMNS {
    GRID_ROWS
} else {
    GRID_COLUMNS
};

/// Adjustable parameters of the generator. Missing fields fall back to the
/// defaults when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Smallest number of obstacle clusters the generator aims for.
    pub cluster_min: u32,
    /// Largest number of obstacle clusters the generator aims for.
    pub cluster_max: u32,
    /// Attempts shared by all cluster placements before giving up.
    pub cluster_attempts: u32,
    /// Side length of the open-area window.
    pub window_size: u32,
    /// Obstacles dropped into a fully open window.
    pub window_fill: u32,
    /// Attempts shared by every column of the separation step.
    pub separation_attempts: u32,
}

impl GenerationConfig {
    /// Cluster target range.
    #[must_use]
    pub fn cluster_range(&self) -> RangeInclusive<u32> {
        self.cluster_min..=self.cluster_max
    }

    /// Rejects values the generator cannot work with.
    pub fn validate(&self) -> Result<(), GenerationConfigError> {
        if self.cluster_min > self.cluster_max {
            return Err(GenerationConfigError::ClusterRange {
                min: self.cluster_min,
                max: self.cluster_max,
            });
        }
        if self.window_size == 0 {
            return Err(GenerationConfigError::EmptyWindow);
        }
        if self.window_size > MAX_WINDOW_SIZE {
            return Err(GenerationConfigError::WindowTooLarge {
                size: self.window_size,
                limit: MAX_WINDOW_SIZE,
            });
        }
        if self.window_fill == 0 || self.window_fill > self.window_size * self.window_size {
            return Err(GenerationConfigError::WindowFill {
                fill: self.window_fill,
                size: self.window_size,
            });
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            cluster_min: 10,
            cluster_max: 19,
            cluster_attempts: 1_000,
            window_size: 4,
            window_fill: 4,
            separation_attempts: 1_000,
        }
    }
}

/// Errors raised when validating a [`GenerationConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GenerationConfigError {
    /// The cluster range is inverted.
    #[error("cluster range {min}..={max} is empty")]
    ClusterRange {
        /// Configured lower bound.
        min: u32,
        /// Configured upper bound.
        max: u32,
    },
    /// The open-area window has no cells.
    #[error("open-area window size must be positive")]
    EmptyWindow,
    /// The window does not fit the grid.
    #[error("open-area window size {size} exceeds the grid's {limit} rows")]
    WindowTooLarge {
        /// Configured window side length.
        size: u32,
        /// Shorter side of the grid.
        limit: u32,
    },
    /// The fill count does not fit the window.
    #[error("cannot drop {fill} obstacles into a {size}x{size} window")]
    WindowFill {
        /// Configured fill count.
        fill: u32,
        /// Configured window side length.
        size: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GenerationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.cluster_range(), 10..=19);
    }

    #[test]
    fn inverted_cluster_range_is_rejected() {
        let config = GenerationConfig {
            cluster_min: 8,
            cluster_max: 3,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GenerationConfigError::ClusterRange { min: 8, max: 3 })
        );
    }

    #[test]
    fn oversized_window_fill_is_rejected() {
        let config = GenerationConfig {
            window_size: 2,
            window_fill: 5,
            ..GenerationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GenerationConfigError::WindowFill { fill: 5, size: 2 })
        ));
        let empty = GenerationConfig {
            window_size: 0,
            ..GenerationConfig::default()
        };
        assert_eq!(empty.validate(), Err(GenerationConfigError::EmptyWindow));
    }

    #[test]
    fn window_larger_than_the_grid_is_rejected() {
        let config = GenerationConfig {
            window_size: 70_000,
            window_fill: 4,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GenerationConfigError::WindowTooLarge {
                size: 70_000,
                limit: 13,
            })
        );

        let whole_height = GenerationConfig {
            window_size: 13,
            window_fill: 169,
            ..GenerationConfig::default()
        };
        assert_eq!(whole_height.validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{ "cluster_min": 2, "cluster_max": 4 }"#).expect("parses");
        assert_eq!(config.cluster_range(), 2..=4);
        assert_eq!(config.window_size, 4);
        assert_eq!(config.separation_attempts, 1_000);
    }
}
