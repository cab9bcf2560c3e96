//! Generation parameters
//!
//! Everything the generator needs to know is carried by one immutable
//! [`GenConfig`], handed by reference to every stage.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a [`GenConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Size of a fixed room, in tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSize {
    pub rows: i32,
    pub cols: i32,
}

impl RoomSize {
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

/// Inclusive range for a sampled room side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimRange {
    pub min: i32,
    pub max: i32,
}

impl DimRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// How rooms of one category are sampled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingProfile {
    pub dims: DimRange,
    /// Chance the sampled room is forced square
    pub square_chance: f64,
}

/// Parameters for one maze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Maze height in tiles
    pub rows: i32,
    /// Maze width in tiles
    pub cols: i32,
    pub start_room: RoomSize,
    pub end_room: RoomSize,
    /// Intermediate path rooms between start and end
    pub mid_rooms: usize,
    pub mid_dims: DimRange,
    pub mid_square_chance: f64,
    /// Rooms hanging off the path
    pub dead_ends: usize,
    pub dead_end_dims: DimRange,
    pub dead_end_square_chance: f64,
    /// Resamples allowed for candidates that overlap occupied tiles
    pub overlap_retries: u32,
    /// Resamples allowed for candidates that leave the grid
    pub bounds_retries: u32,
    /// Fuse overlapping rooms instead of stacking them
    pub merge_overlaps: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 32,
            start_room: RoomSize::new(1, 1),
            end_room: RoomSize::new(6, 6),
            mid_rooms: 0,
            mid_dims: DimRange::new(4, 6),
            mid_square_chance: 0.9,
            dead_ends: 0,
            dead_end_dims: DimRange::new(2, 4),
            dead_end_square_chance: 0.3,
            overlap_retries: 3,
            bounds_retries: 10,
            merge_overlaps: false,
        }
    }
}

impl GenConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: GenConfig = ron::from_str(&content)?;
        log::info!("Loaded generation config from {}", path.display());
        Ok(config)
    }

    pub fn path_profile(&self) -> SamplingProfile {
        SamplingProfile {
            dims: self.mid_dims,
            square_chance: self.mid_square_chance,
        }
    }

    pub fn dead_end_profile(&self) -> SamplingProfile {
        SamplingProfile {
            dims: self.dead_end_dims,
            square_chance: self.dead_end_square_chance,
        }
    }

    /// Reject parameter sets the generator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(ConfigError::Invalid(format!(
                "maze dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }

        for (name, size) in [("start", self.start_room), ("end", self.end_room)] {
            if size.rows <= 0 || size.cols <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "{} room dimensions must be positive, got {}x{}",
                    name, size.rows, size.cols
                )));
            }
            if size.rows > self.rows || size.cols > self.cols {
                return Err(ConfigError::Invalid(format!(
                    "{} room {}x{} does not fit in a {}x{} maze",
                    name, size.rows, size.cols, self.rows, self.cols
                )));
            }
        }

        for (name, range) in [("mid room", self.mid_dims), ("dead end", self.dead_end_dims)] {
            if range.min <= 0 || range.min > range.max {
                return Err(ConfigError::Invalid(format!(
                    "{} dimension range {}..={} is empty or non-positive",
                    name, range.min, range.max
                )));
            }
        }

        for (name, chance) in [
            ("mid room", self.mid_square_chance),
            ("dead end", self.dead_end_square_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "{} square chance {} is not a probability",
                    name, chance
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_end_room_must_fit() {
        let config = GenConfig {
            rows: 4,
            cols: 4,
            ..GenConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = GenConfig {
            dead_end_dims: DimRange::new(5, 2),
            ..GenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GenConfig = ron::from_str("(rows: 48, mid_rooms: 5)").unwrap();
        assert_eq!(config.rows, 48);
        assert_eq!(config.cols, 32);
        assert_eq!(config.mid_rooms, 5);
        assert_eq!(config.overlap_retries, 3);
    }
}
