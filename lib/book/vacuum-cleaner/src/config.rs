/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The room needs at least one square.
    #[error("room size must be at least 1")]
    ZeroRoomSize,

    /// The agent needs at least one step.
    #[error("max steps must be at least 1")]
    ZeroMaxSteps,

    /// A probability outside of [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of one vacuum world run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side of the square room.
    pub room_size: usize,

    /// Probability that each square starts dirty.
    pub dirt_prob: f64,

    /// Energy budget. One unit per step.
    pub max_steps: u32,

    /// Probability that the dirt sensor reports the opposite of the truth.
    pub dirt_sensor_error_rate: f64,

    /// Probability that each bump sensor reports the opposite of the truth.
    pub boundary_sensor_error_rate: f64,
}

impl SimulationConfig {
    /// The dirt sensor is wrong 10% of the time. Bump sensors stay exact.
    pub fn imperfect_dirt_sensor() -> Self {
        Self {
            dirt_sensor_error_rate: 0.1,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_size == 0 {
            return Err(ConfigError::ZeroRoomSize);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        for (name, value) in [
            ("dirt_prob", self.dirt_prob),
            ("dirt_sensor_error_rate", self.dirt_sensor_error_rate),
            ("boundary_sensor_error_rate", self.boundary_sensor_error_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            room_size: 5,
            dirt_prob: 0.2,
            max_steps: 1000,
            dirt_sensor_error_rate: 0.0,
            boundary_sensor_error_rate: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(SimulationConfig::imperfect_dirt_sensor().validate().is_ok());
    }

    #[test]
    fn test_zero_room_size_is_rejected() {
        let config = SimulationConfig {
            room_size: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroRoomSize)));
    }

    #[test]
    fn test_zero_max_steps_is_rejected() {
        let config = SimulationConfig {
            max_steps: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMaxSteps)));
    }

    #[test]
    fn test_bad_probability_is_rejected() {
        let config = SimulationConfig {
            dirt_sensor_error_rate: 1.5,
            ..SimulationConfig::default()
        };
        match config.validate() {
            Err(ConfigError::ProbabilityOutOfRange { name, value }) => {
                assert_eq!(name, "dirt_sensor_error_rate");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected: {:?}", other),
        }
        let config = SimulationConfig {
            dirt_prob: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config =
            SimulationConfig::from_json(r#"{"room_size": 10, "dirt_sensor_error_rate": 0.1}"#)
                .expect("valid config");
        assert_eq!(config.room_size, 10);
        assert_eq!(config.dirt_sensor_error_rate, 0.1);
        assert_eq!(config.max_steps, 1000);
        assert_eq!(config.dirt_prob, 0.2);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        assert!(matches!(
            SimulationConfig::from_json(r#"{"room_size": 0}"#),
            Err(ConfigError::ZeroRoomSize)
        ));
        assert!(matches!(
            SimulationConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
