//! Configuration structures for the lift control loop.
//!
//! All config types use `serde::Deserialize` for TOML loading. Optional
//! fields use `#[serde(default)]` for forward-compatible
//! deserialization. Validation is fail-fast: a bad value is rejected at
//! load time, never tolerated mid-loop.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hal::MotorControllerConfig;
use crate::levels::LevelTables;

/// Default control cycle period [µs] (50 Hz robot loop).
pub const CYCLE_TIME_US_DEFAULT: u32 = 20_000;
/// Minimum supported cycle period [µs].
pub const CYCLE_TIME_US_MIN: u32 = 1_000;
/// Maximum supported cycle period [µs].
pub const CYCLE_TIME_US_MAX: u32 = 100_000;

/// Top-level configuration, loaded from TOML at startup.
///
/// Immutable once the tick loop starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftConfig {
    /// Target cycle period in microseconds (default: 20000 = 20ms).
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,

    /// Per-axis configurations.
    pub axes: Vec<AxisConfig>,
}

fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US_DEFAULT
}

impl LiftConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter bounds across the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_time_us < CYCLE_TIME_US_MIN || self.cycle_time_us > CYCLE_TIME_US_MAX {
            return Err(ConfigError::CycleTimeOutOfRange {
                value: self.cycle_time_us,
                min: CYCLE_TIME_US_MIN,
                max: CYCLE_TIME_US_MAX,
            });
        }
        if self.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }
        for axis in &self.axes {
            axis.validate()?;
        }
        Ok(())
    }
}

/// Per-axis configuration.
///
/// Gains and travel geometry are tuning data owned by the controller;
/// the `motor` block is inert vendor data passed opaquely to the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Axis name, used as the telemetry key prefix.
    pub name: String,

    /// Proportional gain on the normalized error.
    #[serde(default = "default_kp")]
    pub kp: f64,

    /// Derivative gain on the proportional-term delta.
    #[serde(default = "default_kd")]
    pub kd: f64,

    /// Stop distance in raw (non-normalized) units.
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: f64,

    /// Dead-zone floor applied to the normalized error magnitude.
    #[serde(default = "default_error_floor")]
    pub error_floor: f64,

    /// Normalized jog speed magnitude, in `(0, 1]`.
    #[serde(default = "default_jog_speed")]
    pub jog_speed: f64,

    /// Full physical extension in actuator-native units.
    pub max_position: f64,

    /// Travel window over which jog speed ramps to zero at each bound.
    #[serde(default = "default_ramp_window")]
    pub ramp_window: f64,

    /// Softening margin for the anti-tip interlock.
    #[serde(default = "default_interlock_margin")]
    pub interlock_margin: f64,

    /// Calibrated level tables, selected by payload kind.
    pub levels: LevelTables,

    /// Vendor motor-controller configuration (opaque to the core).
    #[serde(default)]
    pub motor: MotorControllerConfig,
}

fn default_kp() -> f64 {
    0.6
}
fn default_kd() -> f64 {
    0.05
}
fn default_stop_threshold() -> f64 {
    0.5
}
fn default_error_floor() -> f64 {
    0.02
}
fn default_jog_speed() -> f64 {
    0.5
}
fn default_ramp_window() -> f64 {
    100.0
}
fn default_interlock_margin() -> f64 {
    50.0
}

impl AxisConfig {
    /// Validate parameter bounds for one axis.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_positive_finite("max_position", self.max_position)?;
        self.check_positive_finite("stop_threshold", self.stop_threshold)?;
        self.check_positive_finite("ramp_window", self.ramp_window)?;
        self.check_positive_finite("interlock_margin", self.interlock_margin)?;
        self.check_positive_finite("kp", self.kp)?;
        if !self.kd.is_finite() || self.kd < 0.0 {
            return Err(self.out_of_range("kd", self.kd, "finite, >= 0"));
        }
        if !(self.jog_speed > 0.0 && self.jog_speed <= 1.0) {
            return Err(self.out_of_range("jog_speed", self.jog_speed, "(0, 1]"));
        }
        if !(self.error_floor > 0.0 && self.error_floor < 1.0) {
            return Err(self.out_of_range("error_floor", self.error_floor, "(0, 1)"));
        }
        self.levels.validate()
    }

    fn check_positive_finite(&self, field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(self.out_of_range(field, value, "finite, > 0"))
        }
    }

    fn out_of_range(&self, field: &'static str, value: f64, expected: &'static str) -> ConfigError {
        ConfigError::ParameterOutOfRange {
            axis: self.name.clone(),
            field,
            value,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;
    use std::io::Write;

    fn reference_axis() -> AxisConfig {
        AxisConfig {
            name: "mast".to_string(),
            kp: 0.6,
            kd: 0.05,
            stop_threshold: 0.5,
            error_floor: 0.02,
            jog_speed: 0.5,
            max_position: 260.0,
            ramp_window: 100.0,
            interlock_margin: 50.0,
            levels: LevelTables {
                tray: LevelTable::new(&[0.0, 19.0, 100.0, 180.0, 260.0]).unwrap(),
                bin: LevelTable::new(&[0.0, 124.0, 217.0]).unwrap(),
            },
            motor: MotorControllerConfig::default(),
        }
    }

    #[test]
    fn reference_axis_validates() {
        assert!(reference_axis().validate().is_ok());
    }

    #[test]
    fn zero_max_position_rejected() {
        let mut axis = reference_axis();
        axis.max_position = 0.0;
        assert!(matches!(
            axis.validate(),
            Err(ConfigError::ParameterOutOfRange {
                field: "max_position",
                ..
            })
        ));
    }

    #[test]
    fn jog_speed_above_one_rejected() {
        let mut axis = reference_axis();
        axis.jog_speed = 1.2;
        assert!(axis.validate().is_err());
    }

    #[test]
    fn config_requires_axes() {
        let config = LiftConfig {
            cycle_time_us: CYCLE_TIME_US_DEFAULT,
            axes: Vec::new(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoAxes)));
    }

    #[test]
    fn cycle_time_bounds_enforced() {
        let config = LiftConfig {
            cycle_time_us: 500,
            axes: vec![reference_axis()],
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CycleTimeOutOfRange { value: 500, .. })
        ));
    }

    #[test]
    fn load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
cycle_time_us = 20000

[[axes]]
name = "mast"
max_position = 260.0
levels = {{ tray = [0.0, 19.0, 100.0, 180.0, 260.0], bin = [0.0, 124.0, 217.0] }}

[axes.motor]
can_id = 10
follower_can_id = 11
open_loop_ramp_s = 2.0
"#
        )
        .unwrap();

        let config = LiftConfig::load(file.path()).unwrap();
        assert_eq!(config.axes.len(), 1);
        let axis = &config.axes[0];
        // Defaults filled in for omitted fields.
        assert_eq!(axis.kp, 0.6);
        assert_eq!(axis.jog_speed, 0.5);
        assert_eq!(axis.levels.tray.resolve(4), 260.0);
        assert_eq!(axis.motor.can_id, 10);
        assert_eq!(axis.motor.follower_can_id, Some(11));
    }

    #[test]
    fn load_rejects_bad_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[axes]]
name = "mast"
max_position = 260.0
levels = {{ tray = [5.0, 19.0], bin = [0.0] }}
"#
        )
        .unwrap();
        assert!(matches!(
            LiftConfig::load(file.path()),
            Err(ConfigError::NonZeroHomeLevel { .. })
        ));
    }
}
