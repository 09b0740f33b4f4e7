//! Configuration error types.
//!
//! The control core has no recoverable-error paths at runtime: numeric
//! operations are total over their clamped domains. The only failure
//! category is misconfiguration, rejected eagerly at load time.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// No axes defined
    #[error("configuration defines no axes")]
    NoAxes,

    /// Level table with no entries
    #[error("level table is empty")]
    EmptyLevelTable,

    /// Level table exceeds fixed capacity
    #[error("level table has {len} entries, maximum is {max}")]
    LevelTableTooLong { len: usize, max: usize },

    /// First table entry must be the retracted home position
    #[error("level table index 0 must be 0.0 (home), got {value}")]
    NonZeroHomeLevel { value: f64 },

    /// Setpoint is NaN or infinite
    #[error("level setpoint is not finite: {value}")]
    NonFiniteSetpoint { value: f64 },

    /// Numeric axis parameter out of its valid range
    #[error("axis '{axis}': {field} = {value} out of range ({expected})")]
    ParameterOutOfRange {
        axis: String,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    /// Cycle time outside supported bounds
    #[error("cycle_time_us {value} out of range [{min}, {max}]")]
    CycleTimeOutOfRange { value: u32, min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_error_display_names_axis_and_field() {
        let err = ConfigError::ParameterOutOfRange {
            axis: "mast".to_string(),
            field: "jog_speed",
            value: 1.5,
            expected: "(0, 1]",
        };
        let msg = err.to_string();
        assert!(msg.contains("mast"));
        assert!(msg.contains("jog_speed"));
        assert!(msg.contains("1.5"));
    }
}
