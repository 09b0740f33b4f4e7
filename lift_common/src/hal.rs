//! Hardware-boundary traits.
//!
//! This module defines:
//! - `MotorDriver` trait - normalized speed command surface of a motor controller
//! - `PositionSensor` trait - encoder read and reference reset
//! - `BoundarySensor` trait - digital limit-switch input
//! - `TelemetrySink` trait - fire-and-forget dashboard publishing
//! - `MotorControllerConfig` struct - inert vendor configuration data
//! - `DriverError` enum - error type for driver configuration
//!
//! The control core only ever talks to hardware through these traits;
//! vendor specifics (CAN wiring, closed-loop registers, firmware
//! parameters) live behind the implementations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for driver configuration.
///
/// Speed and stop commands are assumed to always succeed; hardware
/// faults are out of scope. Only configuration may fail.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// Driver configuration failed
    #[error("Configuration failed: {0}")]
    ConfigFailed(String),

    /// Hardware communication error during setup
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),
}

/// Motor idle behavior when no output is commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleMode {
    /// Hold position against gravity.
    Brake,
    /// Spin down freely.
    Coast,
}

impl Default for IdleMode {
    fn default() -> Self {
        Self::Brake
    }
}

/// Inert vendor motor-controller configuration.
///
/// Constructed once from the configuration file and passed opaquely to
/// [`MotorDriver::configure`] at startup; never mutated at runtime. The
/// control core does not interpret these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotorControllerConfig {
    /// Bus identifier of the lead controller.
    pub can_id: u8,
    /// Bus identifier of an inverted follower, if the axis has one.
    #[serde(default)]
    pub follower_can_id: Option<u8>,
    /// Smart current limit [A].
    #[serde(default = "default_current_limit")]
    pub current_limit_a: u16,
    /// Idle behavior.
    #[serde(default)]
    pub idle_mode: IdleMode,
    /// Open-loop ramp rate [s from 0 to full output].
    #[serde(default)]
    pub open_loop_ramp_s: f64,
    /// Invert the lead controller output.
    #[serde(default)]
    pub inverted: bool,
}

fn default_current_limit() -> u16 {
    50
}

impl Default for MotorControllerConfig {
    fn default() -> Self {
        Self {
            can_id: 0,
            follower_can_id: None,
            current_limit_a: 50,
            idle_mode: IdleMode::Brake,
            open_loop_ramp_s: 0.0,
            inverted: false,
        }
    }
}

/// Normalized command surface of a motor controller.
///
/// # Lifecycle
///
/// 1. `configure()` - called once before the tick loop starts
/// 2. `set_normalized_speed()` / `stop()` - called from the tick loop
pub trait MotorDriver {
    /// Apply vendor configuration. Called once, pre-loop.
    ///
    /// The default implementation accepts any configuration; drivers
    /// that talk to real hardware override this.
    fn configure(&mut self, _config: &MotorControllerConfig) -> Result<(), DriverError> {
        Ok(())
    }

    /// Command a normalized speed in `[-1, 1]`.
    fn set_normalized_speed(&mut self, speed: f64);

    /// Stop the motor output.
    fn stop(&mut self);
}

/// Extension sensor for one axis.
pub trait PositionSensor {
    /// Current extension in actuator-native units, monotonically
    /// increasing with physical extension.
    fn read_position(&mut self) -> f64;

    /// Reset the position reference so subsequent reads report
    /// `position` at the current physical location.
    fn reset_position_reference(&mut self, position: f64);
}

/// Digital boundary (limit switch) input.
pub trait BoundarySensor {
    /// Raw triggered state this tick.
    fn is_triggered(&mut self) -> bool;
}

/// Fire-and-forget telemetry publishing.
///
/// No acknowledgement is required; a slow or absent sink must not block
/// the tick.
pub trait TelemetrySink {
    /// Publish a numeric value under a key.
    fn publish_value(&mut self, key: &str, value: f64);

    /// Publish a text value under a key.
    fn publish_text(&mut self, key: &str, value: &str);
}
