//! Per-axis state for the lift control loop.
//!
//! Enums use `#[repr(u8)]` for compact layout and telemetry transport.
//! `AxisState` is the single mutable record per physical axis; it is owned
//! by the axis and only ever written from the tick thread.

use serde::{Deserialize, Serialize};

/// Which control path is authoritative for an axis this tick.
///
/// Exactly one mode governs actuator output at any instant. Switching
/// modes is the only event (besides reaching the target) that clears
/// the controller's derivative memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlMode {
    /// Open-loop jogging from operator commands.
    Manual = 0,
    /// Closed-loop level seeking via the PD controller.
    Automatic = 1,
}

impl ControlMode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Automatic),
            _ => None,
        }
    }

    /// Short name for telemetry publishing.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Manual
    }
}

/// Direction of a manual jog command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JogDirection {
    /// Toward full extension (`max_position`).
    Up,
    /// Toward the retracted home position (0).
    Down,
}

impl JogDirection {
    /// Sign multiplier for the normalized motor command.
    #[inline]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// Mutable per-axis runtime state.
///
/// Created once at axis construction with `position = 0.0` and
/// `mode = Manual`; lives for the process lifetime. `position` is only
/// ever reset to zero by the homing transition, never by manual
/// arithmetic; every other write comes from the sensor read each tick.
#[derive(Debug, Clone, Copy)]
pub struct AxisState {
    /// Current measured extension in actuator-native units.
    pub position: f64,
    /// Authoritative control path this tick.
    pub mode: ControlMode,
    /// Last requested discrete level, always in table bounds.
    pub target_level: usize,
    /// True once the boundary switch has produced a triggering edge.
    pub homed: bool,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            position: 0.0,
            mode: ControlMode::Manual,
            target_level: 0,
            homed: false,
        }
    }
}

/// Controller memory carried between ticks.
///
/// Holds the previous proportional term used by the derivative
/// computation. Reset on every mode transition and on reaching the
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct AxisControlState {
    /// Previous proportional term (for the derivative).
    pub prev_p_term: f64,
}

impl AxisControlState {
    /// Reset controller memory to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_mode_roundtrip() {
        for v in 0..=1u8 {
            let mode = ControlMode::from_u8(v).unwrap();
            assert_eq!(mode as u8, v);
        }
        assert!(ControlMode::from_u8(2).is_none());
        assert!(ControlMode::from_u8(255).is_none());
    }

    #[test]
    fn control_mode_default_is_manual() {
        assert_eq!(ControlMode::default(), ControlMode::Manual);
    }

    #[test]
    fn jog_direction_sign() {
        assert_eq!(JogDirection::Up.sign(), 1.0);
        assert_eq!(JogDirection::Down.sign(), -1.0);
    }

    #[test]
    fn axis_state_initial() {
        let state = AxisState::default();
        assert_eq!(state.position, 0.0);
        assert_eq!(state.mode, ControlMode::Manual);
        assert_eq!(state.target_level, 0);
        assert!(!state.homed);
    }

    #[test]
    fn control_state_reset() {
        let mut state = AxisControlState { prev_p_term: 0.6 };
        state.reset();
        assert_eq!(state.prev_p_term, 0.0);
    }
}
