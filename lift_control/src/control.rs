//! Reduced PD position controller.
//!
//! The error is normalized by `max(|target|, 1.0)` so the proportional
//! gain behaves consistently whether the setpoint is near zero or far
//! away, at the cost of non-physical units. The stop threshold, by
//! contrast, is an absolute distance in raw units. This asymmetry is
//! preserved from the tuned source behavior; changing either side
//! changes the tuning. The effective gain depends on the destination
//! rather than the absolute error, which is non-standard and worth
//! validating against the physical axis rather than assumed correct.

use lift_common::config::AxisConfig;
use lift_common::state::AxisControlState;

/// PD tuning for one axis.
#[derive(Debug, Clone, Copy)]
pub struct PdGains {
    /// Proportional gain on the normalized error.
    pub kp: f64,
    /// Derivative gain on the proportional-term delta.
    pub kd: f64,
    /// Stop distance in raw (non-normalized) units.
    pub stop_threshold: f64,
    /// Dead-zone floor on the normalized error magnitude.
    pub error_floor: f64,
}

impl PdGains {
    pub fn from_axis_config(config: &AxisConfig) -> Self {
        Self {
            kp: config.kp,
            kd: config.kd,
            stop_threshold: config.stop_threshold,
            error_floor: config.error_floor,
        }
    }
}

/// Result of one PD evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdOutput {
    /// Normalized motor command in `[-1, 1]`.
    pub command: f64,
    /// True when the axis is within the stop threshold of the target.
    pub at_target: bool,
}

/// Compute one PD cycle.
///
/// Within `stop_threshold` raw units of the target the output is
/// exactly zero and the stored derivative memory is exactly zero.
/// Otherwise:
///
/// 1. `error = clamp((target - current) / max(|target|, 1), -1, 1)`,
///    with magnitudes below `error_floor` snapped to `±error_floor` in
///    the sign of the raw error (prevents the output stalling at a
///    rounding-level value while still far in raw units).
/// 2. `p = error * kp`, `d = (p - prev_p_term) * kd`.
/// 3. `prev_p_term = p`; command is `p + d` clamped to `[-1, 1]`.
#[inline]
pub fn pd_compute(
    memory: &mut AxisControlState,
    gains: &PdGains,
    target: f64,
    current: f64,
) -> PdOutput {
    if (target - current).abs() < gains.stop_threshold {
        memory.reset();
        return PdOutput {
            command: 0.0,
            at_target: true,
        };
    }

    let denom = target.abs().max(1.0);
    let raw_error = (target - current) / denom;
    let mut error = raw_error.clamp(-1.0, 1.0);
    if error.abs() < gains.error_floor {
        error = gains.error_floor.copysign(raw_error);
    }

    let p = error * gains.kp;
    let d = (p - memory.prev_p_term) * gains.kd;
    memory.prev_p_term = p;

    PdOutput {
        command: (p + d).clamp(-1.0, 1.0),
        at_target: false,
    }
}
