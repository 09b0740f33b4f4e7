//! Axis command types.
//!
//! Commands are produced by operator input (possibly on another thread)
//! and serialized through a queue drained once per tick, so exactly one
//! mode transition and one control computation happen per axis per
//! tick. There is no cancellation: a command executes synchronously in
//! the tick that drains it, or is superseded by a later command.

use lift_common::levels::{Level, PayloadKind};

/// A single per-axis command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisCommand {
    /// Jog toward full extension (mode → Manual).
    JogUp,
    /// Jog toward home (mode → Manual).
    JogDown,
    /// Stop the motor and hold Manual mode.
    Stop,
    /// Seek a calibrated level (mode → Automatic). The index is clamped
    /// into the selected table's bounds, never rejected.
    GoToLevel {
        index: usize,
        payload: PayloadKind,
    },
}

impl AxisCommand {
    /// Seek a named level on the table for the given payload.
    pub fn level(level: Level, payload: PayloadKind) -> Self {
        Self::GoToLevel {
            index: level.index(),
            payload,
        }
    }
}

/// A command routed to one axis of the lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftCommand {
    /// Index of the target axis in configuration order.
    pub axis: usize,
    /// The command to apply.
    pub command: AxisCommand,
}

impl LiftCommand {
    pub fn new(axis: usize, command: AxisCommand) -> Self {
        Self { axis, command }
    }
}
