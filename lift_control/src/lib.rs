//! # Lift Control
//!
//! Per-axis position control loop for a mobile robot's linear lift and
//! structurally identical wrist/arm joints. Each axis runs a small state
//! machine that unifies limit-switch homing, manual open-loop jogging
//! with end-of-travel ramp-down, closed-loop level seeking via a reduced
//! proportional-derivative law, and an anti-tip speed interlock read by
//! the drive subsystem.
//!
//! ## Tick Model
//!
//! The entire system executes inside one fixed-period tick on a single
//! thread. Commands arriving from an input thread are serialized through
//! a queue drained once per tick, so exactly one mode transition and one
//! control computation happen per axis per tick.

pub mod axis;
pub mod command;
pub mod control;
pub mod cycle;
pub mod edge;
pub mod homing;
pub mod sim;
pub mod telemetry;
