//! Lift Common Library
//!
//! Shared types for the lift actuator workspace: per-axis state enums,
//! calibrated level tables, the anti-tip speed interlock, hardware-boundary
//! traits, and TOML configuration loading with fail-fast validation.
//!
//! # Module Structure
//!
//! - [`state`] - Per-axis control mode and runtime state
//! - [`levels`] - Named levels and calibrated setpoint tables
//! - [`interlock`] - Extension-derived speed scaling for sibling subsystems
//! - [`hal`] - Motor driver, sensor, and telemetry traits
//! - [`config`] - Configuration structures and TOML loading
//! - [`error`] - Configuration and driver error types

pub mod config;
pub mod error;
pub mod hal;
pub mod interlock;
pub mod levels;
pub mod state;
