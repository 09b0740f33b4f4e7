//! Telemetry adapters.
//!
//! The control core publishes through the `TelemetrySink` trait; this
//! module provides the process-local adapters. Publishing is
//! fire-and-forget and must never block the tick.

use tracing::debug;

use lift_common::hal::TelemetrySink;

/// Publishes telemetry as structured `tracing` events under the
/// `telemetry` target, for the subscriber configured at startup to
/// format or forward.
#[derive(Debug, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn publish_value(&mut self, key: &str, value: f64) {
        debug!(target: "telemetry", key, value);
    }

    fn publish_text(&mut self, key: &str, value: &str) {
        debug!(target: "telemetry", key, value);
    }
}
