//! Limit-switch homing.
//!
//! Zeroes the axis position reference on the boundary switch's
//! released → triggered transition. Sustained or bouncing triggers do
//! not re-home: only the edge counts. A missing or always-released
//! switch means homing never occurs and positions stay relative to an
//! unknown but consistent origin — a configuration concern, not a
//! runtime error, so the loop keeps running.

use crate::edge::{Edge, EdgeDetector};

/// Edge-triggered homer for one boundary switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitSwitchHomer {
    detector: EdgeDetector,
}

impl LimitSwitchHomer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's raw switch reading.
    ///
    /// Returns `true` exactly when the position reference must be
    /// zeroed this tick.
    #[inline]
    pub fn on_tick(&mut self, triggered: bool) -> bool {
        self.detector.on_tick(triggered) == Edge::Rising
    }
}
