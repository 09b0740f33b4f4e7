//! Digital edge detection.
//!
//! Small stateful detector over a polled boolean input, reusable for
//! every boundary sensor in the system. Replaces ad-hoc "last state"
//! bookkeeping at each call site.

/// Transition observed on a polled digital input this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// No change since the previous tick.
    None,
    /// Released → triggered.
    Rising,
    /// Triggered → released.
    Falling,
}

/// Polled edge detector.
///
/// The previous state starts released, so an input that is already
/// triggered at boot produces a rising edge on the first tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's raw reading and classify the transition.
    #[inline]
    pub fn on_tick(&mut self, raw: bool) -> Edge {
        let edge = match (self.last, raw) {
            (false, true) => Edge::Rising,
            (true, false) => Edge::Falling,
            _ => Edge::None,
        };
        self.last = raw;
        edge
    }
}
