//! Anti-tip speed interlock.
//!
//! Derives a scaling factor for a sibling subsystem's commanded speed
//! from this axis's current extension. The interlock is a pure function
//! of axis state: it never commands hardware itself. Its output is the
//! one value intentionally shared outward, published as a single-writer
//! snapshot read by other subsystems on the same tick thread.

use std::cell::Cell;
use std::rc::Rc;

/// Compute the speed scale for a sibling subsystem.
///
/// `scale = (max_position + margin - position) / (max_position + margin)`,
/// where `margin` softens the curve near full extension. The result is
/// clamped into `[margin / (max_position + margin), 1.0]`: monotonically
/// non-increasing in `position`, strictly positive for
/// `position <= max_position`, and never above 1 for positions below
/// home.
#[inline]
pub fn speed_scale(position: f64, max_position: f64, margin: f64) -> f64 {
    let span = max_position + margin;
    let floor = margin / span;
    ((span - position) / span).clamp(floor, 1.0)
}

/// Single-writer published snapshot of the interlock scale.
///
/// The owning axis holds the `SpeedScale` writer half; any number of
/// sibling subsystems hold `SpeedScaleReader` handles. Readers can only
/// observe, preserving the single-writer invariant on axis state.
#[derive(Debug)]
pub struct SpeedScale {
    inner: Rc<Cell<f64>>,
}

/// Read-only handle onto a published [`SpeedScale`].
#[derive(Debug, Clone)]
pub struct SpeedScaleReader {
    inner: Rc<Cell<f64>>,
}

impl SpeedScale {
    /// Create a new signal, initially at full scale (1.0).
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Cell::new(1.0)),
        }
    }

    /// Create a read-only handle onto this signal.
    pub fn reader(&self) -> SpeedScaleReader {
        SpeedScaleReader {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Publish a new scale value.
    #[inline]
    pub fn publish(&self, scale: f64) {
        self.inner.set(scale);
    }

    /// Current published value.
    #[inline]
    pub fn get(&self) -> f64 {
        self.inner.get()
    }
}

impl Default for SpeedScale {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeedScaleReader {
    /// Latest published scale.
    #[inline]
    pub fn get(&self) -> f64 {
        self.inner.get()
    }
}
