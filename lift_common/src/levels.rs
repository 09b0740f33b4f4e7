//! Named levels and calibrated setpoint tables.
//!
//! A `LevelTable` is an ordered, fixed-capacity sequence of calibrated
//! positions indexed by level. Out-of-range requests saturate to the
//! nearest valid index instead of failing. An axis may carry several
//! tables sharing the same index semantics, selected by the payload
//! currently held; table shape is static configuration and never
//! mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum setpoints per table.
pub const MAX_LEVELS: usize = 16;

/// Which payload the axis is currently handling.
///
/// Selects between an axis's level tables at call time; the index
/// semantics are identical across tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PayloadKind {
    /// Flat tray cargo (the default table).
    Tray = 0,
    /// Bulk bin cargo.
    Bin = 1,
}

impl PayloadKind {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Tray),
            1 => Some(Self::Bin),
            _ => None,
        }
    }
}

impl Default for PayloadKind {
    fn default() -> Self {
        Self::Tray
    }
}

/// Named lift levels for the tray table.
///
/// Replaces the magic integer level codes of the operator interface;
/// `index()` maps into any `LevelTable` with standard semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    /// Fully retracted home position (always table index 0).
    Stow = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
}

impl Level {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stow),
            1 => Some(Self::Level1),
            2 => Some(Self::Level2),
            3 => Some(Self::Level3),
            4 => Some(Self::Level4),
            _ => None,
        }
    }

    /// Table index for this level.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Ordered sequence of calibrated setpoints, indexed by level.
///
/// Tables are not required to be monotonic, but index 0 is always the
/// fully-retracted home position (enforced at configuration load).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    setpoints: heapless::Vec<f64, MAX_LEVELS>,
}

impl LevelTable {
    /// Build a table from calibrated setpoints.
    ///
    /// Fails fast on an empty table, more than [`MAX_LEVELS`] entries,
    /// or a non-zero home entry — all configuration errors, rejected at
    /// construction rather than tolerated mid-loop.
    pub fn new(setpoints: &[f64]) -> Result<Self, ConfigError> {
        if setpoints.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        if setpoints.len() > MAX_LEVELS {
            return Err(ConfigError::LevelTableTooLong {
                len: setpoints.len(),
                max: MAX_LEVELS,
            });
        }
        if setpoints[0] != 0.0 {
            return Err(ConfigError::NonZeroHomeLevel { value: setpoints[0] });
        }
        let mut table = heapless::Vec::new();
        for &sp in setpoints {
            if !sp.is_finite() {
                return Err(ConfigError::NonFiniteSetpoint { value: sp });
            }
            // Capacity checked above.
            let _ = table.push(sp);
        }
        Ok(Self { setpoints: table })
    }

    /// Number of levels in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.setpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.setpoints.is_empty()
    }

    /// Clamp a requested level index into table bounds.
    #[inline]
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.setpoints.len() - 1)
    }

    /// Resolve a level index to its calibrated position.
    ///
    /// Out-of-range indices saturate to the nearest valid boundary
    /// index; resolution never fails.
    #[inline]
    pub fn resolve(&self, index: usize) -> f64 {
        self.setpoints[self.clamp_index(index)]
    }

    /// Highest calibrated setpoint in the table.
    pub fn max_setpoint(&self) -> f64 {
        self.setpoints.iter().copied().fold(0.0, f64::max)
    }

    /// Validate post-deserialization (serde bypasses `new`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(&self.setpoints).map(|_| ())
    }
}

/// The per-axis set of payload-selected tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTables {
    /// Table used while handling tray cargo.
    pub tray: LevelTable,
    /// Table used while handling bin cargo.
    pub bin: LevelTable,
}

impl LevelTables {
    /// Select the table for the payload currently held.
    #[inline]
    pub fn table(&self, payload: PayloadKind) -> &LevelTable {
        match payload {
            PayloadKind::Tray => &self.tray,
            PayloadKind::Bin => &self.bin,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tray.validate()?;
        self.bin.validate()
    }
}
