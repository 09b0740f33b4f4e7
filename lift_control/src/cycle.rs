//! Fixed-period tick loop.
//!
//! Single-threaded cooperative scheduling: the runner drains the command
//! queue once per tick, ticks every axis, and publishes the aggregate
//! drive speed scale. All work inside a tick must complete before the
//! next tick is due; overruns are counted and logged, but the loop keeps
//! running — continued degraded operation beats stopping the robot
//! mid-match.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use lift_common::hal::TelemetrySink;
use lift_common::interlock::SpeedScaleReader;
use lift_common::state::AxisState;

use crate::axis::Axis;
use crate::command::LiftCommand;

/// O(1) per-cycle timing statistics.
///
/// Updated every cycle with no allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// The periodic control loop over all configured axes.
///
/// Owns the axes, the inbound command queue, and the telemetry sink.
/// Commands may be produced from another thread; draining them here,
/// once per tick, keeps `AxisState` single-writer.
pub struct CycleRunner {
    axes: Vec<Axis>,
    commands: Receiver<LiftCommand>,
    telemetry: Box<dyn TelemetrySink>,
    scale_readers: Vec<SpeedScaleReader>,
    cycle_time: Duration,
    /// Cycle timing statistics.
    pub stats: CycleStats,
}

impl CycleRunner {
    /// Build a runner over pre-constructed axes.
    pub fn new(
        axes: Vec<Axis>,
        commands: Receiver<LiftCommand>,
        telemetry: Box<dyn TelemetrySink>,
        cycle_time_us: u32,
    ) -> Self {
        let scale_readers = axes.iter().map(Axis::speed_scale_reader).collect();
        Self {
            axes,
            commands,
            telemetry,
            scale_readers,
            cycle_time: Duration::from_micros(u64::from(cycle_time_us)),
            stats: CycleStats::new(),
        }
    }

    /// Number of configured axes.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// State snapshot for one axis (diagnostic).
    pub fn axis_state(&self, index: usize) -> Option<&AxisState> {
        self.axes.get(index).map(Axis::state)
    }

    /// The aggregate drive derate: the most-extended axis governs.
    pub fn drive_speed_scale(&self) -> f64 {
        self.scale_readers
            .iter()
            .map(SpeedScaleReader::get)
            .fold(1.0, f64::min)
    }

    /// One tick: drain commands, tick every axis, publish the drive
    /// derate.
    pub fn tick(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            match self.axes.get_mut(cmd.axis) {
                Some(axis) => {
                    debug!(axis = axis.name(), command = ?cmd.command, "applying command");
                    axis.apply(cmd.command);
                }
                None => warn!(axis = cmd.axis, "command for unknown axis dropped"),
            }
        }

        for axis in &mut self.axes {
            axis.tick(self.telemetry.as_mut());
        }

        self.telemetry
            .publish_value("drive/speed_scale", self.drive_speed_scale());
    }

    /// Enter the fixed-period loop until `running` is cleared.
    pub fn run(&mut self, running: &AtomicBool) {
        info!(
            cycle_time_us = self.cycle_time.as_micros() as u64,
            axes = self.axes.len(),
            "entering control loop"
        );

        while running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            self.tick();

            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed.as_nanos() as i64);

            match self.cycle_time.checked_sub(elapsed) {
                Some(remaining) => std::thread::sleep(remaining),
                None => {
                    self.stats.overruns += 1;
                    warn!(
                        actual_ns = elapsed.as_nanos() as u64,
                        budget_ns = self.cycle_time.as_nanos() as u64,
                        "cycle overrun"
                    );
                }
            }
        }

        info!(
            cycles = self.stats.cycle_count,
            overruns = self.stats.overruns,
            avg_ns = self.stats.avg_cycle_ns(),
            "control loop stopped"
        );
    }
}
