//! Simulated axis hardware.
//!
//! First-order physics behind the hardware-boundary traits: the
//! commanded normalized speed integrates into position at a fixed full
//! speed, with hard stops at both travel ends and a boundary switch
//! that asserts at the retracted stop. One shared state backs the
//! motor, encoder, and switch handles, mirroring a real motor
//! controller with an integrated encoder.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use lift_common::hal::{
    BoundarySensor, DriverError, MotorControllerConfig, MotorDriver, PositionSensor,
};

#[derive(Debug)]
struct SimState {
    /// Last commanded normalized speed.
    command: f64,
    /// Physical extension above the retracted hard stop.
    physical: f64,
    /// Encoder zero offset, adjusted by reference resets.
    encoder_offset: f64,
    /// Wall-clock anchor for free-running mode.
    last_update: Option<Instant>,
}

/// Handle onto one simulated axis.
///
/// Clones share state, so the same handle can be boxed separately as
/// the axis's motor driver, position sensor, and boundary sensor.
#[derive(Debug, Clone)]
pub struct SimulatedAxis {
    inner: Rc<RefCell<SimState>>,
    /// Extension rate at full command [units/s].
    max_speed: f64,
    /// Physical travel to the upper hard stop [units].
    travel: f64,
}

impl SimulatedAxis {
    /// Manually stepped simulation (deterministic, for tests).
    pub fn new(max_speed: f64, travel: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimState {
                command: 0.0,
                physical: 0.0,
                encoder_offset: 0.0,
                last_update: None,
            })),
            max_speed,
            travel,
        }
    }

    /// Wall-clock driven simulation: physics advance on every sensor
    /// read by the elapsed time since the previous read.
    pub fn new_free_running(max_speed: f64, travel: f64) -> Self {
        let sim = Self::new(max_speed, travel);
        sim.inner.borrow_mut().last_update = Some(Instant::now());
        sim
    }

    /// Advance the physics by `dt`.
    pub fn step(&self, dt: Duration) {
        let mut state = self.inner.borrow_mut();
        let delta = state.command * self.max_speed * dt.as_secs_f64();
        state.physical = (state.physical + delta).clamp(0.0, self.travel);
    }

    /// Physical extension above the retracted hard stop.
    pub fn physical_position(&self) -> f64 {
        self.inner.borrow().physical
    }

    fn advance_wall_clock(&self) {
        let elapsed = {
            let mut state = self.inner.borrow_mut();
            match state.last_update {
                Some(last) => {
                    let now = Instant::now();
                    state.last_update = Some(now);
                    Some(now.duration_since(last))
                }
                None => None,
            }
        };
        if let Some(dt) = elapsed {
            self.step(dt);
        }
    }
}

impl MotorDriver for SimulatedAxis {
    fn configure(&mut self, config: &MotorControllerConfig) -> Result<(), DriverError> {
        debug!(
            can_id = config.can_id,
            current_limit_a = config.current_limit_a,
            "simulated motor configured"
        );
        Ok(())
    }

    fn set_normalized_speed(&mut self, speed: f64) {
        self.inner.borrow_mut().command = speed.clamp(-1.0, 1.0);
    }

    fn stop(&mut self) {
        self.inner.borrow_mut().command = 0.0;
    }
}

impl PositionSensor for SimulatedAxis {
    fn read_position(&mut self) -> f64 {
        self.advance_wall_clock();
        let state = self.inner.borrow();
        state.physical - state.encoder_offset
    }

    fn reset_position_reference(&mut self, position: f64) {
        let mut state = self.inner.borrow_mut();
        state.encoder_offset = state.physical - position;
    }
}

impl BoundarySensor for SimulatedAxis {
    fn is_triggered(&mut self) -> bool {
        self.inner.borrow().physical <= 0.0
    }
}
