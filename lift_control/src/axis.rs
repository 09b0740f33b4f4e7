//! Per-axis facade.
//!
//! Composes the limit-switch homer, the PD controller, the level
//! tables, and the anti-tip interlock behind the per-tick and
//! per-command surface. One `Axis` exclusively owns its state; the
//! published interlock scale is the only value shared outward.

use lift_common::config::AxisConfig;
use lift_common::hal::{BoundarySensor, DriverError, MotorDriver, PositionSensor, TelemetrySink};
use lift_common::interlock::{speed_scale, SpeedScale, SpeedScaleReader};
use lift_common::levels::{LevelTables, PayloadKind};
use lift_common::state::{AxisControlState, AxisState, ControlMode, JogDirection};

use crate::command::AxisCommand;
use crate::control::{pd_compute, PdGains};
use crate::homing::LimitSwitchHomer;

/// One position-controlled actuator: lift mast, wrist, or arm joint.
pub struct Axis {
    name: String,
    gains: PdGains,
    jog_speed: f64,
    max_position: f64,
    ramp_window: f64,
    interlock_margin: f64,
    tables: LevelTables,

    state: AxisState,
    memory: AxisControlState,
    payload: PayloadKind,
    jog: Option<JogDirection>,
    boundary_triggered: bool,
    homer: LimitSwitchHomer,
    scale: SpeedScale,

    driver: Box<dyn MotorDriver>,
    sensor: Box<dyn PositionSensor>,
    boundary: Box<dyn BoundarySensor>,

    // Telemetry keys, prebuilt so the tick allocates nothing.
    key_position: String,
    key_mode: String,
    key_scale: String,
}

impl Axis {
    /// Build an axis and configure its motor driver.
    pub fn new(
        config: &AxisConfig,
        mut driver: Box<dyn MotorDriver>,
        sensor: Box<dyn PositionSensor>,
        boundary: Box<dyn BoundarySensor>,
    ) -> Result<Self, DriverError> {
        driver.configure(&config.motor)?;
        Ok(Self {
            name: config.name.clone(),
            gains: PdGains::from_axis_config(config),
            jog_speed: config.jog_speed,
            max_position: config.max_position,
            ramp_window: config.ramp_window,
            interlock_margin: config.interlock_margin,
            tables: config.levels.clone(),
            state: AxisState::default(),
            memory: AxisControlState::default(),
            payload: PayloadKind::default(),
            jog: None,
            boundary_triggered: false,
            homer: LimitSwitchHomer::new(),
            scale: SpeedScale::new(),
            driver,
            sensor,
            boundary,
            key_position: format!("{}/position", config.name),
            key_mode: format!("{}/mode", config.name),
            key_scale: format!("{}/speed_scale", config.name),
        })
    }

    /// Axis name from configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current per-axis state snapshot.
    pub fn state(&self) -> &AxisState {
        &self.state
    }

    /// Stored derivative memory (diagnostic).
    pub fn prev_p_term(&self) -> f64 {
        self.memory.prev_p_term
    }

    /// Read-only handle onto this axis's published speed scale.
    pub fn speed_scale_reader(&self) -> SpeedScaleReader {
        self.scale.reader()
    }

    // ─── Command surface ────────────────────────────────────────────

    /// Dispatch a queued command.
    pub fn apply(&mut self, command: AxisCommand) {
        match command {
            AxisCommand::JogUp => self.jog_up(),
            AxisCommand::JogDown => self.jog_down(),
            AxisCommand::Stop => self.stop(),
            AxisCommand::GoToLevel { index, payload } => self.go_to_level(index, payload),
        }
    }

    /// Manual jog toward full extension. Takes effect immediately.
    pub fn jog_up(&mut self) {
        self.enter_manual(Some(JogDirection::Up));
        self.drive_manual();
    }

    /// Manual jog toward home. Takes effect immediately.
    pub fn jog_down(&mut self) {
        self.enter_manual(Some(JogDirection::Down));
        self.drive_manual();
    }

    /// Stop the motor and drop any latched jog.
    pub fn stop(&mut self) {
        self.enter_manual(None);
        self.driver.stop();
    }

    /// Seek a calibrated level on the table for `payload`.
    ///
    /// The index is clamped into table bounds; the target is resolved
    /// on the next tick.
    pub fn go_to_level(&mut self, index: usize, payload: PayloadKind) {
        self.state.mode = ControlMode::Automatic;
        self.state.target_level = self.tables.table(payload).clamp_index(index);
        self.payload = payload;
        self.jog = None;
        // Every mode transition clears derivative memory.
        self.memory.reset();
    }

    fn enter_manual(&mut self, jog: Option<JogDirection>) {
        self.state.mode = ControlMode::Manual;
        self.jog = jog;
        self.memory.reset();
    }

    // ─── Per-tick surface ───────────────────────────────────────────

    /// One control tick: sense, home, publish, drive.
    pub fn tick(&mut self, telemetry: &mut dyn TelemetrySink) {
        // Sense. The sensor read is the only writer of `position`
        // outside the homing transition.
        self.state.position = self.sensor.read_position();
        self.boundary_triggered = self.boundary.is_triggered();

        // Home on the released → triggered edge only.
        if self.homer.on_tick(self.boundary_triggered) {
            self.sensor.reset_position_reference(0.0);
            self.state.position = 0.0;
            self.state.homed = true;
        }

        // Publish the anti-tip scale for sibling subsystems.
        self.scale.publish(speed_scale(
            self.state.position,
            self.max_position,
            self.interlock_margin,
        ));

        telemetry.publish_value(&self.key_position, self.state.position);
        telemetry.publish_text(&self.key_mode, self.state.mode.as_str());
        telemetry.publish_value(&self.key_scale, self.scale.get());

        match self.state.mode {
            ControlMode::Automatic => self.drive_automatic(),
            ControlMode::Manual => self.drive_manual(),
        }
    }

    /// Closed-loop path: PD against the resolved level target.
    fn drive_automatic(&mut self) {
        let target = self.tables.table(self.payload).resolve(self.state.target_level);
        let out = pd_compute(&mut self.memory, &self.gains, target, self.state.position);
        if out.at_target {
            self.driver.stop();
        } else {
            self.driver.set_normalized_speed(out.command);
        }
    }

    /// Open-loop path: latched jog with end-of-travel ramp-down.
    ///
    /// Speed ramps linearly to zero over the final `ramp_window` units
    /// toward the approached bound and the motor is stopped at or past
    /// the bound. Jogging down also stops while the boundary switch is
    /// held, so the carriage cannot be driven into the switch.
    fn drive_manual(&mut self) {
        let Some(direction) = self.jog else {
            return;
        };

        let remaining = match direction {
            JogDirection::Up => self.max_position - self.state.position,
            JogDirection::Down => self.state.position,
        };
        let blocked = direction == JogDirection::Down && self.boundary_triggered;

        let ramp = (remaining / self.ramp_window).clamp(0.0, 1.0);
        let command = self.jog_speed * ramp;
        if blocked || command <= 0.0 {
            self.driver.stop();
        } else {
            self.driver.set_normalized_speed(direction.sign() * command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lift_common::hal::MotorControllerConfig;
    use lift_common::levels::LevelTable;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Last motor command observed by the mock rig.
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum MotorOutput {
        Idle,
        Stopped,
        Speed(f64),
    }

    #[derive(Debug)]
    struct Rig {
        output: MotorOutput,
        position: f64,
        reference_resets: Vec<f64>,
        triggered: bool,
    }

    #[derive(Clone)]
    struct RigHandle(Rc<RefCell<Rig>>);

    impl RigHandle {
        fn new() -> Self {
            Self(Rc::new(RefCell::new(Rig {
                output: MotorOutput::Idle,
                position: 0.0,
                reference_resets: Vec::new(),
                triggered: false,
            })))
        }

        fn set_position(&self, position: f64) {
            self.0.borrow_mut().position = position;
        }

        fn set_triggered(&self, triggered: bool) {
            self.0.borrow_mut().triggered = triggered;
        }

        fn output(&self) -> MotorOutput {
            self.0.borrow().output
        }

        fn reference_resets(&self) -> Vec<f64> {
            self.0.borrow().reference_resets.clone()
        }
    }

    impl MotorDriver for RigHandle {
        fn set_normalized_speed(&mut self, speed: f64) {
            self.0.borrow_mut().output = MotorOutput::Speed(speed);
        }

        fn stop(&mut self) {
            self.0.borrow_mut().output = MotorOutput::Stopped;
        }
    }

    impl PositionSensor for RigHandle {
        fn read_position(&mut self) -> f64 {
            self.0.borrow().position
        }

        fn reset_position_reference(&mut self, position: f64) {
            let mut rig = self.0.borrow_mut();
            rig.reference_resets.push(position);
            rig.position = position;
        }
    }

    impl BoundarySensor for RigHandle {
        fn is_triggered(&mut self) -> bool {
            self.0.borrow().triggered
        }
    }

    struct NullTelemetry;

    impl TelemetrySink for NullTelemetry {
        fn publish_value(&mut self, _key: &str, _value: f64) {}
        fn publish_text(&mut self, _key: &str, _value: &str) {}
    }

    fn test_config() -> AxisConfig {
        AxisConfig {
            name: "mast".to_string(),
            kp: 0.6,
            kd: 0.05,
            stop_threshold: 0.5,
            error_floor: 0.02,
            jog_speed: 0.5,
            max_position: 260.0,
            ramp_window: 100.0,
            interlock_margin: 50.0,
            levels: LevelTables {
                tray: LevelTable::new(&[0.0, 19.0, 100.0, 180.0, 260.0]).unwrap(),
                bin: LevelTable::new(&[0.0, 124.0, 217.0]).unwrap(),
            },
            motor: MotorControllerConfig::default(),
        }
    }

    fn test_axis(rig: &RigHandle) -> Axis {
        Axis::new(
            &test_config(),
            Box::new(rig.clone()),
            Box::new(rig.clone()),
            Box::new(rig.clone()),
        )
        .unwrap()
    }

    #[test]
    fn starts_manual_unhomed() {
        let rig = RigHandle::new();
        let axis = test_axis(&rig);
        assert_eq!(axis.state().mode, ControlMode::Manual);
        assert!(!axis.state().homed);
    }

    #[test]
    fn homing_edge_zeroes_reference_once() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        rig.set_position(37.5);
        rig.set_triggered(true);
        axis.tick(&mut sink);
        assert!(axis.state().homed);
        assert_eq!(axis.state().position, 0.0);
        assert_eq!(rig.reference_resets(), vec![0.0]);

        // Held switch: no further resets; position follows the sensor.
        rig.set_position(5.0);
        axis.tick(&mut sink);
        axis.tick(&mut sink);
        assert_eq!(rig.reference_resets().len(), 1);
        assert_eq!(axis.state().position, 5.0);
    }

    #[test]
    fn jog_up_issues_immediate_command() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        axis.jog_up();
        assert_eq!(axis.state().mode, ControlMode::Manual);
        // Position 0, far from the top: full jog speed.
        assert_eq!(rig.output(), MotorOutput::Speed(0.5));
    }

    #[test]
    fn jog_up_ramps_near_top() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        // 40 units of travel remain: scale = 40/100.
        rig.set_position(220.0);
        axis.jog_up();
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Speed(0.5 * 0.4));

        // At the bound: stopped.
        rig.set_position(260.0);
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);

        // Past the bound: still stopped.
        rig.set_position(261.0);
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);
    }

    #[test]
    fn jog_down_ramps_toward_home() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        rig.set_position(30.0);
        axis.jog_down();
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Speed(-0.5 * 0.3));
    }

    #[test]
    fn jog_down_blocked_by_limit_switch() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        rig.set_position(150.0);
        rig.set_triggered(true);
        let mut sink = NullTelemetry;
        axis.jog_down();
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);
    }

    #[test]
    fn go_to_level_clamps_and_switches_mode() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        axis.go_to_level(7, PayloadKind::Tray);
        assert_eq!(axis.state().mode, ControlMode::Automatic);
        // 5-entry tray table: index saturates to 4.
        assert_eq!(axis.state().target_level, 4);
    }

    #[test]
    fn automatic_tick_drives_toward_level() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        axis.go_to_level(2, PayloadKind::Tray); // 100.0
        axis.tick(&mut sink);
        match rig.output() {
            MotorOutput::Speed(cmd) => assert!(cmd > 0.0),
            other => panic!("expected upward drive, got {other:?}"),
        }

        // Within the stop threshold: motor stopped, memory cleared.
        rig.set_position(99.8);
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);
        assert_eq!(axis.prev_p_term(), 0.0);
    }

    #[test]
    fn jog_command_clears_derivative_memory() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        axis.go_to_level(4, PayloadKind::Tray);
        axis.tick(&mut sink);
        assert!(axis.prev_p_term() != 0.0);

        axis.jog_down();
        assert_eq!(axis.prev_p_term(), 0.0);
        assert_eq!(axis.state().mode, ControlMode::Manual);
    }

    #[test]
    fn manual_mode_ignores_level_targets() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        axis.go_to_level(4, PayloadKind::Tray);
        axis.stop();
        assert_eq!(rig.output(), MotorOutput::Stopped);

        // Ticks in Manual with no jog leave the motor alone.
        rig.set_position(10.0);
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);
    }

    #[test]
    fn payload_selects_level_table() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let mut sink = NullTelemetry;

        // Bin level 1 = 124.0; with the axis already at 124 the stop
        // condition holds immediately.
        rig.set_position(124.0);
        axis.go_to_level(1, PayloadKind::Bin);
        axis.tick(&mut sink);
        assert_eq!(rig.output(), MotorOutput::Stopped);
    }

    #[test]
    fn interlock_scale_tracks_extension() {
        let rig = RigHandle::new();
        let mut axis = test_axis(&rig);
        let reader = axis.speed_scale_reader();
        let mut sink = NullTelemetry;

        axis.tick(&mut sink);
        assert_eq!(reader.get(), 1.0);

        rig.set_position(260.0);
        axis.tick(&mut sink);
        let derated = reader.get();
        assert!(derated > 0.0 && derated < 0.2);
    }
}
