//! # Lift Control
//!
//! Fixed-period control loop for the lift actuators, running against
//! the built-in simulation driver. Loads and validates the TOML
//! configuration, builds one axis per config entry, wires the command
//! queue, and enters the tick loop until interrupted.
//!
//! With `--demo`, a background thread feeds a scripted command sequence
//! through the queue to exercise homing, jogging, and level seeking.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use lift_common::config::LiftConfig;
use lift_common::levels::PayloadKind;
use lift_control::axis::Axis;
use lift_control::command::{AxisCommand, LiftCommand};
use lift_control::cycle::CycleRunner;
use lift_control::sim::SimulatedAxis;
use lift_control::telemetry::TracingTelemetry;

/// Lift Control — per-axis position control loop
#[derive(Parser, Debug)]
#[command(name = "lift_control")]
#[command(version)]
#[command(about = "Fixed-period position control loop for the lift actuators")]
struct Args {
    /// Path to the lift configuration TOML.
    #[arg(default_value = "config/lift.toml")]
    config: PathBuf,

    /// Feed a scripted demo command sequence through the queue.
    #[arg(long)]
    demo: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Lift Control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Lift Control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = LiftConfig::load(&args.config)?;
    info!(
        "Config OK: cycle_time={}µs, axes={}",
        config.cycle_time_us,
        config.axes.len(),
    );

    let (tx, rx) = mpsc::channel();

    // One simulated hardware rig per axis; full travel in two seconds.
    let mut axes = Vec::with_capacity(config.axes.len());
    for axis_config in &config.axes {
        let sim = SimulatedAxis::new_free_running(
            axis_config.max_position / 2.0,
            axis_config.max_position + 2.0,
        );
        axes.push(Axis::new(
            axis_config,
            Box::new(sim.clone()),
            Box::new(sim.clone()),
            Box::new(sim),
        )?);
        info!(axis = %axis_config.name, "axis initialized (simulation)");
    }

    let mut runner = CycleRunner::new(axes, rx, Box::new(TracingTelemetry), config.cycle_time_us);

    // Graceful shutdown on Ctrl-C.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    if args.demo {
        spawn_demo(tx, running.clone());
    } else {
        drop(tx);
    }

    runner.run(&running);
    Ok(())
}

/// Scripted operator input: jog, stop, then cycle through levels.
fn spawn_demo(tx: Sender<LiftCommand>, running: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let script = [
            (Duration::from_millis(500), AxisCommand::JogUp),
            (Duration::from_millis(1500), AxisCommand::Stop),
            (
                Duration::from_millis(500),
                AxisCommand::GoToLevel {
                    index: 2,
                    payload: PayloadKind::Tray,
                },
            ),
            (
                Duration::from_secs(4),
                AxisCommand::GoToLevel {
                    index: 4,
                    payload: PayloadKind::Tray,
                },
            ),
            (
                Duration::from_secs(4),
                AxisCommand::GoToLevel {
                    index: 1,
                    payload: PayloadKind::Bin,
                },
            ),
            (
                Duration::from_secs(4),
                AxisCommand::GoToLevel {
                    index: 0,
                    payload: PayloadKind::Tray,
                },
            ),
        ];

        'demo: loop {
            for (delay, command) in script {
                std::thread::sleep(delay);
                if !running.load(Ordering::SeqCst) {
                    break 'demo;
                }
                if tx.send(LiftCommand::new(0, command)).is_err() {
                    break 'demo;
                }
            }
        }
    });
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
