//! # EVO Homing
//!
//! Homes a simulated machine described by `machine.toml`.
//!
//! Without `--axes` every automatic cycle runs in order (cycle 1, 2, ...).
//! With `--axes XY` only those axes are homed, together, regardless of
//! their cycle numbers. Ctrl-C raises a reset, which aborts the running
//! phase with an alarm. The process exits with the alarm code on failure.

use clap::Parser;
use evo_common::alarm::ExecAlarm;
use evo_common::config::{ConfigLoader, LogLevel};
use evo_common::consts::{AXIS_NAMES, DEFAULT_MACHINE_CONFIG, MAX_N_AXIS};
use evo_common::machine::MachineConfig;
use evo_common::mask::AxisMask;
use evo_homing::homing::{Homing, SystemState};
use evo_homing::signals::RealtimeSignals;
use evo_homing::sim::{SimAxis, SimMachine};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// EVO Homing: limit-switch homing on a simulated machine
#[derive(Parser, Debug)]
#[command(name = "evo_homing")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Multi-axis limit-switch homing with squared-axis pull-off")]
struct Args {
    /// Path to the machine configuration TOML.
    #[arg(short, long, default_value = DEFAULT_MACHINE_CONFIG)]
    config: PathBuf,

    /// Axes to home together (e.g. "XY"). Omit to run all automatic cycles.
    #[arg(long, value_name = "AXES")]
    axes: Option<AxisMask>,

    /// Simulate axes whose switch never trips (e.g. "Z").
    #[arg(long, value_name = "AXES")]
    missing_switch: Option<AxisMask>,

    /// Actually sleep for settle delays.
    #[arg(long)]
    realtime_delays: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = MachineConfig::load(&args.config).and_then(|config| {
        config.validate()?;
        Ok(config)
    });
    setup_tracing(&args, loaded.as_ref().ok().map(|c| c.shared.log_level));

    info!("EVO Homing v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("FATAL: {}: {e}", args.config.display());
            process::exit(1);
        }
    };
    info!(
        "Config OK: {} axes, homing {}, {} automatic cycles",
        config.axis_count(),
        config.homing_mask(),
        config.max_cycle(),
    );

    if let Err(alarm) = run(&args, &config) {
        error!("ALARM:{} {alarm}", alarm.code());
        if alarm.is_homing_failure() {
            warn!("Machine position is not established; clear the alarm and home again");
        }
        process::exit(i32::from(alarm.code()));
    }

    info!("EVO Homing complete");
}

fn run(args: &Args, config: &MachineConfig) -> Result<(), ExecAlarm> {
    let signals = Arc::new(RealtimeSignals::new());

    let mut sim = SimMachine::new(config.clone(), Arc::clone(&signals))
        .with_realtime_delays(args.realtime_delays);
    if let Some(missing) = args.missing_switch {
        for axis in missing.iter().filter(|&a| a < MAX_N_AXIS) {
            sim = sim.with_axis(axis, SimAxis::without_switch());
        }
    }

    // Ctrl-C behaves like a realtime reset.
    let s = Arc::clone(&signals);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received interrupt, requesting reset");
        s.request_reset();
    }) {
        warn!("Interrupt handler not installed: {e}");
    }

    let axes = args.axes.unwrap_or(AxisMask::ALL_CYCLES);
    let mut sys = SystemState::new();
    let result = Homing::new(config, &mut sim, &signals, &mut sys).run_cycles(axes);

    info!("MPos: {}", sim.position_report());
    if result.is_ok() {
        for (axis, axis_cfg) in config.axes.iter().enumerate() {
            let (min, max) = axis_cfg.travel_bounds();
            info!("{} soft limits [{min:.3}, {max:.3}]", AXIS_NAMES[axis]);
        }
    }
    info!(
        "{} moves, {} settle delays, state {:?}",
        sim.log().lines.len(),
        sim.log().delays.len(),
        sys.state,
    );
    result
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let filter = EnvFilter::from_default_env();
    let filter = if args.verbose {
        filter.add_directive(Level::DEBUG.into())
    } else {
        match configured.unwrap_or_default().as_directive().parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter.add_directive(Level::INFO.into()),
        }
    };

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
