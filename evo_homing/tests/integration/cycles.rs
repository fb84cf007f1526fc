//! Integration test: cycle ordering and position commit.

use evo_common::consts::MAX_N_AXIS;
use evo_common::mask::AxisMask;
use evo_homing::hal::{MotionFlags, Stepper};
use evo_homing::homing::{Homing, MachineState, SystemState};
use evo_homing::sim::SimAxis;

use super::{machine, rig};

// ── Helpers ─────────────────────────────────────────────────────────

const THREE_CYCLES: &str = r#"
[[axes]]
name = "X"
[axes.homing]
cycle = 1
mpos = -5.0
settle_ms = 100

[[axes]]
name = "Y"
[axes.homing]
cycle = 1
positive_direction = false
mpos = 2.5
settle_ms = 300

[[axes]]
name = "Z"
steps_per_mm = 400.0
[axes.homing]
cycle = 2
mpos = 0.0
settle_ms = 50

[[axes]]
name = "A"
[axes.homing]
cycle = 0
"#;

fn axes(letters: &str) -> AxisMask {
    letters.parse().unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn all_cycles_run_in_order() {
    let config = machine(THREE_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    assert_eq!(
        sim.log().homing_mode,
        vec![
            (axes("XY"), true),
            (axes("XY"), false),
            (axes("Z"), true),
            (axes("Z"), false),
        ]
    );
    assert_eq!(sys.state, MachineState::Idle);
    assert_eq!(sys.alarm, None);
}

#[test]
fn homed_axes_take_configured_position() {
    let config = machine(THREE_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    let position = sim.machine_position();
    assert_eq!(position[0], -5.0);
    assert_eq!(position[1], 2.5);
    assert_eq!(position[2], 0.0);
    // Manual-only axis untouched.
    assert_eq!(position[3], 0.0);
    assert_eq!(sim.position_report(), "X:-5.000,Y:2.500,Z:0.000,A:0.000");
}

#[test]
fn clear_switches_skip_prepulloff() {
    let config = machine(THREE_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("X"))
        .unwrap();

    // Fast approach, pull-off, slow approach, pull-off.
    assert_eq!(sim.log().lines.len(), 4);
    assert_eq!(sim.log().delays, vec![100; 4]);
    assert_eq!(sim.log().resets, 4);
    for line in &sim.log().lines {
        assert!(line.data.motion.contains(MotionFlags::SYSTEM_MOTION));
        assert!(line.data.motion.contains(MotionFlags::NO_FEED_OVERRIDE));
    }
    assert!(signals.limits().is_empty());
}

#[test]
fn pressed_switch_runs_prepulloff_first() {
    let config = machine(THREE_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_axis(0, SimAxis::at_distance(0.0));
    let mut sys = SystemState::new();
    assert!(!signals.limits().is_empty());

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("X"))
        .unwrap();

    let lines = &sim.log().lines;
    assert_eq!(lines.len(), 5);
    // PrePulloff backs off the positive switch by the pull-off distance.
    assert_eq!(lines[0].target[0], -1.0);
    assert_eq!(lines[0].data.feed_rate, 50.0);
    assert!(signals.limits().is_empty());
}

#[test]
fn explicit_request_ignores_cycle_numbers() {
    let config = machine(THREE_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("XZA"))
        .unwrap();

    assert_eq!(sim.log().homing_mode, vec![(axes("XZA"), true), (axes("XZA"), false)]);
    // Settle is the longest of the three axes, once per phase.
    assert_eq!(sim.log().delays, vec![250; 4]);
}

#[test]
fn axes_without_homing_are_dropped_from_request() {
    let config = machine(
        r#"
[[axes]]
name = "X"
[axes.homing]

[[axes]]
name = "Y"
"#,
    );
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("XY"))
        .unwrap();

    assert_eq!(sim.log().homing_mode[0], (axes("X"), true));
    for line in &sim.log().lines {
        assert_eq!(line.target[1], 0.0);
    }
}

#[test]
fn fast_approach_is_rate_proportional() {
    let config = machine(
        r#"
[[axes]]
name = "X"
max_travel = 300.0
[axes.homing]
seek_rate = 1000.0

[[axes]]
name = "Y"
max_travel = 100.0
[axes.homing]
seek_rate = 200.0
"#,
    );
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("XY"))
        .unwrap();

    let fast = &sim.log().lines[0];
    let expected_feed = (1000.0f64 * 1000.0 + 200.0 * 200.0).sqrt();
    assert!((fast.data.feed_rate - expected_feed).abs() < 1e-9);
    // Y needs longest (0.5 min) and travels exactly its scaled length;
    // X covers five times as much in the same time.
    assert!((fast.target[1] - 110.0).abs() < 1e-9);
    assert!((fast.target[0] - 1650.0).abs() < 1e-9);
    for target in &fast.target[2..MAX_N_AXIS] {
        assert_eq!(*target, 0.0);
    }
}

#[test]
fn repeated_homing_is_stable() {
    let config = machine(THREE_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    for _ in 0..3 {
        Homing::new(&config, &mut sim, &signals, &mut sys)
            .run_cycles(AxisMask::ALL_CYCLES)
            .unwrap();
        assert_eq!(sim.machine_position()[0], -5.0);
    }
    assert_eq!(sys.state, MachineState::Idle);
}
