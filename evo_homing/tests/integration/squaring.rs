//! Integration test: squared (two-motor) axes.
//!
//! After the common pull-off both motors sit the smaller pull-off away from
//! their switches. The differential pull-off then moves only the motor with
//! the larger pull-off, by the difference.

use evo_common::mask::{AxisMask, Motor};
use evo_homing::homing::{Homing, SystemState};
use evo_homing::sim::SimAxis;

use super::{machine, rig};

// ── Helpers ─────────────────────────────────────────────────────────

fn gantry(pulloff0: f64, pulloff1: f64) -> String {
    format!(
        r#"
[[axes]]
name = "X"
[axes.homing]
cycle = 1

[[axes]]
name = "Y"
motors = [{{ pulloff = {pulloff0:.1} }}, {{ pulloff = {pulloff1:.1} }}]
[axes.homing]
cycle = 1
feed_rate = 80.0
"#
    )
}

const EPS: f64 = 1e-9;

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn motor1_backs_off_further() {
    let config = machine(&gantry(2.0, 3.0));
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    let log = sim.log();
    assert_eq!(log.lines.len(), 5);
    assert_eq!(log.blocked, vec![(1, Motor::Motor0)]);

    // Differential move: Y by the 1 mm difference. X is part of the cycle
    // with nothing to add, so it contributes its rate but no travel.
    let pulloff2 = &log.lines[4];
    assert!((pulloff2.target[1] - (-1.0)).abs() < EPS);
    assert_eq!(pulloff2.target[0], 0.0);
    assert!((pulloff2.data.feed_rate - 50.0f64.hypot(80.0)).abs() < EPS);

    assert!((sim.switch_distance(1, Motor::Motor0) - 2.0).abs() < EPS);
    assert!((sim.switch_distance(1, Motor::Motor1) - 3.0).abs() < EPS);
    // Single-motor X is unaffected by the extra phase.
    assert!((sim.switch_distance(0, Motor::Motor0) - 1.0).abs() < EPS);
    assert!(sim.blocked_motors().is_empty());
}

#[test]
fn motor0_backs_off_further() {
    let config = machine(&gantry(3.5, 2.0));
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    assert_eq!(sim.log().blocked, vec![(1, Motor::Motor1)]);
    assert!((sim.switch_distance(1, Motor::Motor0) - 3.5).abs() < EPS);
    assert!((sim.switch_distance(1, Motor::Motor1) - 2.0).abs() < EPS);
}

#[test]
fn equal_pulloffs_skip_differential_phase() {
    let config = machine(&gantry(2.0, 2.0));
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    assert_eq!(sim.log().lines.len(), 4);
    assert!(sim.log().blocked.is_empty());
}

#[test]
fn racked_gantry_is_squared() {
    let config = machine(&gantry(2.0, 3.0));
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_axis(1, SimAxis::at_distance(40.0).with_skew(0.8));
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    // Each motor ends at its own pull-off regardless of the initial rack.
    assert!((sim.switch_distance(1, Motor::Motor0) - 2.0).abs() < EPS);
    assert!((sim.switch_distance(1, Motor::Motor1) - 3.0).abs() < EPS);
    assert!(signals.limits().is_empty());
}

#[test]
fn differential_pulloff_settles_once() {
    let config = machine(&gantry(2.0, 3.0));
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(AxisMask::ALL_CYCLES)
        .unwrap();

    assert_eq!(sim.log().delays.len(), 5);
    assert_eq!(sim.log().resets, 5);
}
