//! Integration test: homing alarms and recovery.
//!
//! Validates the failure lifecycle:
//! 1. A phase fails (switch missing, stuck, reset, door)
//! 2. The alarm is latched, homing mode left, motion stopped
//! 3. Remaining cycles are abandoned
//! 4. After the alarm is cleared homing can run again

use evo_common::alarm::ExecAlarm;
use evo_common::mask::{AxisMask, Motor};
use evo_homing::homing::{Homing, MachineState, SystemState};
use evo_homing::sim::{Injection, SimAxis};

use super::{machine, rig};

// ── Helpers ─────────────────────────────────────────────────────────

const TWO_CYCLES: &str = r#"
[[axes]]
name = "X"
[axes.homing]
cycle = 1
settle_ms = 100

[[axes]]
name = "Y"
[axes.homing]
cycle = 1
settle_ms = 100

[[axes]]
name = "Z"
[axes.homing]
cycle = 2
settle_ms = 100
"#;

fn axes(letters: &str) -> AxisMask {
    letters.parse().unwrap()
}

// ── Approach / pull-off failures ────────────────────────────────────

#[test]
fn missing_switch_fails_its_cycle() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_axis(2, SimAxis::without_switch());
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(AxisMask::ALL_CYCLES);

    assert_eq!(result, Err(ExecAlarm::HomingFailApproach));
    assert_eq!(sys.state, MachineState::Alarm);
    assert_eq!(sys.alarm, Some(ExecAlarm::HomingFailApproach));

    let log = sim.log();
    // XY completed; Z failed on its first move without settling.
    assert_eq!(log.delays.len(), 4);
    assert_eq!(log.lines.len(), 5);
    assert_eq!(log.homing_mode.last(), Some(&(axes("Z"), false)));
    assert_eq!(log.motion_stops, 1);
    assert_eq!(log.realtime_calls, 1);
    assert!(sim.homing_motors().is_empty());
}

#[test]
fn stuck_switch_fails_pulloff() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_axis(1, SimAxis::default().stuck());
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("XY"));

    assert_eq!(result, Err(ExecAlarm::HomingFailPulloff));
    // Fast approach settled; the pull-off did not.
    assert_eq!(sim.log().delays, vec![100]);
    assert!(signals.limits().contains(1, Motor::Motor0));
}

#[test]
fn failed_cycle_abandons_later_cycles() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_axis(0, SimAxis::without_switch());
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(AxisMask::ALL_CYCLES);

    assert_eq!(result, Err(ExecAlarm::HomingFailApproach));
    assert!(
        sim.log()
            .homing_mode
            .iter()
            .all(|&(mask, _)| !mask.contains(2)),
        "cycle 2 must not start"
    );
}

// ── Realtime signals ────────────────────────────────────────────────

#[test]
fn reset_during_slow_approach() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_injection(2, Injection::Reset);
    let mut sys = SystemState::new();

    let mut homing = Homing::new(&config, &mut sim, &signals, &mut sys);
    let result = homing.run_cycles(axes("XY"));

    assert_eq!(result, Err(ExecAlarm::HomingFailReset));
    assert!(!homing.is_approaching());
    assert_eq!(homing.system().active_alarm(), Some(ExecAlarm::HomingFailReset));
    drop(homing);

    assert_eq!(sim.log().lines.len(), 3);
    assert_eq!(sim.log().delays.len(), 2);
}

#[test]
fn door_during_pulloff() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_injection(3, Injection::SafetyDoor);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("XY"));

    assert_eq!(result, Err(ExecAlarm::HomingFailDoor));
    assert_eq!(sys.alarm, Some(ExecAlarm::HomingFailDoor));
}

#[test]
fn reset_takes_precedence_over_door() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim
        .with_injection(1, Injection::SafetyDoor)
        .with_injection(1, Injection::Reset);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("X"));
    assert_eq!(result, Err(ExecAlarm::HomingFailReset));
}

#[test]
fn status_requests_are_answered_mid_cycle() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim
        .with_injection(0, Injection::StatusReport)
        .with_injection(3, Injection::StatusReport);
    let mut sys = SystemState::new();

    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("XY"))
        .unwrap();

    assert_eq!(sim.log().status_reports, 2);
}

#[test]
fn early_cycle_stop_fails_approach() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_injection(0, Injection::CycleStop);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("X"));
    assert_eq!(result, Err(ExecAlarm::HomingFailApproach));
    assert!(sim.log().delays.is_empty());
}

// ── Refusals ────────────────────────────────────────────────────────

#[test]
fn no_cycles_defined() {
    let config = machine(
        r#"
[[axes]]
name = "X"
[axes.homing]
cycle = 0

[[axes]]
name = "Y"
"#,
    );
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(AxisMask::ALL_CYCLES);

    assert_eq!(result, Err(ExecAlarm::HomingNoCycles));
    assert_eq!(sys.state, MachineState::Alarm);
    assert!(sim.log().lines.is_empty());
    assert!(sim.log().homing_mode.is_empty());
}

#[test]
fn ambiguous_switch_refuses_to_home() {
    let config = machine(TWO_CYCLES);
    let (mut sim, signals) = rig(&config);
    signals.set_limit(0, Motor::Motor0, true, true);
    signals.set_limit(0, Motor::Motor0, false, true);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(AxisMask::ALL_CYCLES);

    assert_eq!(result, Err(ExecAlarm::HomingAmbiguousSwitch));
    assert_eq!(sys.alarm, Some(ExecAlarm::HomingAmbiguousSwitch));
    assert!(sim.log().lines.is_empty());
}

#[test]
fn alarm_must_be_cleared_before_homing() {
    let config = machine(TWO_CYCLES);
    let (mut sim, signals) = rig(&config);
    let mut sys = SystemState::new();
    sys.raise_alarm(ExecAlarm::HardLimit);

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("X"));
    assert_eq!(result, Err(ExecAlarm::HardLimit));
    assert!(sim.log().lines.is_empty());

    sys.clear_alarm();
    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("X"))
        .unwrap();
    assert_eq!(sys.state, MachineState::Idle);
}

#[test]
fn recovers_after_reset_is_acknowledged() {
    let config = machine(TWO_CYCLES);
    let (sim, signals) = rig(&config);
    let mut sim = sim.with_injection(1, Injection::Reset);
    let mut sys = SystemState::new();

    let result = Homing::new(&config, &mut sim, &signals, &mut sys).run_cycles(axes("XY"));
    assert_eq!(result, Err(ExecAlarm::HomingFailReset));

    signals.clear_reset();
    sys.clear_alarm();
    Homing::new(&config, &mut sim, &signals, &mut sys)
        .run_cycles(axes("XY"))
        .unwrap();
    assert_eq!(sys.state, MachineState::Idle);
    assert!(signals.limits().is_empty());
}
