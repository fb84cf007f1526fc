mod cycles;
mod failures;
mod squaring;

use std::sync::Arc;

use evo_common::config::ConfigLoader;
use evo_common::machine::MachineConfig;
use evo_homing::signals::RealtimeSignals;
use evo_homing::sim::SimMachine;

/// Parse and validate a machine description.
pub fn machine(toml: &str) -> MachineConfig {
    let config = MachineConfig::from_toml(toml).expect("machine TOML");
    config.validate().expect("valid machine");
    config
}

/// Simulated machine sharing a fresh signal block.
pub fn rig(config: &MachineConfig) -> (SimMachine, Arc<RealtimeSignals>) {
    let signals = Arc::new(RealtimeSignals::new());
    let sim = SimMachine::new(config.clone(), Arc::clone(&signals));
    (sim, signals)
}
