//! Several independent valves driven by one cycle runner.

use std::time::Duration;

use valve_common::state::{CommandCode, StateCode};
use valve_control::ValveType;
use valve_control::cycle::CycleRunner;

use super::Plant;

#[test]
fn runner_drives_independent_valves() {
    let plant = Plant::new();
    let mut runner: CycleRunner = CycleRunner::new(Duration::from_micros(100));
    runner.add(plant.valve("V1", ValveType::SingleThrow));
    runner.add(plant.valve("Gate", ValveType::DoubleThrow));

    plant.set("V1CLOSE_OK?", true);
    runner.valve_mut("V1").unwrap().set_command(CommandCode::Close);
    runner.valve_mut("Gate").unwrap().set_command(CommandCode::Open);

    assert_eq!(runner.notify_data_changed(), 2);
    assert_eq!(runner.valve("V1").unwrap().state(), StateCode::Closing);
    assert_eq!(runner.valve("Gate").unwrap().state(), StateCode::Waiting);

    plant.set("V1CLOSED?", true);
    plant.set("GateOPEN_OK?", true);
    assert_eq!(runner.tick(), 2);
    assert_eq!(runner.valve("V1").unwrap().state(), StateCode::Idle);
    assert_eq!(runner.valve("Gate").unwrap().state(), StateCode::Opening);

    assert_eq!(runner.tick(), 0);
}

#[test]
fn runner_detects_timeouts_by_polling() {
    let plant = Plant::new();
    let mut runner: CycleRunner = CycleRunner::new(Duration::from_micros(100));
    runner.add(plant.valve("Gate", ValveType::DoubleThrow));
    plant.set("GateCLOSE_OK?", true);
    runner.valve_mut("Gate").unwrap().set_command(CommandCode::Close);

    let stats = *runner.run_cycles(3);
    assert_eq!(stats.cycle_count, 3);
    assert_eq!(stats.active_steps, 1);
    assert_eq!(runner.valve("Gate").unwrap().state(), StateCode::Closing);

    plant.clock.advance_ms(5_001);
    runner.run_cycles(1);
    assert_eq!(runner.valve("Gate").unwrap().state(), StateCode::Invalid);
    assert_eq!(runner.stats().active_steps, 2);
}
