//! Double-throw (gate) valve lifecycle.

use valve_common::consts::DEFAULT_MOTION_TIMEOUT_US;
use valve_common::state::{CommandCode, StateCode, ValveFault};
use valve_control::ValveType;

use super::Plant;

#[test]
fn open_timeout_then_reset() {
    let plant = Plant::new();
    let mut v = plant.valve("Gate", ValveType::DoubleThrow);
    plant.set("GateOPEN_OK?", true);

    v.set_command(CommandCode::Open);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Opening);
    assert!(plant.get("GateOPEN!"));

    plant.clock.advance(DEFAULT_MOTION_TIMEOUT_US);
    assert_eq!(v.on_timeout_tick(), 0);
    plant.clock.advance(1);
    assert_eq!(v.on_timeout_tick(), 1);
    assert_eq!(v.state(), StateCode::Invalid);
    assert_eq!(v.faults(), ValveFault::MOTION_TIMEOUT);

    v.set_command(CommandCode::Reset);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Idle);
    assert!(!plant.get("GateOPEN!"));
    assert!(!plant.get("GateCLOSE!"));
}

#[test]
fn full_cycle_close_open() {
    let plant = Plant::new();
    let mut v = plant.valve("Gate", ValveType::DoubleThrow);
    plant.set("GateOPEN_OK?", true);
    plant.set("GateCLOSE_OK?", true);
    plant.set("GateOPENED?", true);

    v.set_command(CommandCode::Close);
    v.on_data_changed();
    assert_eq!(v.state(), StateCode::Closing);
    assert!(plant.get("GateCLOSE!"));
    assert!(!plant.get("GateOPEN!"));

    plant.set("GateOPENED?", false);
    assert_eq!(v.on_data_changed(), 0);
    plant.set("GateCLOSED?", true);
    assert_eq!(v.on_data_changed(), 1);
    assert!(v.is_closed());

    v.set_command(CommandCode::Open);
    v.on_data_changed();
    assert_eq!(v.state(), StateCode::Opening);
    assert!(!plant.get("GateCLOSE!"));
    assert!(plant.get("GateOPEN!"));

    plant.set("GateCLOSED?", false);
    plant.set("GateOPENED?", true);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Idle);
    assert!(v.is_opened());
}

#[test]
fn contradictory_sensors_from_idle() {
    let plant = Plant::new();
    let mut v = plant.valve("Gate", ValveType::DoubleThrow);
    plant.set("GateCLOSED?", true);
    plant.set("GateOPENED?", true);

    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Invalid);
    assert!(v.faults().contains(ValveFault::SENSOR_CONTRADICTION));

    // Already invalid: no second transition.
    assert_eq!(v.on_data_changed(), 0);
}

#[test]
fn contradiction_while_waiting() {
    let plant = Plant::new();
    let mut v = plant.valve("Gate", ValveType::DoubleThrow);
    v.set_command(CommandCode::Open);
    v.on_data_changed();
    assert_eq!(v.state(), StateCode::Waiting);

    plant.set("GateCLOSED?", true);
    plant.set("GateOPENED?", true);
    v.on_timeout_tick();
    assert_eq!(v.state(), StateCode::Invalid);
    assert_eq!(v.pending_command(), CommandCode::Idle);
}

#[test]
fn idle_is_idempotent() {
    let plant = Plant::new();
    let mut v = plant.valve("Gate", ValveType::DoubleThrow);
    plant.set("GateCLOSED?", true);
    assert_eq!(v.on_data_changed(), 0);
    assert_eq!(v.on_data_changed(), 0);
    assert_eq!(v.on_timeout_tick(), 0);
}
