//! Single-throw valve lifecycle.

use valve_common::consts::DEFAULT_MOTION_TIMEOUT_US;
use valve_common::state::{CommandCode, StateCode, ValveFault};
use valve_control::ValveType;

use super::Plant;

#[test]
fn close_then_sensor_confirms() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);
    plant.set("V1CLOSE_OK?", true);
    plant.set("V1CLOSED?", false);

    v.set_command(CommandCode::Close);
    assert_eq!(v.on_data_changed(), 1);
    assert!(plant.get("V1CLOSE!"));
    assert_eq!(v.state(), StateCode::Closing);
    assert_eq!(v.command(), CommandCode::Idle);

    plant.set("V1CLOSED?", true);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Idle);
    assert!(v.is_ready());
}

#[test]
fn open_releases_actuator_until_sensor_drops() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);
    plant.set("V1CLOSE!", true);
    plant.set("V1CLOSED?", true);
    plant.set("V1OPEN_OK?", true);

    v.set_command(CommandCode::Open);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Opening);
    assert!(!plant.get("V1CLOSE!"));

    plant.clock.advance_ms(300);
    assert_eq!(v.on_timeout_tick(), 0);

    plant.set("V1CLOSED?", false);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Idle);
    assert!(v.is_opened());
}

#[test]
fn interlock_arrives_before_timeout() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);

    v.set_command(CommandCode::Close);
    v.on_data_changed();
    assert_eq!(v.state(), StateCode::Waiting);

    for _ in 0..4 {
        plant.clock.advance_ms(1_000);
        assert_eq!(v.on_timeout_tick(), 0);
        assert_eq!(v.state(), StateCode::Waiting);
    }

    plant.set("V1CLOSE_OK?", true);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Closing);
    assert!(plant.get("V1CLOSE!"));
}

#[test]
fn interlock_never_arrives() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);

    v.set_command(CommandCode::Close);
    v.on_data_changed();
    plant.clock.advance(DEFAULT_MOTION_TIMEOUT_US + 1);
    assert_eq!(v.on_timeout_tick(), 1);
    assert_eq!(v.state(), StateCode::Invalid);
    assert!(v.faults().contains(ValveFault::INTERLOCK_TIMEOUT));
    assert!(!plant.get("V1CLOSE!"));
}

#[test]
fn invalid_ignores_everything_but_reset() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);
    v.set_command(CommandCode::Close);
    v.on_data_changed();
    plant.clock.advance(DEFAULT_MOTION_TIMEOUT_US + 1);
    v.on_timeout_tick();
    assert_eq!(v.state(), StateCode::Invalid);

    plant.set("V1CLOSE_OK?", true);
    plant.set("V1OPEN_OK?", true);
    plant.set("V1CLOSED?", true);
    plant.clock.advance_ms(10_000);
    for _ in 0..3 {
        v.on_data_changed();
        v.on_timeout_tick();
        assert_eq!(v.state(), StateCode::Invalid);
    }

    v.set_command(CommandCode::Reset);
    assert_eq!(v.on_data_changed(), 1);
    assert_eq!(v.state(), StateCode::Idle);
    assert!(v.faults().is_empty());
}

#[test]
fn no_contradiction_possible_with_one_sensor() {
    let plant = Plant::new();
    let mut v = plant.valve("V1", ValveType::SingleThrow);
    plant.set("V1CLOSED?", true);
    assert_eq!(v.on_data_changed(), 0);
    assert_eq!(v.state(), StateCode::Idle);
}
