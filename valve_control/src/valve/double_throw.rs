//! Double-throw valve (slot or gate valve): `CLOSE!` / `OPEN!` actuators,
//! `CLOSED?` / `OPENED?` position sensors.
//!
//! Both sensors made at once is physically impossible and forces the valve
//! to `Invalid` regardless of its state.

use valve_common::consts::{
    CLOSE_ACTUATOR, CLOSE_INTERLOCK, CLOSED_SENSOR, OPEN_ACTUATOR, OPEN_INTERLOCK, OPENED_SENSOR,
};
use valve_common::io::{BinaryInput, BinaryOutput};

use super::ValveActuator;
use crate::device::{Device, DeviceError};

#[derive(Debug, Clone)]
pub struct DoubleThrowValve {
    close_cmd: BinaryOutput,
    open_cmd: BinaryOutput,
    closed: BinaryInput,
    opened: BinaryInput,
    close_ok: BinaryInput,
    open_ok: BinaryInput,
}

impl DoubleThrowValve {
    /// Resolve point handles from `device`.
    pub fn from_device(device: &Device) -> Result<Self, DeviceError> {
        Ok(Self {
            close_cmd: device.output(CLOSE_ACTUATOR)?.clone(),
            open_cmd: device.output(OPEN_ACTUATOR)?.clone(),
            closed: device.input(CLOSED_SENSOR)?.clone(),
            opened: device.input(OPENED_SENSOR)?.clone(),
            close_ok: device.input(CLOSE_INTERLOCK)?.clone(),
            open_ok: device.input(OPEN_INTERLOCK)?.clone(),
        })
    }
}

impl ValveActuator for DoubleThrowValve {
    fn in_motion(&self) -> bool {
        (self.close_cmd.value() && !self.closed.value())
            || (self.open_cmd.value() && !self.opened.value())
    }

    fn is_opened(&self) -> bool {
        !self.closed.value() && self.opened.value()
    }

    fn is_closed(&self) -> bool {
        self.closed.value() && !self.opened.value()
    }

    fn close(&self) -> bool {
        let ok = self.close_ok.value();
        if ok {
            self.open_cmd.set(false);
            self.close_cmd.set(true);
        }
        ok
    }

    fn open(&self) -> bool {
        let ok = self.open_ok.value();
        if ok {
            self.close_cmd.set(false);
            self.open_cmd.set(true);
        }
        ok
    }

    fn idle_output(&self) {
        self.close_cmd.set(false);
        self.open_cmd.set(false);
    }

    fn invalid_sensor_state(&self) -> bool {
        self.closed.value() && self.opened.value()
    }
}
