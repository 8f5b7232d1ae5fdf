//! Single-throw valve: one actuator output (`CLOSE!`), one position sensor
//! (`CLOSED?`), plus the `CLOSE_OK?` / `OPEN_OK?` interlocks.
//!
//! De-asserting `CLOSE!` is what opens the valve (spring return).

use valve_common::consts::{CLOSE_ACTUATOR, CLOSE_INTERLOCK, CLOSED_SENSOR, OPEN_INTERLOCK};
use valve_common::io::{BinaryInput, BinaryOutput};

use super::ValveActuator;
use crate::device::{Device, DeviceError};

#[derive(Debug, Clone)]
pub struct SingleThrowValve {
    close_cmd: BinaryOutput,
    closed: BinaryInput,
    close_ok: BinaryInput,
    open_ok: BinaryInput,
}

impl SingleThrowValve {
    /// Resolve point handles from `device`.
    pub fn from_device(device: &Device) -> Result<Self, DeviceError> {
        Ok(Self {
            close_cmd: device.output(CLOSE_ACTUATOR)?.clone(),
            closed: device.input(CLOSED_SENSOR)?.clone(),
            close_ok: device.input(CLOSE_INTERLOCK)?.clone(),
            open_ok: device.input(OPEN_INTERLOCK)?.clone(),
        })
    }
}

impl ValveActuator for SingleThrowValve {
    /// Actuator and sensor disagree.
    fn in_motion(&self) -> bool {
        self.close_cmd.value() != self.closed.value()
    }

    fn is_opened(&self) -> bool {
        !self.closed.value()
    }

    /// Not in motion and the closed sensor is made.
    fn is_closed(&self) -> bool {
        !self.in_motion() && self.closed.value()
    }

    fn close(&self) -> bool {
        let ok = self.close_ok.value();
        if ok {
            self.close_cmd.set(true);
        }
        ok
    }

    fn open(&self) -> bool {
        let ok = self.open_ok.value();
        if ok {
            self.close_cmd.set(false);
        }
        ok
    }

    fn idle_output(&self) {
        self.close_cmd.set(false);
    }
}
