//! Devices: named state entities owning a map of binary points.
//!
//! A device maps logical attribute names (`"CLOSED?"`, `"CLOSE!"`) to points
//! bound once at construction. Variants resolve the attributes they need
//! into handles up front, so a missing point is a construction error and
//! never a runtime one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use valve_common::io::{BinaryInput, BinaryOutput, PointAccess, ProcessImage};
use valve_common::state::{CommandCode, StateCode};

use crate::entity::NamedStateEntity;

// ─── Error Types ────────────────────────────────────────────────────

/// Device construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// A required input attribute is not in the device's point map.
    #[error("device '{device}': missing input point '{point}'")]
    MissingInput { device: String, point: String },

    /// A required output attribute is not in the device's point map.
    #[error("device '{device}': missing output point '{point}'")]
    MissingOutput { device: String, point: String },
}

// ─── PointBinding ───────────────────────────────────────────────────

/// One row of a device point table: attribute → process-image path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBinding {
    /// Logical attribute used by the device logic, e.g. `"OPENED?"`.
    pub attribute: String,
    /// Cell path in the process image, e.g. `"Valve1OPENED?"`.
    pub path: String,
    pub access: PointAccess,
}

impl PointBinding {
    /// Read-only binding of `attribute` to `path`.
    pub fn input(attribute: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            path: path.into(),
            access: PointAccess::ReadOnly,
        }
    }

    /// Read/write binding of `attribute` to `path`.
    pub fn output(attribute: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            path: path.into(),
            access: PointAccess::ReadWrite,
        }
    }
}

// ─── Device ─────────────────────────────────────────────────────────

/// A [`NamedStateEntity`] plus its binary points.
#[derive(Debug, Clone)]
pub struct Device {
    entity: NamedStateEntity,
    serial: String,
    inputs: HashMap<String, BinaryInput>,
    outputs: HashMap<String, BinaryOutput>,
}

impl Device {
    /// Create an idle device over already-bound points.
    pub fn new(
        name: impl Into<String>,
        serial: impl Into<String>,
        inputs: HashMap<String, BinaryInput>,
        outputs: HashMap<String, BinaryOutput>,
    ) -> Self {
        Self {
            entity: NamedStateEntity::new(name),
            serial: serial.into(),
            inputs,
            outputs,
        }
    }

    /// Bind every row of `bindings` to a cell of `image`.
    ///
    /// A later row for the same attribute replaces an earlier one.
    pub fn from_image(
        name: impl Into<String>,
        serial: impl Into<String>,
        image: &ProcessImage,
        bindings: &[PointBinding],
    ) -> Self {
        let mut inputs = HashMap::new();
        let mut outputs = HashMap::new();
        for b in bindings {
            let cell = image.cell(&b.path);
            match b.access {
                PointAccess::ReadOnly => {
                    inputs.insert(b.attribute.clone(), BinaryInput::bind(&b.attribute, cell));
                }
                PointAccess::ReadWrite => {
                    outputs.insert(b.attribute.clone(), BinaryOutput::bind(&b.attribute, cell));
                }
            }
        }
        Self::new(name, serial, inputs, outputs)
    }

    /// Device name.
    #[inline]
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    /// Serial number, empty if not configured.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Current state code.
    #[inline]
    pub fn state(&self) -> StateCode {
        self.entity.state()
    }

    /// Current content of the command register.
    #[inline]
    pub fn command(&self) -> CommandCode {
        self.entity.command()
    }

    /// Write the command register.
    pub fn set_command(&mut self, command: CommandCode) -> bool {
        self.entity.set_command(command)
    }

    /// Set the state code. Owner only.
    #[inline]
    pub(crate) fn set_state(&mut self, state: StateCode) {
        self.entity.set_state(state);
    }

    /// True iff the device is at rest.
    #[inline]
    pub fn ready(&self) -> bool {
        self.entity.state() == StateCode::Idle
    }

    /// Underlying state/command register.
    pub fn entity(&self) -> &NamedStateEntity {
        &self.entity
    }

    /// Look up an input point by attribute.
    pub fn input(&self, attribute: &str) -> Result<&BinaryInput, DeviceError> {
        self.inputs
            .get(attribute)
            .ok_or_else(|| DeviceError::MissingInput {
                device: self.name().to_string(),
                point: attribute.to_string(),
            })
    }

    /// Look up an output point by attribute.
    pub fn output(&self, attribute: &str) -> Result<&BinaryOutput, DeviceError> {
        self.outputs
            .get(attribute)
            .ok_or_else(|| DeviceError::MissingOutput {
                device: self.name().to_string(),
                point: attribute.to_string(),
            })
    }

    /// Sorted input attribute names.
    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Sorted output attribute names.
    pub fn output_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.outputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ─── Controllable ───────────────────────────────────────────────────

/// Driver-facing interface of a polled device.
///
/// `on_data_changed` is called on sensor-change events and
/// `on_timeout_tick` on a periodic timer. Both return 1 when the step
/// produced a transition or accepted a command, else 0. Repeated calls with
/// no new input and no elapsed timeout return 0.
pub trait Controllable {
    fn name(&self) -> &str;

    fn state(&self) -> StateCode;

    /// Write the command register. See [`NamedStateEntity::set_command`].
    fn set_command(&mut self, command: CommandCode) -> bool;

    fn on_data_changed(&mut self) -> u8;

    fn on_timeout_tick(&mut self) -> u8;

    fn is_ready(&self) -> bool {
        self.state() == StateCode::Idle
    }
}
