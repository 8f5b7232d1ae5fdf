//! Valve: interlock-gated, timeout-supervised open/close state machine.
//!
//! ## Transitions (one evaluation per `update()`)
//!
//! | State     | Condition                                 | Next                 |
//! |-----------|-------------------------------------------|----------------------|
//! | Idle      | `Close`/`Open`, interlock met             | Closing / Opening    |
//! | Idle      | `Close`/`Open`, interlock not met         | Waiting (queued)     |
//! | Waiting   | queued interlock now met                  | Closing / Opening    |
//! | Waiting   | still unmet, wait > timeout               | Invalid              |
//! | Opening   | opened / motion > timeout                 | Idle / Invalid       |
//! | Closing   | closed / motion > timeout                 | Idle / Invalid       |
//! | Invalid   | `Reset`                                   | Idle (outputs idled) |
//! | any       | contradictory sensors                     | Invalid              |
//!
//! A command the current state cannot process is queued into the
//! per-instance pending slot if that slot is empty, otherwise rejected and
//! logged. The live register is cleared either way.

mod double_throw;
mod single_throw;

pub use double_throw::DoubleThrowValve;
pub use single_throw::SingleThrowValve;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use valve_common::clock::Clock;
use valve_common::consts::{
    CLOSE_ACTUATOR, CLOSE_INTERLOCK, CLOSED_SENSOR, DEFAULT_MOTION_TIMEOUT_US, OPEN_ACTUATOR,
    OPEN_INTERLOCK, OPENED_SENSOR,
};
use valve_common::state::{CommandCode, StateCode, ValveFault};

use crate::device::{Controllable, Device, DeviceError};

// ─── Hardware predicates ────────────────────────────────────────────

/// Hardware-specific predicates consumed by the valve state machine.
pub trait ValveActuator {
    /// Asserted actuator output(s) not yet confirmed by the sensor(s).
    fn in_motion(&self) -> bool;

    /// Opened position is reported.
    fn is_opened(&self) -> bool;

    /// Closed position is reported.
    fn is_closed(&self) -> bool;

    /// Check the close interlock; if met, drive the close actuator.
    /// Returns whether the command was issued to hardware.
    fn close(&self) -> bool;

    /// Check the open interlock; if met, drive the open actuator.
    fn open(&self) -> bool;

    /// De-assert all actuator outputs.
    fn idle_output(&self);

    /// Hardware reports physically impossible sensor combinations.
    fn invalid_sensor_state(&self) -> bool {
        false
    }
}

// ─── ValveType / ValveKind ──────────────────────────────────────────

/// Valve hardware family, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValveType {
    /// One actuator (`CLOSE!`), one sensor (`CLOSED?`).
    SingleThrow,
    /// Two actuators (`CLOSE!`, `OPEN!`), two sensors. Slot or gate valves.
    DoubleThrow,
}

impl ValveType {
    /// Configuration spelling, e.g. `"single_throw"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleThrow => "single_throw",
            Self::DoubleThrow => "double_throw",
        }
    }

    /// Input attributes the variant dereferences.
    pub const fn required_inputs(self) -> &'static [&'static str] {
        match self {
            Self::SingleThrow => &[CLOSED_SENSOR, CLOSE_INTERLOCK, OPEN_INTERLOCK],
            Self::DoubleThrow => &[CLOSED_SENSOR, OPENED_SENSOR, CLOSE_INTERLOCK, OPEN_INTERLOCK],
        }
    }

    /// Output attributes the variant drives.
    pub const fn required_outputs(self) -> &'static [&'static str] {
        match self {
            Self::SingleThrow => &[CLOSE_ACTUATOR],
            Self::DoubleThrow => &[CLOSE_ACTUATOR, OPEN_ACTUATOR],
        }
    }
}

impl fmt::Display for ValveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware variant of a valve with its resolved point handles.
#[derive(Debug, Clone)]
pub enum ValveKind {
    SingleThrow(SingleThrowValve),
    DoubleThrow(DoubleThrowValve),
}

impl ValveKind {
    /// Resolve the points of `valve_type` from `device`.
    pub fn resolve(valve_type: ValveType, device: &Device) -> Result<Self, DeviceError> {
        Ok(match valve_type {
            ValveType::SingleThrow => Self::SingleThrow(SingleThrowValve::from_device(device)?),
            ValveType::DoubleThrow => Self::DoubleThrow(DoubleThrowValve::from_device(device)?),
        })
    }

    /// Hardware family of this variant.
    pub const fn valve_type(&self) -> ValveType {
        match self {
            Self::SingleThrow(_) => ValveType::SingleThrow,
            Self::DoubleThrow(_) => ValveType::DoubleThrow,
        }
    }
}

impl ValveActuator for ValveKind {
    fn in_motion(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.in_motion(),
            Self::DoubleThrow(v) => v.in_motion(),
        }
    }

    fn is_opened(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.is_opened(),
            Self::DoubleThrow(v) => v.is_opened(),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.is_closed(),
            Self::DoubleThrow(v) => v.is_closed(),
        }
    }

    fn close(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.close(),
            Self::DoubleThrow(v) => v.close(),
        }
    }

    fn open(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.open(),
            Self::DoubleThrow(v) => v.open(),
        }
    }

    fn idle_output(&self) {
        match self {
            Self::SingleThrow(v) => v.idle_output(),
            Self::DoubleThrow(v) => v.idle_output(),
        }
    }

    fn invalid_sensor_state(&self) -> bool {
        match self {
            Self::SingleThrow(v) => v.invalid_sensor_state(),
            Self::DoubleThrow(v) => v.invalid_sensor_state(),
        }
    }
}

// ─── Valve ──────────────────────────────────────────────────────────

/// Open/close valve state machine.
///
/// Single-threaded: the driver must serialize calls per instance.
pub struct Valve {
    device: Device,
    kind: ValveKind,
    clock: Arc<dyn Clock>,
    motion_start_us: u64,
    wait_start_us: u64,
    motion_timeout_us: u64,
    /// Command queued until its interlock is met. Owned by this instance.
    pending_command: CommandCode,
    faults: ValveFault,
    rejected_commands: u64,
}

impl fmt::Debug for Valve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Valve")
            .field("device", &self.device)
            .field("kind", &self.kind)
            .field("motion_start_us", &self.motion_start_us)
            .field("wait_start_us", &self.wait_start_us)
            .field("motion_timeout_us", &self.motion_timeout_us)
            .field("pending_command", &self.pending_command)
            .field("faults", &self.faults)
            .field("rejected_commands", &self.rejected_commands)
            .finish_non_exhaustive()
    }
}

impl Valve {
    /// Build a valve of `valve_type` over `device`.
    ///
    /// # Errors
    /// `DeviceError` if the device lacks a point the variant needs.
    pub fn new(
        device: Device,
        valve_type: ValveType,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DeviceError> {
        let kind = ValveKind::resolve(valve_type, &device)?;
        Ok(Self {
            device,
            kind,
            clock,
            motion_start_us: 0,
            wait_start_us: 0,
            motion_timeout_us: DEFAULT_MOTION_TIMEOUT_US,
            pending_command: CommandCode::Idle,
            faults: ValveFault::empty(),
            rejected_commands: 0,
        })
    }

    /// Replace the motion / interlock timeout.
    pub fn with_motion_timeout(mut self, timeout: Duration) -> Self {
        self.motion_timeout_us = u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX);
        self
    }

    // ── Register access ──

    /// Device name.
    #[inline]
    pub fn name(&self) -> &str {
        self.device.name()
    }

    /// Current state code.
    #[inline]
    pub fn state(&self) -> StateCode {
        self.device.state()
    }

    /// Current content of the command register.
    #[inline]
    pub fn command(&self) -> CommandCode {
        self.device.command()
    }

    /// Write the command register. Processed on the next `update()`.
    pub fn set_command(&mut self, command: CommandCode) -> bool {
        debug!(device = %self.name(), %command, "command written");
        self.device.set_command(command)
    }

    /// True iff the valve is `Idle`.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.device.ready()
    }

    /// Command queued for a later step, `Idle` if none.
    #[inline]
    pub fn pending_command(&self) -> CommandCode {
        self.pending_command
    }

    /// Why the valve is `Invalid`. Empty outside `Invalid`.
    #[inline]
    pub fn faults(&self) -> ValveFault {
        self.faults
    }

    /// Number of commands dropped because one was already pending.
    pub fn rejected_commands(&self) -> u64 {
        self.rejected_commands
    }

    /// Motion / interlock wait timeout.
    pub fn motion_timeout(&self) -> Duration {
        Duration::from_micros(self.motion_timeout_us)
    }

    /// Start of the current motion. Meaningful in `Opening`/`Closing`.
    pub fn motion_start_us(&self) -> u64 {
        self.motion_start_us
    }

    /// Start of the current interlock wait. Meaningful in `Waiting`.
    pub fn wait_start_us(&self) -> u64 {
        self.wait_start_us
    }

    /// Underlying device and its points.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Hardware variant with its resolved point handles.
    pub fn kind(&self) -> &ValveKind {
        &self.kind
    }

    /// Configuration name of the hardware family, e.g. `"double_throw"`.
    pub fn kind_name(&self) -> &'static str {
        self.kind.valve_type().as_str()
    }

    /// Actuator asserted but not yet confirmed by a sensor.
    pub fn in_motion(&self) -> bool {
        self.kind.in_motion()
    }

    /// Opened position is reported.
    pub fn is_opened(&self) -> bool {
        self.kind.is_opened()
    }

    /// Closed position is reported.
    pub fn is_closed(&self) -> bool {
        self.kind.is_closed()
    }

    // ── Entry points ──

    /// Called when input data changes.
    pub fn on_data_changed(&mut self) -> u8 {
        u8::from(self.update())
    }

    /// Called periodically to check completion of requested motions.
    pub fn on_timeout_tick(&mut self) -> u8 {
        u8::from(self.update())
    }

    /// Evaluate one step of the transition table.
    ///
    /// Returns true if the state changed or a command was accepted/queued.
    pub fn update(&mut self) -> bool {
        let before = self.state();
        let mut accepted = false;

        match before {
            StateCode::Idle => accepted = self.step_idle(),
            StateCode::Waiting => self.step_waiting(),
            StateCode::Opening => {
                if self.kind.is_opened() {
                    self.device.set_state(StateCode::Idle);
                } else if self.elapsed_since(self.motion_start_us) > self.motion_timeout_us {
                    self.enter_invalid(ValveFault::MOTION_TIMEOUT);
                }
            }
            StateCode::Closing => {
                if self.kind.is_closed() {
                    self.device.set_state(StateCode::Idle);
                } else if self.elapsed_since(self.motion_start_us) > self.motion_timeout_us {
                    self.enter_invalid(ValveFault::MOTION_TIMEOUT);
                }
            }
            StateCode::Invalid => {
                if self.command() == CommandCode::Reset {
                    self.device.set_command(CommandCode::Idle);
                    self.kind.idle_output();
                    self.pending_command = CommandCode::Idle;
                    self.faults = ValveFault::empty();
                    self.device.set_state(StateCode::Idle);
                    info!(device = %self.name(), "reset: outputs idled");
                    accepted = true;
                }
            }
            // Never entered by this machine.
            StateCode::Initializing | StateCode::MotionComplete => {}
        }

        accepted |= self.queue_unprocessed_command();

        if self.state() != StateCode::Invalid && self.kind.invalid_sensor_state() {
            self.enter_invalid(ValveFault::SENSOR_CONTRADICTION);
        }

        let after = self.state();
        if after != before {
            debug!(device = %self.name(), from = %before, to = %after, "state transition");
        }
        accepted || after != before
    }

    /// `Idle`: take the live command, or replay a queued motion command.
    fn step_idle(&mut self) -> bool {
        let live = self.command();
        let command = if live.is_idle() {
            let queued = std::mem::take(&mut self.pending_command);
            if !queued.is_idle() && !queued.is_motion() {
                debug!(device = %self.name(), command = %queued, "discarding queued command at rest");
            }
            queued
        } else {
            if !self.pending_command.is_idle() {
                debug!(
                    device = %self.name(),
                    stale = %self.pending_command,
                    command = %live,
                    "live command supersedes queued command"
                );
                self.pending_command = CommandCode::Idle;
            }
            live
        };

        if !command.is_motion() {
            return false;
        }
        if !self.issue(command) {
            self.wait_start_us = self.clock.now_us();
            self.pending_command = command;
            self.device.set_state(StateCode::Waiting);
            debug!(device = %self.name(), %command, "interlock not met, waiting");
        }
        if !live.is_idle() {
            self.device.set_command(CommandCode::Idle);
        }
        true
    }

    /// `Waiting`: retry the queued command's interlock or time out.
    fn step_waiting(&mut self) {
        let queued = self.pending_command;
        if queued.is_motion() && self.issue(queued) {
            self.pending_command = CommandCode::Idle;
        } else if self.elapsed_since(self.wait_start_us) > self.motion_timeout_us {
            self.enter_invalid(ValveFault::INTERLOCK_TIMEOUT);
        }
    }

    /// Try to start `command`'s motion. On success records the motion start
    /// and enters `Opening`/`Closing`.
    fn issue(&mut self, command: CommandCode) -> bool {
        let (issued, next) = match command {
            CommandCode::Close => (self.kind.close(), StateCode::Closing),
            CommandCode::Open => (self.kind.open(), StateCode::Opening),
            _ => return false,
        };
        if issued {
            self.motion_start_us = self.clock.now_us();
            self.device.set_state(next);
        }
        issued
    }

    /// Capture a command the state switch left in the register.
    fn queue_unprocessed_command(&mut self) -> bool {
        let leftover = self.command();
        if leftover.is_idle() {
            return false;
        }
        self.device.set_command(CommandCode::Idle);

        if self.pending_command.is_idle() {
            self.pending_command = leftover;
            debug!(device = %self.name(), command = %leftover, state = %self.state(), "command queued");
            true
        } else {
            self.rejected_commands += 1;
            warn!(
                device = %self.name(),
                command = %leftover,
                code = leftover.as_u8(),
                pending = %self.pending_command,
                "could not accept command"
            );
            false
        }
    }

    fn enter_invalid(&mut self, fault: ValveFault) {
        self.device.set_state(StateCode::Invalid);
        self.faults |= fault;
        self.pending_command = CommandCode::Idle;
        warn!(device = %self.name(), ?fault, "valve invalid, reset required");
    }

    #[inline]
    fn elapsed_since(&self, start_us: u64) -> u64 {
        self.clock.now_us().saturating_sub(start_us)
    }
}

impl Controllable for Valve {
    fn name(&self) -> &str {
        Valve::name(self)
    }

    fn state(&self) -> StateCode {
        Valve::state(self)
    }

    fn set_command(&mut self, command: CommandCode) -> bool {
        Valve::set_command(self, command)
    }

    fn on_data_changed(&mut self) -> u8 {
        Valve::on_data_changed(self)
    }

    fn on_timeout_tick(&mut self) -> u8 {
        Valve::on_timeout_tick(self)
    }
}
