//! # Valve Control Library
//!
//! Interlock-gated, timeout-supervised open/close state machine for
//! pneumatic or electric valves driven through named binary I/O points.
//!
//! ## Layers
//!
//! 1. **NamedStateEntity**: name + state/command register
//! 2. **Device**: entity plus its named binary points
//! 3. **Valve**: the transition logic; hardware predicates come from a
//!    [`ValveKind`](valve::ValveKind) variant (single or double throw)
//! 4. **CycleRunner**: the external driver polling one or more valves
//!
//! ## Driving a valve
//!
//! The state machine never blocks and never arms a timer. Timeouts are
//! detected by polling, so the driver must call
//! [`Valve::on_timeout_tick`](valve::Valve::on_timeout_tick) often enough
//! for the configured timeout resolution, and
//! [`Valve::on_data_changed`](valve::Valve::on_data_changed) on sensor
//! changes. Calls for one valve must be serialized by the driver.

pub mod config;
pub mod cycle;
pub mod device;
pub mod entity;
pub mod valve;

pub use device::{Controllable, Device, DeviceError, PointBinding};
pub use entity::NamedStateEntity;
pub use valve::{Valve, ValveActuator, ValveKind, ValveType};
