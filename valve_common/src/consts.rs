//! System-wide constants for the valve workspace.
//!
//! Logical point attribute names and timing defaults. Imported by all
//! crates.

/// Default motion / interlock timeout in microseconds (5 s).
pub const DEFAULT_MOTION_TIMEOUT_US: u64 = 5_000_000;

/// Default polling period of the cycle runner in microseconds (10 ms).
pub const DEFAULT_TICK_PERIOD_US: u64 = 10_000;

/// Closed-position sensor.
pub const CLOSED_SENSOR: &str = "CLOSED?";

/// Opened-position sensor (double-throw only).
pub const OPENED_SENSOR: &str = "OPENED?";

/// Close interlock permissive.
pub const CLOSE_INTERLOCK: &str = "CLOSE_OK?";

/// Open interlock permissive.
pub const OPEN_INTERLOCK: &str = "OPEN_OK?";

/// Close actuator output.
pub const CLOSE_ACTUATOR: &str = "CLOSE!";

/// Open actuator output (double-throw only).
pub const OPEN_ACTUATOR: &str = "OPEN!";
