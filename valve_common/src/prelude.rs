//! Prelude module for common re-exports.
//!
//! ```rust
//! use valve_common::prelude::*;
//! ```

// ─── Codes ──────────────────────────────────────────────────────────
pub use crate::state::{CommandCode, StateCode, ValveFault};

// ─── Clock ──────────────────────────────────────────────────────────
pub use crate::clock::{Clock, ManualClock, MonotonicClock};

// ─── I/O ────────────────────────────────────────────────────────────
pub use crate::io::{BinaryInput, BinaryOutput, PointAccess, PointCell, ProcessImage};

// ─── Configuration & logging ────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogConfig, LogFormat, LogLevel};
pub use crate::logging::init_tracing;

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_MOTION_TIMEOUT_US, DEFAULT_TICK_PERIOD_US};
