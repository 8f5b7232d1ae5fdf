//! State and command codes for single-axis open/close devices.
//!
//! Both enums carry the numeric values of the device protocol so they can be
//! exchanged with supervisory software as raw integers. Includes the
//! `ValveFault` bitflags recording why a device was driven to `Invalid`.

use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

// ─── StateCode ──────────────────────────────────────────────────────

/// Mechanical state of a controllable device.
///
/// `Initializing` and `MotionComplete` are part of the code table but are
/// never entered by the valve transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i8)]
pub enum StateCode {
    /// Entered on program startup.
    Initializing = 90,
    /// Device is seen to be at rest.
    Idle = 0,
    /// Waiting for an interlock to be met.
    Waiting = 5,
    /// Requested motion just completed.
    MotionComplete = 10,
    /// Close motion in progress.
    Closing = 20,
    /// Open motion in progress.
    Opening = 30,
    /// Timeout or contradictory sensors. Requires `Reset`.
    Invalid = -1,
}

impl StateCode {
    /// Convert from raw `i8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            90 => Some(Self::Initializing),
            0 => Some(Self::Idle),
            5 => Some(Self::Waiting),
            10 => Some(Self::MotionComplete),
            20 => Some(Self::Closing),
            30 => Some(Self::Opening),
            -1 => Some(Self::Invalid),
            _ => None,
        }
    }

    /// Raw protocol value.
    #[inline]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// True while an actuator has been commanded and completion is pending.
    #[inline]
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

impl Default for StateCode {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initializing => "INITIALIZING",
            Self::Idle => "IDLE",
            Self::Waiting => "WAITING",
            Self::MotionComplete => "MOTION_COMPLETE",
            Self::Closing => "CLOSING",
            Self::Opening => "OPENING",
            Self::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}

// ─── CommandCode ────────────────────────────────────────────────────

/// Command written into a device's command register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum CommandCode {
    /// Null command: register empty.
    Idle = 0,
    Close = 20,
    Open = 30,
    /// Attempt to return to `Idle` from `Invalid`.
    Reset = 90,
}

impl CommandCode {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            20 => Some(Self::Close),
            30 => Some(Self::Open),
            90 => Some(Self::Reset),
            _ => None,
        }
    }

    /// Raw protocol value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Register is empty.
    #[inline]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// `Open` or `Close`.
    #[inline]
    pub const fn is_motion(self) -> bool {
        matches!(self, Self::Open | Self::Close)
    }
}

impl Default for CommandCode {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Close => "CLOSE",
            Self::Open => "OPEN",
            Self::Reset => "RESET",
        };
        f.write_str(s)
    }
}

impl FromStr for CommandCode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "close" => Ok(Self::Close),
            "open" => Ok(Self::Open),
            "reset" => Ok(Self::Reset),
            _ => Err(format!("unknown CommandCode: {s:?}")),
        }
    }
}

// ─── ValveFault ─────────────────────────────────────────────────────

bitflags! {
    /// Reason(s) a valve was driven to `StateCode::Invalid`.
    ///
    /// Set on entry to `Invalid`, cleared by an accepted `Reset`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValveFault: u8 {
        /// Interlock not satisfied within the timeout while `Waiting`.
        const INTERLOCK_TIMEOUT    = 0x01;
        /// Completion sensor not observed within the timeout.
        const MOTION_TIMEOUT       = 0x02;
        /// Mutually exclusive sensors asserted together.
        const SENSOR_CONTRADICTION = 0x04;
    }
}

impl Default for ValveFault {
    fn default() -> Self {
        Self::empty()
    }
}
