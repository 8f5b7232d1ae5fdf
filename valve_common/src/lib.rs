//! Valve Common Library
//!
//! Shared leaf types for the valve device workspace: state and command
//! codes, the microsecond clock contract, binary I/O points bound to a
//! process image, configuration loading and logging setup.
//!
//! # Module Structure
//!
//! - [`state`] - State/command codes and fault flags
//! - [`clock`] - Monotonic microsecond clock contract
//! - [`io`] - Binary I/O points and the process image they bind to
//! - [`config`] - Configuration loading traits and types
//! - [`logging`] - Tracing subscriber setup
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use valve_common::prelude::*;
//!
//! let image = ProcessImage::new();
//! let sensor = BinaryInput::bind("CLOSED?", image.cell("Valve1CLOSED?"));
//! assert!(!sensor.value());
//! ```

pub mod clock;
pub mod config;
pub mod consts;
pub mod io;
pub mod logging;
pub mod prelude;
pub mod state;
