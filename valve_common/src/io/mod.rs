//! Binary I/O points bound to a shared process image.
//!
//! A [`ProcessImage`] owns the hardware-facing storage cells. Devices bind
//! named [`BinaryInput`] / [`BinaryOutput`] points to those cells once at
//! construction and never rebind them.

pub mod image;
pub mod point;

pub use image::{PointCell, ProcessImage};
pub use point::{BinaryInput, BinaryOutput, PointAccess};
