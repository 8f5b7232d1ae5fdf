//! Named binary input/output points.
//!
//! Inputs are read without synchronization; the most recently observed
//! value is good enough for a flag refreshed by hardware polling. Output
//! writes are serialized per cell by a scoped lock.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use tracing::warn;

use super::image::PointCell;

/// Shared placeholder cell for default-constructed points. Always `false`.
static DEFAULT_CELL: LazyLock<Arc<PointCell>> = LazyLock::new(|| Arc::new(PointCell::new(false)));

/// Access mode of a point binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointAccess {
    /// Input, reflects hardware.
    ReadOnly,
    /// Output, written by the device.
    ReadWrite,
}

// ─── BinaryInput ────────────────────────────────────────────────────

/// Read-only binary point.
#[derive(Debug, Clone)]
pub struct BinaryInput {
    name: String,
    cell: Arc<PointCell>,
}

impl BinaryInput {
    /// Bind a named input to a hardware cell.
    pub fn bind(name: impl Into<String>, cell: Arc<PointCell>) -> Self {
        Self {
            name: name.into(),
            cell,
        }
    }

    /// Logical attribute name, e.g. `"CLOSED?"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Most recently observed value. Lock-free.
    #[inline]
    pub fn value(&self) -> bool {
        self.cell.load()
    }

    /// False for default-constructed placeholders.
    pub fn is_bound(&self) -> bool {
        !Arc::ptr_eq(&self.cell, &*DEFAULT_CELL)
    }
}

impl Default for BinaryInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            cell: Arc::clone(&*DEFAULT_CELL),
        }
    }
}

// ─── BinaryOutput ───────────────────────────────────────────────────

/// Read/write binary point.
#[derive(Debug, Clone)]
pub struct BinaryOutput {
    name: String,
    cell: Arc<PointCell>,
}

impl BinaryOutput {
    /// Bind a named output to a hardware cell.
    pub fn bind(name: impl Into<String>, cell: Arc<PointCell>) -> Self {
        Self {
            name: name.into(),
            cell,
        }
    }

    /// Logical attribute name, e.g. `"CLOSE!"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current output value.
    #[inline]
    pub fn value(&self) -> bool {
        self.cell.load()
    }

    /// Write the output. Concurrent writers of the same cell serialize;
    /// the lock is released when this call returns.
    ///
    /// Writes to an unbound placeholder are dropped.
    pub fn set(&self, value: bool) {
        if !self.is_bound() {
            warn!(value, "write to unbound binary output ignored");
            return;
        }
        let _guard = self.cell.lock_writes();
        self.cell.store(value);
    }

    /// False for default-constructed placeholders.
    pub fn is_bound(&self) -> bool {
        !Arc::ptr_eq(&self.cell, &*DEFAULT_CELL)
    }
}

impl Default for BinaryOutput {
    fn default() -> Self {
        Self {
            name: String::new(),
            cell: Arc::clone(&*DEFAULT_CELL),
        }
    }
}

assert_impl_all!(BinaryInput: Send, Sync, Clone);
assert_impl_all!(BinaryOutput: Send, Sync, Clone);
