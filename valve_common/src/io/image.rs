//! Process image: named hardware cells shared by points and field drivers.
//!
//! The image plays the role of the polled hardware: a field driver (or a
//! simulation) refreshes input cells and observes output cells, while
//! devices read and write the same cells through their bound points.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard, RwLock};

// ─── PointCell ──────────────────────────────────────────────────────

/// One boolean hardware cell.
///
/// Reads are lock-free. Writers through [`BinaryOutput`](super::BinaryOutput)
/// take `write_lock` so concurrent writes to the same cell serialize.
#[derive(Debug, Default)]
pub struct PointCell {
    value: AtomicBool,
    write_lock: Mutex<()>,
}

impl PointCell {
    /// Create a cell holding `value`.
    pub const fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
            write_lock: Mutex::new(()),
        }
    }

    /// Most recently stored value.
    #[inline]
    pub fn load(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    /// Raw store without the writer lock. Writers that may race an output
    /// go through [`ProcessImage::write`] or `BinaryOutput::set`.
    #[inline]
    pub fn store(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    /// Acquire the writer lock. Released when the guard drops.
    #[inline]
    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock()
    }
}

// ─── ProcessImage ───────────────────────────────────────────────────

/// Thread-safe table of named [`PointCell`]s.
///
/// Cells are created on first use and live as long as any point or the
/// image refers to them.
#[derive(Debug, Default)]
pub struct ProcessImage {
    cells: RwLock<HashMap<String, Arc<PointCell>>>,
}

impl ProcessImage {
    /// Create an empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cell at `path`, creating it (value `false`) if absent.
    pub fn cell(&self, path: &str) -> Arc<PointCell> {
        if let Some(cell) = self.cells.read().get(path) {
            return Arc::clone(cell);
        }
        let mut cells = self.cells.write();
        Arc::clone(
            cells
                .entry(path.to_string())
                .or_insert_with(|| Arc::new(PointCell::default())),
        )
    }

    /// Read a cell. Unknown paths read as `None`.
    pub fn read(&self, path: &str) -> Option<bool> {
        self.cells.read().get(path).map(|c| c.load())
    }

    /// Write a cell from the field side, creating it if absent.
    ///
    /// Takes the cell's writer lock, so field writes and
    /// [`BinaryOutput::set`](super::BinaryOutput::set) on the same cell
    /// serialize.
    pub fn write(&self, path: &str, value: bool) {
        let cell = self.cell(path);
        let _guard = cell.lock_writes();
        cell.store(value);
    }

    /// True if a cell exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.cells.read().contains_key(path)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    /// True if no cell has been created yet.
    pub fn is_empty(&self) -> bool {
        self.cells.read().is_empty()
    }

    /// Sorted cell paths, for diagnostics.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.cells.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}
