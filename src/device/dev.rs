//! Device
//!
//! One storage instance behind one lock.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Geometry;
use crate::error::Result;
use crate::report::DeviceReport;
use crate::storage::{Storage, TrimStats};
use crate::transfer::{TransferSink, TransferSource};

use super::handle::{AccessMode, DeviceHandle};
use super::interrupt::{lock_interruptible, Interrupt};

/// A sparse in-memory byte device
///
/// ## Concurrency
/// - Every operation holds `storage` for its whole critical section:
///   addressing, allocation, the transfer itself, and the size update.
/// - Lock waits are interruptible through the caller's [`Interrupt`].
/// - A device never touches another device's lock.
pub struct Device {
    /// Position of this device in its set
    index: usize,

    /// Geometry restored by every trim
    defaults: Geometry,

    /// Node chain, size and current geometry
    storage: Mutex<Storage>,
}

impl Device {
    /// Create an empty device using `defaults` as its geometry
    pub fn new(index: usize, defaults: Geometry) -> Self {
        Self {
            index,
            defaults,
            storage: Mutex::new(Storage::new(defaults)),
        }
    }

    /// Open the device.
    ///
    /// Opening write-only truncates existing contents before any write.
    pub fn open(self: &Arc<Self>, mode: AccessMode, intr: &Interrupt) -> Result<DeviceHandle> {
        if mode == AccessMode::WriteOnly {
            let mut storage = lock_interruptible(&self.storage, intr)?;
            let stats = self.trim_locked(&mut storage);
            tracing::debug!(
                device = self.index,
                nodes = stats.nodes_freed,
                size = stats.size_before,
                "Truncated on write-only open"
            );
        }

        Ok(DeviceHandle::new(Arc::clone(self), mode, intr.clone()))
    }

    /// Release a handle. Storage is left untouched.
    pub fn release(&self, handle: DeviceHandle) {
        tracing::trace!(device = self.index, pos = handle.position(), "Released handle");
    }

    /// Read up to `count` bytes at `*pos` into `sink`, advancing `*pos`.
    ///
    /// Returns 0 at end of data. Short reads are normal: one call stops at
    /// the end of the current quantum, and an unwritten hole reads as 0.
    pub fn read<S>(&self, pos: &mut u64, count: usize, sink: &mut S, intr: &Interrupt) -> Result<usize>
    where
        S: TransferSink + ?Sized,
    {
        let storage = lock_interruptible(&self.storage, intr)?;

        let n = storage.read_into(*pos, count, sink).inspect_err(|e| {
            tracing::warn!(device = self.index, pos = *pos, "Read failed: {}", e);
        })?;
        *pos += n as u64;

        tracing::trace!(device = self.index, pos = *pos, bytes = n, "Read");
        Ok(n)
    }

    /// Write up to `count` bytes from `source` at `*pos`, advancing `*pos`.
    ///
    /// One call stops at the end of the current quantum; the caller loops
    /// for the remainder.
    pub fn write<S>(&self, pos: &mut u64, count: usize, source: &mut S, intr: &Interrupt) -> Result<usize>
    where
        S: TransferSource + ?Sized,
    {
        let mut storage = lock_interruptible(&self.storage, intr)?;

        let n = storage.write_from(*pos, count, source).inspect_err(|e| {
            tracing::warn!(device = self.index, pos = *pos, "Write failed: {}", e);
        })?;
        *pos += n as u64;

        tracing::trace!(
            device = self.index,
            pos = *pos,
            bytes = n,
            size = storage.size(),
            "Wrote"
        );
        Ok(n)
    }

    /// Read into `buf` at `pos` (single call, may be short)
    pub fn read_at(&self, pos: u64, buf: &mut [u8], intr: &Interrupt) -> Result<usize> {
        let mut pos = pos;
        let count = buf.len();
        let mut sink: &mut [u8] = buf;
        self.read(&mut pos, count, &mut sink, intr)
    }

    /// Write `data` at `pos` (single call, may be short)
    pub fn write_at(&self, pos: u64, data: &[u8], intr: &Interrupt) -> Result<usize> {
        let mut pos = pos;
        let mut source: &[u8] = data;
        self.write(&mut pos, data.len(), &mut source, intr)
    }

    /// Drop all contents and restore the default geometry
    pub fn trim(&self, intr: &Interrupt) -> Result<TrimStats> {
        let mut storage = lock_interruptible(&self.storage, intr)?;
        Ok(self.trim_locked(&mut storage))
    }

    /// Trim with the lock already held by the caller
    fn trim_locked(&self, storage: &mut Storage) -> TrimStats {
        let stats = storage.trim(self.defaults);
        tracing::debug!(
            device = self.index,
            nodes = stats.nodes_freed,
            quanta = stats.quanta_freed,
            "Trimmed"
        );
        stats
    }

    /// Trim during set teardown, waiting uninterruptibly for the lock
    pub(crate) fn teardown(&self) -> TrimStats {
        let mut storage = self.storage.lock();
        self.trim_locked(&mut storage)
    }

    /// Override the geometry while the device holds no data.
    ///
    /// The override lasts until the next trim.
    pub fn set_geometry(&self, geometry: Geometry, intr: &Interrupt) -> Result<()> {
        let mut storage = lock_interruptible(&self.storage, intr)?;
        storage.set_geometry(geometry)?;
        tracing::debug!(
            device = self.index,
            quantum = geometry.quantum,
            qset = geometry.qset,
            "Geometry changed"
        );
        Ok(())
    }

    /// Consistent diagnostic snapshot, taken under the lock
    pub fn report(&self, intr: &Interrupt) -> Result<DeviceReport> {
        let storage = lock_interruptible(&self.storage, intr)?;
        Ok(DeviceReport::capture(self.index, &storage))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Index of this device in its set
    pub fn index(&self) -> usize {
        self.index
    }

    /// Geometry restored by trim
    pub fn defaults(&self) -> Geometry {
        self.defaults
    }

    /// Current high-water size
    pub fn size(&self, intr: &Interrupt) -> Result<u64> {
        Ok(lock_interruptible(&self.storage, intr)?.size())
    }

    /// Current geometry
    pub fn geometry(&self, intr: &Interrupt) -> Result<Geometry> {
        Ok(lock_interruptible(&self.storage, intr)?.geometry())
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("index", &self.index)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
