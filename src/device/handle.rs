//! Device handle
//!
//! An open device: access mode, private file position and the interrupt
//! token its lock waits honor. Handles implement `std::io::Read` and
//! `std::io::Write` with ordinary short-transfer semantics.

use std::io;
use std::sync::Arc;

use crate::error::{Result, ScullError};
use crate::transfer::{TransferSink, TransferSource};

use super::dev::Device;
use super::interrupt::Interrupt;

/// How a device was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    /// Truncates the device on open
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }
}

/// An open device with its own position
#[derive(Debug)]
pub struct DeviceHandle {
    device: Arc<Device>,
    mode: AccessMode,
    pos: u64,
    intr: Interrupt,
}

impl DeviceHandle {
    pub(crate) fn new(device: Arc<Device>, mode: AccessMode, intr: Interrupt) -> Self {
        Self {
            device,
            mode,
            pos: 0,
            intr,
        }
    }

    /// Read up to `count` bytes at the current position into `sink`
    pub fn read_to<S>(&mut self, count: usize, sink: &mut S) -> Result<usize>
    where
        S: TransferSink + ?Sized,
    {
        if !self.mode.can_read() {
            return Err(ScullError::BadAccess(format!(
                "device {} not open for reading",
                self.device.index()
            )));
        }
        self.device.read(&mut self.pos, count, sink, &self.intr)
    }

    /// Write up to `count` bytes from `source` at the current position
    pub fn write_from<S>(&mut self, count: usize, source: &mut S) -> Result<usize>
    where
        S: TransferSource + ?Sized,
    {
        if !self.mode.can_write() {
            return Err(ScullError::BadAccess(format!(
                "device {} not open for writing",
                self.device.index()
            )));
        }
        self.device.write(&mut self.pos, count, source, &self.intr)
    }

    /// Read everything from the current position until a zero-length read
    pub fn read_to_end_bytes(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let n = self.read_to(usize::MAX, &mut out)?;
            if n == 0 {
                return Ok(out);
            }
        }
    }

    /// Write all of `data`, one quantum-bounded call at a time
    pub fn write_all_bytes(&mut self, data: &[u8]) -> Result<()> {
        let mut source: &[u8] = data;
        while !source.is_empty() {
            let remaining = source.len();
            self.write_from(remaining, &mut source)?;
        }
        Ok(())
    }

    /// Close the handle
    pub fn release(self) {
        let device = Arc::clone(&self.device);
        device.release(self);
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn set_position(&mut self, pos: u64) {
        self.pos = pos;
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Token that aborts this handle's lock waits when raised
    pub fn interrupt(&self) -> &Interrupt {
        &self.intr
    }
}

impl io::Read for DeviceHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len();
        let mut sink: &mut [u8] = buf;
        Ok(self.read_to(count, &mut sink)?)
    }
}

impl io::Write for DeviceHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut source: &[u8] = buf;
        Ok(self.write_from(buf.len(), &mut source)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
