//! Transfer Channel
//!
//! Moves bytes between a device's quantum buffers and a caller-owned
//! buffer. Channels behave like streams: every successful transfer
//! consumes (source) or fills (sink) the next bytes of the caller's side,
//! so repeated calls walking across quanta just keep passing the same
//! channel.
//!
//! A channel may fail on its own. Bytes moved before the failure are not
//! rolled back.

use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, ScullError};

/// Destination of a device read
pub trait TransferSink {
    /// Copy all of `src` into the caller's buffer
    fn copy_to_caller(&mut self, src: &[u8]) -> Result<()>;
}

/// Origin of a device write
pub trait TransferSource {
    /// Fill all of `dst` from the caller's buffer
    fn copy_from_caller(&mut self, dst: &mut [u8]) -> Result<()>;
}

// =============================================================================
// Slices
// =============================================================================

impl TransferSink for &mut [u8] {
    fn copy_to_caller(&mut self, src: &[u8]) -> Result<()> {
        if src.len() > self.len() {
            return Err(ScullError::TransferFault(format!(
                "caller buffer too small: need {} bytes, have {}",
                src.len(),
                self.len()
            )));
        }
        let (head, tail) = std::mem::take(self).split_at_mut(src.len());
        head.copy_from_slice(src);
        *self = tail;
        Ok(())
    }
}

impl TransferSource for &[u8] {
    fn copy_from_caller(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.len() {
            return Err(ScullError::TransferFault(format!(
                "caller buffer too short: need {} bytes, have {}",
                dst.len(),
                self.len()
            )));
        }
        let (head, tail) = self.split_at(dst.len());
        dst.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

impl TransferSink for Vec<u8> {
    fn copy_to_caller(&mut self, src: &[u8]) -> Result<()> {
        self.try_reserve(src.len())
            .map_err(|e| ScullError::TransferFault(e.to_string()))?;
        self.extend_from_slice(src);
        Ok(())
    }
}

// =============================================================================
// Bytes
// =============================================================================

impl TransferSink for BytesMut {
    fn copy_to_caller(&mut self, src: &[u8]) -> Result<()> {
        self.put_slice(src);
        Ok(())
    }
}

impl TransferSource for Bytes {
    fn copy_from_caller(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.remaining() {
            return Err(ScullError::TransferFault(format!(
                "caller buffer too short: need {} bytes, have {}",
                dst.len(),
                self.remaining()
            )));
        }
        self.copy_to_slice(dst);
        Ok(())
    }
}

// =============================================================================
// std::io adapters
// =============================================================================

/// Sink over any `io::Write`; write errors become transfer faults
#[derive(Debug)]
pub struct IoSink<W>(pub W);

impl<W: io::Write> TransferSink for IoSink<W> {
    fn copy_to_caller(&mut self, src: &[u8]) -> Result<()> {
        self.0
            .write_all(src)
            .map_err(|e| ScullError::TransferFault(e.to_string()))
    }
}

/// Source over any `io::Read`; short input is a transfer fault
#[derive(Debug)]
pub struct IoSource<R>(pub R);

impl<R: io::Read> TransferSource for IoSource<R> {
    fn copy_from_caller(&mut self, dst: &mut [u8]) -> Result<()> {
        self.0
            .read_exact(dst)
            .map_err(|e| ScullError::TransferFault(e.to_string()))
    }
}
