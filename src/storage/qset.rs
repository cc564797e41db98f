//! Quantum-Set node
//!
//! A node owns a lazily allocated array of `qset` optional quantum
//! buffers. A missing array and a missing buffer both mean "never
//! written". Every allocation goes through `try_reserve_exact` so an
//! exhausted allocator surfaces as `AllocationFailure` instead of aborting.

use crate::config::Geometry;
use crate::error::{Result, ScullError};

/// One fixed-size quantum buffer
pub type Quantum = Box<[u8]>;

/// Allocate a zeroed buffer of exactly `len` bytes, failing softly
pub(crate) fn alloc_zeroed(len: usize) -> Result<Quantum> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf.into_boxed_slice())
}

/// Allocate an array of `len` empty slots, failing softly
fn alloc_slots(len: usize) -> Result<Vec<Option<Quantum>>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(len)?;
    slots.resize_with(len, || None);
    Ok(slots)
}

/// A node in the quantum-set chain
#[derive(Debug, Default)]
pub struct QsetNode {
    /// Slot array, absent until the first write touches this node
    slots: Option<Vec<Option<Quantum>>>,
}

impl QsetNode {
    /// Create a node with no slot array
    pub fn new() -> Self {
        Self { slots: None }
    }

    /// Whether the slot array has been allocated
    pub fn has_slots(&self) -> bool {
        self.slots.is_some()
    }

    /// Address of the slot array, for diagnostics only
    pub fn slots_addr(&self) -> Option<usize> {
        self.slots.as_ref().map(|s| s.as_ptr() as usize)
    }

    /// Get the quantum buffer in `slot`, if materialized
    pub fn quantum(&self, slot: usize) -> Option<&[u8]> {
        self.slots.as_ref()?.get(slot)?.as_deref()
    }

    /// Get the quantum buffer in `slot`, allocating the slot array and
    /// the buffer as needed.
    ///
    /// Both allocations are made before the node is touched, so a failure
    /// leaves the node exactly as it was.
    pub fn quantum_or_alloc(&mut self, slot: usize, geometry: &Geometry) -> Result<&mut [u8]> {
        let needs_slots = self.slots.is_none();
        let fresh_quantum = if self.quantum(slot).is_none() {
            Some(alloc_zeroed(geometry.quantum)?)
        } else {
            None
        };
        if needs_slots {
            self.slots = Some(alloc_slots(geometry.qset)?);
        }

        let slots = self.slots.get_or_insert_with(Vec::new);
        let entry = &mut slots[slot];
        if let Some(buf) = fresh_quantum {
            *entry = Some(buf);
        }

        entry.as_deref_mut().ok_or_else(|| {
            ScullError::AllocationFailure(format!("quantum slot {} left vacant", slot))
        })
    }

    /// Occupied slots and their buffers, in slot order
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        self.slots
            .iter()
            .flat_map(|slots| slots.iter().enumerate())
            .filter_map(|(i, q)| q.as_deref().map(|buf| (i, buf)))
    }

    /// Drop every buffer, then the slot array
    pub fn release(&mut self) -> usize {
        let mut freed = 0;
        if let Some(slots) = self.slots.as_mut() {
            for q in slots.iter_mut() {
                if q.take().is_some() {
                    freed += 1;
                }
            }
        }
        self.slots = None;
        freed
    }
}
