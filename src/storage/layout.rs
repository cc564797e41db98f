//! Offset addressing
//!
//! Maps a linear byte offset onto (item, slot, inner) coordinates.

use crate::config::Geometry;

/// Coordinates of one byte inside the node chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Index of the quantum-set node in the chain
    pub item: u64,

    /// Slot index inside the node
    pub slot: usize,

    /// Byte offset inside the quantum buffer
    pub inner: usize,
}

impl Position {
    /// Bytes left in the addressed quantum, starting at `inner`
    #[inline]
    pub fn quantum_remaining(&self, geometry: &Geometry) -> usize {
        geometry.quantum - self.inner
    }
}

/// Locate `pos` for the given geometry. Pure; never allocates.
#[inline]
pub fn locate(pos: u64, geometry: &Geometry) -> Position {
    let item_size = geometry.item_size() as u64;
    let quantum = geometry.quantum as u64;

    let item = pos / item_size;
    let rest = pos % item_size;

    Position {
        item,
        slot: (rest / quantum) as usize,
        inner: (rest % quantum) as usize,
    }
}

/// Clamp a requested length so it stops at the end of the current quantum
#[inline]
pub fn clamp_to_quantum(position: &Position, geometry: &Geometry, len: usize) -> usize {
    len.min(position.quantum_remaining(geometry))
}
