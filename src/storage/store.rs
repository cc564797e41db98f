//! Storage
//!
//! The owned node chain plus the high-water size and geometry. Storage
//! itself is single-threaded; the device wraps it in a lock.

use crate::config::Geometry;
use crate::error::{Result, ScullError};
use crate::transfer::{TransferSink, TransferSource};

use super::layout::{clamp_to_quantum, locate};
use super::qset::QsetNode;

/// What a trim released
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrimStats {
    /// Nodes dropped from the chain
    pub nodes_freed: usize,

    /// Quantum buffers dropped
    pub quanta_freed: usize,

    /// High-water size before the trim
    pub size_before: u64,
}

/// Sparse, growable byte storage
///
/// ## Layout
/// - `nodes[k]` exists iff some offset in item `k` or beyond was addressed
///   by a write; the chain never has gaps.
/// - `size` is a high-water mark, not a count of materialized bytes.
#[derive(Debug)]
pub struct Storage {
    /// Quantum-set chain, head first
    nodes: Vec<QsetNode>,

    /// Highest offset ever reached by a write
    size: u64,

    /// Current buffer geometry
    geometry: Geometry,
}

impl Storage {
    /// Create an empty storage with the given geometry
    pub fn new(geometry: Geometry) -> Self {
        Self {
            nodes: Vec::new(),
            size: 0,
            geometry,
        }
    }

    // =========================================================================
    // Locate
    // =========================================================================

    /// Find node `item` without extending the chain
    pub fn node(&self, item: u64) -> Option<&QsetNode> {
        let index = usize::try_from(item).ok()?;
        self.nodes.get(index)
    }

    /// Find node `item`, appending empty nodes up to it as needed.
    ///
    /// The chain is extended all at once after a successful reservation,
    /// so on failure no node has been added.
    pub fn node_or_create(&mut self, item: u64) -> Result<&mut QsetNode> {
        let index = usize::try_from(item)
            .map_err(|_| ScullError::AllocationFailure(format!("item {} out of range", item)))?;
        let wanted = index.checked_add(1).ok_or_else(|| {
            ScullError::AllocationFailure(format!("item {} out of range", item))
        })?;

        if wanted > self.nodes.len() {
            self.nodes.try_reserve(wanted - self.nodes.len())?;
            self.nodes.resize_with(wanted, QsetNode::new);
        }

        Ok(&mut self.nodes[index])
    }

    // =========================================================================
    // Read / Write
    // =========================================================================

    /// Copy up to `count` bytes at `pos` into `sink`.
    ///
    /// Returns 0 at or past the end of data, and also when `pos` falls in a
    /// hole that was never written. A single call never crosses a quantum
    /// boundary.
    pub fn read_into<S>(&self, pos: u64, count: usize, sink: &mut S) -> Result<usize>
    where
        S: TransferSink + ?Sized,
    {
        if pos >= self.size {
            return Ok(0);
        }
        let available = self.size - pos;
        let count = usize::try_from(available).map_or(count, |a| count.min(a));

        let position = locate(pos, &self.geometry);
        let quantum = match self
            .node(position.item)
            .and_then(|node| node.quantum(position.slot))
        {
            Some(q) => q,
            None => return Ok(0),
        };

        let count = clamp_to_quantum(&position, &self.geometry, count);
        sink.copy_to_caller(&quantum[position.inner..position.inner + count])?;

        Ok(count)
    }

    /// Copy up to `count` bytes from `source` into the storage at `pos`.
    ///
    /// Allocates the node, slot array and quantum on first touch; a failed
    /// allocation leaves the chain as it was. A single call never crosses a
    /// quantum boundary. The size only grows, and only after the transfer
    /// succeeded.
    pub fn write_from<S>(&mut self, pos: u64, count: usize, source: &mut S) -> Result<usize>
    where
        S: TransferSource + ?Sized,
    {
        let geometry = self.geometry;
        let position = locate(pos, &geometry);

        // Nodes appended for this write are dropped again if the quantum
        // cannot be allocated.
        let chain_len = self.nodes.len();
        let quantum = match self
            .node_or_create(position.item)?
            .quantum_or_alloc(position.slot, &geometry)
        {
            Ok(q) => q,
            Err(e) => {
                self.nodes.truncate(chain_len);
                tracing::warn!(item = position.item, "Quantum allocation failed: {}", e);
                return Err(e);
            }
        };

        let count = clamp_to_quantum(&position, &geometry, count);
        source.copy_from_caller(&mut quantum[position.inner..position.inner + count])?;

        let end = pos.saturating_add(count as u64);
        if end > self.size {
            self.size = end;
        }

        Ok(count)
    }

    // =========================================================================
    // Trim / Geometry
    // =========================================================================

    /// Free every buffer and node, reset size to 0 and geometry to `defaults`
    pub fn trim(&mut self, defaults: Geometry) -> TrimStats {
        let mut stats = TrimStats {
            size_before: self.size,
            ..TrimStats::default()
        };

        for mut node in self.nodes.drain(..) {
            stats.quanta_freed += node.release();
            stats.nodes_freed += 1;
        }

        self.size = 0;
        self.geometry = defaults;
        stats
    }

    /// Replace the geometry of an empty storage
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        geometry.validate()?;
        if !self.is_empty() {
            return Err(ScullError::Busy(format!(
                "cannot reshape populated storage ({} items, size {})",
                self.nodes.len(),
                self.size
            )));
        }
        self.geometry = geometry;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// High-water size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current geometry
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Number of nodes in the chain
    pub fn item_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes in chain order
    pub fn nodes(&self) -> &[QsetNode] {
        &self.nodes
    }

    /// True when nothing has been allocated and nothing was written
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.size == 0
    }
}
