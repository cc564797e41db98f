//! Introspection report
//!
//! Read-only snapshot of a device's chain. Captured under the device lock
//! by [`Device::report`](crate::device::Device::report); never mutates.

use std::fmt;

use crate::config::Geometry;
use crate::storage::Storage;

/// One node of the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Address of the node
    pub node_addr: usize,

    /// Address of its slot array, if allocated
    pub slots_addr: Option<usize>,
}

/// One occupied slot of the last node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotReport {
    pub slot: usize,

    /// Address of the quantum buffer
    pub quantum_addr: usize,
}

/// Diagnostic snapshot of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub index: usize,
    pub geometry: Geometry,
    pub size: u64,
    pub items: Vec<ItemReport>,
    /// Occupied slots of the last node only
    pub last_item_slots: Vec<SlotReport>,
}

impl DeviceReport {
    /// Walk `storage` and record its shape
    pub fn capture(index: usize, storage: &Storage) -> Self {
        let nodes = storage.nodes();

        let items = nodes
            .iter()
            .map(|node| ItemReport {
                node_addr: node as *const _ as usize,
                slots_addr: node.slots_addr(),
            })
            .collect();

        let last_item_slots = nodes
            .last()
            .map(|node| {
                node.occupied()
                    .map(|(slot, buf)| SlotReport {
                        slot,
                        quantum_addr: buf.as_ptr() as usize,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            index,
            geometry: storage.geometry(),
            size: storage.size(),
            items,
            last_item_slots,
        }
    }

    /// Number of nodes in the chain
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Device {}: {} items (qset={}, quantum={}), size = {}",
            self.index,
            self.item_count(),
            self.geometry.qset,
            self.geometry.quantum,
            self.size
        )?;

        for item in &self.items {
            match item.slots_addr {
                Some(addr) => writeln!(f, "  item at {:#x}; qset at {:#x}", item.node_addr, addr)?,
                None => writeln!(f, "  item at {:#x}; qset at (none)", item.node_addr)?,
            }
        }

        for slot in &self.last_item_slots {
            writeln!(f, "    {:>4}: {:#x}", slot.slot, slot.quantum_addr)?;
        }

        Ok(())
    }
}
