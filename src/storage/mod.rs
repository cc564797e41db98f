//! Storage Module
//!
//! Sparse in-memory byte storage built from a chain of quantum sets.
//!
//! ## Responsibilities
//! - Map byte offsets onto (item, slot, inner) coordinates
//! - Grow the chain lazily on write
//! - Serve reads without allocating
//! - Release everything on trim
//!
//! ## Layout
//! ```text
//!  nodes[0]                 nodes[1]                 nodes[2]
//! ┌──────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │ slot 0 ─► quantum│     │ slot 0 ─► quantum│     │ (no slot array)  │
//! │ slot 1 ─► quantum│ ──► │ slot 1    (none) │ ──► │                  │
//! │ ...              │     │ ...              │     │                  │
//! │ slot qset-1      │     │ slot qset-1      │     │                  │
//! └──────────────────┘     └──────────────────┘     └──────────────────┘
//!
//!  offset = item * (quantum * qset) + slot * quantum + inner
//! ```

mod layout;
mod qset;
mod store;

pub use layout::{clamp_to_quantum, locate, Position};
pub use qset::{QsetNode, Quantum};
pub use store::{Storage, TrimStats};
