//! # sculldev
//!
//! Sparse, growable in-memory byte devices:
//! - Position-based read/write with short-transfer semantics
//! - Lazy allocation in fixed-size quantum buffers
//! - Truncate on write-only open, trim back to empty on demand
//! - One interruptible lock per device
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DeviceSet                              │
//! │                (fixed count, torn down together)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Device (Mutex<Storage>)                      │
//! │         open / read / write / release / trim                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Transfer   │          │   Storage   │
//!   │  Channel    │          │ (qset chain)│
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Quantum   │
//!                           │   buffers   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod transfer;
pub mod device;
pub mod report;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ScullError};
pub use config::{Config, Geometry};
pub use device::{AccessMode, Device, DeviceHandle, DeviceSet, Interrupt};
pub use report::DeviceReport;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sculldev
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
