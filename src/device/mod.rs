//! Device Module
//!
//! Devices wrapping one storage instance each.
//!
//! ## Responsibilities
//! - Serialize every access to a device's storage behind one lock
//! - Abort lock waits on interruption with a retryable error
//! - Truncate on write-only open; release does nothing
//! - Create and tear down the whole set together
//!
//! ## Lifecycle
//! ```text
//!   DeviceSet::new ──► active ──► DeviceSet::close
//!                        │  ▲
//!        open(WriteOnly) │  │ trim
//!                        ▼  │
//!                     truncated
//! ```

mod dev;
mod handle;
mod interrupt;
mod set;

pub use dev::Device;
pub use handle::{AccessMode, DeviceHandle};
pub use interrupt::{lock_interruptible, Interrupt};
pub use set::DeviceSet;
