//! Interruptible lock acquisition
//!
//! A blocked caller can be told to give up waiting for a device lock by
//! raising its [`Interrupt`] from another thread. Giving up yields
//! `ScullError::Interrupted` and leaves the device untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::utils::Backoff;
use parking_lot::{Mutex, MutexGuard};

use crate::error::{Result, ScullError};

/// How long one timed attempt parks before re-checking the interrupt
const LOCK_SLICE: Duration = Duration::from_millis(5);

/// Cancellation flag shared by a caller and whoever may cancel it
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    raised: Arc<AtomicBool>,
}

impl Interrupt {
    /// Create a token that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask any wait using this token to abort
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Re-arm the token after the caller handled the interruption
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Whether an interruption is pending
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// Acquire `mutex`, giving up with `Interrupted` if `intr` is raised
/// while waiting.
///
/// An uncontended lock is taken immediately even if `intr` is raised.
pub fn lock_interruptible<'a, T>(
    mutex: &'a Mutex<T>,
    intr: &Interrupt,
) -> Result<MutexGuard<'a, T>> {
    if let Some(guard) = mutex.try_lock() {
        return Ok(guard);
    }

    let backoff = Backoff::new();
    loop {
        if intr.is_raised() {
            tracing::debug!("lock wait interrupted");
            return Err(ScullError::Interrupted);
        }

        if backoff.is_completed() {
            if let Some(guard) = mutex.try_lock_for(LOCK_SLICE) {
                return Ok(guard);
            }
        } else {
            backoff.snooze();
            if let Some(guard) = mutex.try_lock() {
                return Ok(guard);
            }
        }
    }
}
