//! Error types for sculldev
//!
//! Provides a unified error type for all device and storage operations.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Result type alias using ScullError
pub type Result<T> = std::result::Result<T, ScullError>;

/// Unified error type for sculldev operations
#[derive(Debug, Error)]
pub enum ScullError {
    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    // -------------------------------------------------------------------------
    // Transfer Channel Errors
    // -------------------------------------------------------------------------
    #[error("Transfer fault: {0}")]
    TransferFault(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Interrupted while waiting for device lock")]
    Interrupted,

    // -------------------------------------------------------------------------
    // Device Errors
    // -------------------------------------------------------------------------
    #[error("Device busy: {0}")]
    Busy(String),

    #[error("No such device: {0}")]
    NoSuchDevice(usize),

    #[error("Bad access mode: {0}")]
    BadAccess(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ScullError {
    /// Whether the caller may simply retry the whole operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScullError::Interrupted)
    }
}

impl From<TryReserveError> for ScullError {
    fn from(e: TryReserveError) -> Self {
        ScullError::AllocationFailure(e.to_string())
    }
}

impl From<ScullError> for io::Error {
    fn from(e: ScullError) -> Self {
        match e {
            ScullError::Io(inner) => inner,
            ScullError::Interrupted => io::Error::new(io::ErrorKind::Interrupted, e),
            ScullError::AllocationFailure(_) => io::Error::new(io::ErrorKind::OutOfMemory, e),
            ScullError::TransferFault(_) => io::Error::new(io::ErrorKind::InvalidData, e),
            ScullError::Busy(_) => io::Error::new(io::ErrorKind::Other, e),
            ScullError::NoSuchDevice(_) => io::Error::new(io::ErrorKind::NotFound, e),
            ScullError::BadAccess(_) => io::Error::new(io::ErrorKind::PermissionDenied, e),
            ScullError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, e),
        }
    }
}
