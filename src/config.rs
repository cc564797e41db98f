//! Configuration for sculldev
//!
//! Creation parameters for a device set, with the classic defaults.
//! They are fixed at startup; every device copies the geometry once.

use crate::error::{Result, ScullError};

/// Default number of devices in a set
pub const DEFAULT_DEVICE_COUNT: usize = 4;

/// Default bytes per quantum buffer
pub const DEFAULT_QUANTUM: usize = 4000;

/// Default quantum slots per quantum-set node
pub const DEFAULT_QSET: usize = 1000;

/// Buffer geometry of one storage instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Bytes per quantum buffer
    pub quantum: usize,

    /// Quantum slots per node
    pub qset: usize,
}

impl Geometry {
    /// Create a geometry, rejecting zero sizes and overflowing item sizes
    pub fn new(quantum: usize, qset: usize) -> Result<Self> {
        let geometry = Self { quantum, qset };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Bytes addressed by one full node (`quantum * qset`)
    #[inline]
    pub fn item_size(&self) -> usize {
        self.quantum * self.qset
    }

    /// Check that both sizes are positive and `quantum * qset` fits
    pub fn validate(&self) -> Result<()> {
        if self.quantum == 0 {
            return Err(ScullError::Config("quantum must be positive".to_string()));
        }
        if self.qset == 0 {
            return Err(ScullError::Config("qset must be positive".to_string()));
        }
        if self.quantum.checked_mul(self.qset).is_none() {
            return Err(ScullError::Config(format!(
                "quantum * qset overflows: {} * {}",
                self.quantum, self.qset
            )));
        }
        Ok(())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            qset: DEFAULT_QSET,
        }
    }
}

/// Main configuration for a device set
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Device Set Configuration
    // -------------------------------------------------------------------------
    /// Number of devices created at startup
    pub device_count: usize,

    // -------------------------------------------------------------------------
    // Geometry Defaults
    // -------------------------------------------------------------------------
    /// Bytes per quantum buffer
    pub quantum: usize,

    /// Slots per quantum-set node
    pub qset: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_count: DEFAULT_DEVICE_COUNT,
            quantum: DEFAULT_QUANTUM,
            qset: DEFAULT_QSET,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default geometry handed to every device
    pub fn geometry(&self) -> Geometry {
        Geometry {
            quantum: self.quantum,
            qset: self.qset,
        }
    }

    /// Check that all creation parameters are positive and consistent
    pub fn validate(&self) -> Result<()> {
        if self.device_count == 0 {
            return Err(ScullError::Config(
                "device_count must be positive".to_string(),
            ));
        }
        self.geometry().validate()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of devices
    pub fn device_count(mut self, count: usize) -> Self {
        self.config.device_count = count;
        self
    }

    /// Set the quantum size (in bytes)
    pub fn quantum(mut self, bytes: usize) -> Self {
        self.config.quantum = bytes;
        self
    }

    /// Set the number of slots per quantum-set node
    pub fn qset(mut self, slots: usize) -> Self {
        self.config.qset = slots;
        self
    }

    /// Finish building; call `Config::validate` before use
    pub fn build(self) -> Config {
        self.config
    }
}
