//! Device Set
//!
//! The fixed collection of devices created at startup and torn down
//! together. Devices share nothing but the immutable default geometry.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, ScullError};
use crate::report::DeviceReport;

use super::dev::Device;
use super::handle::{AccessMode, DeviceHandle};
use super::interrupt::Interrupt;

/// A fixed-size set of independent devices
#[derive(Debug)]
pub struct DeviceSet {
    /// Creation parameters, kept for inspection
    config: Config,

    /// Devices, indexed from 0
    devices: Vec<Arc<Device>>,
}

impl DeviceSet {
    /// Validate `config` and create `device_count` empty devices
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let geometry = config.geometry();
        let devices = (0..config.device_count)
            .map(|index| Arc::new(Device::new(index, geometry)))
            .collect();

        tracing::debug!(
            devices = config.device_count,
            quantum = geometry.quantum,
            qset = geometry.qset,
            "Created device set"
        );

        Ok(Self { config, devices })
    }

    /// Get device `index`
    pub fn get(&self, index: usize) -> Result<&Arc<Device>> {
        self.devices
            .get(index)
            .ok_or(ScullError::NoSuchDevice(index))
    }

    /// Open device `index` with a fresh interrupt token
    pub fn open(&self, index: usize, mode: AccessMode) -> Result<DeviceHandle> {
        self.get(index)?.open(mode, &Interrupt::new())
    }

    /// Snapshot every device, each under its own lock
    pub fn report(&self, intr: &Interrupt) -> Result<Vec<DeviceReport>> {
        self.devices.iter().map(|d| d.report(intr)).collect()
    }

    /// Iterate over the devices in index order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tear down the set, trimming every device under its lock
    pub fn close(self) {
        for device in &self.devices {
            let stats = device.teardown();
            tracing::debug!(
                device = device.index(),
                nodes = stats.nodes_freed,
                quanta = stats.quanta_freed,
                "Device torn down"
            );
        }
    }
}
