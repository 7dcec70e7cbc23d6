//! Kernel service abstractions
//!
//! Everything the driver needs from its host kernel at load and unload
//! time. Acquisitions can fail; releases cannot.

use crate::register::MemRegion;

/// Character device number (major/minor pair)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceNumber {
    /// Major number, identifies the driver
    pub major: u32,
    /// Minor number, identifies the instance
    pub minor: u32,
}

impl DeviceNumber {
    /// Create a device number
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// Errors from kernel resource acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Resource is already claimed by someone else
    Busy,
    /// No more resources of this kind are available
    Exhausted,
    /// The request was malformed
    Invalid,
}

/// Kernel services used while loading and unloading the driver
pub trait Platform {
    /// Allocate a character device number
    fn alloc_device_number(&mut self, name: &str) -> Result<DeviceNumber, PlatformError>;

    /// Return a device number obtained from [`Platform::alloc_device_number`]
    fn release_device_number(&mut self, dev: DeviceNumber);

    /// Claim exclusive use of a physical memory region
    fn request_mem_region(&mut self, region: MemRegion, name: &str) -> Result<(), PlatformError>;

    /// Give back a region obtained from [`Platform::request_mem_region`]
    fn release_mem_region(&mut self, region: MemRegion);

    /// Route an interrupt number to this driver
    fn request_irq(&mut self, irq: u32, name: &str) -> Result<(), PlatformError>;

    /// Stop routing an interrupt number to this driver
    fn free_irq(&mut self, irq: u32);

    /// Register the character device operations under a device number
    fn add_char_device(&mut self, dev: DeviceNumber) -> Result<(), PlatformError>;

    /// Unregister the character device operations
    fn remove_char_device(&mut self, dev: DeviceNumber);

    /// Create the device class entry and the user-visible device node
    fn create_device_node(&mut self, dev: DeviceNumber, name: &str) -> Result<(), PlatformError>;

    /// Remove the device node and its class entry
    fn destroy_device_node(&mut self, dev: DeviceNumber);
}
