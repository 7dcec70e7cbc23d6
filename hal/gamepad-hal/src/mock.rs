//! Fakes for host-side testing
//!
//! [`MockRegisters`] models the GPIO peripheral closely enough to drive
//! the interrupt path: pin changes set flags according to the configured
//! edges and enable mask, and writes to the clear register drop flags.
//! [`MockPlatform`] records every kernel resource it hands out and can be
//! told to refuse specific requests. [`FaultingBuffer`] stands in for
//! caller memory that cannot be written.

use heapless::Vec;
use portable_atomic::{AtomicU32, Ordering};

use crate::platform::{DeviceNumber, Platform, PlatformError};
use crate::register::{MemRegion, Register, RegisterBus};
use crate::user::{CopyFault, UserBuffer};

/// Regions reported by [`MockRegisters`]: a port block and an interrupt block
pub const MOCK_REGIONS: [MemRegion; 2] = [
    MemRegion::new(0x1000_0048, 0x24),
    MemRegion::new(0x1000_0100, 0x20),
];

const REGISTER_COUNT: usize = Register::ALL.len();

/// Fake GPIO register file
pub struct MockRegisters {
    values: [AtomicU32; REGISTER_COUNT],
    reads: [AtomicU32; REGISTER_COUNT],
    writes: [AtomicU32; REGISTER_COUNT],
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegisters {
    /// Create a register file with all buttons released (inputs pulled high)
    pub fn new() -> Self {
        let regs = Self {
            values: core::array::from_fn(|_| AtomicU32::new(0)),
            reads: core::array::from_fn(|_| AtomicU32::new(0)),
            writes: core::array::from_fn(|_| AtomicU32::new(0)),
        };
        regs.values[Register::PortInput.index()].store(0xFF, Ordering::SeqCst);
        regs
    }

    /// Current raw value of a register, without counting it as a read
    pub fn value(&self, reg: Register) -> u32 {
        self.values[reg.index()].load(Ordering::SeqCst)
    }

    /// Number of driver reads of a register
    pub fn reads(&self, reg: Register) -> u32 {
        self.reads[reg.index()].load(Ordering::SeqCst)
    }

    /// Number of driver writes to a register
    pub fn writes(&self, reg: Register) -> u32 {
        self.writes[reg.index()].load(Ordering::SeqCst)
    }

    /// Overwrite the whole input register
    pub fn set_input(&self, value: u32) {
        self.values[Register::PortInput.index()].store(value, Ordering::SeqCst);
    }

    /// Set pending interrupt flags directly
    pub fn raise_flags(&self, mask: u32) {
        self.values[Register::InterruptFlag.index()].fetch_or(mask, Ordering::SeqCst);
    }

    /// Drive a pin to a level
    ///
    /// Latches the interrupt flag for the pin when the transition matches
    /// a configured edge and the pin's interrupt is enabled. Returns `true`
    /// if a flag was latched.
    pub fn set_pin(&self, pin: u8, high: bool) -> bool {
        let mask = 1u32 << pin;
        let input = &self.values[Register::PortInput.index()];
        let was_high = input.load(Ordering::SeqCst) & mask != 0;

        if high {
            input.fetch_or(mask, Ordering::SeqCst);
        } else {
            input.fetch_and(!mask, Ordering::SeqCst);
        }

        let edge = match (was_high, high) {
            (false, true) => self.value(Register::ExtiRisingEdge),
            (true, false) => self.value(Register::ExtiFallingEdge),
            _ => 0,
        };

        if edge & self.value(Register::InterruptEnable) & mask != 0 {
            self.raise_flags(mask);
            true
        } else {
            false
        }
    }

    /// Press a button (active-low: drives the pin low)
    pub fn press(&self, pin: u8) -> bool {
        self.set_pin(pin, false)
    }

    /// Release a button (pin pulled back high)
    pub fn release(&self, pin: u8) -> bool {
        self.set_pin(pin, true)
    }
}

impl RegisterBus for MockRegisters {
    fn read(&self, reg: Register) -> u32 {
        self.reads[reg.index()].fetch_add(1, Ordering::SeqCst);
        match reg {
            // Write-only on real hardware
            Register::InterruptFlagClear => 0,
            _ => self.value(reg),
        }
    }

    fn write(&self, reg: Register, value: u32) {
        self.writes[reg.index()].fetch_add(1, Ordering::SeqCst);
        match reg {
            Register::InterruptFlagClear => {
                self.values[Register::InterruptFlag.index()].fetch_and(!value, Ordering::SeqCst);
            }
            // Input and flag registers are driven by the pins, not by software
            Register::PortInput | Register::InterruptFlag => {}
            _ => self.values[reg.index()].store(value, Ordering::SeqCst),
        }
    }

    fn mem_regions(&self) -> &[MemRegion] {
        &MOCK_REGIONS
    }
}

/// Buffer in memory the caller cannot access
pub struct FaultingBuffer;

impl UserBuffer for FaultingBuffer {
    fn copy_to_user(&mut self, _src: &[u8]) -> Result<(), CopyFault> {
        Err(CopyFault)
    }
}

const MAX_TRACKED: usize = 8;

/// Fake kernel that tracks resource ownership
#[derive(Debug, Default)]
pub struct MockPlatform {
    next_major: u32,
    device_numbers: Vec<DeviceNumber, MAX_TRACKED>,
    regions: Vec<MemRegion, MAX_TRACKED>,
    irqs: Vec<u32, MAX_TRACKED>,
    char_devices: Vec<DeviceNumber, MAX_TRACKED>,
    nodes: Vec<DeviceNumber, MAX_TRACKED>,
    foreign_regions: Vec<MemRegion, MAX_TRACKED>,
    foreign_irqs: Vec<u32, MAX_TRACKED>,
    device_numbers_exhausted: bool,
    char_device_fails: bool,
    device_node_fails: bool,
    bad_releases: u32,
}

impl MockPlatform {
    /// Create a platform with every resource available
    pub fn new() -> Self {
        Self {
            next_major: 240,
            ..Self::default()
        }
    }

    /// Refuse all device number allocations
    pub fn with_device_numbers_exhausted(mut self) -> Self {
        self.device_numbers_exhausted = true;
        self
    }

    /// Mark a region as already claimed by another driver
    pub fn with_foreign_region(mut self, region: MemRegion) -> Self {
        let _ = self.foreign_regions.push(region);
        self
    }

    /// Mark an interrupt number as already claimed by another driver
    pub fn with_foreign_irq(mut self, irq: u32) -> Self {
        let _ = self.foreign_irqs.push(irq);
        self
    }

    /// Refuse character device registration
    pub fn with_char_device_failure(mut self) -> Self {
        self.char_device_fails = true;
        self
    }

    /// Refuse device node creation
    pub fn with_device_node_failure(mut self) -> Self {
        self.device_node_fails = true;
        self
    }

    /// Device numbers currently allocated
    pub fn device_numbers(&self) -> &[DeviceNumber] {
        &self.device_numbers
    }

    /// Memory regions currently held
    pub fn regions(&self) -> &[MemRegion] {
        &self.regions
    }

    /// Interrupt numbers currently routed to the driver
    pub fn irqs(&self) -> &[u32] {
        &self.irqs
    }

    /// Character devices currently registered
    pub fn char_devices(&self) -> &[DeviceNumber] {
        &self.char_devices
    }

    /// Device nodes currently visible
    pub fn device_nodes(&self) -> &[DeviceNumber] {
        &self.nodes
    }

    /// Releases of resources that were never handed out
    pub fn bad_releases(&self) -> u32 {
        self.bad_releases
    }

    /// True when nothing is held and nothing was released twice
    pub fn is_clean(&self) -> bool {
        self.device_numbers.is_empty()
            && self.regions.is_empty()
            && self.irqs.is_empty()
            && self.char_devices.is_empty()
            && self.nodes.is_empty()
            && self.bad_releases == 0
    }

    fn take<T: PartialEq, const N: usize>(list: &mut Vec<T, N>, item: &T, bad: &mut u32) {
        match list.iter().position(|x| x == item) {
            Some(pos) => {
                list.swap_remove(pos);
            }
            None => *bad += 1,
        }
    }
}

impl Platform for MockPlatform {
    fn alloc_device_number(&mut self, _name: &str) -> Result<DeviceNumber, PlatformError> {
        if self.device_numbers_exhausted {
            return Err(PlatformError::Exhausted);
        }
        let dev = DeviceNumber::new(self.next_major, 0);
        self.device_numbers
            .push(dev)
            .map_err(|_| PlatformError::Exhausted)?;
        self.next_major += 1;
        Ok(dev)
    }

    fn release_device_number(&mut self, dev: DeviceNumber) {
        Self::take(&mut self.device_numbers, &dev, &mut self.bad_releases);
    }

    fn request_mem_region(&mut self, region: MemRegion, _name: &str) -> Result<(), PlatformError> {
        if self.foreign_regions.contains(&region) || self.regions.contains(&region) {
            return Err(PlatformError::Busy);
        }
        self.regions.push(region).map_err(|_| PlatformError::Exhausted)
    }

    fn release_mem_region(&mut self, region: MemRegion) {
        Self::take(&mut self.regions, &region, &mut self.bad_releases);
    }

    fn request_irq(&mut self, irq: u32, _name: &str) -> Result<(), PlatformError> {
        if self.foreign_irqs.contains(&irq) || self.irqs.contains(&irq) {
            return Err(PlatformError::Busy);
        }
        self.irqs.push(irq).map_err(|_| PlatformError::Exhausted)
    }

    fn free_irq(&mut self, irq: u32) {
        Self::take(&mut self.irqs, &irq, &mut self.bad_releases);
    }

    fn add_char_device(&mut self, dev: DeviceNumber) -> Result<(), PlatformError> {
        if self.char_device_fails {
            return Err(PlatformError::Invalid);
        }
        self.char_devices
            .push(dev)
            .map_err(|_| PlatformError::Exhausted)
    }

    fn remove_char_device(&mut self, dev: DeviceNumber) {
        Self::take(&mut self.char_devices, &dev, &mut self.bad_releases);
    }

    fn create_device_node(&mut self, dev: DeviceNumber, _name: &str) -> Result<(), PlatformError> {
        if self.device_node_fails {
            return Err(PlatformError::Exhausted);
        }
        self.nodes.push(dev).map_err(|_| PlatformError::Exhausted)
    }

    fn destroy_device_node(&mut self, dev: DeviceNumber) {
        Self::take(&mut self.nodes, &dev, &mut self.bad_releases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_register_drops_flags() {
        let regs = MockRegisters::new();
        regs.raise_flags(0b1010);
        regs.write(Register::InterruptFlagClear, 0b0010);
        assert_eq!(regs.value(Register::InterruptFlag), 0b1000);
    }

    #[test]
    fn test_falling_edge_latches_flag() {
        let regs = MockRegisters::new();
        regs.write(Register::ExtiFallingEdge, 0xFF);
        regs.write(Register::InterruptEnable, 0xFF);

        assert!(regs.press(3));
        assert_eq!(regs.value(Register::InterruptFlag), 1 << 3);
        assert_eq!(regs.value(Register::PortInput), 0xFF & !(1 << 3));

        // No rising edge configured
        assert!(!regs.release(3));
        assert_eq!(regs.value(Register::PortInput), 0xFF);
    }

    #[test]
    fn test_disabled_pin_does_not_latch() {
        let regs = MockRegisters::new();
        regs.write(Register::ExtiFallingEdge, 0xFF);
        regs.write(Register::InterruptEnable, 0x0F);
        assert!(!regs.press(5));
        assert_eq!(regs.value(Register::InterruptFlag), 0);
    }

    #[test]
    fn test_platform_tracks_ownership() {
        let mut platform = MockPlatform::new();
        let dev = platform.alloc_device_number("test").unwrap();
        platform.request_mem_region(MOCK_REGIONS[0], "test").unwrap();
        assert!(!platform.is_clean());

        platform.release_mem_region(MOCK_REGIONS[0]);
        platform.release_device_number(dev);
        assert!(platform.is_clean());

        platform.release_device_number(dev);
        assert_eq!(platform.bad_releases(), 1);
    }

    #[test]
    fn test_platform_foreign_claims() {
        let mut platform = MockPlatform::new()
            .with_foreign_region(MOCK_REGIONS[1])
            .with_foreign_irq(18);
        assert!(platform.request_mem_region(MOCK_REGIONS[0], "test").is_ok());
        assert_eq!(
            platform.request_mem_region(MOCK_REGIONS[1], "test"),
            Err(PlatformError::Busy)
        );
        assert!(platform.request_irq(17, "test").is_ok());
        assert_eq!(platform.request_irq(18, "test"), Err(PlatformError::Busy));
    }
}
