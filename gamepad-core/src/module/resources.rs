//! Resource ledger
//!
//! Records each kernel resource and hardware state change as it is
//! acquired so that a failed load and a normal unload unwind through the
//! same code, in reverse order, touching only what was actually taken.

use heapless::Vec;

use gamepad_hal::{DeviceNumber, MemRegion, Platform, Register, RegisterBus};

/// Maximum memory regions a register bus may ask to reserve
pub const MAX_MEM_REGIONS: usize = 4;

/// Resources currently held by the driver
#[derive(Debug, Default)]
pub(crate) struct Resources {
    pub device_number: Option<DeviceNumber>,
    pub regions: Vec<MemRegion, MAX_MEM_REGIONS>,
    pub irqs: [Option<u32>; 2],
    pub interrupts_armed: bool,
    pub char_device: Option<DeviceNumber>,
    pub device_node: Option<DeviceNumber>,
}

impl Resources {
    pub const fn new() -> Self {
        Self {
            device_number: None,
            regions: Vec::new(),
            irqs: [None; 2],
            interrupts_armed: false,
            char_device: None,
            device_node: None,
        }
    }

    /// Check if nothing is held
    pub fn is_empty(&self) -> bool {
        self.device_number.is_none()
            && self.regions.is_empty()
            && self.irqs.iter().all(Option::is_none)
            && !self.interrupts_armed
            && self.char_device.is_none()
            && self.device_node.is_none()
    }

    /// Give everything back, newest first
    ///
    /// Safe to call any number of times; each entry is cleared as it is
    /// released.
    pub fn release<P: Platform, R: RegisterBus>(&mut self, platform: &mut P, regs: &R) {
        if let Some(dev) = self.device_node.take() {
            platform.destroy_device_node(dev);
        }

        if let Some(dev) = self.char_device.take() {
            platform.remove_char_device(dev);
        }

        if self.interrupts_armed {
            regs.write(Register::InterruptEnable, 0);
            regs.write(Register::InterruptFlagClear, regs.read(Register::InterruptFlag));
            regs.barrier();
            self.interrupts_armed = false;
        }

        for irq in self.irqs.iter_mut().rev() {
            if let Some(irq) = irq.take() {
                platform.free_irq(irq);
            }
        }

        while let Some(region) = self.regions.pop() {
            platform.release_mem_region(region);
        }

        if let Some(dev) = self.device_number.take() {
            platform.release_device_number(dev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepad_hal::mock::{MockPlatform, MockRegisters, MOCK_REGIONS};

    #[test]
    fn test_release_is_idempotent() {
        let regs = MockRegisters::new();
        let mut platform = MockPlatform::new();
        let mut resources = Resources::new();

        let dev = platform.alloc_device_number("test").unwrap();
        resources.device_number = Some(dev);
        platform.request_mem_region(MOCK_REGIONS[0], "test").unwrap();
        resources.regions.push(MOCK_REGIONS[0]).unwrap();
        platform.request_irq(17, "test").unwrap();
        resources.irqs[0] = Some(17);

        resources.release(&mut platform, &regs);
        assert!(resources.is_empty());
        assert!(platform.is_clean());

        resources.release(&mut platform, &regs);
        assert_eq!(platform.bad_releases(), 0);
    }

    #[test]
    fn test_release_disarms_interrupts() {
        let regs = MockRegisters::new();
        let mut platform = MockPlatform::new();
        let mut resources = Resources::new();

        regs.write(Register::InterruptEnable, 0xFF);
        regs.raise_flags(0x04);
        resources.interrupts_armed = true;

        resources.release(&mut platform, &regs);
        assert_eq!(regs.value(Register::InterruptEnable), 0);
        assert_eq!(regs.value(Register::InterruptFlag), 0);
    }

    #[test]
    fn test_empty_release_touches_nothing() {
        let regs = MockRegisters::new();
        let mut platform = MockPlatform::new();
        let mut resources = Resources::new();

        resources.release(&mut platform, &regs);
        for reg in Register::ALL {
            assert_eq!(regs.writes(reg), 0);
        }
        assert!(platform.is_clean());
    }
}
