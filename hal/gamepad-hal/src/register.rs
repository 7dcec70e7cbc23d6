//! GPIO register abstractions
//!
//! The driver never sees physical addresses. It names registers by role
//! and a chip HAL maps each role onto its memory-mapped location.

/// GPIO registers the driver touches, all 32 bits wide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Pin mode for the low eight pins of the button port (4 bits per pin)
    PortMode,
    /// Output latch of the button port; selects pull direction for inputs
    PortOutput,
    /// Raw input level of the button port
    PortInput,
    /// Port selection for external interrupts 0-7 (4 bits per line)
    ExtiPinSelect,
    /// Rising-edge trigger mask
    ExtiRisingEdge,
    /// Falling-edge trigger mask
    ExtiFallingEdge,
    /// Interrupt enable mask
    InterruptEnable,
    /// Pending interrupt flags
    InterruptFlag,
    /// Write-one-to-clear for pending interrupt flags
    InterruptFlagClear,
}

impl Register {
    /// Every register, in initialization order
    pub const ALL: [Register; 9] = [
        Register::PortMode,
        Register::PortOutput,
        Register::PortInput,
        Register::ExtiPinSelect,
        Register::ExtiRisingEdge,
        Register::ExtiFallingEdge,
        Register::InterruptEnable,
        Register::InterruptFlag,
        Register::InterruptFlagClear,
    ];

    /// Index of the register in [`Register::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A physical memory range that must be reserved before it is accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemRegion {
    /// Physical start address
    pub start: usize,
    /// Length in bytes
    pub len: usize,
}

impl MemRegion {
    /// Create a new region
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Check whether an address falls inside this region
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.start + self.len
    }
}

/// Volatile access to the GPIO register set
///
/// Implementations must perform every read and write as an immediate
/// volatile access: the hardware changes these values on its own, so
/// nothing may be cached or reordered. There is no error path; a fault
/// here is a configuration bug, not a runtime condition.
///
/// Methods take `&self` because the registers are shared between the
/// interrupt handler and ordinary context.
pub trait RegisterBus {
    /// Read the current value of a register
    fn read(&self, reg: Register) -> u32;

    /// Write a value to a register
    fn write(&self, reg: Register, value: u32);

    /// Wait until all previous register writes have reached the peripheral
    fn barrier(&self) {}

    /// Physical regions backing the registers
    fn mem_regions(&self) -> &[MemRegion];
}

impl<T: RegisterBus + ?Sized> RegisterBus for &T {
    fn read(&self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }

    fn barrier(&self) {
        (**self).barrier()
    }

    fn mem_regions(&self) -> &[MemRegion] {
        (**self).mem_regions()
    }
}
