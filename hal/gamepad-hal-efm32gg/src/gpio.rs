//! GPIO register map for EFM32GG
//!
//! Port registers repeat every 0x24 bytes from the peripheral base; the
//! external interrupt registers are shared by all ports and live at a
//! fixed offset above them.

use gamepad_hal::{MemRegion, Register, RegisterBus};

/// Base address of the GPIO peripheral
pub const GPIO_BASE: usize = 0x4000_6000;

/// Distance between consecutive port register blocks
const PORT_STRIDE: usize = 0x24;

// Per-port register offsets
const MODEL: usize = 0x04;
const DOUT: usize = 0x0C;
const DIN: usize = 0x1C;

// Shared external interrupt registers, relative to GPIO_BASE
const EXTI_BLOCK: usize = 0x100;
const EXTI_BLOCK_LEN: usize = 0x20;
const EXTIPSELL: usize = 0x100;
const EXTIRISE: usize = 0x108;
const EXTIFALL: usize = 0x10C;
const IEN: usize = 0x110;
const IF: usize = 0x114;
const IFC: usize = 0x11C;

/// GPIO ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    pub const ALL: [Port; 6] = [Port::A, Port::B, Port::C, Port::D, Port::E, Port::F];

    /// Base address of this port's register block
    pub const fn base(self) -> usize {
        GPIO_BASE + self as usize * PORT_STRIDE
    }

    /// Value for one 4-bit field of EXTIPSELL selecting this port
    pub const fn exti_select(self) -> u32 {
        self as u32
    }

    /// Port selected by one 4-bit EXTIPSELL field
    pub fn from_exti_select(field: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|port| port.exti_select() == field)
    }

    /// Parse a port letter ("A" to "F", case-insensitive)
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Port::A),
            'B' => Some(Port::B),
            'C' => Some(Port::C),
            'D' => Some(Port::D),
            'E' => Some(Port::E),
            'F' => Some(Port::F),
            _ => None,
        }
    }
}

/// Memory-mapped GPIO registers for one button port
pub struct MmioRegisters {
    port: Port,
    regions: [MemRegion; 2],
}

impl MmioRegisters {
    /// Create a register accessor for a port
    ///
    /// # Safety
    ///
    /// The GPIO peripheral must be mapped at its physical address, its
    /// clock must be running, and the regions from
    /// [`RegisterBus::mem_regions`] must be reserved for this driver before
    /// any register is accessed.
    pub const unsafe fn new(port: Port) -> Self {
        Self {
            port,
            regions: [
                MemRegion::new(port.base(), PORT_STRIDE),
                MemRegion::new(GPIO_BASE + EXTI_BLOCK, EXTI_BLOCK_LEN),
            ],
        }
    }

    /// The port whose pins this accessor reads
    pub fn port(&self) -> Port {
        self.port
    }

    /// Physical address of a register
    pub const fn address(&self, reg: Register) -> usize {
        match reg {
            Register::PortMode => self.port.base() + MODEL,
            Register::PortOutput => self.port.base() + DOUT,
            Register::PortInput => self.port.base() + DIN,
            Register::ExtiPinSelect => GPIO_BASE + EXTIPSELL,
            Register::ExtiRisingEdge => GPIO_BASE + EXTIRISE,
            Register::ExtiFallingEdge => GPIO_BASE + EXTIFALL,
            Register::InterruptEnable => GPIO_BASE + IEN,
            Register::InterruptFlag => GPIO_BASE + IF,
            Register::InterruptFlagClear => GPIO_BASE + IFC,
        }
    }
}

impl RegisterBus for MmioRegisters {
    fn read(&self, reg: Register) -> u32 {
        // SAFETY: address() only yields registers inside the reserved
        // regions, which `new`'s contract guarantees are mapped
        unsafe { core::ptr::read_volatile(self.address(reg) as *const u32) }
    }

    fn write(&self, reg: Register, value: u32) {
        // SAFETY: see `read`
        unsafe { core::ptr::write_volatile(self.address(reg) as *mut u32, value) }
    }

    fn barrier(&self) {
        // The flag clear must land before the handler returns, or the
        // still-asserted line re-enters the handler
        #[cfg(target_arch = "arm")]
        cortex_m::asm::dsb();
    }

    fn mem_regions(&self) -> &[MemRegion] {
        &self.regions
    }
}
