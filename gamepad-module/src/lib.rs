//! Gamepad driver for the EFM32GG development kit
//!
//! Binds the board-agnostic driver in `gamepad-core` to the EFM32GG GPIO
//! registers, using the board values from `board.toml` (validated at build
//! time).
//!
//! # Usage
//!
//! ```ignore
//! // SAFETY: GPIO is mapped at its physical address and clocked
//! let module = unsafe { gamepad_module::load(&mut platform) }?;
//!
//! // From the GPIO_EVEN / GPIO_ODD vectors
//! gamepad_module::dispatch_irq(&module, irq);
//!
//! let mut handle = module.open();
//! let mut buf = [0u8; 4];
//! handle.read(&mut buf[..])?;
//!
//! drop(handle);
//! module.unload(&mut platform);
//! ```

#![cfg_attr(not(test), no_std)]

use gamepad_core::{GamepadModule, InitError};
use gamepad_hal::{IrqReturn, Platform, RegisterBus};
use gamepad_hal_efm32gg::MmioRegisters;

/// Board constants generated from board.toml
pub mod board {
    use gamepad_core::{BoardConfig, GpioConfig, IrqConfig};
    use gamepad_hal_efm32gg::Port;

    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

pub use board::{BOARD_CONFIG, BUTTON_PORT, DEVICE_NAME};

/// The driver bound to the EFM32GG GPIO registers
pub type Efm32ggGamepad<'d> = GamepadModule<'d, MmioRegisters>;

/// Load the driver on the development kit
///
/// # Safety
///
/// The GPIO peripheral must be mapped at its physical address with its
/// clock enabled. The loader reserves the register regions itself before
/// touching them.
pub unsafe fn load<'d, P: Platform>(platform: &mut P) -> Result<Efm32ggGamepad<'d>, InitError> {
    // SAFETY: forwarded to the caller; the regions are reserved by `load`
    // before the first access
    let regs = unsafe { MmioRegisters::new(BUTTON_PORT) };
    load_with(platform, regs)
}

/// Load the driver with the board configuration on any register bus
pub fn load_with<'d, P: Platform, R: RegisterBus>(
    platform: &mut P,
    regs: R,
) -> Result<GamepadModule<'d, R>, InitError> {
    GamepadModule::load(platform, regs, BOARD_CONFIG, DEVICE_NAME)
}

/// Interrupt entry for both GPIO vectors
pub fn dispatch_irq<R: RegisterBus>(module: &GamepadModule<'_, R>, irq: u32) -> IrqReturn {
    critical_section::with(|cs| module.handle_irq(cs, irq))
}

// Build script error reports, tested on the host
#[cfg(test)]
#[path = "../build/report.rs"]
mod report;

#[cfg(test)]
mod tests {
    use super::*;
    use gamepad_core::NotifySink;
    use gamepad_hal::mock::{MockPlatform, MockRegisters};
    use gamepad_hal::{MemRegion, Register};
    use gamepad_hal_efm32gg::{Port, GPIO_EVEN_IRQ, GPIO_ODD_IRQ};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter(AtomicU32);

    impl NotifySink for Counter {
        fn notify(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_board_config_is_valid() {
        assert_eq!(BOARD_CONFIG.validate(), Ok(()));
    }

    #[test]
    fn test_board_matches_kit_wiring() {
        assert_eq!(DEVICE_NAME, "Gamepad_Driver");
        assert_eq!(BUTTON_PORT, Port::C);
        assert_eq!(BOARD_CONFIG, gamepad_core::BoardConfig::DEFAULT);
        assert_eq!(BOARD_CONFIG.irq.even, GPIO_EVEN_IRQ);
        assert_eq!(BOARD_CONFIG.irq.odd, GPIO_ODD_IRQ);
    }

    #[test]
    fn test_button_port_regions() {
        // SAFETY: only addresses are inspected, nothing is accessed
        let regs = unsafe { MmioRegisters::new(BUTTON_PORT) };
        assert_eq!(
            regs.mem_regions(),
            &[
                MemRegion::new(0x4000_6048, 0x24),
                MemRegion::new(0x4000_6100, 0x20),
            ]
        );
    }

    #[test]
    fn test_load_press_unload() {
        let counter = Counter(AtomicU32::new(0));
        let regs = MockRegisters::new();
        let mut platform = MockPlatform::new();
        let module = load_with(&mut platform, &regs).unwrap();

        let mut handle = module.open();
        handle.set_owner(&counter).unwrap();
        handle.subscribe(true).unwrap();

        assert!(regs.press(6));
        assert_eq!(dispatch_irq(&module, GPIO_EVEN_IRQ), IrqReturn::Handled);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(dispatch_irq(&module, 99), IrqReturn::None);

        let mut buf = [0u8; 4];
        assert_eq!(handle.read(&mut buf), Ok(4));
        assert_eq!(u32::from_ne_bytes(buf), 0xFF & !(1 << 6));

        drop(handle);
        module.unload(&mut platform);
        assert!(platform.is_clean());
        assert_eq!(regs.value(Register::InterruptEnable), 0);
    }
}
