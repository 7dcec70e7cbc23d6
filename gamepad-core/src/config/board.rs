//! Board configuration
//!
//! The values written to the GPIO peripheral at load time and the
//! interrupt numbers the kernel routes to the driver.

use gamepad_hal::IrqLine;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest pin mask the external interrupt select register covers (pins 0-7)
pub const EXTI_PIN_MASK: u32 = 0xFF;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No pin has its interrupt enabled, so nothing would ever notify
    NoInterruptsEnabled,
    /// A pin's interrupt is enabled but neither edge triggers it
    EnabledWithoutEdge,
    /// An enabled pin is outside the range covered by the pin select register
    PinOutOfRange,
    /// Even and odd lines share one interrupt number
    DuplicateIrqLine,
}

/// GPIO register values written at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GpioConfig {
    /// Pin mode register (4 bits per pin)
    pub port_mode: u32,
    /// Output latch; for inputs with pull, a 1 selects pull-up
    pub port_output: u32,
    /// External interrupt port select (4 bits per line)
    pub exti_pin_select: u32,
    /// Pins that interrupt on a rising edge (button released)
    pub exti_rising: u32,
    /// Pins that interrupt on a falling edge (button pressed)
    pub exti_falling: u32,
    /// Pins whose interrupt is enabled
    pub interrupt_enable: u32,
}

impl GpioConfig {
    /// Eight active-low buttons on port C pins 0-7, notifying on press
    pub const DEFAULT: Self = Self {
        port_mode: 0x3333_3333,
        port_output: 0xFF,
        exti_pin_select: 0x2222_2222,
        exti_rising: 0x00,
        exti_falling: 0xFF,
        interrupt_enable: 0xFF,
    };
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Interrupt numbers of the two GPIO lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IrqConfig {
    /// Interrupt number of the even-pin line
    pub even: u32,
    /// Interrupt number of the odd-pin line
    pub odd: u32,
}

impl IrqConfig {
    pub const DEFAULT: Self = Self { even: 17, odd: 18 };

    /// Interrupt number of a line
    pub const fn number(&self, line: IrqLine) -> u32 {
        match line {
            IrqLine::Even => self.even,
            IrqLine::Odd => self.odd,
        }
    }

    /// Line served by an interrupt number, if it is one of ours
    pub fn line(&self, irq: u32) -> Option<IrqLine> {
        IrqLine::BOTH.into_iter().find(|&line| self.number(line) == irq)
    }
}

impl Default for IrqConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// GPIO register values
    pub gpio: GpioConfig,
    /// Interrupt numbers
    pub irq: IrqConfig,
}

impl BoardConfig {
    pub const DEFAULT: Self = Self {
        gpio: GpioConfig::DEFAULT,
        irq: IrqConfig::DEFAULT,
    };

    /// Check the configuration for wiring mistakes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gpio = &self.gpio;

        if gpio.interrupt_enable == 0 {
            return Err(ConfigError::NoInterruptsEnabled);
        }

        if gpio.interrupt_enable & !EXTI_PIN_MASK != 0 {
            return Err(ConfigError::PinOutOfRange);
        }

        if gpio.interrupt_enable & !(gpio.exti_rising | gpio.exti_falling) != 0 {
            return Err(ConfigError::EnabledWithoutEdge);
        }

        if self.irq.even == self.irq.odd {
            return Err(ConfigError::DuplicateIrqLine);
        }

        Ok(())
    }
}
