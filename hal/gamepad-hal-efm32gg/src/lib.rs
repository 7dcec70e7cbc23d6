//! EFM32GG-specific HAL for the gamepad driver
//!
//! This crate maps the register roles from `gamepad-hal` onto the
//! EFM32 Giant Gecko GPIO peripheral and accesses them through volatile
//! loads and stores.
//!
//! # Board wiring
//!
//! The development kit's gamepad connects eight buttons to port C pins
//! 0-7. Each button pulls its pin low when pressed.
//!
//! # Usage
//!
//! ```ignore
//! // SAFETY: the GPIO block is mapped 1:1 and reserved by the loader
//! let regs = unsafe { MmioRegisters::new(Port::C) };
//! let input = regs.read(Register::PortInput);
//! ```

#![no_std]

pub mod gpio;
pub mod irq;

pub use gpio::{MmioRegisters, Port, GPIO_BASE};
pub use irq::{GPIO_EVEN_IRQ, GPIO_ODD_IRQ};
