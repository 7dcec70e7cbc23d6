//! Board-agnostic core of the gamepad driver
//!
//! This crate contains everything between the register bus and the
//! kernel's file operations:
//!
//! - Board configuration (pin mode, pull, edge and enable masks, IRQ numbers)
//! - The driver context with its subscriber set
//! - Device handles (open/read/write/subscribe/release)
//! - The interrupt handler
//! - Module load/unload with resource rollback
//! - An async watcher for consumers that want to await button changes

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod config;
pub mod driver;
pub mod module;

#[cfg(test)]
mod testing;

pub use config::{BoardConfig, ConfigError, GpioConfig, IrqConfig};
pub use driver::{
    ButtonWatcher, DeviceError, DeviceHandle, GamepadDriver, HandleId, HandleState, NotifySink,
};
pub use module::{GamepadModule, InitError};
