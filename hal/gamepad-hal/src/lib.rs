//! Gamepad Hardware Abstraction Layer
//!
//! This crate defines the boundaries the gamepad driver talks across:
//! the memory-mapped GPIO registers below it and the kernel services
//! around it. Chip-specific crates implement [`RegisterBus`]; the hosting
//! kernel implements [`Platform`] and [`UserBuffer`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  gamepad-module (board wiring)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gamepad-core (driver, lifecycle)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  gamepad-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!         │                       │
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ gamepad-hal-  │       │ kernel        │
//! │   efm32gg     │       │ (Platform)    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`register::RegisterBus`] - Volatile access to the GPIO register set
//! - [`platform::Platform`] - Device numbers, memory regions, IRQ lines, device nodes
//! - [`user::UserBuffer`] - Copying data out to a caller-supplied buffer

#![no_std]
#![deny(unsafe_code)]

pub mod irq;
pub mod platform;
pub mod register;
pub mod user;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use irq::{IrqLine, IrqReturn};
pub use platform::{DeviceNumber, Platform, PlatformError};
pub use register::{MemRegion, Register, RegisterBus};
pub use user::{CopyFault, UserBuffer};
