//! Async button watcher
//!
//! Wraps a subscribed handle whose owner is an embassy [`Signal`], so a
//! task can `await` the next button change instead of polling. The value
//! returned is whatever the input register holds when the task resumes,
//! which may already differ from the level that raised the interrupt.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use gamepad_hal::RegisterBus;

use super::{DeviceError, DeviceHandle, GamepadDriver, READ_LEN};

/// Signal type used as a watcher's notification sink
pub type ButtonSignal = Signal<CriticalSectionRawMutex, ()>;

/// Subscribed handle paired with the signal it notifies
pub struct ButtonWatcher<'a, 'd, R: RegisterBus> {
    handle: DeviceHandle<'a, 'd, R>,
    signal: &'d ButtonSignal,
}

impl<'a, 'd, R: RegisterBus> ButtonWatcher<'a, 'd, R> {
    /// Open a handle on `driver` and subscribe it with `signal` as owner
    pub fn new(driver: &'a GamepadDriver<'d, R>, signal: &'d ButtonSignal) -> Result<Self, DeviceError> {
        let mut handle = driver.open();
        handle.set_owner(signal)?;
        handle.subscribe(true)?;
        Ok(Self { handle, signal })
    }

    /// Wait for the next notification, then read the buttons
    pub async fn next(&self) -> Result<u32, DeviceError> {
        self.signal.wait().await;
        self.current()
    }

    /// Read the buttons without waiting
    pub fn current(&self) -> Result<u32, DeviceError> {
        let mut buf = [0u8; READ_LEN];
        self.handle.read(&mut buf)?;
        Ok(u32::from_ne_bytes(buf))
    }

    /// Check if a notification arrived that [`ButtonWatcher::next`] has not consumed
    pub fn pending(&self) -> bool {
        self.signal.signaled()
    }

    /// The underlying handle
    pub fn handle(&self) -> &DeviceHandle<'a, 'd, R> {
        &self.handle
    }
}
