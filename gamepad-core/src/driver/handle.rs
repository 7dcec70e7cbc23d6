//! Device handles
//!
//! A [`DeviceHandle`] is one open session on the device. It carries no
//! per-session state beyond its notification owner and subscription:
//! every handle reads the same hardware.
//!
//! Handles are either `Open` or `Closed`. Releasing a handle, explicitly
//! or by dropping it, always removes its subscription, so a consumer that
//! forgets to unsubscribe before closing leaves nothing behind.

use gamepad_hal::{RegisterBus, UserBuffer};

use super::{DeviceError, GamepadDriver, HandleId, NotifySink, READ_LEN};

/// Handle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandleState {
    /// Accepting operations
    Open,
    /// Released; every operation fails with [`DeviceError::Closed`]
    Closed,
}

/// One open session on the gamepad device
pub struct DeviceHandle<'a, 'd, R: RegisterBus> {
    driver: &'a GamepadDriver<'d, R>,
    id: HandleId,
    state: HandleState,
    owner: Option<&'d dyn NotifySink>,
}

impl<'a, 'd, R: RegisterBus> DeviceHandle<'a, 'd, R> {
    pub(crate) fn new(driver: &'a GamepadDriver<'d, R>, id: HandleId) -> Self {
        Self {
            driver,
            id,
            state: HandleState::Open,
            owner: None,
        }
    }

    /// Identifier of this session
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Current lifecycle state
    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Check if the handle accepts operations
    pub fn is_open(&self) -> bool {
        self.state == HandleState::Open
    }

    /// Check if the handle is in the driver's subscriber set
    pub fn is_subscribed(&self) -> bool {
        self.driver.is_subscribed(self.id)
    }

    fn ensure_open(&self) -> Result<(), DeviceError> {
        match self.state {
            HandleState::Open => Ok(()),
            HandleState::Closed => Err(DeviceError::Closed),
        }
    }

    /// Copy the current button bitmask into `buf`
    ///
    /// Reads the raw input register once and writes its four bytes in
    /// native order. Never blocks: without a new event the current level is
    /// returned again. Returns the payload size on success; a buffer that
    /// cannot hold the payload yields [`DeviceError::Fault`] and nothing is
    /// reported as transferred.
    pub fn read<B: UserBuffer + ?Sized>(&self, buf: &mut B) -> Result<usize, DeviceError> {
        self.ensure_open()?;

        let state = self.driver.input_state();
        buf.copy_to_user(&state.to_ne_bytes())
            .map_err(|_| DeviceError::Fault)?;

        trace!("Handle {} read {:#x}", self.id.0, state);
        Ok(READ_LEN)
    }

    /// Accept and discard a write
    ///
    /// Buttons cannot be written. The data is dropped with a warning and
    /// reported as consumed so callers probing for writability do not
    /// retry forever.
    pub fn write(&self, data: &[u8]) -> Result<usize, DeviceError> {
        self.ensure_open()?;
        warn!("Trying to write {} bytes to buttons, ignored", data.len());
        Ok(data.len())
    }

    /// Set the sink that receives this handle's notifications
    ///
    /// If the handle is already subscribed, future notifications go to the
    /// new sink.
    pub fn set_owner(&mut self, sink: &'d dyn NotifySink) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.owner = Some(sink);
        self.driver.update_sink(self.id, sink);
        Ok(())
    }

    /// Opt in to or out of change notifications
    ///
    /// Idempotent in both directions. Enabling requires an owner.
    pub fn subscribe(&self, enable: bool) -> Result<(), DeviceError> {
        self.ensure_open()?;
        if enable {
            let sink = self.owner.ok_or(DeviceError::NoOwner)?;
            self.driver.subscribe(self.id, sink)
        } else {
            self.driver.unsubscribe(self.id);
            Ok(())
        }
    }

    /// Close the session
    pub fn release(&mut self) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.driver.unsubscribe(self.id);
        self.state = HandleState::Closed;
        info!("Releasing gamepad handle {}", self.id.0);
        Ok(())
    }
}

impl<R: RegisterBus> Drop for DeviceHandle<'_, '_, R> {
    fn drop(&mut self) {
        if self.is_open() {
            let _ = self.release();
        }
    }
}
