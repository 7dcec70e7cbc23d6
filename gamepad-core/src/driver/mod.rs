//! Gamepad driver context
//!
//! [`GamepadDriver`] owns the register bus and the set of handles that
//! asked to be notified. Ordinary context reaches the subscriber set
//! through a critical-section mutex; the interrupt handler borrows it
//! with the critical section it already runs in.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use portable_atomic::{AtomicU64, Ordering};

use gamepad_hal::{Register, RegisterBus};

pub mod handle;
pub mod interrupt;
pub mod notify;
pub mod watch;

pub use handle::{DeviceHandle, HandleState};
pub use notify::NotifySink;
pub use watch::ButtonWatcher;

/// Maximum number of handles subscribed at once
pub const MAX_SUBSCRIBERS: usize = 16;

/// Size of a read payload: the raw 32-bit input register
pub const READ_LEN: usize = 4;

/// Errors from device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The handle has been released
    Closed,
    /// The caller's buffer could not take the payload
    Fault,
    /// Subscription requested without a notification owner
    NoOwner,
    /// The subscriber set is at capacity
    SubscribersFull,
}

/// Identifies one open session on the device
///
/// 64 bits wide so the counter cannot wrap onto a handle that is still
/// open within the lifetime of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandleId(pub u64);

/// Subscriber set entry
struct Subscriber<'d> {
    handle: HandleId,
    sink: &'d dyn NotifySink,
}

type SubscriberSet<'d> = Vec<Subscriber<'d>, MAX_SUBSCRIBERS>;

/// Driver context shared by every handle and the interrupt handler
pub struct GamepadDriver<'d, R> {
    regs: R,
    subscribers: Mutex<CriticalSectionRawMutex, RefCell<SubscriberSet<'d>>>,
    next_handle: AtomicU64,
}

impl<'d, R: RegisterBus> GamepadDriver<'d, R> {
    /// Create a driver on top of a register bus
    ///
    /// Does not touch the hardware; configuration happens at module load.
    pub const fn new(regs: R) -> Self {
        Self {
            regs,
            subscribers: Mutex::new(RefCell::new(Vec::new())),
            next_handle: AtomicU64::new(1),
        }
    }

    /// The underlying register bus
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Open a new session
    ///
    /// Always succeeds and performs no hardware access.
    pub fn open(&self) -> DeviceHandle<'_, 'd, R> {
        let id = HandleId(self.next_handle.fetch_add(1, Ordering::Relaxed));
        info!("Opening gamepad handle {}", id.0);
        DeviceHandle::new(self, id)
    }

    /// Move the id counter, to reach far-off ids without opening them all
    #[cfg(test)]
    pub(crate) fn seed_handle_ids(&self, next: u64) {
        self.next_handle.store(next, Ordering::Relaxed);
    }

    /// Instantaneous level of the button pins
    pub fn input_state(&self) -> u32 {
        self.regs.read(Register::PortInput)
    }

    /// Number of handles currently subscribed
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock(|subs| subs.borrow().len())
    }

    /// Check if a handle is in the subscriber set
    pub fn is_subscribed(&self, id: HandleId) -> bool {
        self.subscribers
            .lock(|subs| subs.borrow().iter().any(|s| s.handle == id))
    }

    /// Add a handle to the subscriber set, or point an existing entry at a new sink
    pub(crate) fn subscribe(&self, id: HandleId, sink: &'d dyn NotifySink) -> Result<(), DeviceError> {
        self.subscribers.lock(|subs| {
            let mut subs = subs.borrow_mut();
            if let Some(entry) = subs.iter_mut().find(|s| s.handle == id) {
                entry.sink = sink;
                return Ok(());
            }
            subs.push(Subscriber { handle: id, sink })
                .map_err(|_| DeviceError::SubscribersFull)?;
            debug!("Handle {} subscribed ({} total)", id.0, subs.len());
            Ok(())
        })
    }

    /// Replace the sink of a handle if it is subscribed
    pub(crate) fn update_sink(&self, id: HandleId, sink: &'d dyn NotifySink) {
        self.subscribers.lock(|subs| {
            if let Some(entry) = subs.borrow_mut().iter_mut().find(|s| s.handle == id) {
                entry.sink = sink;
            }
        })
    }

    /// Remove a handle from the subscriber set; no-op if absent
    pub(crate) fn unsubscribe(&self, id: HandleId) {
        self.subscribers.lock(|subs| {
            let mut subs = subs.borrow_mut();
            let before = subs.len();
            subs.retain(|s| s.handle != id);
            if subs.len() != before {
                debug!("Handle {} unsubscribed ({} left)", id.0, subs.len());
            }
        })
    }
}
