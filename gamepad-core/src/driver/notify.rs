//! Notification sinks
//!
//! A sink is whatever a consumer wants poked when the buttons change.
//! The interrupt handler calls [`NotifySink::notify`] with interrupts
//! masked, so implementations must return quickly and must never block
//! or allocate. They must not call back into the driver either: the
//! subscriber set stays borrowed while sinks are notified, and subscribing
//! or releasing a handle from inside `notify` panics.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Receiver of "input ready" wake-ups
///
/// Runs in interrupt context: no blocking, no allocation, no calls back
/// into the driver.
pub trait NotifySink: Sync {
    /// Wake the consumer; carries no payload
    fn notify(&self);
}

impl<M: RawMutex + Send + Sync> NotifySink for Signal<M, ()> {
    fn notify(&self) {
        self.signal(());
    }
}
