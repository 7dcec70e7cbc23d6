//! Shared test helpers

use portable_atomic::{AtomicU32, Ordering};

use crate::driver::NotifySink;

/// Sink that counts notifications
pub struct CountingSink(AtomicU32);

impl CountingSink {
    pub fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn count(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

impl NotifySink for CountingSink {
    fn notify(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
