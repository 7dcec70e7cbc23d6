//! GPIO interrupt handler
//!
//! Runs for both the even and the odd GPIO line. It acknowledges every
//! pending flag in one read/clear pair and wakes each subscriber once.
//! Pins that fire between the read and the clear are folded into the same
//! notification; consumers learn which button changed by reading the full
//! input register afterwards.
//!
//! The handler takes a [`CriticalSection`] token. Holding one is the only
//! way to reach the subscriber set without locking, and nothing reachable
//! from here waits, allocates or loops beyond the subscriber count.

use critical_section::CriticalSection;
use gamepad_hal::{IrqLine, IrqReturn, Register, RegisterBus};

use super::GamepadDriver;

impl<'d, R: RegisterBus> GamepadDriver<'d, R> {
    /// Acknowledge pending GPIO interrupts and notify subscribers
    ///
    /// Always reports [`IrqReturn::Handled`]: the flags are cleared in
    /// hardware whether or not anyone is listening.
    pub fn on_interrupt(&self, cs: CriticalSection<'_>, line: IrqLine) -> IrqReturn {
        let pending = self.regs.read(Register::InterruptFlag);
        self.regs.write(Register::InterruptFlagClear, pending);
        self.regs.barrier();

        let subscribers = self.subscribers.borrow(cs).borrow();
        trace!(
            "GPIO {} irq, flags {:#x}, {} subscribers",
            line,
            pending,
            subscribers.len()
        );

        for subscriber in subscribers.iter() {
            subscriber.sink.notify();
        }

        IrqReturn::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingSink;
    use gamepad_hal::mock::MockRegisters;

    fn fire<R: RegisterBus>(driver: &GamepadDriver<'_, R>, line: IrqLine) -> IrqReturn {
        critical_section::with(|cs| driver.on_interrupt(cs, line))
    }

    #[test]
    fn test_clears_flags_without_subscribers() {
        let regs = MockRegisters::new();
        regs.raise_flags(0b0110);
        let driver = GamepadDriver::new(&regs);

        assert_eq!(fire(&driver, IrqLine::Even), IrqReturn::Handled);
        assert_eq!(regs.value(Register::InterruptFlag), 0);
        assert_eq!(regs.reads(Register::InterruptFlag), 1);
        assert_eq!(regs.writes(Register::InterruptFlagClear), 1);
    }

    #[test]
    fn test_touches_only_flag_registers() {
        let regs = MockRegisters::new();
        regs.raise_flags(0x01);
        let driver = GamepadDriver::new(&regs);
        fire(&driver, IrqLine::Odd);

        for reg in Register::ALL {
            match reg {
                Register::InterruptFlag => assert_eq!(regs.reads(reg), 1),
                Register::InterruptFlagClear => assert_eq!(regs.writes(reg), 1),
                _ => {
                    assert_eq!(regs.reads(reg), 0);
                    assert_eq!(regs.writes(reg), 0);
                }
            }
        }
    }

    #[test]
    fn test_one_notification_per_subscriber() {
        let a = CountingSink::new();
        let b = CountingSink::new();
        let regs = MockRegisters::new();
        let driver = GamepadDriver::new(&regs);

        let mut first = driver.open();
        first.set_owner(&a).unwrap();
        first.subscribe(true).unwrap();
        let mut second = driver.open();
        second.set_owner(&b).unwrap();
        second.subscribe(true).unwrap();

        // Even and odd pins pending together: one invocation, one round
        regs.raise_flags(0b0011);
        fire(&driver, IrqLine::Even);

        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);
        assert_eq!(regs.value(Register::InterruptFlag), 0);
    }

    #[test]
    fn test_unsubscribed_handle_is_not_notified() {
        let sink = CountingSink::new();
        let regs = MockRegisters::new();
        let driver = GamepadDriver::new(&regs);
        let mut handle = driver.open();
        handle.set_owner(&sink).unwrap();

        fire(&driver, IrqLine::Even);
        assert_eq!(sink.count(), 0);

        handle.subscribe(true).unwrap();
        fire(&driver, IrqLine::Even);
        fire(&driver, IrqLine::Odd);
        assert_eq!(sink.count(), 2);

        handle.subscribe(false).unwrap();
        fire(&driver, IrqLine::Odd);
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_concurrent_subscribe_and_interrupt() {
        const CYCLES: usize = 2000;
        const IRQS: usize = 20_000;

        let sinks: [CountingSink; 4] = core::array::from_fn(|_| CountingSink::new());
        let regs = MockRegisters::new();
        let driver = GamepadDriver::new(&regs);

        std::thread::scope(|s| {
            for sink in &sinks {
                let driver = &driver;
                s.spawn(move || {
                    for i in 0..CYCLES {
                        let mut handle = driver.open();
                        handle.set_owner(sink).unwrap();
                        handle.subscribe(true).unwrap();
                        assert!(handle.is_subscribed());
                        if i % 2 == 0 {
                            handle.subscribe(false).unwrap();
                        }
                    }
                });
            }

            s.spawn(|| {
                for _ in 0..IRQS {
                    regs.raise_flags(0x01);
                    assert_eq!(fire(&driver, IrqLine::Even), IrqReturn::Handled);
                }
            });
        });

        assert_eq!(driver.subscriber_count(), 0);
        assert_eq!(regs.value(Register::InterruptFlag), 0);
        assert_eq!(regs.reads(Register::InterruptFlag), IRQS as u32);
    }
}
