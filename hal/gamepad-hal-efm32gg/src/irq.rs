//! GPIO interrupt numbers

/// Interrupt number of the even-pin GPIO line
pub const GPIO_EVEN_IRQ: u32 = 17;

/// Interrupt number of the odd-pin GPIO line
pub const GPIO_ODD_IRQ: u32 = 18;
