//! Interrupt line abstractions

/// GPIO interrupt lines
///
/// The GPIO peripheral raises one interrupt for even-numbered pins and
/// another for odd-numbered pins. Both share the same flag register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqLine {
    /// Interrupts from even-numbered pins
    Even,
    /// Interrupts from odd-numbered pins
    Odd,
}

impl IrqLine {
    /// Both lines, in registration order
    pub const BOTH: [IrqLine; 2] = [IrqLine::Even, IrqLine::Odd];
}

/// Result reported back to the interrupt dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The interrupt was not ours
    None,
    /// The interrupt was acknowledged
    Handled,
}
