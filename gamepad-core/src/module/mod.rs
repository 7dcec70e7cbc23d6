//! Module lifecycle
//!
//! [`GamepadModule::load`] brings the driver up against a kernel
//! [`Platform`]: device number, memory regions, pin configuration,
//! interrupt lines, interrupt configuration, character device and device
//! node, in that order. Any failure unwinds everything acquired so far
//! before the error is returned, so a failed load leaves no trace.
//!
//! [`GamepadModule::unload`] consumes the module. Open handles borrow it,
//! so the device cannot be unloaded while a session is still open.

mod resources;

use critical_section::CriticalSection;

use gamepad_hal::{
    DeviceNumber, IrqLine, IrqReturn, MemRegion, Platform, PlatformError, Register, RegisterBus,
};

use crate::config::{BoardConfig, ConfigError};
use crate::driver::{DeviceHandle, GamepadDriver};

use resources::Resources;

pub use resources::MAX_MEM_REGIONS;

/// Errors that abort loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Board configuration is inconsistent
    Config(ConfigError),
    /// No device number could be allocated
    DeviceNumber(PlatformError),
    /// A register region could not be reserved
    MemRegion {
        region: MemRegion,
        error: PlatformError,
    },
    /// The register bus needs more regions than the driver tracks
    TooManyRegions,
    /// An interrupt line could not be requested
    Irq { irq: u32, error: PlatformError },
    /// The character device could not be registered
    CharDevice(PlatformError),
    /// The device node could not be created
    DeviceNode(PlatformError),
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

/// A loaded gamepad driver and the resources it holds
pub struct GamepadModule<'d, R: RegisterBus> {
    driver: GamepadDriver<'d, R>,
    config: BoardConfig,
    resources: Resources,
}

impl<'d, R: RegisterBus> GamepadModule<'d, R> {
    /// Bring the driver up
    ///
    /// `name` is the driver name used for every kernel registration.
    pub fn load<P: Platform>(
        platform: &mut P,
        regs: R,
        config: BoardConfig,
        name: &str,
    ) -> Result<Self, InitError> {
        info!("Initializing gamepad driver");

        config.validate()?;

        let driver = GamepadDriver::new(regs);
        let mut resources = Resources::new();

        if let Err(e) = acquire(platform, driver.registers(), &config, name, &mut resources) {
            error!("Gamepad driver initialization failed: {}", e);
            resources.release(platform, driver.registers());
            debug_assert!(resources.is_empty());
            return Err(e);
        }

        info!("Gamepad driver initialized");
        Ok(Self {
            driver,
            config,
            resources,
        })
    }

    /// Tear the driver down and release every resource
    pub fn unload<P: Platform>(mut self, platform: &mut P) {
        info!("Exiting gamepad driver");
        self.resources.release(platform, self.driver.registers());
    }

    /// The driver context
    pub fn driver(&self) -> &GamepadDriver<'d, R> {
        &self.driver
    }

    /// Open a session on the device
    pub fn open(&self) -> DeviceHandle<'_, 'd, R> {
        self.driver.open()
    }

    /// Configuration the module was loaded with
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Device number the device is registered under
    pub fn device_number(&self) -> Option<DeviceNumber> {
        self.resources.device_number
    }

    /// Dispatch a platform interrupt number to the handler
    ///
    /// Numbers that are not one of the two GPIO lines are left alone and
    /// reported as [`IrqReturn::None`].
    pub fn handle_irq(&self, cs: CriticalSection<'_>, irq: u32) -> IrqReturn {
        match self.config.irq.line(irq) {
            Some(line) => self.driver.on_interrupt(cs, line),
            None => IrqReturn::None,
        }
    }
}

/// Acquire everything in load order, recording each step in `resources`
fn acquire<P: Platform, R: RegisterBus>(
    platform: &mut P,
    regs: &R,
    config: &BoardConfig,
    name: &str,
    resources: &mut Resources,
) -> Result<(), InitError> {
    if regs.mem_regions().len() > MAX_MEM_REGIONS {
        return Err(InitError::TooManyRegions);
    }

    let dev = platform
        .alloc_device_number(name)
        .map_err(InitError::DeviceNumber)?;
    resources.device_number = Some(dev);
    debug!("Allocated device number {}:{}", dev.major, dev.minor);

    for &region in regs.mem_regions() {
        platform
            .request_mem_region(region, name)
            .map_err(|error| InitError::MemRegion { region, error })?;
        resources
            .regions
            .push(region)
            .map_err(|_| InitError::TooManyRegions)?;
    }

    // Buttons: inputs with pull, pulled up
    let gpio = &config.gpio;
    regs.write(Register::PortMode, gpio.port_mode);
    regs.write(Register::PortOutput, gpio.port_output);

    for (slot, line) in resources.irqs.iter_mut().zip(IrqLine::BOTH) {
        let irq = config.irq.number(line);
        platform
            .request_irq(irq, name)
            .map_err(|error| InitError::Irq { irq, error })?;
        *slot = Some(irq);
    }

    regs.write(Register::ExtiPinSelect, gpio.exti_pin_select);
    regs.write(Register::ExtiRisingEdge, gpio.exti_rising);
    regs.write(Register::ExtiFallingEdge, gpio.exti_falling);
    // Stale flags from before load would fire immediately
    regs.write(Register::InterruptFlagClear, regs.read(Register::InterruptFlag));
    regs.write(Register::InterruptEnable, gpio.interrupt_enable);
    resources.interrupts_armed = true;

    platform
        .add_char_device(dev)
        .map_err(InitError::CharDevice)?;
    resources.char_device = Some(dev);

    platform
        .create_device_node(dev, name)
        .map_err(InitError::DeviceNode)?;
    resources.device_node = Some(dev);

    Ok(())
}
