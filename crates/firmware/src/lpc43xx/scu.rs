//! SCU pin-configuration backend.

use platform::mmio::RegisterBus;
use platform::scu::{PinMode, PinMux, CLOCK_PORT};
use thiserror_no_std::Error;

use super::SCU_BASE;

/// Highest regular port group (P0..PF).
const MAX_PORT: u8 = 0xF;

/// Highest pin index inside a port group.
const MAX_PIN: u8 = 31;

/// Number of SFSCLKn registers.
const CLOCK_PINS: u8 = 4;

/// SCU backend errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScuError {
    /// No SFS register exists for this port/pin.
    #[error("no SFS register for port {port:#x} pin {pin}")]
    InvalidPin {
        /// Requested port group
        port: u8,
        /// Requested pin
        pin: u8,
    },
}

/// Address of the SFS register for `port`/`pin`.
///
/// `SCU_BASE + port * 0x80 + pin * 4`; port 0x18 lands on SFSCLK0..3.
#[allow(clippy::arithmetic_side_effects)] // port <= 0x18, pin <= 31: at most 0xC7C above base
pub const fn sfs_address(port: u8, pin: u8) -> Result<u32, ScuError> {
    let valid = (port <= MAX_PORT && pin <= MAX_PIN) || (port == CLOCK_PORT && pin < CLOCK_PINS);
    if !valid {
        return Err(ScuError::InvalidPin { port, pin });
    }
    Ok(SCU_BASE + (port as u32) * 0x80 + (pin as u32) * 4)
}

/// SCU pin multiplexer over a register bus.
pub struct Scu<B> {
    bus: B,
}

impl<B: RegisterBus> Scu<B> {
    /// Wrap `bus`.
    pub const fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Release the bus.
    pub fn free(self) -> B {
        self.bus
    }

    /// Borrow the bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus> PinMux for Scu<B> {
    type Error = ScuError;

    fn set_pin_mux(&mut self, port: u8, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        let address = sfs_address(port, pin)?;
        self.bus.write(address, mode.bits());
        Ok(())
    }
}
