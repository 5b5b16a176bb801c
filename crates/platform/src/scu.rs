//! System Control Unit (SCU) pin multiplexing
//!
//! On the LPC43xx every package pin has one SFS register in the SCU. The low
//! three bits select which peripheral signal is routed to the pin; the upper
//! bits control the pad: pull resistors, slew rate, input buffer and glitch
//! filter.
//!
//! ```text
//!  7      6      5      4      3      2..0
//! ZIF    EZI    EHS    EPUN   EPD    MODE
//! filter input  fast   pull-up pull-  function
//! off    buffer slew   off    down
//! ```
//!
//! # Sources
//!
//! - LPC43xx User Manual UM10503, chapter 16 (SCU), Table 190 (SFSP register)
//! - LPC43xx User Manual UM10503, Table 192 (SFSCLKn clock pin registers)

/// Alternate function routed to a pin (SFS `MODE` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PinFunction {
    /// Function 0 (reset default on most pins)
    Func0 = 0,
    /// Function 1
    Func1 = 1,
    /// Function 2
    Func2 = 2,
    /// Function 3
    Func3 = 3,
    /// Function 4
    Func4 = 4,
    /// Function 5
    Func5 = 5,
    /// Function 6
    Func6 = 6,
    /// Function 7
    Func7 = 7,
}

impl PinFunction {
    /// Raw `MODE` field value.
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// Pad configuration flags for one SFS register (everything except `MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadConfig(u32);

impl PadConfig {
    /// Pull-down enabled (EPD).
    pub const PULL_DOWN: Self = Self(1 << 3);
    /// Pull-up disabled (EPUN). Without `PULL_DOWN` this leaves the pad floating.
    pub const PULL_UP_DISABLE: Self = Self(1 << 4);
    /// Fast slew rate (EHS).
    pub const FAST_SLEW: Self = Self(1 << 5);
    /// Input buffer enabled (EZI). Required for bidirectional bus signals.
    pub const INPUT_BUFFER: Self = Self(1 << 6);
    /// Input glitch filter disabled (ZIF). Required above 30 MHz.
    pub const FILTER_DISABLE: Self = Self(1 << 7);

    /// Reset state: pull-up enabled, slow slew, input buffer off, filter on.
    pub const DEFAULT: Self = Self(0);

    /// Neither pull-up nor pull-down.
    pub const INACTIVE: Self = Self::PULL_UP_DISABLE;

    /// High-speed bus pad used for every EMC signal.
    pub const FAST_IO: Self = Self::INACTIVE
        .union(Self::FAST_SLEW)
        .union(Self::INPUT_BUFFER)
        .union(Self::FILTER_DISABLE);

    /// Combine two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw register bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Complete SFS register encoding: function select plus pad configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMode {
    /// Routed peripheral function.
    pub function: PinFunction,
    /// Electrical configuration.
    pub pad: PadConfig,
}

impl PinMode {
    /// Build a mode from its parts.
    pub const fn new(function: PinFunction, pad: PadConfig) -> Self {
        Self { function, pad }
    }

    /// EMC fast-I/O mode for `function`.
    pub const fn fast_io(function: PinFunction) -> Self {
        Self::new(function, PadConfig::FAST_IO)
    }

    /// Value written to the SFS register.
    pub const fn bits(self) -> u32 {
        self.pad.bits() | self.function.bits()
    }
}

/// One physical pin routed to a peripheral signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// SCU port group (`0x0..=0xF`, or `0x18` for the CLKn pins).
    pub port: u8,
    /// Pin number within the group.
    pub pin: u8,
    /// Register encoding to program.
    pub mode: PinMode,
    /// Board signal name, e.g. `"D7"` or `"CAS#"`.
    pub signal: &'static str,
}

impl PinAssignment {
    /// Fast-I/O assignment; the form every EMC pin uses.
    pub const fn fast_io(port: u8, pin: u8, function: PinFunction, signal: &'static str) -> Self {
        Self {
            port,
            pin,
            mode: PinMode::fast_io(function),
            signal,
        }
    }
}

/// Port number of the dedicated clock pins (SFSCLK0..3).
pub const CLOCK_PORT: u8 = 0x18;

/// Pin multiplexer: programs one SFS register.
///
/// Register writes on the LPC43xx cannot fail; implementations only report
/// errors for pins that do not exist.
pub trait PinMux {
    /// Error type
    type Error;

    /// Route `port`/`pin` according to `mode`.
    fn set_pin_mux(&mut self, port: u8, pin: u8, mode: PinMode) -> Result<(), Self::Error>;

    /// Program a full assignment.
    fn apply(&mut self, assignment: &PinAssignment) -> Result<(), Self::Error> {
        self.set_pin_mux(assignment.port, assignment.pin, assignment.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_io_pad_is_0xf0() {
        assert_eq!(PadConfig::FAST_IO.bits(), 0xF0);
    }

    #[test]
    fn fast_io_has_no_pull_resistor() {
        assert!(PadConfig::FAST_IO.contains(PadConfig::PULL_UP_DISABLE));
        assert!(!PadConfig::FAST_IO.contains(PadConfig::PULL_DOWN));
    }

    #[test]
    fn mode_bits_merge_function_and_pad() {
        assert_eq!(PinMode::fast_io(PinFunction::Func3).bits(), 0xF3);
        assert_eq!(PinMode::fast_io(PinFunction::Func0).bits(), 0xF0);
        assert_eq!(
            PinMode::new(PinFunction::Func2, PadConfig::DEFAULT).bits(),
            0x02
        );
    }
}
