//! External Memory Controller (EMC) dynamic-memory configuration
//!
//! Value types describing how the LPC43xx EMC drives an SDRAM device, and the
//! [`DynamicMemoryController`] seam that applies them. Everything here is
//! plain data: no register access, fully host-testable.
//!
//! # Timing values
//!
//! The EMC timing registers hold `cycles - 1` for most fields. A
//! [`DynamicConfig`] stores exactly what the register should receive, so a
//! board that needs 3 cycles of tRP stores `Timing::Cycles(2)`. Values may
//! also be given in nanoseconds; they are converted against the EMC clock
//! when the controller is programmed, and the same minus-one applies, so
//! `Nanoseconds(20)` at 102 MHz (3 cycles) also programs 2.
//!
//! # Sources
//!
//! - LPC43xx User Manual UM10503, chapter 21 (EMC), Tables 372-395
//! - IS42S16800F datasheet (ISSI), mode register definition

/// A timing parameter, as written to its EMC register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timing {
    /// Raw EMC clock cycles (register value).
    Cycles(u32),
    /// Nanoseconds, rounded up to whole EMC clock cycles.
    Nanoseconds(u32),
}

impl Timing {
    /// Disabled / unused field.
    pub const ZERO: Self = Self::Cycles(0);

    /// Register value at `emc_clk_hz`.
    ///
    /// `Nanoseconds` converts with `ceil(ns * hz / 1e9)`, at least 1 cycle.
    pub fn to_cycles(self, emc_clk_hz: u32) -> u32 {
        match self {
            Self::Cycles(cycles) => cycles,
            Self::Nanoseconds(ns) => ns_to_cycles(ns, emc_clk_hz),
        }
    }

    /// Register value for a field that holds `cycles - 1` when `minus_one`.
    ///
    /// `Cycles` are already register values and pass through; `Nanoseconds`
    /// are converted and then offset.
    pub fn to_register(self, emc_clk_hz: u32, minus_one: bool) -> u32 {
        match self {
            Self::Cycles(cycles) => cycles,
            Self::Nanoseconds(ns) => {
                let cycles = ns_to_cycles(ns, emc_clk_hz);
                if minus_one {
                    cycles.saturating_sub(1)
                } else {
                    cycles
                }
            }
        }
    }
}

/// Convert nanoseconds to EMC clock cycles (ceiling, at least 1).
///
/// Integer only: `cycles = (ns * hz + 999_999_999) / 1_000_000_000`.
/// The intermediate product fits in `u64` for every `u32` input.
#[allow(clippy::arithmetic_side_effects)] // u32 * u32 + 1e9 cannot overflow u64
#[allow(clippy::cast_possible_truncation)] // clamped to u32::MAX below
pub const fn ns_to_cycles(ns: u32, emc_clk_hz: u32) -> u32 {
    let cycles = (ns as u64 * emc_clk_hz as u64 + 999_999_999) / 1_000_000_000;
    if cycles < 1 {
        1
    } else if cycles > u32::MAX as u64 {
        u32::MAX
    } else {
        cycles as u32
    }
}

/// Read-data capture strategy (DYNAMICREADCONFIG `RD` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum ReadStrategy {
    /// Clock out delayed strategy, using CLKOUT.
    ClockOutDelayed = 0,
    /// Command delayed strategy, using EMCCLKDELAY.
    CommandDelayed = 1,
    /// Command delayed plus one clock cycle.
    CommandDelayedPlusOne = 2,
    /// Command delayed plus two clock cycles.
    CommandDelayedPlusTwo = 3,
}

/// Bit offset of the `RD` field in DYNAMICREADCONFIG.
pub const DYNAMIC_READ_CONFIG_RD_SHIFT: u32 = 0;

impl ReadStrategy {
    /// Register value.
    pub const fn bits(self) -> u32 {
        (self as u32) << DYNAMIC_READ_CONFIG_RD_SHIFT
    }
}

/// SDRAM mode-register pattern (loaded through the MODE command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdramMode(u32);

impl SdramMode {
    /// Burst length 1.
    pub const BURST_LEN_1: Self = Self(0);
    /// Burst length 2.
    pub const BURST_LEN_2: Self = Self(1);
    /// Burst length 4.
    pub const BURST_LEN_4: Self = Self(2);
    /// Burst length 8.
    pub const BURST_LEN_8: Self = Self(3);
    /// Full-page burst.
    pub const BURST_LEN_FULL: Self = Self(7);
    /// Sequential burst ordering.
    pub const BURST_TYPE_SEQUENTIAL: Self = Self(0);
    /// Interleaved burst ordering.
    pub const BURST_TYPE_INTERLEAVE: Self = Self(1 << 3);
    /// CAS latency 1.
    pub const CAS_1: Self = Self(1 << 4);
    /// CAS latency 2.
    pub const CAS_2: Self = Self(2 << 4);
    /// CAS latency 3.
    pub const CAS_3: Self = Self(3 << 4);
    /// Standard operating mode.
    pub const OPMODE_STANDARD: Self = Self(0);
    /// Writes use the programmed burst length.
    pub const WBMODE_PROGRAMMED: Self = Self(0);
    /// Writes are single-location accesses.
    pub const WBMODE_SINGLE_LOCATION: Self = Self(1 << 9);

    /// Empty pattern (unused chip select).
    pub const NONE: Self = Self(0);

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Combine two patterns.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// CAS latency encoded in bits 6:4.
    pub const fn cas_latency(self) -> u32 {
        (self.0 >> 4) & 0x7
    }
}

/// DYNAMICCONFIGn word: device type, address mapping and bus width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig(u32);

impl DeviceConfig {
    /// Memory device: standard SDRAM (`MD` = 00).
    pub const MD_SDRAM: Self = Self(0);
    /// Memory device: low-power SDRAM (`MD` = 01).
    pub const MD_LOW_POWER_SDRAM: Self = Self(1 << 3);
    /// Low-power address mapping: bank, row, column (AM0 bit 12).
    pub const LPSDRAM: Self = Self(1 << 12);
    /// 16-bit external data bus (AM1 = 0).
    pub const DATA_BUS_16: Self = Self(0);
    /// 32-bit external data bus (AM1 = 1).
    pub const DATA_BUS_32: Self = Self(1 << 14);
    /// 128 Mb (8M × 16), 4 banks, 12 row bits, 9 column bits.
    pub const GEOMETRY_8MX16_4BANKS_12ROWS_9COLS: Self = Self(0x09 << 7);
    /// Buffer enable (set by the controller after initialization).
    pub const BUFFER_ENABLE: Self = Self(1 << 19);
    /// Write protect.
    pub const WRITE_PROTECT: Self = Self(1 << 20);

    /// Empty configuration (unused chip select).
    pub const NONE: Self = Self(0);

    /// Build from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Combine two configurations.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw word.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Device organization for a 16-bit data bus.
    ///
    /// Decodes the device size (bits 11:9) and width (bits 8:7) fields using
    /// UM10503 Table 378. Returns `None` for 32-bit buses and reserved codes.
    pub const fn geometry(self) -> Option<Geometry> {
        if self.0 & Self::DATA_BUS_32.0 != 0 {
            return None;
        }
        let size = (self.0 >> 9) & 0x7;
        let width = (self.0 >> 7) & 0x3;
        let (bank_bits, row_bits, column_bits) = match (size, width) {
            (0, 0) => (1, 11, 9),
            (0, 1) => (1, 11, 8),
            (1, 0) => (2, 12, 9),
            (1, 1) => (2, 12, 8),
            (2, 0) => (2, 12, 10),
            (2, 1) => (2, 12, 9),
            (3, 0) => (2, 13, 10),
            (3, 1) => (2, 13, 9),
            (4, 0) => (2, 13, 11),
            (4, 1) => (2, 13, 10),
            _ => return None,
        };
        Some(Geometry {
            bank_bits,
            row_bits,
            column_bits,
        })
    }
}

/// SDRAM organization decoded from a [`DeviceConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// log2(number of banks)
    pub bank_bits: u8,
    /// Row address bits
    pub row_bits: u8,
    /// Column address bits
    pub column_bits: u8,
}

/// Base address of the dynamic chip-select windows.
pub mod chip_select {
    /// DYCS0 window.
    pub const DYCS0: u32 = 0x2800_0000;
    /// DYCS1 window.
    pub const DYCS1: u32 = 0x3000_0000;
    /// DYCS2 window.
    pub const DYCS2: u32 = 0x6000_0000;
    /// DYCS3 window.
    pub const DYCS3: u32 = 0x7000_0000;
}

/// Per-chip-select SDRAM description.
///
/// A record whose `base_address` is 0 describes an unused chip select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicChipConfig {
    /// Window base address, e.g. [`chip_select::DYCS0`]; 0 when disabled.
    pub base_address: u32,
    /// RAS latency (active to read/write delay) in cycles.
    pub ras_latency: u32,
    /// Mode register pattern.
    pub mode: SdramMode,
    /// DYNAMICCONFIGn word.
    pub config: DeviceConfig,
}

impl DynamicChipConfig {
    /// Unused chip select.
    pub const DISABLED: Self = Self {
        base_address: 0,
        ras_latency: 0,
        mode: SdramMode::NONE,
        config: DeviceConfig::NONE,
    };

    /// `true` if this chip select is populated.
    pub const fn is_enabled(&self) -> bool {
        self.base_address != 0
    }

    /// `true` if every field is zero.
    pub const fn is_zeroed(&self) -> bool {
        self.base_address == 0
            && self.ras_latency == 0
            && self.mode.bits() == 0
            && self.config.bits() == 0
    }
}

/// Number of dynamic chip selects on the LPC43xx EMC.
pub const DYNAMIC_CHIP_SELECTS: usize = 4;

/// Complete dynamic-memory controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicConfig {
    /// Row refresh interval (DYNAMICREFRESH, before the ×16 scaling).
    pub refresh_period: Timing,
    /// DYNAMICREADCONFIG value.
    pub read_config: u32,
    /// tRP: precharge command period.
    pub t_rp: Timing,
    /// tRAS: active to precharge command period.
    pub t_ras: Timing,
    /// tSREX: self-refresh exit time.
    pub t_srex: Timing,
    /// tAPR: last-data-out to active command time.
    pub t_apr: Timing,
    /// tDAL: data-in to active command time.
    pub t_dal: Timing,
    /// tWR: write recovery time.
    pub t_wr: Timing,
    /// tRC: active to active command period.
    pub t_rc: Timing,
    /// tRFC: auto-refresh period.
    pub t_rfc: Timing,
    /// tXSR: exit self-refresh to active command time.
    pub t_xsr: Timing,
    /// tRRD: active bank A to active bank B latency.
    pub t_rrd: Timing,
    /// tMRD: load mode register to active command time.
    pub t_mrd: Timing,
    /// One record per dynamic chip select (DYCS0..DYCS3).
    pub chips: [DynamicChipConfig; DYNAMIC_CHIP_SELECTS],
}

impl DynamicConfig {
    /// Populated chip selects with their index.
    pub fn enabled_chips(&self) -> impl Iterator<Item = (usize, &DynamicChipConfig)> {
        self.chips.iter().enumerate().filter(|(_, c)| c.is_enabled())
    }
}

/// Dynamic-memory side of the EMC.
pub trait DynamicMemoryController {
    /// Error type
    type Error;

    /// Program timing and chip-select registers and run the SDRAM
    /// power-up sequence (NOP, PALL, refresh, MODE, NORMAL).
    fn init_dynamic(&mut self, config: &DynamicConfig) -> Result<(), Self::Error>;

    /// Enable (`true`) or disable the dynamic-memory interface.
    fn enable_dynamic(&mut self, enable: bool) -> Result<(), Self::Error>;
}
