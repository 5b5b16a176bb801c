//! EMC dynamic-memory backend.
//!
//! Programs the controller registers from a [`DynamicConfig`] and runs the
//! JEDEC power-up sequence the LPC43xx user manual prescribes for SDRAM
//! (UM10503 §21.8, "SDRAM initialization"):
//!
//! ```text
//! DYNAMICCONFIGn / DYNAMICRASCASn     all four, zero when unused
//! DYNAMICREADCONFIG, tRP .. tMRD      timing, in EMC cycles
//! wait 100 us
//! NOP                                 CLKOUT + CKE running
//! wait 200 us
//! PALL                                precharge all banks
//! DYNAMICREFRESH = 2                  32-cycle refresh burst
//! wait 200 us                         at least 2 refresh cycles
//! DYNAMICREFRESH = period / 16
//! MODE                                read from base | mode << shift
//! NORMAL
//! DYNAMICCONFIGn.B = 1                buffers on
//! ```
//!
//! Every register value is computed and range-checked before the first
//! write, so a config that does not fit leaves the controller untouched.

use embedded_hal::delay::DelayNs;
use platform::emc::{
    DeviceConfig, DynamicChipConfig, DynamicConfig, DynamicMemoryController, Timing,
    DYNAMIC_CHIP_SELECTS,
};
use platform::mmio::RegisterBus;
use thiserror_no_std::Error;

use super::EMC_BASE;

/// Register offsets from [`EMC_BASE`].
pub mod reg {
    /// Dynamic control: clock enables and SDRAM commands.
    pub const DYNAMIC_CONTROL: u32 = 0x020;
    /// Refresh timer.
    pub const DYNAMIC_REFRESH: u32 = 0x024;
    /// Read strategy.
    pub const DYNAMIC_READ_CONFIG: u32 = 0x028;
    /// tRP
    pub const DYNAMIC_RP: u32 = 0x030;
    /// tRAS
    pub const DYNAMIC_RAS: u32 = 0x034;
    /// tSREX
    pub const DYNAMIC_SREX: u32 = 0x038;
    /// tAPR
    pub const DYNAMIC_APR: u32 = 0x03C;
    /// tDAL
    pub const DYNAMIC_DAL: u32 = 0x040;
    /// tWR
    pub const DYNAMIC_WR: u32 = 0x044;
    /// tRC
    pub const DYNAMIC_RC: u32 = 0x048;
    /// tRFC
    pub const DYNAMIC_RFC: u32 = 0x04C;
    /// tXSR
    pub const DYNAMIC_XSR: u32 = 0x050;
    /// tRRD
    pub const DYNAMIC_RRD: u32 = 0x054;
    /// tMRD
    pub const DYNAMIC_MRD: u32 = 0x058;
    /// DYNAMICCONFIG0..3
    pub const DYNAMIC_CONFIG: [u32; 4] = [0x100, 0x120, 0x140, 0x160];
    /// DYNAMICRASCAS0..3
    pub const DYNAMIC_RASCAS: [u32; 4] = [0x104, 0x124, 0x144, 0x164];
}

/// DYNAMICCONTROL command words.
pub mod command {
    /// CE | CS | NOP (clock running, SDRAM idle).
    pub const NOP: u32 = 0x0000_0183;
    /// CE | CS | PALL.
    pub const PALL: u32 = 0x0000_0103;
    /// CE | CS | MODE (mode register load).
    pub const MODE: u32 = 0x0000_0083;
    /// NORMAL operation.
    pub const NORMAL: u32 = 0x0000_0000;
    /// CE | CS: clock enable and CLKOUT run.
    pub const ENABLE: u32 = 0x0000_0003;
}

/// Refresh value used while precharging (2 x 16 = 32 cycles).
pub const FAST_REFRESH: u32 = 2;

/// Delay before the first SDRAM command.
pub const POWER_UP_DELAY_US: u32 = 100;

/// Delay after NOP and after the fast refresh burst.
pub const COMMAND_DELAY_US: u32 = 200;

const REFRESH_BITS: u32 = 11;
const READ_CONFIG_BITS: u32 = 2;
const RAS_CAS_BITS: u32 = 2;
const CAS_SHIFT: u32 = 8;

/// EMC backend errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmcError {
    /// A value does not fit its register field.
    #[error("{register} value {value} does not fit its register field")]
    FieldOverflow {
        /// Register name
        register: &'static str,
        /// Offending value (cycles)
        value: u32,
    },
    /// The chip-select configuration word has no supported geometry.
    #[error("unsupported SDRAM geometry on DYCS{chip_select}")]
    UnsupportedGeometry {
        /// Chip select index
        chip_select: u8,
    },
}

fn field(register: &'static str, value: u32, bits: u32) -> Result<u32, EmcError> {
    if value >> bits == 0 {
        Ok(value)
    } else {
        Err(EmcError::FieldOverflow { register, value })
    }
}

/// One timing register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingField {
    /// Register name, as reported in [`EmcError::FieldOverflow`].
    pub name: &'static str,
    /// Offset from [`EMC_BASE`].
    pub offset: u32,
    /// Field width in bits.
    pub bits: u32,
    /// The register holds `cycles - 1`.
    pub minus_one: bool,
}

const fn timing_field(name: &'static str, offset: u32, bits: u32, minus_one: bool) -> TimingField {
    TimingField {
        name,
        offset,
        bits,
        minus_one,
    }
}

/// Timing registers in programming order. tDAL is the only one that holds
/// the plain cycle count.
pub const TIMING_FIELDS: [TimingField; 11] = [
    timing_field("DYNAMICRP", reg::DYNAMIC_RP, 4, true),
    timing_field("DYNAMICRAS", reg::DYNAMIC_RAS, 4, true),
    timing_field("DYNAMICSREX", reg::DYNAMIC_SREX, 4, true),
    timing_field("DYNAMICAPR", reg::DYNAMIC_APR, 4, true),
    timing_field("DYNAMICDAL", reg::DYNAMIC_DAL, 4, false),
    timing_field("DYNAMICWR", reg::DYNAMIC_WR, 4, true),
    timing_field("DYNAMICRC", reg::DYNAMIC_RC, 5, true),
    timing_field("DYNAMICRFC", reg::DYNAMIC_RFC, 5, true),
    timing_field("DYNAMICXSR", reg::DYNAMIC_XSR, 5, true),
    timing_field("DYNAMICRRD", reg::DYNAMIC_RRD, 4, true),
    timing_field("DYNAMICMRD", reg::DYNAMIC_MRD, 4, true),
];

const fn timings(config: &DynamicConfig) -> [Timing; 11] {
    [
        config.t_rp,
        config.t_ras,
        config.t_srex,
        config.t_apr,
        config.t_dal,
        config.t_wr,
        config.t_rc,
        config.t_rfc,
        config.t_xsr,
        config.t_rrd,
        config.t_mrd,
    ]
}

/// Register values for one populated chip select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipRegisters {
    /// DYNAMICCONFIGn (buffers still off).
    pub config: u32,
    /// DYNAMICRASCASn.
    pub ras_cas: u32,
    /// Address whose read issues the mode-register load.
    pub mode_address: u32,
}

/// Every value [`Emc::init_dynamic`] writes, computed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterPlan {
    /// DYNAMICREADCONFIG.
    pub read_config: u32,
    /// tRP .. tMRD, in [`TIMING_FIELDS`] order.
    pub timings: [u32; 11],
    /// DYNAMICREFRESH after precharge.
    pub refresh: u32,
    /// Per chip select; `None` when unused.
    pub chips: [Option<ChipRegisters>; DYNAMIC_CHIP_SELECTS],
}

impl RegisterPlan {
    /// Validate `config` against the register layout at `emc_clk_hz`.
    pub fn new(config: &DynamicConfig, emc_clk_hz: u32) -> Result<Self, EmcError> {
        let read_config = field("DYNAMICREADCONFIG", config.read_config, READ_CONFIG_BITS)?;

        let mut values = [0; 11];
        for ((slot, register), timing) in values
            .iter_mut()
            .zip(TIMING_FIELDS.iter())
            .zip(timings(config))
        {
            *slot = field(
                register.name,
                timing.to_register(emc_clk_hz, register.minus_one),
                register.bits,
            )?;
        }

        let refresh = field(
            "DYNAMICREFRESH",
            config.refresh_period.to_cycles(emc_clk_hz) >> 4,
            REFRESH_BITS,
        )?;

        let mut chips = [None; DYNAMIC_CHIP_SELECTS];
        for (index, chip) in config.enabled_chips() {
            if let Some(slot) = chips.get_mut(index) {
                *slot = Some(chip_registers(index, chip)?);
            }
        }

        Ok(Self {
            read_config,
            timings: values,
            refresh,
            chips,
        })
    }
}

#[allow(clippy::cast_possible_truncation)] // index < DYNAMIC_CHIP_SELECTS
fn chip_registers(index: usize, chip: &DynamicChipConfig) -> Result<ChipRegisters, EmcError> {
    let chip_select = index as u8;
    let geometry = chip
        .config
        .geometry()
        .ok_or(EmcError::UnsupportedGeometry { chip_select })?;

    let ras = field("DYNAMICRASCAS.RAS", chip.ras_latency, RAS_CAS_BITS)?;
    let cas = field("DYNAMICRASCAS.CAS", chip.mode.cas_latency(), RAS_CAS_BITS)?;

    // Row and bank bits follow the column bits, plus one for the 16-bit bus.
    // Bank-row-column mapping puts the banks on top instead.
    let mut shift = u32::from(geometry.column_bits).saturating_add(1);
    if !chip.config.contains(DeviceConfig::LPSDRAM) {
        shift = shift.saturating_add(u32::from(geometry.bank_bits));
    }
    let offset = chip
        .mode
        .bits()
        .checked_shl(shift)
        .filter(|offset| offset >> shift == chip.mode.bits())
        .ok_or(EmcError::FieldOverflow {
            register: "MODE",
            value: chip.mode.bits(),
        })?;

    Ok(ChipRegisters {
        config: chip.config.bits(),
        ras_cas: ras | (cas << CAS_SHIFT),
        mode_address: chip.base_address | offset,
    })
}

/// EMC dynamic-memory controller over a register bus.
pub struct Emc<B, D> {
    bus: B,
    delay: D,
    emc_clk_hz: u32,
}

impl<B: RegisterBus, D: DelayNs> Emc<B, D> {
    /// Wrap `bus`; `emc_clk_hz` converts nanosecond timings.
    pub const fn new(bus: B, delay: D, emc_clk_hz: u32) -> Self {
        Self {
            bus,
            delay,
            emc_clk_hz,
        }
    }

    /// Release the bus and delay.
    pub fn free(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Borrow the bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[allow(clippy::arithmetic_side_effects)] // offsets are < 0x200 above the base
    fn write(&mut self, offset: u32, value: u32) {
        self.bus.write(EMC_BASE + offset, value);
    }

    #[allow(clippy::arithmetic_side_effects)]
    fn read(&mut self, offset: u32) -> u32 {
        self.bus.read(EMC_BASE + offset)
    }

    fn command(&mut self, word: u32) {
        self.write(reg::DYNAMIC_CONTROL, word);
    }
}

impl<B: RegisterBus, D: DelayNs> DynamicMemoryController for Emc<B, D> {
    type Error = EmcError;

    fn init_dynamic(&mut self, config: &DynamicConfig) -> Result<(), Self::Error> {
        let plan = RegisterPlan::new(config, self.emc_clk_hz)?;

        for (chip, (config_reg, rascas_reg)) in plan
            .chips
            .iter()
            .zip(reg::DYNAMIC_CONFIG.iter().zip(reg::DYNAMIC_RASCAS.iter()))
        {
            // unused chip selects are written as zero (disabled)
            let (chip_config, ras_cas) = chip.map_or((0, 0), |c| (c.config, c.ras_cas));
            self.write(*config_reg, chip_config);
            self.write(*rascas_reg, ras_cas);
        }

        self.write(reg::DYNAMIC_READ_CONFIG, plan.read_config);
        for (register, value) in TIMING_FIELDS.iter().zip(plan.timings) {
            self.write(register.offset, value);
        }

        self.delay.delay_us(POWER_UP_DELAY_US);
        self.command(command::NOP);
        self.delay.delay_us(COMMAND_DELAY_US);
        self.command(command::PALL);
        self.write(reg::DYNAMIC_REFRESH, FAST_REFRESH);
        self.delay.delay_us(COMMAND_DELAY_US);
        self.write(reg::DYNAMIC_REFRESH, plan.refresh);

        self.command(command::MODE);
        for chip in plan.chips.iter().flatten() {
            // The SDRAM latches the mode from the address lines; the data is junk.
            let _ = self.bus.read(chip.mode_address);
        }
        self.command(command::NORMAL);

        for (chip, config_reg) in plan.chips.iter().zip(reg::DYNAMIC_CONFIG) {
            if chip.is_some() {
                self.bus_set_bits(config_reg, DeviceConfig::BUFFER_ENABLE.bits());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "EMC: dynamic memory initialized, refresh={=u32}x16",
            plan.refresh
        );

        Ok(())
    }

    fn enable_dynamic(&mut self, enable: bool) -> Result<(), Self::Error> {
        let control = self.read(reg::DYNAMIC_CONTROL);
        let control = if enable {
            control | command::ENABLE
        } else {
            control & !command::ENABLE
        };
        self.write(reg::DYNAMIC_CONTROL, control);
        Ok(())
    }
}

impl<B: RegisterBus, D> Emc<B, D> {
    #[allow(clippy::arithmetic_side_effects)]
    fn bus_set_bits(&mut self, offset: u32, mask: u32) {
        self.bus.set_bits(EMC_BASE + offset, mask);
    }
}
