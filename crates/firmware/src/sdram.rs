//! IS42S16800F SDRAM wiring and controller configuration for the EDU-CIAA.
//!
//! Pure data: the SCU pin table that routes the EMC bus to the package pins,
//! and the dynamic-memory record programmed into the EMC. Both are
//! compile-time constants bundled into [`EDU_CIAA_SDRAM`], which the boot
//! code passes to [`crate::arch::initialize_sdram`].
//!
//! # Bus wiring
//!
//! ```text
//! A0-A11   P2_9, P2_10..13, P1_0..2, P2_8, P2_7, P2_6, P2_2
//! BA0/BA1  P2_0, P6_8
//! D0-D15   P1_7..14, P5_4..7, P5_0..3
//! CLK0-3   SFSCLK0..3 (port 0x18)
//! control  WE# P1_6, CKE P6_11, CS# P6_9, RAS# P6_5, CAS# P6_4
//! masks    DQM0 P6_12, DQM1 P6_10
//! ```
//!
//! A12 (P2_1) is not routed: the 8M x 16 device only uses 12 row bits.

use platform::emc::{
    chip_select, DeviceConfig, DynamicChipConfig, DynamicConfig, SdramMode, Timing,
};
use platform::scu::{PinAssignment, PinFunction, CLOCK_PORT};

use crate::board;

use PinFunction::{Func0, Func1, Func2, Func3};

/// Number of SCU pins used by the SDRAM bus.
pub const SDRAM_PIN_COUNT: usize = 41;

/// SCU assignments for every SDRAM signal.
pub const SDRAM_PINS: [PinAssignment; SDRAM_PIN_COUNT] = [
    PinAssignment::fast_io(0x1, 6, Func3, "WE#"),
    // Address bus
    PinAssignment::fast_io(0x2, 10, Func3, "A1"),
    PinAssignment::fast_io(0x2, 11, Func3, "A2"),
    PinAssignment::fast_io(0x2, 12, Func3, "A3"),
    PinAssignment::fast_io(0x2, 13, Func3, "A4"),
    PinAssignment::fast_io(0x1, 0, Func2, "A5"),
    PinAssignment::fast_io(0x1, 1, Func2, "A6"),
    PinAssignment::fast_io(0x1, 2, Func2, "A7"),
    PinAssignment::fast_io(0x2, 8, Func3, "A8"),
    PinAssignment::fast_io(0x2, 7, Func3, "A9"),
    PinAssignment::fast_io(0x2, 6, Func2, "A10"),
    PinAssignment::fast_io(0x2, 2, Func2, "A11"),
    PinAssignment::fast_io(0x2, 0, Func2, "BA0"),
    PinAssignment::fast_io(0x6, 8, Func1, "BA1"),
    // Data bus
    PinAssignment::fast_io(0x1, 7, Func3, "D0"),
    PinAssignment::fast_io(0x1, 8, Func3, "D1"),
    PinAssignment::fast_io(0x1, 9, Func3, "D2"),
    PinAssignment::fast_io(0x1, 10, Func3, "D3"),
    PinAssignment::fast_io(0x1, 11, Func3, "D4"),
    PinAssignment::fast_io(0x1, 12, Func3, "D5"),
    PinAssignment::fast_io(0x1, 13, Func3, "D6"),
    PinAssignment::fast_io(0x1, 14, Func3, "D7"),
    PinAssignment::fast_io(0x5, 4, Func2, "D8"),
    PinAssignment::fast_io(0x5, 5, Func2, "D9"),
    PinAssignment::fast_io(0x5, 6, Func2, "D10"),
    PinAssignment::fast_io(0x5, 7, Func2, "D11"),
    PinAssignment::fast_io(0x5, 0, Func2, "D12"),
    PinAssignment::fast_io(0x5, 1, Func2, "D13"),
    PinAssignment::fast_io(0x5, 2, Func2, "D14"),
    PinAssignment::fast_io(0x5, 3, Func2, "D15"),
    // 16- and 32-bit SDRAM need EMC_CLK with the input buffer on in all four SFSCLKn.
    PinAssignment::fast_io(CLOCK_PORT, 0, Func0, "CLK0"),
    PinAssignment::fast_io(CLOCK_PORT, 1, Func0, "CLK1"),
    PinAssignment::fast_io(CLOCK_PORT, 2, Func0, "CLK2"),
    PinAssignment::fast_io(CLOCK_PORT, 3, Func0, "CLK3"),
    // Control
    PinAssignment::fast_io(0x6, 11, Func3, "CKE"),
    PinAssignment::fast_io(0x6, 9, Func3, "DYCS0#"),
    PinAssignment::fast_io(0x6, 5, Func3, "RAS#"),
    PinAssignment::fast_io(0x6, 4, Func3, "CAS#"),
    PinAssignment::fast_io(0x6, 12, Func3, "DQM0"),
    PinAssignment::fast_io(0x6, 10, Func3, "DQM1"),
    PinAssignment::fast_io(0x2, 9, Func3, "A0"),
];

/// Mode register pattern: burst of 8, sequential, CAS 2, programmed write burst.
pub const IS42S16800_MODE: SdramMode = SdramMode::WBMODE_PROGRAMMED
    .union(SdramMode::OPMODE_STANDARD)
    .union(SdramMode::CAS_2)
    .union(SdramMode::BURST_TYPE_SEQUENTIAL)
    .union(SdramMode::BURST_LEN_8);

/// DYNAMICCONFIG0: 16-bit bus, low-power (bank-row-column) mapping, 8M x 16 SDRAM.
pub const IS42S16800_DEVICE: DeviceConfig = DeviceConfig::DATA_BUS_16
    .union(DeviceConfig::LPSDRAM)
    .union(DeviceConfig::GEOMETRY_8MX16_4BANKS_12ROWS_9COLS)
    .union(DeviceConfig::MD_SDRAM);

/// Register value for a field that stores `cycles - 1`.
#[allow(clippy::arithmetic_side_effects)] // saturating form
const fn minus_one(cycles: u32) -> Timing {
    Timing::Cycles(cycles.saturating_sub(1))
}

/// EMC dynamic-memory record for the IS42S16800F on DYCS0.
pub const IS42S16800_CONFIG: DynamicConfig = DynamicConfig {
    refresh_period: Timing::Cycles(board::SDRAM_REFRESH),
    read_config: board::SDRAM_RDCFG_RD.bits(),
    t_rp: minus_one(board::SDRAM_T_RP),
    t_ras: minus_one(board::SDRAM_T_RAS),
    t_srex: minus_one(board::SDRAM_T_SREX),
    t_apr: minus_one(board::SDRAM_T_APR),
    t_dal: Timing::Cycles(board::SDRAM_T_DAL),
    t_wr: minus_one(board::SDRAM_T_WR),
    t_rc: minus_one(board::SDRAM_T_RC),
    t_rfc: minus_one(board::SDRAM_T_RFC),
    t_xsr: minus_one(board::SDRAM_T_XSR),
    t_rrd: minus_one(board::SDRAM_T_RRD),
    t_mrd: minus_one(board::SDRAM_T_MRD),
    chips: [
        DynamicChipConfig {
            base_address: chip_select::DYCS0,
            ras_latency: board::SDRAM_RAS,
            mode: IS42S16800_MODE,
            config: IS42S16800_DEVICE,
        },
        DynamicChipConfig::DISABLED,
        DynamicChipConfig::DISABLED,
        DynamicChipConfig::DISABLED,
    ],
};

/// SDRAM capacity: 8M x 16 bit.
pub const SDRAM_SIZE: usize = 16 * 1024 * 1024;

/// Everything the SDRAM bring-up needs for one board.
#[derive(Debug, Clone, Copy)]
pub struct SdramProfile<'a> {
    /// Pins to route to the EMC.
    pub pins: &'a [PinAssignment],
    /// Controller configuration.
    pub dynamic: &'a DynamicConfig,
    /// EMC clock the timing record was computed for.
    pub emc_clk_hz: u32,
    /// CPU address of the SDRAM window.
    pub base_address: u32,
    /// Window size in bytes.
    pub size: usize,
}

/// EDU-CIAA: IS42S16800F on DYCS0 at 102 MHz.
pub const EDU_CIAA_SDRAM: SdramProfile<'static> = SdramProfile {
    pins: &SDRAM_PINS,
    dynamic: &IS42S16800_CONFIG,
    emc_clk_hz: board::EMC_CLK_HZ,
    base_address: chip_select::DYCS0,
    size: SDRAM_SIZE,
};
