//! EDU-CIAA clock and SDRAM timing constants.
//!
//! Target device: IS42S16800F-6 (ISSI) -- 16 MB (8M x 16-bit), TSOP-54
//! EMC chip select: DYCS0 (base address 0x2800_0000)
//! EMC clock: BASE_M4_CLK 204 MHz, EMC divider /2 -> 102 MHz
//!
//! # Timing math
//!
//! cycles = ceil(t_ns * EMC_CLK_HZ / 1_000_000_000)
//!
//! Constants here are actual cycle counts (1-based). The EMC timing
//! registers store (cycles - 1) for every field except tDAL; the conversion
//! happens where the timing record is built (see `sdram::IS42S16800_CONFIG`).
//!
//! # Refresh
//!
//! 4096 rows refreshed within 64 ms.
//! Per-row interval = 64 ms / 4096 * 102 MHz = 1593 EMC cycles (rounded down).
//!
//! # References
//!
//! - IS42S16800F datasheet Rev B, AC characteristics (-6 speed grade)
//! - LPC43xx User Manual UM10503, chapter 21.8 (EMC dynamic memory registers)
//! - LPC43xx User Manual UM10503, chapter 13 (CGU/CCU: EMC clock divider)

use platform::emc::ns_to_cycles;

// ---- Clock ----------------------------------------------------------------

/// Core clock (BASE_M4_CLK) in Hz.
pub const CORE_CLK_HZ: u32 = 204_000_000;

/// EMC clock divider (CREG6.EMC_CLK_SEL + CCU1 EMCDIV = /2).
pub const EMC_CLK_DIV: u32 = 2;

/// EMC clock in Hz. All timing registers count in this clock.
#[allow(clippy::arithmetic_side_effects)] // const divisor is non-zero
pub const EMC_CLK_HZ: u32 = CORE_CLK_HZ / EMC_CLK_DIV;

// ---- IS42S16800F-6 timing constraints in nanoseconds ---------------------

/// tRP - Precharge command period (ns).
pub const T_RP_NS: u32 = 18;

/// tRAS - Active to precharge command period (ns).
pub const T_RAS_NS: u32 = 42;

/// tRCD - Active to read/write delay (ns). Sets the RAS latency.
pub const T_RCD_NS: u32 = 18;

/// tRC - Active to active command period, same bank (ns).
pub const T_RC_NS: u32 = 60;

/// tRFC - Auto-refresh period (ns).
pub const T_RFC_NS: u32 = 60;

/// tXSR - Exit self-refresh to active (ns).
pub const T_XSR_NS: u32 = 70;

/// tRRD - Active bank A to active bank B (ns).
pub const T_RRD_NS: u32 = 12;

/// Refresh period for all rows (ms).
pub const REFRESH_PERIOD_MS: u32 = 64;

/// Rows refreshed per period.
pub const REFRESH_ROWS: u32 = 4096;

// ---- Cycle counts ----------------------------------------------------------

/// Row refresh interval in EMC cycles.
pub const SDRAM_REFRESH: u32 = refresh_cycles(REFRESH_PERIOD_MS, REFRESH_ROWS, EMC_CLK_HZ);

/// tRP: ceil(18 ns * 102 MHz) = 2 cycles.
pub const SDRAM_T_RP: u32 = ns_to_cycles(T_RP_NS, EMC_CLK_HZ);

/// tRAS: ceil(42 ns * 102 MHz) = 5 cycles.
pub const SDRAM_T_RAS: u32 = ns_to_cycles(T_RAS_NS, EMC_CLK_HZ);

/// tSREX: self-refresh exit, same constraint as tXSR = 8 cycles.
pub const SDRAM_T_SREX: u32 = ns_to_cycles(T_XSR_NS, EMC_CLK_HZ);

/// tAPR: last-data-out to active, 2 cycles.
pub const SDRAM_T_APR: u32 = 2;

/// tWR: write recovery, 2 CLK (datasheet specifies clocks).
pub const SDRAM_T_WR: u32 = 2;

/// tDAL: data-in to active = tWR + tRP = 4 cycles.
#[allow(clippy::arithmetic_side_effects)] // small compile-time constants
pub const SDRAM_T_DAL: u32 = SDRAM_T_WR + SDRAM_T_RP;

/// tRC: ceil(60 ns * 102 MHz) = 7 cycles.
pub const SDRAM_T_RC: u32 = ns_to_cycles(T_RC_NS, EMC_CLK_HZ);

/// tRFC: ceil(60 ns * 102 MHz) = 7 cycles.
pub const SDRAM_T_RFC: u32 = ns_to_cycles(T_RFC_NS, EMC_CLK_HZ);

/// tXSR: ceil(70 ns * 102 MHz) = 8 cycles.
pub const SDRAM_T_XSR: u32 = ns_to_cycles(T_XSR_NS, EMC_CLK_HZ);

/// tRRD: ceil(12 ns * 102 MHz) = 2 cycles.
pub const SDRAM_T_RRD: u32 = ns_to_cycles(T_RRD_NS, EMC_CLK_HZ);

/// tMRD: load mode register to active, 2 CLK.
pub const SDRAM_T_MRD: u32 = 2;

/// RAS latency: tRCD rounded up, 2 cycles.
pub const SDRAM_RAS: u32 = ns_to_cycles(T_RCD_NS, EMC_CLK_HZ);

/// DYNAMICREADCONFIG RD field: command delayed strategy.
pub const SDRAM_RDCFG_RD: platform::emc::ReadStrategy = platform::emc::ReadStrategy::CommandDelayed;

// ---- Const helper functions -------------------------------------------------

/// Per-row refresh interval in EMC cycles (rounded down so rows are never late).
///
/// cycles = floor(period_ms * clk_hz / 1_000 / rows)
#[allow(clippy::arithmetic_side_effects)] // u32 * u32 fits u64; rows is non-zero below
#[allow(clippy::cast_possible_truncation)] // result <= period_ms * clk_hz / 1000 < 2^32 for ms < 4_294_967
pub const fn refresh_cycles(period_ms: u32, rows: u32, clk_hz: u32) -> u32 {
    if rows == 0 {
        return 0;
    }
    (period_ms as u64 * clk_hz as u64 / 1_000 / rows as u64) as u32
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn emc_clock_is_102mhz() {
        assert_eq!(EMC_CLK_HZ, 102_000_000);
    }

    #[test]
    fn refresh_is_1593_cycles() {
        // 64 ms * 102 MHz / 1000 / 4096 = 1593.75
        assert_eq!(SDRAM_REFRESH, 1593);
    }

    #[test]
    fn refresh_never_exceeds_row_interval() {
        // 1593 cycles * 9.8 ns = 15.62 us <= 15.625 us
        let ns = u64::from(SDRAM_REFRESH) * 1_000_000_000 / u64::from(EMC_CLK_HZ);
        assert!(ns <= 15_625);
    }

    #[test]
    fn cycle_counts_at_102mhz() {
        assert_eq!(SDRAM_T_RP, 2);
        assert_eq!(SDRAM_T_RAS, 5);
        assert_eq!(SDRAM_T_SREX, 8);
        assert_eq!(SDRAM_T_DAL, 4);
        assert_eq!(SDRAM_T_RC, 7);
        assert_eq!(SDRAM_T_RFC, 7);
        assert_eq!(SDRAM_T_XSR, 8);
        assert_eq!(SDRAM_T_RRD, 2);
        assert_eq!(SDRAM_RAS, 2);
    }

    #[test]
    fn every_minus_one_field_is_at_least_one_cycle() {
        for t in [
            SDRAM_T_RP,
            SDRAM_T_RAS,
            SDRAM_T_SREX,
            SDRAM_T_APR,
            SDRAM_T_WR,
            SDRAM_T_RC,
            SDRAM_T_RFC,
            SDRAM_T_XSR,
            SDRAM_T_RRD,
            SDRAM_T_MRD,
        ] {
            assert!(t >= 1);
        }
    }

    #[test]
    fn refresh_cycles_handles_zero_rows() {
        assert_eq!(refresh_cycles(64, 0, EMC_CLK_HZ), 0);
    }
}
