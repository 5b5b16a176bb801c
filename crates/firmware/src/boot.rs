//! Hardware boot sequence for the EDU-CIAA.
//!
//! Initialization order (each step depends on the previous one):
//!   1. Clocks: BASE_M4_CLK at 204 MHz, EMC clock divided by 2
//!   2. SCU: route the 41 SDRAM signals in fast-I/O mode
//!   3. EMC: program DYCS0 and run the SDRAM power-up sequence
//!   4. EMC: enable the dynamic-memory interface
//!   5. SDRAM: pattern check over the start of the window
//!
//! Steps 2-4 are [`crate::arch::initialize_arch`]; step 1 is done by the
//! startup code before `main`.
//!
//! # Safety
//! These steps run from the reset context before anything else uses the SCU,
//! the EMC or the SDRAM window.

/// Ordered list of boot steps, for documentation and tests.
///
/// # Correctness Invariants
///
/// - Pins must be routed before the EMC issues its first command, otherwise
///   NOP/PALL/MODE never reach the device.
/// - The EMC clock must be stable before any timing register is programmed;
///   every register value is counted in EMC cycles.
/// - Nothing may touch 0x2800_0000 before the dynamic interface is enabled.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. Clocks: BASE_M4_CLK 204 MHz, EMC divider /2 -> 102 MHz",
    "2. SCU: route 41 SDRAM pins (fast I/O, no pulls, filter off)",
    "3. EMC: program DYCS0 timing, NOP -> PALL -> refresh -> MODE -> NORMAL",
    "4. EMC: enable dynamic memory (CE | CS)",
    "5. SDRAM: pattern check at 0x2800_0000",
];

/// Words checked by the boot pattern test (4 KiB).
pub const PATTERN_CHECK_WORDS: usize = 1024;

/// A word that did not read back as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("word {index}: wrote {expected:#010x}, read {found:#010x}")]
pub struct PatternMismatch {
    /// Word index inside the checked region.
    pub index: usize,
    /// Written value.
    pub expected: u32,
    /// Value read back.
    pub found: u32,
}

/// Pattern for word `index`: alternating bits mixed with the index, so
/// stuck, shorted and aliased address lines all show up.
#[allow(clippy::cast_possible_truncation)] // wraps on purpose above 4 G words
pub const fn pattern(index: usize) -> u32 {
    let i = index as u32;
    let base = if i & 1 == 0 { 0xAAAA_5555 } else { 0x5555_AAAA };
    base ^ i.rotate_left(16) ^ i
}

/// Write [`pattern`] into `words`.
pub fn fill_pattern(words: &mut [u32]) {
    for (index, word) in words.iter_mut().enumerate() {
        *word = pattern(index);
    }
}

/// Compare `words` against [`pattern`]; report the first difference.
pub fn check_pattern(words: &[u32]) -> Result<(), PatternMismatch> {
    for (index, found) in words.iter().copied().enumerate() {
        let expected = pattern(index);
        if found != expected {
            return Err(PatternMismatch {
                index,
                expected,
                found,
            });
        }
    }
    Ok(())
}

// ── Hardware-only init ────────────────────────────────────────────────────────
//
// Only compiled for the target. Host tests never build this module; the same
// sequence runs against mocks in `tests/integration_boot.rs`.

#[cfg(feature = "hardware")]
pub mod hardware {
    //! Boot steps over the physical registers.

    use platform::VolatileBus;

    use crate::arch::{ArchError, ExternalMemory, Initialized, Uninitialized};
    use crate::board;
    use crate::lpc43xx::delay::CycleDelay;
    use crate::lpc43xx::{Emc, EmcError, Scu, ScuError};

    use super::{check_pattern, fill_pattern, PatternMismatch, PATTERN_CHECK_WORDS};

    /// Bring-up failure on the real backends.
    pub type BootError = ArchError<ScuError, EmcError>;

    /// Route the pins, program the EMC and enable the SDRAM.
    ///
    /// # Safety
    ///
    /// - Call once, from the reset context, before interrupts are enabled.
    /// - No other code may access the SCU, the EMC or the SDRAM window
    ///   while this runs.
    /// - The EMC clock must already run at [`board::EMC_CLK_HZ`].
    #[allow(unsafe_code)]
    pub unsafe fn init_external_memory() -> Result<ExternalMemory<Initialized>, BootError> {
        // SAFETY: SCU SFS registers are valid word-aligned peripheral
        // registers; exclusivity is the caller's contract.
        let mut scu = Scu::new(unsafe { VolatileBus::new() });
        // SAFETY: EMC registers and the DYCS0 window are valid; the MODE
        // command reads from inside the window. Exclusive per caller.
        let mut emc = Emc::new(
            unsafe { VolatileBus::new() },
            CycleDelay::new(board::CORE_CLK_HZ),
            board::EMC_CLK_HZ,
        );

        ExternalMemory::<Uninitialized>::new().initialize(&mut scu, &mut emc)
    }

    /// Pattern-check the first [`PATTERN_CHECK_WORDS`] words of the window.
    ///
    /// Overwrites that region.
    #[allow(unsafe_code)]
    #[allow(clippy::arithmetic_side_effects)] // divisor is size_of::<u32>()
    pub fn check_window(sdram: &mut ExternalMemory<Initialized>) -> Result<(), PatternMismatch> {
        let words = PATTERN_CHECK_WORDS.min(sdram.size() / core::mem::size_of::<u32>());
        // SAFETY: the window is enabled (typestate), word-aligned, at least
        // `words` long, and `&mut` on the handle makes this the only access.
        let region = unsafe { core::slice::from_raw_parts_mut(sdram.as_mut_ptr(), words) };
        fill_pattern(region);
        cortex_m::asm::dsb();
        check_pattern(region)
    }
}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::unwrap_used,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    /// Index of the first step whose subsystem label (after "N. ") is `label`.
    fn step_of(label: &str) -> Option<usize> {
        BOOT_SEQUENCE_STEPS.iter().position(|s| {
            s.split_once(". ")
                .is_some_and(|(_, step)| step.starts_with(label))
        })
    }

    #[test]
    fn test_boot_sequence_pins_before_emc() {
        let scu = step_of("SCU:").unwrap();
        let emc = step_of("EMC:").unwrap();
        assert!(scu < emc, "SCU pin routing must precede the first EMC step");
    }

    #[test]
    fn test_boot_sequence_clocks_first() {
        // the clock step mentions the EMC divider but is not an EMC step
        assert_eq!(step_of("Clocks:"), Some(0));
        assert_eq!(step_of("EMC:"), Some(2));
    }

    #[test]
    fn test_boot_sequence_checks_sdram_last() {
        let last = BOOT_SEQUENCE_STEPS.last().copied().unwrap_or_default();
        assert!(last.contains("SDRAM"), "SDRAM check must be the final step");
    }

    #[test]
    fn test_pattern_differs_between_neighbours() {
        for i in 0..64 {
            assert_ne!(pattern(i), pattern(i + 1), "words {i} and {} alias", i + 1);
        }
    }

    #[test]
    fn test_pattern_roundtrip_on_healthy_memory() {
        let mut words = [0u32; 256];
        fill_pattern(&mut words);
        assert_eq!(check_pattern(&words), Ok(()));
    }

    #[test]
    fn test_pattern_reports_first_bad_word() {
        let mut words = [0u32; 256];
        fill_pattern(&mut words);
        words[17] ^= 1 << 9; // stuck data line D9
        words[200] = 0;
        let err = check_pattern(&words).unwrap_err();
        assert_eq!(err.index, 17);
        assert_eq!(err.expected, pattern(17));
        assert_eq!(err.found, pattern(17) ^ (1 << 9));
    }
}
