//! EDU-CIAA Firmware - Main Entry Point
//!
//! Hardware-only entry point for the LPC4337 (Cortex-M4 core).

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use firmware::board;
use firmware::boot::{self, hardware};

// RTT transport for defmt
use defmt_rtt as _;
// Panic handler
use panic_probe as _;

#[entry]
fn main() -> ! {
    defmt::info!("EDU-CIAA firmware v{=str}", env!("CARGO_PKG_VERSION"));
    defmt::info!(
        "LPC4337 Cortex-M4F @ {=u32} MHz, EMC @ {=u32} MHz",
        board::CORE_CLK_HZ / 1_000_000,
        board::EMC_CLK_HZ / 1_000_000
    );
    for step in boot::BOOT_SEQUENCE_STEPS {
        defmt::trace!("boot: {=str}", *step);
    }

    // Steps 2-4: pins, EMC programming, dynamic enable.
    //
    // SAFETY: first thing after reset. Interrupts are still disabled and no
    // other code has touched the SCU, the EMC or the SDRAM window.
    #[allow(unsafe_code)]
    let mut sdram = match unsafe { hardware::init_external_memory() } {
        Ok(sdram) => sdram,
        Err(e) => {
            defmt::error!("SDRAM bring-up failed: {}", e);
            halt();
        }
    };

    // Step 5: pattern check.
    match hardware::check_window(&mut sdram) {
        Ok(()) => defmt::info!(
            "SDRAM check passed: {=usize} words at {=u32:#x}",
            boot::PATTERN_CHECK_WORDS,
            sdram.base_address()
        ),
        Err(e) => {
            defmt::error!("SDRAM check failed: {}", e);
            halt();
        }
    }

    defmt::info!("Boot complete");
    halt();
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
