//! EDU-CIAA Board Firmware
//!
//! Board support for the EDU-CIAA (NXP LPC4337, Cortex-M4F): brings the
//! external IS42S16800F SDRAM online through the External Memory Controller.
//!
//! # Architecture
//!
//! This firmware follows a layered architecture:
//!
//! ```text
//! Entry point (main.rs, boot)
//!         ↓
//! Orchestration (arch: pins → EMC → enable)
//!         ↓
//! Board data (board, sdram: clocks, pin table, timing record)
//!         ↓
//! Register backends (lpc43xx::Scu, lpc43xx::Emc over platform::RegisterBus)
//! ```
//!
//! # Features
//!
//! - `hardware` - Build for the LPC4337 target (cortex-m-rt, defmt-rtt)
//! - `defmt` - Log through defmt
//! - `std` - Expose platform mocks to host tooling (xtask emc-dump)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf -p firmware --features hardware
//! ```
//!
//! ## Host Tests
//!
//! ```bash
//! cargo test -p firmware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod arch;
pub mod board;
pub mod boot;
pub mod lpc43xx;
pub mod sdram;

// Re-export key types
pub use arch::{
    initialize_arch, initialize_sdram, initialize_sdram_pins, ArchError, ExternalMemory,
    Initialized, PinMuxError, Uninitialized,
};
pub use sdram::{SdramProfile, EDU_CIAA_SDRAM, IS42S16800_CONFIG, SDRAM_PINS};
