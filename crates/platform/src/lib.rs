//! Hardware Abstraction Layer (HAL) for CIAA boards
//!
//! This crate provides trait-based abstractions for the peripherals touched
//! during board bring-up, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Board crate (firmware: pin tables, timing records, boot order)
//!         ↓
//! Platform HAL (this crate - trait abstractions + value types)
//!         ↓
//! Register backends (firmware::lpc43xx over mmio::RegisterBus)
//! ```
//!
//! # Modules
//!
//! - [`scu`] - Pin multiplexing ([`PinMux`])
//! - [`emc`] - External memory controller, dynamic side ([`DynamicMemoryController`])
//! - [`mmio`] - Memory-mapped register access ([`RegisterBus`])
//! - [`iodriver`] - Synchronous I/O driver contract ([`IoDriver`])
//!
//! # Features
//!
//! - `std`: Expose [`mocks`] to other crates' tests
//! - `defmt`: Enable defmt derives
//! - `io-port-8` / `io-port-16`: DIO port width (32-bit otherwise)
//!
//! # Example
//!
//! ```
//! use platform::scu::{PinFunction, PinMode};
//!
//! let mode = PinMode::fast_io(PinFunction::Func3);
//! assert_eq!(mode.bits(), 0xF3);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod emc;
pub mod iodriver;
pub mod mmio;
pub mod mocks;
pub mod scu;

pub use emc::{DynamicConfig, DynamicMemoryController, Timing};
pub use iodriver::{IoDriver, IoError, IoResult};
pub use mmio::{RegisterBus, VolatileBus};
pub use scu::{PinAssignment, PinFunction, PinMode, PinMux};
