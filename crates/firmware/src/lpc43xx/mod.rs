//! LPC43xx register backends for the platform seams.
//!
//! Each backend is generic over [`platform::RegisterBus`] so the exact
//! register traffic can be checked on the host with
//! `platform::mocks::MockRegisterBus`. On the target they run over
//! [`platform::VolatileBus`].

pub mod emc;
pub mod scu;

#[cfg(feature = "hardware")]
pub mod delay;

pub use emc::{Emc, EmcError};
pub use scu::{Scu, ScuError};

/// SCU register block base.
pub const SCU_BASE: u32 = 0x4008_6000;

/// EMC register block base.
pub const EMC_BASE: u32 = 0x4000_5000;
