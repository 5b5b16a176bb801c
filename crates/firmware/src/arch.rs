//! External memory bring-up.
//!
//! Routes the SDRAM bus through the SCU, programs the EMC and enables the
//! dynamic-memory interface, in that order. The first failure stops the
//! sequence and is returned to the caller.
//!
//! ```text
//! initialize_arch
//!   └─ initialize_sdram(profile)
//!        ├─ initialize_sdram_pins   every pin, table order
//!        ├─ init_dynamic            timing + power-up sequence
//!        └─ enable_dynamic(true)
//! ```
//!
//! [`ExternalMemory`] wraps the same sequence in a typestate: only an
//! `ExternalMemory<Initialized>` hands out the SDRAM window.

use core::marker::PhantomData;

use platform::emc::DynamicMemoryController;
use platform::scu::{PinAssignment, PinMux};
use thiserror_no_std::Error;

use crate::sdram::{SdramProfile, EDU_CIAA_SDRAM};

/// A pin assignment the SCU rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("cannot route {signal} to P{port:X}_{pin}")]
pub struct PinMuxError<E> {
    /// Board signal name.
    pub signal: &'static str,
    /// SCU port group.
    pub port: u8,
    /// Pin within the group.
    pub pin: u8,
    /// Backend error.
    pub cause: E,
}

/// SDRAM bring-up failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArchError<P, C> {
    /// Pin configuration failed; the controller was not touched.
    #[error("{0}")]
    PinMux(PinMuxError<P>),
    /// The memory controller rejected the configuration or the enable.
    #[error("dynamic memory controller failed")]
    Controller(C),
}

/// Program every pin in `pins`, in order.
///
/// Stops at the first pin the backend rejects. Running it again with the same
/// table leaves the SCU in the same state.
pub fn initialize_sdram_pins<M: PinMux>(
    scu: &mut M,
    pins: &[PinAssignment],
) -> Result<(), PinMuxError<M::Error>> {
    for assignment in pins {
        scu.apply(assignment).map_err(|cause| PinMuxError {
            signal: assignment.signal,
            port: assignment.port,
            pin: assignment.pin,
            cause,
        })?;
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("SCU: {=usize} SDRAM pins configured", pins.len());

    Ok(())
}

/// Bring up the SDRAM described by `profile`.
pub fn initialize_sdram<M, C>(
    scu: &mut M,
    emc: &mut C,
    profile: &SdramProfile<'_>,
) -> Result<(), ArchError<M::Error, C::Error>>
where
    M: PinMux,
    C: DynamicMemoryController,
{
    initialize_sdram_pins(scu, profile.pins).map_err(ArchError::PinMux)?;
    emc.init_dynamic(profile.dynamic)
        .map_err(ArchError::Controller)?;
    emc.enable_dynamic(true).map_err(ArchError::Controller)?;

    #[cfg(feature = "defmt")]
    defmt::info!(
        "SDRAM online: {=usize} KiB at {=u32:#x}",
        profile.size >> 10,
        profile.base_address
    );

    Ok(())
}

/// Board bring-up entry: the EDU-CIAA SDRAM.
pub fn initialize_arch<M, C>(scu: &mut M, emc: &mut C) -> Result<(), ArchError<M::Error, C::Error>>
where
    M: PinMux,
    C: DynamicMemoryController,
{
    initialize_sdram(scu, emc, &EDU_CIAA_SDRAM)
}

/// Memory not yet configured.
pub struct Uninitialized;

/// Memory configured and enabled.
pub struct Initialized;

/// Handle to the external SDRAM window.
pub struct ExternalMemory<STATE> {
    base_address: u32,
    size: usize,
    _state: PhantomData<STATE>,
}

impl ExternalMemory<Uninitialized> {
    /// Handle for the board SDRAM.
    pub const fn new() -> Self {
        Self {
            base_address: EDU_CIAA_SDRAM.base_address,
            size: EDU_CIAA_SDRAM.size,
            _state: PhantomData,
        }
    }

    /// Run the bring-up with the board profile.
    pub fn initialize<M, C>(
        self,
        scu: &mut M,
        emc: &mut C,
    ) -> Result<ExternalMemory<Initialized>, ArchError<M::Error, C::Error>>
    where
        M: PinMux,
        C: DynamicMemoryController,
    {
        self.initialize_with(scu, emc, &EDU_CIAA_SDRAM)
    }

    /// Run the bring-up with `profile`; the handle takes its window.
    pub fn initialize_with<M, C>(
        self,
        scu: &mut M,
        emc: &mut C,
        profile: &SdramProfile<'_>,
    ) -> Result<ExternalMemory<Initialized>, ArchError<M::Error, C::Error>>
    where
        M: PinMux,
        C: DynamicMemoryController,
    {
        initialize_sdram(scu, emc, profile)?;
        Ok(ExternalMemory {
            base_address: profile.base_address,
            size: profile.size,
            _state: PhantomData,
        })
    }
}

impl Default for ExternalMemory<Uninitialized> {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalMemory<Initialized> {
    /// First byte of the window.
    pub const fn base_address(&self) -> u32 {
        self.base_address
    }

    /// Window size in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// `true` if `address` lies inside the window.
    #[allow(clippy::cast_possible_truncation)] // SDRAM windows are < 4 GiB
    pub const fn contains(&self, address: u32) -> bool {
        address >= self.base_address
            && address.wrapping_sub(self.base_address) < self.size as u32
    }

    /// Start of the window as a word pointer.
    pub fn as_mut_ptr(&self) -> *mut u32 {
        self.base_address as usize as *mut u32
    }
}
