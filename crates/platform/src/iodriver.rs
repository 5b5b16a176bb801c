//! Digital I/O driver contract
//!
//! Entry points and error codes shared by every synchronous I/O driver on the
//! board. This module only declares the interface; drivers implement
//! [`IoDriver`] in their own crates.
//!
//! # Error code ranges
//!
//! | Codes     | Owner                         |
//! |-----------|-------------------------------|
//! | 0-15      | I/O framework                 |
//! | 16-63     | I/O drivers                   |
//! | 64-127    | Implementation specific       |
//! | 128-255   | Reserved for future use       |
//!
//! Code 0 means success and is represented as `Ok(())`.

use thiserror_no_std::Error;

/// Success return code.
pub const IO_E_OK: u8 = 0;

/// Failure of a synchronous I/O entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IoError {
    /// The device is busy with another request.
    #[error("device busy")]
    Busy = 1,
    /// The requested mode is not supported.
    #[error("unknown mode")]
    UnknownMode = 2,
    /// The function is currently suspended.
    #[error("function suspended")]
    FunctionSuspended = 16,
    /// A parameter was ignored.
    #[error("parameter ignored")]
    ParamIgnored = 17,
    /// Channel id out of range.
    #[error("invalid channel id")]
    InvalidChannelId = 18,
    /// Value out of range.
    #[error("invalid value")]
    InvalidValue = 19,
    /// Size out of range.
    #[error("invalid size")]
    InvalidSize = 20,
    /// Position out of range.
    #[error("invalid position")]
    InvalidPosition = 21,
    /// Unsupported notification type.
    #[error("invalid notification type")]
    InvalidNotificationType = 22,
}

/// A numeric code that does not name any [`IoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("unknown I/O error code {0}")]
pub struct UnknownIoCode(pub u8);

impl IoError {
    /// Every defined error, in code order.
    pub const ALL: [Self; 9] = [
        Self::Busy,
        Self::UnknownMode,
        Self::FunctionSuspended,
        Self::ParamIgnored,
        Self::InvalidChannelId,
        Self::InvalidValue,
        Self::InvalidSize,
        Self::InvalidPosition,
        Self::InvalidNotificationType,
    ];

    /// Numeric code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Range the code belongs to.
    pub const fn range(self) -> IoCodeRange {
        IoCodeRange::of(self.code())
    }
}

impl TryFrom<u8> for IoError {
    type Error = UnknownIoCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.code() == code)
            .ok_or(UnknownIoCode(code))
    }
}

impl From<IoError> for u8 {
    fn from(error: IoError) -> Self {
        error.code()
    }
}

/// Result of a synchronous I/O entry point.
pub type IoResult = Result<(), IoError>;

/// Numeric return code of `result` (`IO_E_OK` on success).
pub fn result_code(result: IoResult) -> u8 {
    match result {
        Ok(()) => IO_E_OK,
        Err(e) => e.code(),
    }
}

/// Decode a numeric return code.
pub fn result_from_code(code: u8) -> Result<IoResult, UnknownIoCode> {
    if code == IO_E_OK {
        return Ok(Ok(()));
    }
    IoError::try_from(code).map(Err)
}

/// Ownership of a numeric error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoCodeRange {
    /// 0-15: I/O framework.
    Framework,
    /// 16-63: I/O drivers.
    Driver,
    /// 64-127: implementation specific.
    Implementation,
    /// 128 and above: reserved.
    Reserved,
}

impl IoCodeRange {
    /// Classify `code`.
    pub const fn of(code: u8) -> Self {
        match code {
            0..=15 => Self::Framework,
            16..=63 => Self::Driver,
            64..=127 => Self::Implementation,
            _ => Self::Reserved,
        }
    }
}

/// Driver-specific request selector passed to [`IoDriver::ioctl_sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoMode(pub u32);

/// Driver version as `major.minor.micro.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverVersion {
    /// Major
    pub major: u8,
    /// Minor
    pub minor: u8,
    /// Micro
    pub micro: u8,
    /// Patch
    pub patch: u8,
}

impl DriverVersion {
    /// Build a version.
    pub const fn new(major: u8, minor: u8, micro: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            micro,
            patch,
        }
    }
}

/// Version of the digital I/O driver interface.
pub const DIO_DRIVER_VERSION: DriverVersion = DriverVersion::new(0, 0, 1, 0);

/// Port value width.
#[cfg(feature = "io-port-8")]
pub type IoValue = u8;
/// Port value width.
#[cfg(all(feature = "io-port-16", not(feature = "io-port-8")))]
pub type IoValue = u16;
/// Port value width.
#[cfg(not(any(feature = "io-port-8", feature = "io-port-16")))]
pub type IoValue = u32;

/// Synchronous I/O driver entry points.
///
/// `address` identifies the device instance the call applies to.
pub trait IoDriver {
    /// Interface version implemented by the driver.
    const VERSION: DriverVersion = DIO_DRIVER_VERSION;

    /// Initialize the device at `address`.
    fn init_sync(&mut self, address: usize) -> IoResult;

    /// Release the device at `address`.
    fn deinit_sync(&mut self, address: usize) -> IoResult;

    /// Driver-specific control request.
    fn ioctl_sync(&mut self, mode: IoMode, address: usize) -> IoResult;
}
