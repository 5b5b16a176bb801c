//! Memory-mapped register access
//!
//! Peripheral backends are written against [`RegisterBus`] instead of raw
//! pointers so the register sequence they produce can be replayed on the host
//! (see `mocks::MockRegisterBus`). On the target, [`VolatileBus`] performs the
//! actual volatile loads and stores.

/// 32-bit memory-mapped register access.
pub trait RegisterBus {
    /// Store `value` at `address`.
    fn write(&mut self, address: u32, value: u32);

    /// Load the word at `address`.
    fn read(&mut self, address: u32) -> u32;

    /// Read-modify-write: set the bits in `mask`.
    fn set_bits(&mut self, address: u32, mask: u32) {
        let value = self.read(address);
        self.write(address, value | mask);
    }
}

/// Several backends sharing one bus, e.g. one register image in host tests.
impl<B: RegisterBus> RegisterBus for &core::cell::RefCell<B> {
    fn write(&mut self, address: u32, value: u32) {
        self.borrow_mut().write(address, value);
    }

    fn read(&mut self, address: u32) -> u32 {
        self.borrow_mut().read(address)
    }
}

/// Direct volatile access to the physical address space.
pub struct VolatileBus {
    _private: (),
}

impl VolatileBus {
    /// Create a bus that dereferences register addresses directly.
    ///
    /// # Safety
    ///
    /// Every address later passed to [`RegisterBus::read`] or
    /// [`RegisterBus::write`] must be a valid, word-aligned peripheral
    /// register or memory location, and the caller must have exclusive access
    /// to the peripherals being touched (boot stage, no other context running).
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for VolatileBus {
    fn write(&mut self, address: u32, value: u32) {
        // SAFETY: validity and exclusivity of `address` are the contract of
        // `VolatileBus::new`.
        unsafe { core::ptr::write_volatile(address as usize as *mut u32, value) }
    }

    fn read(&mut self, address: u32) -> u32 {
        // SAFETY: see `write`.
        unsafe { core::ptr::read_volatile(address as usize as *const u32) }
    }
}
