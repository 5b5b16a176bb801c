//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits for use
//! in unit and integration tests. The mocks keep a register image and a call
//! journal so tests can check both the final state and the order of writes.

#![cfg(any(test, feature = "std"))]
#![allow(clippy::arithmetic_side_effects)] // counters in test doubles
#![allow(clippy::expect_used)] // an overflowing mock log must fail the test

use crate::emc::{DynamicConfig, DynamicMemoryController};
use crate::iodriver::{IoDriver, IoError, IoMode, IoResult};
use crate::mmio::RegisterBus;
use crate::scu::{PinMode, PinMux};

/// Register bus backed by a sparse in-memory image.
///
/// Unwritten addresses read as 0 unless preloaded.
pub struct MockRegisterBus {
    memory: heapless::Vec<(u32, u32), 128>,
    writes: heapless::Vec<(u32, u32), 256>,
    reads: heapless::Vec<u32, 32>,
}

impl MockRegisterBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            memory: heapless::Vec::new(),
            writes: heapless::Vec::new(),
            reads: heapless::Vec::new(),
        }
    }

    /// Seed `address` with `value` without logging a write.
    pub fn preload(&mut self, address: u32, value: u32) {
        self.store(address, value);
    }

    /// Current value at `address`, if it was ever written or preloaded.
    pub fn value(&self, address: u32) -> Option<u32> {
        self.memory
            .iter()
            .find(|(a, _)| *a == address)
            .map(|(_, v)| *v)
    }

    /// Every write, in order.
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    /// Every read address, in order.
    pub fn reads(&self) -> &[u32] {
        &self.reads
    }

    /// Values written to `address`, in order.
    pub fn writes_to(&self, address: u32) -> impl Iterator<Item = u32> + '_ {
        self.writes
            .iter()
            .filter(move |(a, _)| *a == address)
            .map(|(_, v)| *v)
    }

    /// Forget the journals, keep the image.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }

    fn store(&mut self, address: u32, value: u32) {
        if let Some(slot) = self.memory.iter_mut().find(|(a, _)| *a == address) {
            slot.1 = value;
        } else {
            self.memory.push((address, value))
                .expect("mock capacity exceeded");
        }
    }
}

impl Default for MockRegisterBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for MockRegisterBus {
    fn write(&mut self, address: u32, value: u32) {
        self.store(address, value);
        self.writes.push((address, value))
            .expect("mock capacity exceeded");
    }

    fn read(&mut self, address: u32) -> u32 {
        self.reads.push(address)
            .expect("mock capacity exceeded");
        self.value(address).unwrap_or(0)
    }
}

/// Delay that only accumulates the requested time.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
    calls: usize,
}

impl MockDelay {
    /// Create a zeroed delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all requested delays.
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }

    /// Number of delay calls.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// One call observed by [`MockBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// `PinMux::set_pin_mux`
    PinMux {
        /// Port
        port: u8,
        /// Pin
        pin: u8,
        /// Mode
        mode: PinMode,
    },
    /// `DynamicMemoryController::init_dynamic`
    InitDynamic,
    /// `DynamicMemoryController::enable_dynamic`
    EnableDynamic(bool),
}

/// Failure injected by [`MockBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Pin write rejected.
    Pin {
        /// Port
        port: u8,
        /// Pin
        pin: u8,
    },
    /// Controller call rejected.
    Controller,
}

/// Pin mux and memory controller sharing one journal.
///
/// Used to check ordering across the two seams (pins before controller).
pub struct MockBoard {
    journal: heapless::Vec<BoardEvent, 128>,
    pins: heapless::Vec<(u8, u8, PinMode), 64>,
    config: Option<DynamicConfig>,
    enabled: bool,
    fail_pin: Option<(u8, u8)>,
    fail_controller: bool,
}

impl MockBoard {
    /// Healthy board with nothing configured.
    pub fn new() -> Self {
        Self {
            journal: heapless::Vec::new(),
            pins: heapless::Vec::new(),
            config: None,
            enabled: false,
            fail_pin: None,
            fail_controller: false,
        }
    }

    /// Make writes to `port`/`pin` fail.
    pub fn fail_pin(mut self, port: u8, pin: u8) -> Self {
        self.fail_pin = Some((port, pin));
        self
    }

    /// Make every controller call fail.
    pub fn fail_controller(mut self) -> Self {
        self.fail_controller = true;
        self
    }

    /// Calls in order.
    pub fn journal(&self) -> &[BoardEvent] {
        &self.journal
    }

    /// Programmed mode of `port`/`pin`.
    pub fn pin_mode(&self, port: u8, pin: u8) -> Option<PinMode> {
        self.pins
            .iter()
            .find(|(p, n, _)| *p == port && *n == pin)
            .map(|(_, _, m)| *m)
    }

    /// Every programmed pin.
    pub fn pins(&self) -> &[(u8, u8, PinMode)] {
        &self.pins
    }

    /// Configuration passed to `init_dynamic`.
    pub fn dynamic_config(&self) -> Option<&DynamicConfig> {
        self.config.as_ref()
    }

    /// `true` once `enable_dynamic(true)` succeeded.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PinMux for MockBoard {
    type Error = MockError;

    fn set_pin_mux(&mut self, port: u8, pin: u8, mode: PinMode) -> Result<(), Self::Error> {
        self.journal.push(BoardEvent::PinMux { port, pin, mode })
            .expect("mock capacity exceeded");
        if self.fail_pin == Some((port, pin)) {
            return Err(MockError::Pin { port, pin });
        }
        if let Some(slot) = self
            .pins
            .iter_mut()
            .find(|(p, n, _)| *p == port && *n == pin)
        {
            slot.2 = mode;
        } else {
            self.pins.push((port, pin, mode))
                .expect("mock capacity exceeded");
        }
        Ok(())
    }
}

impl DynamicMemoryController for MockBoard {
    type Error = MockError;

    fn init_dynamic(&mut self, config: &DynamicConfig) -> Result<(), Self::Error> {
        self.journal.push(BoardEvent::InitDynamic)
            .expect("mock capacity exceeded");
        if self.fail_controller {
            return Err(MockError::Controller);
        }
        self.config = Some(*config);
        Ok(())
    }

    fn enable_dynamic(&mut self, enable: bool) -> Result<(), Self::Error> {
        self.journal.push(BoardEvent::EnableDynamic(enable))
            .expect("mock capacity exceeded");
        if self.fail_controller {
            return Err(MockError::Controller);
        }
        self.enabled = enable;
        Ok(())
    }
}

/// I/O driver that replays a fixed answer and counts calls.
pub struct MockIoDriver {
    answer: IoResult,
    initialized: heapless::Vec<usize, 8>,
    ioctls: heapless::Vec<(IoMode, usize), 16>,
}

impl MockIoDriver {
    /// Driver answering every call with `answer`.
    pub fn new(answer: IoResult) -> Self {
        Self {
            answer,
            initialized: heapless::Vec::new(),
            ioctls: heapless::Vec::new(),
        }
    }

    /// Driver that rejects every call as busy.
    pub fn busy() -> Self {
        Self::new(Err(IoError::Busy))
    }

    /// Addresses currently initialized.
    pub fn initialized(&self) -> &[usize] {
        &self.initialized
    }

    /// Control requests received.
    pub fn ioctls(&self) -> &[(IoMode, usize)] {
        &self.ioctls
    }
}

impl IoDriver for MockIoDriver {
    fn init_sync(&mut self, address: usize) -> IoResult {
        self.answer?;
        if !self.initialized.contains(&address) {
            self.initialized.push(address)
                .expect("mock capacity exceeded");
        }
        Ok(())
    }

    fn deinit_sync(&mut self, address: usize) -> IoResult {
        self.answer?;
        self.initialized.retain(|a| *a != address);
        Ok(())
    }

    fn ioctl_sync(&mut self, mode: IoMode, address: usize) -> IoResult {
        self.ioctls.push((mode, address))
            .expect("mock capacity exceeded");
        self.answer
    }
}
