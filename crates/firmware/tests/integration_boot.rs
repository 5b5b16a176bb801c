//! SDRAM bring-up integration tests
//!
//! Runs the full board sequence against the real LPC43xx backends over one
//! shared mock register bus, so the checks see the same register traffic the
//! chip would: every SFS register, every EMC register, in order.
//!
//! Run with: cargo test -p firmware --test integration_boot

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use core::cell::RefCell;

use firmware::arch::{initialize_arch, initialize_sdram, initialize_sdram_pins, ArchError};
use firmware::lpc43xx::emc::{command, reg};
use firmware::lpc43xx::{Emc, EmcError, Scu, ScuError, EMC_BASE, SCU_BASE};
use firmware::sdram::{SdramProfile, EDU_CIAA_SDRAM, IS42S16800_CONFIG, SDRAM_PINS};
use firmware::{board, ExternalMemory};
use platform::emc::Timing;
use platform::mocks::{BoardEvent, MockBoard, MockDelay, MockError, MockRegisterBus};
use platform::scu::{PinAssignment, PinFunction};

fn sfs(port: u8, pin: u8) -> u32 {
    SCU_BASE + u32::from(port) * 0x80 + u32::from(pin) * 4
}

fn emc(offset: u32) -> u32 {
    EMC_BASE + offset
}

fn is_emc(address: u32) -> bool {
    (EMC_BASE..EMC_BASE + 0x1000).contains(&address)
}

fn is_scu(address: u32) -> bool {
    (SCU_BASE..SCU_BASE + 0x1000).contains(&address)
}

// ─── Full bring-up on register backends ──────────────────────────────────────

/// Every pin in the board table ends up with its fast-I/O encoding.
#[test]
fn test_all_41_pins_programmed() {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    initialize_arch(&mut scu, &mut emc_backend).unwrap();

    let bus = bus.borrow();
    for p in &SDRAM_PINS {
        assert_eq!(
            bus.value(sfs(p.port, p.pin)),
            Some(0xF0 | p.mode.function.bits()),
            "{} (P{:X}_{}) not programmed",
            p.signal,
            p.port,
            p.pin
        );
    }
    let scu_writes = bus.writes().iter().filter(|(a, _)| is_scu(*a)).count();
    assert_eq!(scu_writes, 41, "one SFS write per pin");
}

/// The EMC sees nothing until the last SFS register has been written.
#[test]
fn test_pins_complete_before_controller() {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    initialize_arch(&mut scu, &mut emc_backend).unwrap();

    let bus = bus.borrow();
    let last_pin = bus.writes().iter().rposition(|(a, _)| is_scu(*a)).unwrap();
    let first_emc = bus.writes().iter().position(|(a, _)| is_emc(*a)).unwrap();
    assert!(
        last_pin < first_emc,
        "SCU write #{last_pin} after EMC write #{first_emc}"
    );
}

/// Final EMC register image after a successful bring-up.
#[test]
fn test_emc_register_image() {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    initialize_arch(&mut scu, &mut emc_backend).unwrap();

    let bus = bus.borrow();
    let expect = [
        (reg::DYNAMIC_READ_CONFIG, 1),
        (reg::DYNAMIC_RP, 1),
        (reg::DYNAMIC_RAS, 4),
        (reg::DYNAMIC_SREX, 7),
        (reg::DYNAMIC_APR, 1),
        (reg::DYNAMIC_DAL, 4),
        (reg::DYNAMIC_WR, 1),
        (reg::DYNAMIC_RC, 6),
        (reg::DYNAMIC_RFC, 6),
        (reg::DYNAMIC_XSR, 7),
        (reg::DYNAMIC_RRD, 1),
        (reg::DYNAMIC_MRD, 1),
        (reg::DYNAMIC_REFRESH, 99),
        (reg::DYNAMIC_CONFIG[0], 0x0008_1480),
        (reg::DYNAMIC_RASCAS[0], 0x0000_0202),
        // NORMAL, then CE | CS from enable_dynamic
        (reg::DYNAMIC_CONTROL, command::ENABLE),
    ];
    for (offset, value) in expect {
        assert_eq!(
            bus.value(emc(offset)),
            Some(value),
            "EMC register +{offset:#05x}"
        );
    }
    // DYCS1-3 are written, and written as disabled
    for cs in 1..4 {
        assert_eq!(bus.value(emc(reg::DYNAMIC_CONFIG[cs])), Some(0), "DYCS{cs} config");
        assert_eq!(bus.value(emc(reg::DYNAMIC_RASCAS[cs])), Some(0), "DYCS{cs} RAS/CAS");
    }
}

/// DYNAMICCONTROL goes NOP, PALL, MODE, NORMAL, then enable.
#[test]
fn test_dynamic_control_sequence() {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    initialize_arch(&mut scu, &mut emc_backend).unwrap();

    let control: Vec<u32> = bus
        .borrow()
        .writes_to(emc(reg::DYNAMIC_CONTROL))
        .collect();
    assert_eq!(
        control,
        [
            command::NOP,
            command::PALL,
            command::MODE,
            command::NORMAL,
            command::ENABLE
        ]
    );
}

/// Running the pin configuration twice leaves the same SCU image.
#[test]
fn test_pin_mux_idempotent() {
    let mut scu = Scu::new(MockRegisterBus::new());
    initialize_sdram_pins(&mut scu, &SDRAM_PINS).unwrap();
    let first: Vec<Option<u32>> = SDRAM_PINS
        .iter()
        .map(|p| scu.bus().value(sfs(p.port, p.pin)))
        .collect();

    initialize_sdram_pins(&mut scu, &SDRAM_PINS).unwrap();
    let second: Vec<Option<u32>> = SDRAM_PINS
        .iter()
        .map(|p| scu.bus().value(sfs(p.port, p.pin)))
        .collect();

    assert_eq!(first, second);
    assert_eq!(scu.bus().writes().len(), 82);
}

/// Typestate handle comes back with the DYCS0 window.
#[test]
fn test_external_memory_handle() {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    let sdram = ExternalMemory::new()
        .initialize(&mut scu, &mut emc_backend)
        .unwrap();

    assert_eq!(sdram.base_address(), 0x2800_0000);
    assert_eq!(sdram.size(), 16 * 1024 * 1024);
    // the MODE load read went through the window
    assert!(bus.borrow().reads().iter().any(|a| sdram.contains(*a)));
}

// ─── Failure propagation ─────────────────────────────────────────────────────

/// A bad pin stops the sequence before the controller is touched.
#[test]
fn test_bad_pin_stops_before_controller() {
    let pins = [
        SDRAM_PINS[0],
        PinAssignment::fast_io(0x10, 0, PinFunction::Func3, "BOGUS"),
        SDRAM_PINS[1],
    ];
    let profile = SdramProfile {
        pins: &pins,
        ..EDU_CIAA_SDRAM
    };
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    let err = initialize_sdram(&mut scu, &mut emc_backend, &profile).unwrap_err();

    match err {
        ArchError::PinMux(e) => {
            assert_eq!(e.signal, "BOGUS");
            assert_eq!(e.cause, ScuError::InvalidPin { port: 0x10, pin: 0 });
        }
        ArchError::Controller(e) => panic!("unexpected controller error {e:?}"),
    }
    let bus = bus.borrow();
    assert_eq!(bus.writes().len(), 1, "only the pin before the bad one");
    assert!(!bus.writes().iter().any(|(a, _)| is_emc(*a)));
}

/// A timing that does not fit its field is reported as a controller error.
#[test]
fn test_timing_overflow_is_controller_error() {
    let mut config = IS42S16800_CONFIG;
    config.t_rc = Timing::Cycles(32);
    let profile = SdramProfile {
        dynamic: &config,
        ..EDU_CIAA_SDRAM
    };
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc_backend = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    let err = initialize_sdram(&mut scu, &mut emc_backend, &profile).unwrap_err();

    assert_eq!(
        err,
        ArchError::Controller(EmcError::FieldOverflow {
            register: "DYNAMICRC",
            value: 32
        })
    );
    // pins were done, the EMC was not written
    let bus = bus.borrow();
    assert_eq!(bus.writes().len(), 41);
}

// ─── Seam-level ordering with the recording board ────────────────────────────

/// Pin failure: the controller seam is never called.
#[test]
fn test_pin_failure_leaves_controller_idle() {
    let mut scu = MockBoard::new().fail_pin(0x18, 2);
    let mut emc_seam = MockBoard::new();

    let err = initialize_arch(&mut scu, &mut emc_seam).unwrap_err();

    assert!(matches!(
        err,
        ArchError::PinMux(e) if e.signal == "CLK2" && e.cause == (MockError::Pin { port: 0x18, pin: 2 })
    ));
    assert!(emc_seam.journal().is_empty());
    // pins after CLK2 were not attempted
    let attempted = scu.journal().len();
    let clk2 = SDRAM_PINS.iter().position(|p| p.signal == "CLK2").unwrap();
    assert_eq!(attempted, clk2 + 1);
}

/// Healthy seams: success, and the controller gets the board record once.
#[test]
fn test_healthy_seams_succeed() {
    let mut scu = MockBoard::new();
    let mut emc_seam = MockBoard::new();

    assert_eq!(initialize_arch(&mut scu, &mut emc_seam), Ok(()));

    assert_eq!(scu.pins().len(), 41);
    assert_eq!(
        emc_seam.journal(),
        &[BoardEvent::InitDynamic, BoardEvent::EnableDynamic(true)]
    );
    assert_eq!(emc_seam.dynamic_config(), Some(&IS42S16800_CONFIG));
}
