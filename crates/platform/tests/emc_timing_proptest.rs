//! Property-based tests for EMC timing and pin encodings.
//! Verifies invariants hold for ALL valid inputs, not just the board values.

#![allow(clippy::arithmetic_side_effects)]

use platform::emc::{ns_to_cycles, Timing};
use platform::scu::{PadConfig, PinFunction, PinMode};

const FUNCTIONS: [PinFunction; 8] = [
    PinFunction::Func0,
    PinFunction::Func1,
    PinFunction::Func2,
    PinFunction::Func3,
    PinFunction::Func4,
    PinFunction::Func5,
    PinFunction::Func6,
    PinFunction::Func7,
];

proptest::proptest! {
    /// Converted cycles always cover the requested time.
    #[test]
    fn ns_to_cycles_never_shortens(ns in 0u32..1_000_000, hz in 1_000_000u32..=204_000_000) {
        let cycles = u64::from(ns_to_cycles(ns, hz));
        assert!(cycles * 1_000_000_000 >= u64::from(ns) * u64::from(hz));
    }

    /// ...and by less than one extra cycle (except the 1-cycle floor).
    #[test]
    fn ns_to_cycles_is_tight(ns in 1u32..1_000_000, hz in 1_000_000u32..=204_000_000) {
        let cycles = u64::from(ns_to_cycles(ns, hz));
        assert!((cycles - 1) * 1_000_000_000 < u64::from(ns) * u64::from(hz));
    }

    /// Slower clocks never need more cycles.
    #[test]
    fn ns_to_cycles_monotone_in_clock(ns in 0u32..100_000, a in 1_000_000u32..=204_000_000, b in 1_000_000u32..=204_000_000) {
        let (slow, fast) = if a <= b { (a, b) } else { (b, a) };
        assert!(ns_to_cycles(ns, slow) <= ns_to_cycles(ns, fast));
    }

    /// Raw cycle counts are passed to the register as given.
    #[test]
    fn cycles_ignore_clock(cycles in 0u32..=u32::MAX, hz in 1u32..=u32::MAX) {
        assert_eq!(Timing::Cycles(cycles).to_cycles(hz), cycles);
    }

    /// A nanosecond timing programs the same register as its cycle count
    /// written in register form.
    #[test]
    fn nanoseconds_match_register_form(ns in 0u32..1_000_000, hz in 1_000_000u32..=204_000_000, minus_one in proptest::bool::ANY) {
        let cycles = ns_to_cycles(ns, hz);
        let register = if minus_one { cycles - 1 } else { cycles };
        assert_eq!(Timing::Nanoseconds(ns).to_register(hz, minus_one), register);
        assert_eq!(Timing::Cycles(register).to_register(hz, minus_one), register);
    }

    /// Fast-I/O encoding keeps the function in MODE and the pad bits above it.
    #[test]
    fn fast_io_bits_split_cleanly(f in 0usize..8) {
        let function = FUNCTIONS[f];
        let bits = PinMode::fast_io(function).bits();
        assert_eq!(bits & 0x7, function.bits());
        assert_eq!(bits & !0x7, PadConfig::FAST_IO.bits());
    }
}
