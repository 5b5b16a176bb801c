//! Memory safety architecture tests.
// Architecture test file: expect/unwrap lints are intentional.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects
)]
//! Source-level checks on where raw memory access may live, and on the
//! linker layout. The SDRAM window must never be a linker region: nothing
//! can be placed there until the EMC is running.
//!
//! Run with: cargo test -p firmware --test memory_safety

/// Files allowed to contain `unsafe` blocks or `unsafe fn`.
const UNSAFE_ALLOWED: &[&str] = &["boot.rs", "main.rs"];

const FIRMWARE_SOURCES: &[(&str, &str)] = &[
    ("arch.rs", include_str!("../src/arch.rs")),
    ("board.rs", include_str!("../src/board.rs")),
    ("boot.rs", include_str!("../src/boot.rs")),
    ("lib.rs", include_str!("../src/lib.rs")),
    ("main.rs", include_str!("../src/main.rs")),
    ("sdram.rs", include_str!("../src/sdram.rs")),
    ("lpc43xx/mod.rs", include_str!("../src/lpc43xx/mod.rs")),
    ("lpc43xx/scu.rs", include_str!("../src/lpc43xx/scu.rs")),
    ("lpc43xx/emc.rs", include_str!("../src/lpc43xx/emc.rs")),
    ("lpc43xx/delay.rs", include_str!("../src/lpc43xx/delay.rs")),
];

fn has_unsafe_code(source: &str) -> bool {
    source
        .lines()
        .map(str::trim_start)
        .filter(|l| !l.starts_with("//"))
        .any(|l| l.contains("unsafe {") || l.contains("unsafe fn"))
}

/// Register backends go through `RegisterBus`; only the boot path builds
/// a `VolatileBus` or touches the SDRAM window directly.
#[test]
fn unsafe_confined_to_boot_path() {
    for (name, source) in FIRMWARE_SOURCES {
        if UNSAFE_ALLOWED.contains(name) {
            continue;
        }
        assert!(
            !has_unsafe_code(source),
            "{name} contains unsafe code; route register access through RegisterBus"
        );
    }
}

/// Every unsafe block in the boot path carries a SAFETY comment.
#[test]
fn unsafe_blocks_have_safety_comments() {
    for (name, source) in FIRMWARE_SOURCES {
        let lines: Vec<&str> = source.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if !line.contains("unsafe {") || line.trim_start().starts_with("//") {
                continue;
            }
            let window = &lines[i.saturating_sub(4)..i];
            assert!(
                window.iter().any(|l| l.contains("SAFETY:")),
                "{name}:{} unsafe block without a SAFETY comment",
                i + 1
            );
        }
    }
}

/// The volatile backend is the only place that dereferences register addresses.
#[test]
fn volatile_access_only_in_mmio() {
    let mmio = include_str!("../../platform/src/mmio.rs");
    assert!(mmio.contains("write_volatile") && mmio.contains("read_volatile"));

    for (name, source) in FIRMWARE_SOURCES {
        assert!(
            !source.contains("write_volatile") && !source.contains("read_volatile"),
            "{name} performs volatile access outside platform::mmio"
        );
    }
}

/// memory.x describes flash and local SRAM only.
#[test]
fn sdram_window_is_not_a_linker_region() {
    let memory_x = include_str!("../../../memory.x");
    let regions: Vec<&str> = memory_x
        .lines()
        .map(str::trim)
        .filter(|l| l.contains("ORIGIN"))
        .collect();

    assert_eq!(regions.len(), 2, "expected FLASH and RAM only: {regions:?}");
    assert!(regions.iter().any(|r| r.starts_with("FLASH") && r.contains("0x1A000000")));
    assert!(regions.iter().any(|r| r.starts_with("RAM") && r.contains("0x10000000")));
    assert!(
        !regions.iter().any(|r| r.contains("0x28000000")),
        "SDRAM must not be a linker region; it is unusable before EMC init"
    );
}

/// The platform HAL never reaches back into the board crate.
#[test]
fn platform_does_not_depend_on_firmware() {
    let manifest = include_str!("../../platform/Cargo.toml");
    assert!(
        !manifest.contains("firmware"),
        "platform must stay below firmware in the dependency graph"
    );
}

/// No heap in the bring-up path.
#[test]
fn no_allocator_in_firmware() {
    let manifest = include_str!("../Cargo.toml");
    for banned in ["embedded-alloc", "alloc-cortex-m", "linked_list_allocator"] {
        assert!(!manifest.contains(banned), "firmware must not pull {banned}");
    }
    for (name, source) in FIRMWARE_SOURCES {
        assert!(
            !source.contains("extern crate alloc"),
            "{name} links alloc"
        );
    }
}

/// Every platform feature is read by some `cfg` in the platform sources.
#[test]
fn platform_features_are_all_used() {
    let manifest = include_str!("../../platform/Cargo.toml");
    let sources = [
        include_str!("../../platform/src/lib.rs"),
        include_str!("../../platform/src/emc.rs"),
        include_str!("../../platform/src/iodriver.rs"),
        include_str!("../../platform/src/mmio.rs"),
        include_str!("../../platform/src/scu.rs"),
        include_str!("../../platform/src/mocks/mod.rs"),
    ];

    let features = manifest
        .split_once("[features]")
        .map(|(_, rest)| rest.split("\n[").next().unwrap_or_default())
        .unwrap();
    for line in features.lines().map(str::trim) {
        let Some((name, _)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.starts_with('#') || name == "default" {
            continue;
        }
        let needle = format!("feature = \"{name}\"");
        assert!(
            sources.iter().any(|s| s.contains(&needle)),
            "platform feature `{name}` is not read by any cfg"
        );
    }
}

/// Features the board crate forwards to platform exist there.
#[test]
fn forwarded_platform_features_exist() {
    let firmware = include_str!("../Cargo.toml");
    let platform = include_str!("../../platform/Cargo.toml");
    for forwarded in firmware.split('"').filter_map(|s| s.strip_prefix("platform/")) {
        let declared = platform.contains(&format!("\n{forwarded} "))
            || platform.contains(&format!("\n{forwarded}="));
        assert!(
            declared,
            "firmware forwards missing feature platform/{forwarded}"
        );
    }
}
