#![allow(clippy::expect_used)] // build scripts fail loudly

fn main() {
    // Linker script only matters for the LPC4337 target
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs;
        use std::path::PathBuf;

        // cortex-m-rt's link.x INCLUDEs memory.x from the search path.
        let out = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
        fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))
            .expect("write memory.x to OUT_DIR");

        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
