// Host tooling crate: unwrap/expect/panic acceptable outside the firmware.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
#![allow(missing_docs)]

mod check;
mod emc_dump;
mod flash;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "EDU-CIAA firmware development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to the EDU-CIAA (LPC4337) via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Check the hardware build, the no_std platform crate, clippy and fmt
    Check,
    /// Run all tests (unit, integration, doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Print the SDRAM pin table and the EMC register image of a simulated bring-up
    EmcDump {
        /// Also print every register write in order
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::EmcDump { trace } => emc_dump::run(trace),
    }
}
