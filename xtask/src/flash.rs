use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const TARGET: &str = "thumbv7em-none-eabihf";
const CHIP: &str = "LPC4337";

fn binary_path(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/firmware")
}

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({mode} mode)...").cyan().bold()
    );
    println!();

    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd
        .args(["build", "-p", "firmware", "--target", TARGET])
        .args(["--features", "hardware"]);
    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;
    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Build successful in {:.2}s",
            build_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    show_binary_size(release);
    println!();

    println!("{}", format!("📡 Flashing to {CHIP}...").cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .args(["download", "--chip", CHIP, "--probe-index", "0"])
        .arg(binary_path(release))
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the board is powered");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP} {}' to view RTT logs", binary_path(release))
            .dimmed()
    );
    println!();

    Ok(())
}

/// Section sizes via `rust-size`; silently skipped when the tool is missing.
fn show_binary_size(release: bool) {
    let output = Command::new("rust-size")
        .arg(binary_path(release))
        .arg("-A")
        .output();

    if let Ok(out) = output {
        if out.status.success() {
            println!("{}", "📊 Binary size:".cyan());
            for line in String::from_utf8_lossy(&out.stdout).lines() {
                println!("   {}", line.dimmed());
            }
        }
    }
}
