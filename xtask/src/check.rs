use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// How a failed step is treated.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    Abort,
    Warn,
}

struct Step {
    label: &'static str,
    args: &'static [&'static str],
    on_failure: OnFailure,
}

const STEPS: &[Step] = &[
    Step {
        label: "hardware target (LPC4337)",
        args: &[
            "check",
            "-p",
            "firmware",
            "--target",
            "thumbv7em-none-eabihf",
            "--features",
            "hardware",
        ],
        on_failure: OnFailure::Abort,
    },
    Step {
        label: "platform crate (no_std)",
        args: &[
            "check",
            "-p",
            "platform",
            "--target",
            "thumbv7em-none-eabihf",
            "--no-default-features",
        ],
        on_failure: OnFailure::Abort,
    },
    Step {
        label: "host tests (compile only)",
        args: &["test", "--workspace", "--no-run"],
        on_failure: OnFailure::Abort,
    },
    Step {
        label: "clippy lints",
        args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        on_failure: OnFailure::Warn,
    },
    Step {
        label: "code formatting",
        args: &["fmt", "--all", "--check"],
        on_failure: OnFailure::Warn,
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking firmware builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for step in STEPS {
        run_step(step)?;
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn run_step(step: &Step) -> Result<()> {
    println!("{}", format!("  Checking {}...", step.label).cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(step.args)
        .output()
        .with_context(|| format!("Failed to run cargo for {}", step.label))?;

    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ {} passed in {:.2}s",
                step.label,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
        return Ok(());
    }

    match step.on_failure {
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {} failed", step.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed", step.label);
        }
        OnFailure::Warn => {
            eprintln!("{}", format!("  ⚠ {} reported issues", step.label).yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            println!();
            Ok(())
        }
    }
}
