use anyhow::{Context, Result};
use colored::Colorize;
use std::cell::RefCell;

use firmware::arch::initialize_arch;
use firmware::board;
use firmware::lpc43xx::emc::{reg, RegisterPlan, TIMING_FIELDS};
use firmware::lpc43xx::scu::sfs_address;
use firmware::lpc43xx::{Emc, Scu, EMC_BASE};
use firmware::sdram::{EDU_CIAA_SDRAM, SDRAM_PINS};
use platform::mocks::{MockDelay, MockRegisterBus};

pub fn run(trace: bool) -> Result<()> {
    println!();
    println!("{}", "🧩 EDU-CIAA SDRAM bring-up (simulated)".cyan().bold());
    println!(
        "   {}",
        format!(
            "EMC clock {} MHz, DYCS0 at {:#010x}, {} MiB",
            board::EMC_CLK_HZ / 1_000_000,
            EDU_CIAA_SDRAM.base_address,
            EDU_CIAA_SDRAM.size >> 20
        )
        .dimmed()
    );
    println!();

    print_pins()?;
    print_plan()?;
    simulate(trace)?;

    Ok(())
}

fn print_pins() -> Result<()> {
    println!("{}", format!("  SCU pins ({})", SDRAM_PINS.len()).cyan());
    for p in &SDRAM_PINS {
        let address = sfs_address(p.port, p.pin)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("pin table entry {}", p.signal))?;
        println!(
            "    {:<7} P{:X}_{:<2}  FUNC{}  SFS {:#010x} = {:#04x}",
            p.signal,
            p.port,
            p.pin,
            p.mode.function.bits(),
            address,
            p.mode.bits()
        );
    }
    println!();
    Ok(())
}

fn print_plan() -> Result<()> {
    let plan = RegisterPlan::new(EDU_CIAA_SDRAM.dynamic, EDU_CIAA_SDRAM.emc_clk_hz)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("board timing record does not fit the EMC registers")?;

    println!("{}", "  EMC register plan".cyan());
    println!("    {:<18} {}", "DYNAMICREADCONFIG", plan.read_config);
    for (register, value) in TIMING_FIELDS.iter().zip(plan.timings) {
        println!("    {:<18} {value}", register.name);
    }
    println!(
        "    {:<18} {} (x16 = {} cycles)",
        "DYNAMICREFRESH",
        plan.refresh,
        plan.refresh * 16
    );
    for (cs, chip) in plan.chips.iter().enumerate() {
        if let Some(chip) = chip {
            println!(
                "    DYCS{cs}: CONFIG {:#010x}  RASCAS {:#06x}  MODE read @ {:#010x}",
                chip.config, chip.ras_cas, chip.mode_address
            );
        }
    }
    println!();
    Ok(())
}

fn simulate(trace: bool) -> Result<()> {
    let bus = RefCell::new(MockRegisterBus::new());
    let mut scu = Scu::new(&bus);
    let mut emc = Emc::new(&bus, MockDelay::new(), board::EMC_CLK_HZ);

    initialize_arch(&mut scu, &mut emc)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("simulated bring-up failed")?;
    let (_, delay) = emc.free();

    let bus = bus.borrow();
    if trace {
        println!("{}", "  Register writes".cyan());
        for (i, (address, value)) in bus.writes().iter().enumerate() {
            println!("    {i:>3}  {address:#010x} <- {value:#010x}");
        }
        println!("    reads: {:#010x?}", bus.reads());
        println!();
    }

    println!("{}", "  EMC image after bring-up".cyan());
    let control = bus.value(EMC_BASE + reg::DYNAMIC_CONTROL).unwrap_or(0);
    println!("    {:<18} {control:#010x}", "DYNAMICCONTROL");
    let config0 = bus.value(EMC_BASE + reg::DYNAMIC_CONFIG[0]).unwrap_or(0);
    println!("    {:<18} {config0:#010x}", "DYNAMICCONFIG0");
    println!(
        "    {}",
        format!(
            "{} writes, {} reads, {} us of power-up delay",
            bus.writes().len(),
            bus.reads().len(),
            delay.total_ns() / 1_000
        )
        .dimmed()
    );
    println!();
    println!("{}", "✓ Bring-up sequence completed".green().bold());
    println!();

    Ok(())
}
