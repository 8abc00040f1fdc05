use std::path::PathBuf;

use pocketboy_gb::GameBoy;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: gb_trace <rom_path> [steps]");
        std::process::exit(2);
    });
    let steps: u64 = args
        .next()
        .unwrap_or_else(|| "1000000".to_string())
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Invalid step count; expected an integer.");
            std::process::exit(2);
        });

    let rom = std::fs::read(&rom_path).unwrap_or_else(|err| {
        eprintln!("Failed to read ROM '{}': {err}", rom_path.display());
        std::process::exit(1);
    });

    let mut gb = GameBoy::new(&rom).unwrap_or_else(|err| {
        eprintln!("Failed to load cartridge: {err}");
        std::process::exit(1);
    });

    let cycles = gb.run_steps(steps);

    let regs = gb.regs();
    println!(
        "Ran {} instructions ({} cycles, {} frames) of '{}'",
        steps,
        cycles,
        gb.frames(),
        gb.header().title
    );
    println!(
        "PC=0x{:04X} SP=0x{:04X} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X}",
        regs.pc,
        regs.sp,
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl()
    );

    let faults = gb.faults();
    println!(
        "Faults: {} out-of-bounds, {} illegal; {} unimplemented opcodes skipped",
        faults.out_of_bounds, faults.illegal, gb.cpu.unimplemented_ops
    );
}
