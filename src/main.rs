use ayyboy_mmu::error::{AyyError, LoggerSetupSnafu};
use ayyboy_mmu::gameboy::GameBoy;
use ayyboy_mmu::memory::cartridge::{BootRom, FileCartridge};
use clap::Parser;
use log::{info, LevelFilter};
use snafu::ResultExt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Load a cartridge onto the DMG bus and inspect it")]
struct Args {
    /// Path to ROM file
    rom: PathBuf,

    /// Path to boot ROM file
    #[arg(long)]
    bootrom: Option<PathBuf>,

    /// First address to dump (hex)
    #[arg(long, default_value = "ff00", value_parser = parse_address)]
    start: u16,

    /// Last address to dump (hex)
    #[arg(long, default_value = "ff7f", value_parser = parse_address)]
    end: u16,

    /// T-cycles to run the devices before dumping
    #[arg(long, default_value_t = 0)]
    cycles: usize,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches('$');
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {}: {}", s, e))
}

fn setup_logger(level: LevelFilter) -> Result<(), AyyError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context(LoggerSetupSnafu)
}

fn run(args: Args) -> Result<(), AyyError> {
    setup_logger(args.log_level)?;

    let bootrom = args.bootrom.as_ref().map(BootRom::from_path).transpose()?;
    let mut gb = GameBoy::new(Box::new(FileCartridge::new(&args.rom)), bootrom)?;

    if args.cycles > 0 {
        info!("Running devices for {} T-cycles", args.cycles);
        gb.tick(args.cycles);
    }

    let dump = gb.mmu().dump(args.start, args.end)?;
    for (row, chunk) in dump.chunks(16).enumerate() {
        let addr = args.start as usize + row * 16;
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("${:04x}: {}", addr, bytes.join(" "));
    }

    if !gb.serial_output().is_empty() {
        println!("serial: {}", gb.serial_output());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
