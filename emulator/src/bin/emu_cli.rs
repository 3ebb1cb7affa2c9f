use emu_lib::{Clock, IoRegion, Machine, Memory};

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::{error, info};


/// ASOC-V Simulator
#[derive(Parser)]
struct Args {
    /// Memory image to load at address 0
    #[arg(default_value = "rom.bin")]
    image: PathBuf,

    /// Clock half-period in microseconds
    #[arg(long, default_value_t = 500)]
    clock_us: u64,

    /// Shared memory segment the terminal attaches to
    #[arg(long, default_value = IoRegion::DEFAULT_SHM_NAME)]
    shm_name: String,

    /// Keep display/keyboard I/O in-process and print the display output on exit
    #[arg(long)]
    private_io: bool,
}


fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let args = Args::parse();

    let io = if args.private_io {
        IoRegion::private()
    } else {
        match IoRegion::open_shared(&args.shm_name) {
            Ok(io) => io,
            Err(err) => {
                error!("Can't open shared memory {}: {err}", args.shm_name);
                eprintln!("Error: can't open shared memory {}: {err}", args.shm_name);
                return ExitCode::FAILURE;
            },
        }
    };
    let io = Arc::new(io);
    info!("I/O region: {}", if io.is_shared() { args.shm_name.as_str() } else { "private" });

    let memory = Memory::from_image_file(&args.image);
    let machine = Machine::new(memory, io.clone())
        .with_clock(Clock::new(Duration::from_micros(args.clock_us)));
    let outcome = machine.run();

    if !io.is_shared() {
        let out = io.output().drain();
        let mut stdout = std::io::stdout();
        if let Err(err) = stdout.write_all(&out).and_then(|_| stdout.flush()) {
            error!("Can't write display output: {err}");
        }
    }

    match outcome.result {
        Ok(()) => ExitCode::SUCCESS,
        Err(fault) => {
            error!("{fault}");
            eprintln!("Error: {fault}");
            ExitCode::FAILURE
        },
    }
}
