use disassembler::{Disassembled, disassemble, remove_long_zeros};
use common::mem::{trailing_bytes, words_from_bytes};

use std::process::ExitCode;

use clap::Parser;
use log::warn;

/// ASOC-V Disassembler
#[derive(Parser)]
struct Args {
    /// Memory image to disassemble
    bin: String,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let bin = match std::fs::read(&args.bin) {
        Ok(bin) => bin,
        Err(err) => {
            eprintln!("{}: {err}", args.bin);
            return ExitCode::FAILURE;
        },
    };
    if trailing_bytes(&bin) != 0 {
        warn!("Ignoring {} trailing bytes", trailing_bytes(&bin));
    }
    let mut disassembly = disassemble(&words_from_bytes(&bin));

    remove_long_zeros(&mut disassembly);

    let mut prev: Option<Disassembled> = None;
    for dis in disassembly {
        if let Some(p) = &prev {
            if p.addr as usize + 1 != dis.addr as usize {
                println!("...");
            }
        }
        println!("{}", dis);
        prev = Some(dis);
    }
    ExitCode::SUCCESS
}
