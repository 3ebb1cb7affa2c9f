use std::process::ExitCode;

use as_lib::assemble;
use common::constants::WORD_BYTES;

use clap::Parser;
use clap_stdin::FileOrStdin;
use log::debug;

/// ASOC-V Assembler
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input assembly file, or - for stdin
    input: FileOrStdin,

    /// File name to output to
    #[arg(long, short, default_value = "rom.bin")]
    output: String,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let input = match args.input.contents() {
        Ok(input) => input,
        Err(err) => {
            eprintln!("Can't read input: {err}");
            return ExitCode::from(1);
        },
    };

    let prog = match assemble(&input) {
        Ok(prog) => prog,
        Err(err) => {
            eprintln!("Assembly error: {err}");
            return ExitCode::from(2);
        },
    };

    if let Err(err) = prog.write_file(&args.output) {
        eprintln!("{}: {err}", args.output);
        return ExitCode::from(1);
    }
    debug!("Wrote {} bytes", prog.len() * WORD_BYTES);

    println!("Assembled -> {} ({} words)", args.output, prog.len());
    let symbols = prog.sorted_symbols();
    if !symbols.is_empty() {
        println!("Symbols:");
        for (name, val) in symbols {
            println!("  {name}: 0x{val:04X}");
        }
    }
    ExitCode::SUCCESS
}
