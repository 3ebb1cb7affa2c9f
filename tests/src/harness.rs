use as_lib::assemble;
use emu_lib::{Clock, IoRegion, Machine, Memory, Outcome};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// Slow enough that every unit sees every edge on a loaded test host.
pub const TEST_PERIOD: Duration = Duration::from_millis(2);

// Machines spin on the edge counter; running several at once starves the
// clock.
static SERIAL: Mutex<()> = Mutex::new(());

pub fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn memory_for(src: &str) -> Memory {
    let prog = assemble(src).unwrap();
    let image: Vec<i32> = prog.words.iter().map(|w| *w as i32).collect();
    let mut mem = Memory::new();
    mem.load_image(&image);
    mem
}

pub fn run_memory(mem: Memory, io: Arc<IoRegion>) -> Outcome {
    let _serial = serial();
    Machine::new(mem, io)
        .with_clock(Clock::new(TEST_PERIOD))
        .run()
}

pub fn run_with_io(src: &str, io: Arc<IoRegion>) -> Outcome {
    run_memory(memory_for(src), io)
}

pub fn run(src: &str) -> Outcome {
    run_with_io(src, Arc::new(IoRegion::private()))
}

pub fn mem_word(outcome: &Outcome, addr: u16) -> i32 {
    outcome.memory.as_ref().unwrap().read_word(addr)
}
