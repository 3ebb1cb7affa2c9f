pub mod alu;
pub mod bus;
pub mod clock;
pub mod cpu;
pub mod fault;
pub mod io;
pub mod machine;
pub mod state;

pub use bus::Bus;
pub use clock::Clock;
pub use cpu::{Cpu, ExecRet};
pub use fault::Fault;
pub use io::memory::Memory;
pub use io::ring::IoRegion;
pub use machine::{Machine, Outcome};
pub use state::{CpuState, Flags};
