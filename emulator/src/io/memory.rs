use common::constants::{BUS_IDLE, DATA_BARRIER, MEM_WORDS, is_mmio};
use common::mem::{trailing_bytes, words_from_bytes};

use crate::bus::{Bus, Control};
use crate::fault::Fault;
use crate::io::BusDevice;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use log::{trace, warn};

// Last word the memory served on a read. The CPU compares each fetched word
// against it.
#[derive(Debug, Default, Clone)]
pub struct Guard(Arc<AtomicI32>);

impl Guard {
    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, val: i32) {
        self.0.store(val, Ordering::Release);
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug)]
pub struct Memory {
    words: Vec<i32>,
    guard: Guard,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            words: vec![0; MEM_WORDS],
            guard: Guard::default(),
        }
    }

    // A missing or short image isn't an error; whatever isn't loaded stays
    // zero.
    pub fn from_image_file(path: impl AsRef<Path>) -> Memory {
        let path = path.as_ref();
        let mut mem = Memory::new();
        match std::fs::read(path) {
            Ok(bytes) => {
                if trailing_bytes(&bytes) != 0 {
                    warn!("Image {} has {} trailing bytes, ignoring them", path.display(), trailing_bytes(&bytes));
                }
                let loaded = mem.load_image(&words_from_bytes(&bytes));
                if loaded < MEM_WORDS {
                    warn!("Image {} holds {loaded} words, rest of memory is zero", path.display());
                }
            },
            Err(err) => warn!("Can't read image {}: {err}, memory is zero", path.display()),
        }
        mem
    }

    // Bypasses the barrier; only for loading before the machine starts.
    // Returns the number of words loaded.
    pub fn load_image(&mut self, image: &[i32]) -> usize {
        let len = image.len().min(MEM_WORDS);
        self.words[..len].copy_from_slice(&image[..len]);
        self.words[len..].fill(0);
        len
    }

    pub fn read_word(&self, addr: u16) -> i32 {
        self.words[addr as usize]
    }

    pub fn words(&self) -> &[i32] {
        &self.words
    }

    pub fn guard(&self) -> Guard {
        self.guard.clone()
    }

    fn bus_read(&mut self, bus: &Bus, addr: u16) {
        let val = self.words[addr as usize];
        trace!("Mem: reading {val:#010x} from {addr:#06x}");
        bus.set_data(val);
        self.guard.set(val);
    }

    fn bus_write(&mut self, bus: &Bus, addr: u16) -> Result<(), Fault> {
        let val = bus.data();
        trace!("Mem: writing {val:#010x} to {addr:#06x}");
        if addr < DATA_BARRIER {
            return Err(Fault::ProtectedWrite{addr, val});
        }
        self.words[addr as usize] = val;
        Ok(())
    }
}

impl BusDevice for Memory {
    fn name(&self) -> &'static str {
        "Memory"
    }

    // Answers every address that isn't a device register or the idle marker.
    fn service(&mut self, bus: &Bus) -> Result<(), Fault> {
        let addr = bus.address();
        if addr == BUS_IDLE || is_mmio(addr) {
            return Ok(());
        }

        match bus.control() {
            Control::Read => self.bus_read(bus, addr),
            Control::Write => self.bus_write(bus, addr)?,
        }
        bus.release();
        Ok(())
    }
}
