use common::constants::BUS_IDLE;

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, AtomicU16, AtomicU64, Ordering};
use std::thread;

use derive_more::IsVariant;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive, IsVariant)]
pub enum Control {
    Read = 0,
    Write = 1,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("machine stopped")]
pub struct Stopped;

// The address/data/control lines plus the clock. Shared by every unit through
// an Arc; all synchronization is acquire/release on these fields and edge
// counting, never a lock.
//
// There is no acknowledgement line. A transaction is correct only if the
// initiator and the responder both let the agreed number of edges pass; a
// responder that misses an edge leaves stale data on the bus and nobody
// notices.
#[derive(Debug)]
pub struct Bus {
    address: AtomicU16,
    data: AtomicI32,
    control: AtomicU8,

    clock: AtomicBool,
    edges: AtomicU64,

    running: AtomicBool,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    // Edges a simple transaction takes: one for the responder to notice the
    // address and act, one for it to publish and go idle.
    pub const TRANSACTION_EDGES: u32 = 2;

    pub fn new() -> Bus {
        Bus {
            address: AtomicU16::new(BUS_IDLE),
            data: AtomicI32::new(0),
            control: AtomicU8::new(Control::Read as u8),
            clock: AtomicBool::new(false),
            edges: AtomicU64::new(0),
            running: AtomicBool::new(true),
        }
    }

    pub fn address(&self) -> u16 {
        self.address.load(Ordering::Acquire)
    }

    pub fn set_address(&self, addr: u16) {
        self.address.store(addr, Ordering::Release);
    }

    pub fn data(&self) -> i32 {
        self.data.load(Ordering::Acquire)
    }

    pub fn set_data(&self, val: i32) {
        self.data.store(val, Ordering::Release);
    }

    pub fn control(&self) -> Control {
        // Only Control values are ever stored.
        Control::from_u8(self.control.load(Ordering::Acquire)).unwrap_or(Control::Read)
    }

    pub fn set_control(&self, control: Control) {
        self.control.store(control as u8, Ordering::Release);
    }

    pub fn release(&self) {
        self.set_address(BUS_IDLE);
    }

    pub fn is_idle(&self) -> bool {
        self.address() == BUS_IDLE
    }

    ///////////////////////////////////////////////////////////////////////////
    // Clock
    ///////////////////////////////////////////////////////////////////////////

    pub fn clock_level(&self) -> bool {
        self.clock.load(Ordering::Acquire)
    }

    pub fn edges(&self) -> u64 {
        self.edges.load(Ordering::Acquire)
    }

    // Only the clock calls this.
    pub fn toggle_clock(&self) {
        let level = self.clock.load(Ordering::Acquire);
        self.clock.store(!level, Ordering::Release);
        self.edges.fetch_add(1, Ordering::AcqRel);
    }

    // Spin until the edge counter moves past the value seen on entry. Gives up
    // the time slice between polls but never blocks.
    pub fn wait_edge(&self) -> Result<(), Stopped> {
        let seen = self.edges();
        loop {
            if !self.is_running() {
                return Err(Stopped);
            }
            if self.edges() != seen {
                return Ok(());
            }
            thread::yield_now();
        }
    }

    pub fn wait_edges(&self, n: u32) -> Result<(), Stopped> {
        for _ in 0..n {
            self.wait_edge()?;
        }
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////
    // Machine-wide stop
    ///////////////////////////////////////////////////////////////////////////

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}
