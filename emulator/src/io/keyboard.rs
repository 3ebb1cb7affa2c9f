use common::constants::{KEYBOARD_DATA, KEYBOARD_STATUS};

use crate::bus::{Bus, Control};
use crate::fault::Fault;
use crate::io::BusDevice;
use crate::io::ring::IoRegion;

use std::sync::Arc;

use log::trace;

// Input-only character device fed by the terminal through the inbound ring.
pub struct Keyboard {
    io: Arc<IoRegion>,
}

impl Keyboard {
    // Keyboard Data
    pub const DATA: u16 = KEYBOARD_DATA;

    // Keyboard Status
    pub const STATUS: u16 = KEYBOARD_STATUS;

    pub const ADDRS: &[u16] = &[Self::DATA, Self::STATUS];

    pub fn new(io: Arc<IoRegion>) -> Self {
        Keyboard{io}
    }

    // 1 if anything is waiting, else 0.
    fn status_read(&self) -> i32 {
        let pending = self.io.input().len();
        trace!("Keyboard: {pending} bytes pending");
        (pending != 0) as i32
    }

    // 0 when nothing is waiting, which is indistinguishable from a NUL key.
    // Bytes are signed, so 0x80..=0xff come out negative.
    fn data_read(&self) -> i32 {
        match self.io.input().pop() {
            Some(ch) => {
                trace!("Keyboard: read {:?}", ch as char);
                ch as i8 as i32
            },
            None => {
                trace!("Keyboard: data read with nothing pending");
                0
            },
        }
    }
}

impl BusDevice for Keyboard {
    fn name(&self) -> &'static str {
        "Keyboard"
    }

    fn service(&mut self, bus: &Bus) -> Result<(), Fault> {
        match (bus.address(), bus.control()) {
            (Self::DATA, Control::Read) => bus.set_data(self.data_read()),
            (Self::DATA, Control::Write) => trace!("Keyboard: ignoring data write"),
            (Self::STATUS, Control::Read) => bus.set_data(self.status_read()),
            (Self::STATUS, Control::Write) => trace!("Keyboard: ignoring status write"),
            _ => return Ok(()),
        }
        bus.release();
        Ok(())
    }
}
