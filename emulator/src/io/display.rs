use common::constants::{DISPLAY_DATA, DISPLAY_STATUS};

use crate::bus::{Bus, Control};
use crate::fault::Fault;
use crate::io::BusDevice;
use crate::io::ring::IoRegion;

use std::sync::Arc;

use log::trace;

// Output-only character device. Bytes written to the data register go to the
// outbound ring for the terminal to print.
pub struct Display {
    io: Arc<IoRegion>,
}

impl Display {
    // Display Data
    pub const DATA: u16 = DISPLAY_DATA;

    // Display Status
    pub const STATUS: u16 = DISPLAY_STATUS;

    pub const ADDRS: &[u16] = &[Self::DATA, Self::STATUS];

    const READY: i32 = 0x1;
    const NO_DATA: i32 = 0x0;

    pub fn new(io: Arc<IoRegion>) -> Self {
        Display{io}
    }

    fn status_read(&self) -> i32 {
        trace!("Display: status read");
        // Never busy.
        Self::READY
    }

    fn data_read(&self) -> i32 {
        trace!("Display: data read, nothing to read");
        Self::NO_DATA
    }

    fn data_write(&self, val: i32) {
        let byte = val as u8;
        trace!("Display: data write {val:#06x}");
        if !self.io.output().push(byte) {
            trace!("Display: output full, dropping {byte:#04x}");
        }
    }
}

impl BusDevice for Display {
    fn name(&self) -> &'static str {
        "Display"
    }

    fn service(&mut self, bus: &Bus) -> Result<(), Fault> {
        match (bus.address(), bus.control()) {
            (Self::STATUS, Control::Read) => bus.set_data(self.status_read()),
            (Self::STATUS, Control::Write) => trace!("Display: ignoring status write"),
            (Self::DATA, Control::Read) => bus.set_data(self.data_read()),
            (Self::DATA, Control::Write) => self.data_write(bus.data()),
            _ => return Ok(()),
        }
        bus.release();
        Ok(())
    }
}
