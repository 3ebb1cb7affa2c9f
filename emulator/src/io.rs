pub mod display;
pub mod keyboard;
pub mod memory;
pub mod ring;

use crate::bus::Bus;
use crate::fault::Fault;

use log::debug;

// Anything that answers bus transactions. Devices run on their own thread and
// get `service` called once per clock edge; a device that owns the current
// address does its work, publishes any result and releases the bus.
pub trait BusDevice: Send {
    fn name(&self) -> &'static str;

    fn service(&mut self, bus: &Bus) -> Result<(), Fault>;
}

// Device thread body. Runs until the machine stops or the device hits a fault,
// which stops the machine for everyone else. Hands the device back so its
// final state can be inspected.
pub fn run_device<D: BusDevice>(mut dev: D, bus: &Bus) -> (D, Result<(), Fault>) {
    loop {
        if bus.wait_edge().is_err() {
            debug!("{}: stopped", dev.name());
            return (dev, Ok(()));
        }

        if let Err(fault) = dev.service(bus) {
            debug!("{}: {fault}", dev.name());
            bus.stop();
            return (dev, Err(fault));
        }
    }
}
