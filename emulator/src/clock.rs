use crate::bus::Bus;

use std::thread;
use std::time::Duration;

use log::trace;

// Free-running clock: toggles the bus clock once per period until the machine
// stops. Nobody acknowledges an edge and nothing slows it down, so any unit
// that takes longer than a period between waits falls out of step.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    period: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new(Self::DEFAULT_PERIOD)
    }
}

impl Clock {
    pub const DEFAULT_PERIOD: Duration = Duration::from_micros(500);

    pub fn new(period: Duration) -> Clock {
        Clock{period}
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn run(&self, bus: &Bus) {
        while bus.is_running() {
            thread::sleep(self.period);
            bus.toggle_clock();
        }
        trace!("Clock: stopped after {} edges", bus.edges());
    }
}
