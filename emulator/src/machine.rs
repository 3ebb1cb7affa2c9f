use crate::bus::Bus;
use crate::clock::Clock;
use crate::cpu::{BusPort, Cpu};
use crate::fault::Fault;
use crate::io::display::Display;
use crate::io::keyboard::Keyboard;
use crate::io::memory::Memory;
use crate::io::ring::IoRegion;
use crate::io::{BusDevice, run_device};
use crate::state::CpuState;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};

use log::{debug, error, info};

// Stops the bus when dropped, including while unwinding, so one unit dying
// can't leave the others polling forever.
struct StopOnDrop<'a>(&'a Bus);

impl Drop for StopOnDrop<'_> {
    fn drop(&mut self) {
        self.0.stop();
    }
}

#[derive(Debug)]
pub struct Outcome {
    // Ok on HALT.
    pub result: Result<(), Fault>,

    // None if the unit panicked.
    pub cpu: Option<CpuState>,
    pub memory: Option<Memory>,
}

impl Outcome {
    pub fn halted(&self) -> bool {
        self.result.is_ok()
    }
}


pub struct Machine {
    bus: Arc<Bus>,
    memory: Memory,
    io: Arc<IoRegion>,
    clock: Clock,
}

impl Machine {
    pub fn new(memory: Memory, io: Arc<IoRegion>) -> Machine {
        Machine {
            bus: Arc::new(Bus::new()),
            memory,
            io,
            clock: Clock::default(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Machine {
        self.clock = clock;
        self
    }

    // Runs until HALT or the first fault, then stops and joins every unit.
    // The CPU runs on the calling thread.
    pub fn run(self) -> Outcome {
        let Machine{bus, memory, io, clock} = self;
        info!("Starting machine, clock period {:?}", clock.period());

        let guard = memory.guard();
        let display = Display::new(io.clone());
        let keyboard = Keyboard::new(io);

        thread::scope(|s| {
            let clock_h = thread::Builder::new()
                .name("clock".into())
                .spawn_scoped(s, || {
                    let _stop = StopOnDrop(&bus);
                    clock.run(&bus);
                });
            let clock_h = match clock_h {
                Ok(h) => h,
                Err(err) => {
                    error!("Can't spawn clock thread: {err}");
                    bus.stop();
                    return Outcome{result: Err(Fault::SpawnFailed("clock")), cpu: None, memory: Some(memory)};
                },
            };

            let mem_h = spawn_device(s, &bus, memory);
            let display_h = spawn_device(s, &bus, display);
            let keyboard_h = spawn_device(s, &bus, keyboard);

            let cpu_res = panic::catch_unwind(AssertUnwindSafe(|| {
                let _stop = StopOnDrop(&bus);
                let mut cpu = Cpu::new(BusPort::new(bus.clone(), guard));
                let res = cpu.run();
                (cpu.state().clone(), res)
            }));
            bus.stop();

            if clock_h.join().is_err() {
                error!("Clock thread panicked");
            }
            let (memory, mem_res) = join_device(mem_h, "memory");
            let (_, display_res) = join_device(display_h, "display");
            let (_, keyboard_res) = join_device(keyboard_h, "keyboard");

            let (cpu, cpu_res) = match cpu_res {
                Ok((state, res)) => (Some(state), res),
                Err(_) => (None, Err(Fault::UnitPanicked("cpu"))),
            };

            // The CPU only sees BusStopped when a device brought the machine
            // down, so the device's fault is the real cause.
            let result = mem_res.and(display_res).and(keyboard_res).and(cpu_res);
            match (&result, &cpu) {
                (Ok(()), Some(state)) => info!("Halted after {} instructions", state.num_ins()),
                (Err(fault), _) => debug!("Machine stopped: {fault}"),
                _ => (),
            }
            Outcome{result, cpu, memory}
        })
    }
}

type DeviceHandle<'s, D> = ScopedJoinHandle<'s, (D, Result<(), Fault>)>;

fn spawn_device<'s, 'e: 's, D: BusDevice + 's>(
    s: &'s Scope<'s, 'e>,
    bus: &'s Bus,
    dev: D,
) -> Result<DeviceHandle<'s, D>, Fault> {
    let name = dev.name();
    thread::Builder::new()
        .name(name.to_lowercase())
        .spawn_scoped(s, move || {
            let _stop = StopOnDrop(bus);
            run_device(dev, bus)
        })
        .map_err(|err| {
            error!("Can't spawn {name} thread: {err}");
            bus.stop();
            Fault::SpawnFailed(name)
        })
}

fn join_device<D>(handle: Result<DeviceHandle<'_, D>, Fault>, name: &'static str) -> (Option<D>, Result<(), Fault>) {
    match handle.map(|h| h.join()) {
        Ok(Ok((dev, res))) => (Some(dev), res),
        Ok(Err(_)) => {
            error!("{name} thread panicked");
            (None, Err(Fault::UnitPanicked(name)))
        },
        Err(fault) => (None, Err(fault)),
    }
}
