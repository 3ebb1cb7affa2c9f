use common::asm::{NUM_REGS, Reg};

use std::fmt;

use log::trace;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub negative: bool,
    pub carry: bool,
    pub overflow: bool,
}

impl Flags {
    pub fn new() -> Flags {
        Default::default()
    }

    // Zero and negative from a 16-bit result.
    pub fn set_zn(&mut self, res: u16) {
        self.zero = res == 0;
        self.negative = (res as i16) < 0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Z={} N={} C={} V={}",
            self.zero as u8,
            self.negative as u8,
            self.carry as u8,
            self.overflow as u8,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////

// Architectural state. Only the control unit touches it, and only while
// executing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CpuState {
    num_ins: usize,
    pc: u16,
    regs: [i32; NUM_REGS],
    pub flags: Flags,
}

impl CpuState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        trace!("Reg: writing {pc:#06x} to PC");
        self.pc = pc;
    }

    pub fn reg_read(&self, reg: Reg) -> i32 {
        self.regs[reg.index()]
    }

    pub fn reg_write(&mut self, reg: Reg, val: i32) {
        trace!("Reg: writing {val:#06x} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn x(&self) -> i32 {
        self.reg_read(Reg::X)
    }

    pub fn acc(&self) -> i32 {
        self.reg_read(Reg::Acc)
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PC: {:#06x} X: {:#06x} ACC: {:#06x} {}",
            self.pc,
            self.x(),
            self.acc(),
            self.flags,
        )
    }
}
