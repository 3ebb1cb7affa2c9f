
use common::asm::*;
use common::constants::RESET_VECTOR;
use common::decoder::Fields;
use crate::alu::{self, AluOp, ArithOp, LogicOp};
use crate::bus::{Bus, Control};
use crate::fault::Fault;
use crate::io::memory::Guard;
use crate::state::CpuState;

use std::sync::Arc;

use log::{debug, info};


// The control unit's view of the outside world. On the real machine this is
// the bus; tests swap in plain memory.
pub trait Port {
    // Idle the bus and let one edge pass.
    fn begin_cycle(&mut self) -> Result<(), Fault>;

    fn read(&mut self, addr: u16) -> Result<i32, Fault>;
    fn write(&mut self, addr: u16, val: i32) -> Result<(), Fault>;

    // Last word memory served.
    fn guard(&self) -> i32;

    fn end_cycle(&mut self) -> Result<(), Fault>;
}

pub struct BusPort {
    bus: Arc<Bus>,
    guard: Guard,
}

impl BusPort {
    pub fn new(bus: Arc<Bus>, guard: Guard) -> BusPort {
        BusPort{bus, guard}
    }
}

impl Port for BusPort {
    fn begin_cycle(&mut self) -> Result<(), Fault> {
        self.bus.release();
        self.bus.wait_edge()?;
        Ok(())
    }

    // Control goes out before the address: a device acts as soon as it sees
    // its address, so everything else has to be in place by then.
    fn read(&mut self, addr: u16) -> Result<i32, Fault> {
        self.bus.set_control(Control::Read);
        self.bus.set_address(addr);
        self.bus.wait_edges(Bus::TRANSACTION_EDGES)?;
        Ok(self.bus.data())
    }

    fn write(&mut self, addr: u16, val: i32) -> Result<(), Fault> {
        self.bus.set_control(Control::Write);
        self.bus.set_data(val);
        self.bus.set_address(addr);
        self.bus.wait_edges(Bus::TRANSACTION_EDGES)?;
        Ok(())
    }

    fn guard(&self) -> i32 {
        self.guard.get()
    }

    fn end_cycle(&mut self) -> Result<(), Fault> {
        self.bus.wait_edges(Bus::TRANSACTION_EDGES)?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

// What an addressing mode resolved the operand to. Immediate operands have no
// address; they resolve to address 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effective {
    pub addr: u16,
    pub value: i32,
}

// Addresses wrap at 16 bits. Indirect pointers use their low 16 bits.
pub fn resolve(port: &mut impl Port, mode: AddrMode, operand: u16, x: i32) -> Result<Effective, Fault> {
    let eff = match mode {
        AddrMode::Immediate => Effective{addr: 0, value: operand as i32},
        AddrMode::Direct => Effective{addr: operand, value: port.read(operand)?},
        AddrMode::Indirect => {
            let addr = port.read(operand)? as u16;
            Effective{addr, value: port.read(addr)?}
        },
        AddrMode::Indexed => {
            let addr = (operand as i32).wrapping_add(x) as u16;
            Effective{addr, value: port.read(addr)?}
        },
    };
    Ok(eff)
}


pub struct Cpu<P: Port> {
    state: CpuState,
    port: P,
}

impl<P: Port> Cpu<P> {
    pub fn new(port: P) -> Cpu<P> {
        let mut state = CpuState::new();
        state.set_pc(RESET_VECTOR);
        Cpu{state, port}
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    // Run until a halt or a fault.
    pub fn run(&mut self) -> Result<(), Fault> {
        while self.run_ins()? != ExecRet::Halt {}
        Ok(())
    }

    // Fetch, decode and execute one instruction.
    pub fn run_ins(&mut self) -> Result<ExecRet, Fault> {
        debug!("{}", self.state);
        self.port.begin_cycle()?;

        let word = self.fetch()?;
        let ins = self.decode(word)?;
        self.state.inc_ins();

        if self.exec(&ins.0, ins.1)? == ExecRet::Halt {
            info!("Halted at PC {:#06x}", self.state.pc().wrapping_sub(1));
            return Ok(ExecRet::Halt);
        }

        self.port.end_cycle()?;
        Ok(ExecRet::Ok)
    }

    // PC moves on before the word arrives, so a fetch is never retried.
    fn fetch(&mut self) -> Result<i32, Fault> {
        let addr = self.state.pc();
        self.state.set_pc(addr.wrapping_add(1));
        let word = self.port.read(addr)?;

        let guard = self.port.guard();
        if word != guard {
            return Err(Fault::GuardMismatch{fetched: word, guard});
        }
        if addr == RESET_VECTOR && word == 0 {
            return Err(Fault::NullInstruction);
        }

        debug!("[IF] {addr:#06x}: {word:#010x}");
        Ok(word)
    }

    // The opcode is only checked after the operand is resolved, so an invalid
    // opcode still costs its operand reads.
    fn decode(&mut self, word: i32) -> Result<(Ins, Effective), Fault> {
        let fields = Fields::split(word as u32);
        let mode = fields.mode()?;
        let reg = fields.reg()?;
        let eff = resolve(&mut self.port, mode, fields.operand, self.state.x())?;
        let op = fields.opcode()?;

        let ins = Ins::new(op, reg, mode, fields.operand);
        debug!(
            "[ID] {ins} ({}) => EA: {:#06x} value: {:#06x}",
            mode,
            eff.addr,
            eff.value,
        );
        Ok((ins, eff))
    }

    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn exec(&mut self, ins: &Ins, eff: Effective) -> Result<ExecRet, Fault> {
        use Opcode::*;
        debug!("[EX] {}", ins.op);
        let reg = ins.reg;
        match ins.op {
            St => self.port.write(eff.addr, self.state.reg_read(reg))?,
            Ld | Ldi => self.do_load(reg, eff.value),

            Add => self.do_alu(reg, AluOp::Arith(ArithOp::Add), eff.value)?,
            Sub => self.do_alu(reg, AluOp::Arith(ArithOp::Sub), eff.value)?,
            Mul => self.do_alu(reg, AluOp::Arith(ArithOp::Mul), eff.value)?,
            Div => self.do_alu(reg, AluOp::Arith(ArithOp::Div), eff.value)?,
            Mod => self.do_alu(reg, AluOp::Arith(ArithOp::Mod), eff.value)?,

            And => self.do_alu(reg, AluOp::Logic(LogicOp::And), eff.value)?,
            Or => self.do_alu(reg, AluOp::Logic(LogicOp::Or), eff.value)?,
            Xor => self.do_alu(reg, AluOp::Logic(LogicOp::Xor), eff.value)?,
            Not => self.do_alu(reg, AluOp::Logic(LogicOp::Not), 0)?,

            Jmp => self.do_jump(eff.addr, true),
            Jz => self.do_jump(eff.addr, self.state.flags.zero),
            Jn => self.do_jump(eff.addr, self.state.flags.negative),

            Clr => {
                let val = self.state.reg_read(reg);
                self.do_alu(reg, AluOp::Arith(ArithOp::Sub), val)?;
            },
            Nop => (),
            Dec => self.do_alu(reg, AluOp::Arith(ArithOp::Sub), 1)?,
            Inc => self.do_alu(reg, AluOp::Arith(ArithOp::Add), 1)?,

            Halt => return Ok(ExecRet::Halt),
        }
        Ok(ExecRet::Ok)
    }

    fn do_load(&mut self, reg: Reg, val: i32) {
        self.state.reg_write(reg, val);
        self.state.flags.zero = val == 0;
        self.state.flags.negative = val < 0;
    }

    // The masked 16-bit result goes back as is, so a negative result reads
    // back as 0x8000..=0xffff and is out of range for the next ALU op.
    fn do_alu(&mut self, reg: Reg, op: AluOp, rhs: i32) -> Result<(), Fault> {
        let lhs = self.state.reg_read(reg);
        let res = alu::execute(op, lhs, rhs, &mut self.state.flags)?;
        self.state.reg_write(reg, res as i32);
        Ok(())
    }

    fn do_jump(&mut self, target: u16, taken: bool) {
        if taken {
            debug!("[EX] jumping to {target:#06x}");
            self.state.set_pc(target);
        }
    }
}
