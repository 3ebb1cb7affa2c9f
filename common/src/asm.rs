
use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::ToPrimitive;
use derive_more::IsVariant;


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash)]
pub enum Opcode {
    St = 0,
    Ld,
    Ldi,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Not,
    Jmp,
    Jz,
    Jn,
    Clr,
    Nop,
    Dec,
    Inc,
    Halt,
}

// Operand shape of an instruction, as written in assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Format {
    RegOperand,   // ADD ACC, #3
    RegImmediate, // LDI X, #10
    Reg,          // INC X
    Operand,      // JMP loop
    Bare,         // HALT
}

impl Opcode {
    pub const NUM_BITS: u32 = 8;

    pub const ALL: [Opcode; 20] = [
        Opcode::St, Opcode::Ld, Opcode::Ldi, Opcode::Add, Opcode::Sub,
        Opcode::Mul, Opcode::Div, Opcode::Mod, Opcode::And, Opcode::Or,
        Opcode::Xor, Opcode::Not, Opcode::Jmp, Opcode::Jz, Opcode::Jn,
        Opcode::Clr, Opcode::Nop, Opcode::Dec, Opcode::Inc, Opcode::Halt,
    ];

    pub fn mnemonic(self) -> &'static str {
        use Opcode::*;
        match self {
            St => "ST",
            Ld => "LD",
            Ldi => "LDI",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Mod => "MOD",
            And => "AND",
            Or => "OR",
            Xor => "XOR",
            Not => "NOT",
            Jmp => "JMP",
            Jz => "JZ",
            Jn => "JN",
            Clr => "CLR",
            Nop => "NOP",
            Dec => "DEC",
            Inc => "INC",
            Halt => "HALT",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| op.mnemonic().eq_ignore_ascii_case(s))
    }

    pub fn format(self) -> Format {
        use Opcode::*;
        match self {
            St | Ld | Add | Sub | Mul | Div | Mod | And | Or | Xor => Format::RegOperand,
            Ldi => Format::RegImmediate,
            Not | Clr | Dec | Inc => Format::Reg,
            Jmp | Jz | Jn => Format::Operand,
            Nop | Halt => Format::Bare,
        }
    }

    pub fn to_u8p(self) -> u8 {
        // Discriminants are all below 256.
        self.to_u8().unwrap_or_default()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash)]
pub enum Reg {
    X = 0,
    Acc,
}

pub const NUM_REGS: usize = 2;

impl Reg {
    pub const NUM_BITS: u32 = 4;
    pub const MASK: u32 = (1u32 << Self::NUM_BITS) - 1;

    pub fn name(self) -> &'static str {
        match self {
            Reg::X => "X",
            Reg::Acc => "ACC",
        }
    }

    pub fn from_name(s: &str) -> Option<Reg> {
        [Reg::X, Reg::Acc].into_iter().find(|r| r.name().eq_ignore_ascii_case(s))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, ToPrimitive, PartialEq, Eq, Hash, IsVariant)]
pub enum AddrMode {
    Immediate = 0,
    Direct,
    Indirect,
    Indexed, // Always off X
}

impl AddrMode {
    pub const NUM_BITS: u32 = 4;
    pub const MASK: u32 = (1u32 << Self::NUM_BITS) - 1;

    pub fn name(self) -> &'static str {
        match self {
            AddrMode::Immediate => "Immediate",
            AddrMode::Direct => "Direct",
            AddrMode::Indirect => "Indirect",
            AddrMode::Indexed => "Indexed",
        }
    }

    // Extra bus round trips needed to resolve the operand.
    pub fn fmt_operand(self, f: &mut fmt::Formatter, operand: u16) -> fmt::Result {
        match self {
            AddrMode::Immediate => write!(f, "#{operand:#06x}"),
            AddrMode::Direct => write!(f, "{operand:#06x}"),
            AddrMode::Indirect => write!(f, "@{operand:#06x}"),
            AddrMode::Indexed => write!(f, "{operand:#06x}(X)"),
        }
    }
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}


////////////////////////////////////////////////////////////////////////////////


// opcode:8 | reg:4 | mode:4 | operand:16
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ins {
    pub op: Opcode,
    pub reg: Reg,
    pub mode: AddrMode,
    pub operand: u16,
}

impl Ins {
    pub const OPCODE_SHIFT: u32 = 24;
    pub const REG_SHIFT: u32 = 20;
    pub const MODE_SHIFT: u32 = 16;
    pub const OPERAND_MASK: u32 = 0xffff;

    pub fn new(op: Opcode, reg: Reg, mode: AddrMode, operand: u16) -> Ins {
        Ins{op, reg, mode, operand}
    }

    pub fn bare(op: Opcode) -> Ins {
        Ins::new(op, Reg::X, AddrMode::Immediate, 0)
    }

    pub fn encode(&self) -> u32 {
        ((self.op as u32) << Self::OPCODE_SHIFT)
            | ((self.reg as u32 & Reg::MASK) << Self::REG_SHIFT)
            | ((self.mode as u32 & AddrMode::MASK) << Self::MODE_SHIFT)
            | (self.operand as u32)
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.format() {
            Format::RegOperand | Format::RegImmediate => {
                write!(f, "{} {}, ", self.op, self.reg)?;
                self.mode.fmt_operand(f, self.operand)
            },
            Format::Reg => write!(f, "{} {}", self.op, self.reg),
            Format::Operand => {
                write!(f, "{} ", self.op)?;
                self.mode.fmt_operand(f, self.operand)
            },
            Format::Bare => write!(f, "{}", self.op),
        }
    }
}
