
use num_traits::FromPrimitive;
use thiserror::Error;

use super::asm::*;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid opcode {0:#04x}")]
    Opcode(u8),
    #[error("invalid register {0}")]
    Reg(u8),
    #[error("invalid addressing mode {0}")]
    AddrMode(u8),
}

// Raw bit fields of an instruction word. Splitting never fails; each field is
// validated separately so the CPU can check them at the step where they're
// needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub opcode: u8,
    pub reg: u8,
    pub mode: u8,
    pub operand: u16,
}

impl Fields {
    pub fn split(word: u32) -> Fields {
        Fields {
            opcode: (word >> Ins::OPCODE_SHIFT) as u8,
            reg: ((word >> Ins::REG_SHIFT) & Reg::MASK) as u8,
            mode: ((word >> Ins::MODE_SHIFT) & AddrMode::MASK) as u8,
            operand: (word & Ins::OPERAND_MASK) as u16,
        }
    }

    pub fn opcode(&self) -> Result<Opcode, DecodeError> {
        Opcode::from_u8(self.opcode).ok_or(DecodeError::Opcode(self.opcode))
    }

    pub fn reg(&self) -> Result<Reg, DecodeError> {
        Reg::from_u8(self.reg).ok_or(DecodeError::Reg(self.reg))
    }

    pub fn mode(&self) -> Result<AddrMode, DecodeError> {
        AddrMode::from_u8(self.mode).ok_or(DecodeError::AddrMode(self.mode))
    }
}

// Same check order as the CPU: mode, register, then opcode.
pub fn decode(word: u32) -> Result<Ins, DecodeError> {
    let fields = Fields::split(word);
    let mode = fields.mode()?;
    let reg = fields.reg()?;
    let op = fields.opcode()?;
    Ok(Ins{op, reg, mode, operand: fields.operand})
}
