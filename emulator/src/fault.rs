use common::decoder::DecodeError;

use crate::bus::Stopped;

use thiserror::Error;

// Every detected inconsistency stops the whole machine. There is no recovery
// path for any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("ALU operand out of signed 16-bit range: {0}, {1}")]
    OperandOutOfRange(i32, i32),

    #[error("division by zero")]
    DivideByZero,

    #[error("invalid opcode {0:#04x}")]
    InvalidOpcode(u8),

    #[error("invalid addressing mode {0}")]
    InvalidAddrMode(u8),

    #[error("invalid register {0}")]
    InvalidRegister(u8),

    #[error("invalid ALU mode {0}")]
    InvalidAluMode(u8),

    #[error("invalid ALU operation {op} for mode {mode}")]
    InvalidAluOp { mode: u8, op: u8 },

    #[error("write of {val:#06x} to protected address {addr:#06x}")]
    ProtectedWrite { addr: u16, val: i32 },

    #[error("fetched {fetched:#010x} but memory last served {guard:#010x}")]
    GuardMismatch { fetched: i32, guard: i32 },

    #[error("null instruction at address 0x0000")]
    NullInstruction,

    #[error("bus stopped by another unit")]
    BusStopped,

    #[error("{0} thread panicked")]
    UnitPanicked(&'static str),

    #[error("can't start {0} thread")]
    SpawnFailed(&'static str),
}

impl From<DecodeError> for Fault {
    fn from(err: DecodeError) -> Fault {
        match err {
            DecodeError::Opcode(op) => Fault::InvalidOpcode(op),
            DecodeError::Reg(reg) => Fault::InvalidRegister(reg),
            DecodeError::AddrMode(mode) => Fault::InvalidAddrMode(mode),
        }
    }
}

impl From<Stopped> for Fault {
    fn from(_: Stopped) -> Fault {
        Fault::BusStopped
    }
}
