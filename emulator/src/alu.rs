use common::constants::{I16_MAX, I16_MIN};

use crate::fault::Fault;
use crate::state::Flags;

use log::trace;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum AluMode {
    Arithmetic = 0,
    Logic = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum ArithOp {
    Add = 0,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum LogicOp {
    And = 0,
    Or,
    Xor,
    Not, // Ignores the second operand
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Arith(ArithOp),
    Logic(LogicOp),
}

impl AluOp {
    pub fn mode(self) -> AluMode {
        match self {
            AluOp::Arith(_) => AluMode::Arithmetic,
            AluOp::Logic(_) => AluMode::Logic,
        }
    }

    // Decoding from a raw (mode, op) pair. The CPU maps opcodes straight to
    // typed ops, so the two ALU faults only come from here.
    pub fn from_raw(mode: u8, op: u8) -> Result<AluOp, Fault> {
        let bad_op = Fault::InvalidAluOp{mode, op};
        match AluMode::from_u8(mode) {
            Some(AluMode::Arithmetic) => ArithOp::from_u8(op).map(AluOp::Arith).ok_or(bad_op),
            Some(AluMode::Logic) => LogicOp::from_u8(op).map(AluOp::Logic).ok_or(bad_op),
            None => Err(Fault::InvalidAluMode(mode)),
        }
    }
}

fn in_range(val: i32) -> bool {
    (I16_MIN..=I16_MAX).contains(&val)
}

fn mask(val: i32) -> u16 {
    val as u16
}

// Both operands must already be signed 16-bit values; anything else stops the
// machine before flags are touched. The result is always the low 16 bits of
// the true result.
pub fn execute(op: AluOp, lhs: i32, rhs: i32, flags: &mut Flags) -> Result<u16, Fault> {
    if !in_range(lhs) || !in_range(rhs) {
        return Err(Fault::OperandOutOfRange(lhs, rhs));
    }

    let res = match op {
        AluOp::Arith(op) => arith(op, lhs, rhs, flags)?,
        AluOp::Logic(op) => logic(op, lhs, rhs, flags),
    };
    trace!("ALU: {op:?} {lhs}, {rhs} => {res:#06x} {flags}");
    Ok(res)
}

fn arith(op: ArithOp, lhs: i32, rhs: i32, flags: &mut Flags) -> Result<u16, Fault> {
    use ArithOp::*;
    let full = match op {
        Add => lhs + rhs,
        Sub => lhs - rhs,
        Mul => lhs * rhs,
        Div | Mod if rhs == 0 => return Err(Fault::DivideByZero),
        // Both truncate toward zero.
        Div => lhs / rhs,
        Mod => lhs % rhs,
    };
    let res = mask(full);

    let lhs_sign = lhs < 0;
    let rhs_sign = rhs < 0;
    let res_sign = (res as i16) < 0;

    match op {
        Add => {
            flags.carry = !in_range(full);
            flags.overflow = lhs_sign == rhs_sign && res_sign != lhs_sign;
        },
        Sub => {
            flags.carry = !in_range(full);
            flags.overflow = lhs_sign != rhs_sign && res_sign != lhs_sign;
        },
        Mul => {
            flags.carry = !in_range(full);
            flags.overflow = flags.carry;
        },
        Div | Mod => {
            flags.carry = false;
            flags.overflow = false;
        },
    }
    flags.set_zn(res);
    Ok(res)
}

// Carry and overflow are left alone.
fn logic(op: LogicOp, lhs: i32, rhs: i32, flags: &mut Flags) -> u16 {
    let res = match op {
        LogicOp::And => lhs & rhs,
        LogicOp::Or => lhs | rhs,
        LogicOp::Xor => lhs ^ rhs,
        LogicOp::Not => !lhs,
    };
    let res = mask(res);
    flags.set_zn(res);
    res
}
