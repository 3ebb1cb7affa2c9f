use common::asm::Opcode;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {0}: invalid number: {1}")]
    InvalidNumber(usize, String),

    #[error("line {0}: unknown instruction: {1}")]
    UnknownInstruction(usize, String),

    #[error("line {0}: unknown register: {1}")]
    UnknownRegister(usize, String),

    #[error("line {line}: {op} expects: {expected}")]
    OperandCount { line: usize, op: Opcode, expected: &'static str },

    #[error("line {0}: LDI requires an immediate operand prefixed with #")]
    LdiNotImmediate(usize),

    #[error("line {0}: immediate out of range (16-bit): {1}")]
    ImmediateOutOfRange(usize, i64),

    #[error("line {0}: empty operand")]
    EmptyOperand(usize),

    #[error("line {line}: duplicate label {label} (first defined on line {first})")]
    DuplicateLabel { line: usize, label: String, first: usize },

    #[error("line {0}: location {1:#x} is past the end of memory")]
    PastEndOfMemory(usize, usize),

    #[error("unresolved symbols: {}", .0.join(", "))]
    Unresolved(Vec<String>),
}
