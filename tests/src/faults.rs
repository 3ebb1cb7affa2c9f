use crate::harness::*;

use emu_lib::{Fault, IoRegion, Memory};

use std::sync::Arc;

#[test]
fn immediate_out_of_range() {
    let outcome = run(r#"
        LDI ACC, #5
        ADD ACC, #40000
        HALT
    "#);
    assert_eq!(outcome.result, Err(Fault::OperandOutOfRange(5, 40000)));
    assert_eq!(outcome.cpu.unwrap().acc(), 5);
}

#[test]
fn protected_write() {
    let outcome = run(r#"
        LDI ACC, #1
        ST ACC, 0x100
        HALT
    "#);
    assert_eq!(outcome.result, Err(Fault::ProtectedWrite{addr: 0x100, val: 1}));
    assert_eq!(mem_word(&outcome, 0x100), 0);
    assert!(!outcome.halted());
}

#[test]
fn overwrite_code_is_protected() {
    let outcome = run(r#"
        start:
            LD ACC, start
            ST ACC, 0x1ff
            HALT
    "#);
    assert_eq!(outcome.result, Err(Fault::ProtectedWrite{addr: 0x1ff, val: 0x0111_0000}));
}

#[test]
fn null_image() {
    let outcome = run_memory(Memory::new(), Arc::new(IoRegion::private()));
    assert_eq!(outcome.result, Err(Fault::NullInstruction));
    assert_eq!(outcome.cpu.unwrap().num_ins(), 0);
}

#[test]
fn invalid_opcode() {
    let mut mem = Memory::new();
    mem.load_image(&[0x7f00_0000]);
    let outcome = run_memory(mem, Arc::new(IoRegion::private()));
    assert_eq!(outcome.result, Err(Fault::InvalidOpcode(0x7f)));
}

#[test]
fn invalid_register() {
    let mut mem = Memory::new();
    mem.load_image(&[0x0130_0000]);
    let outcome = run_memory(mem, Arc::new(IoRegion::private()));
    assert_eq!(outcome.result, Err(Fault::InvalidRegister(3)));
}

#[test]
fn divide_by_zero() {
    let outcome = run(r#"
        LDI ACC, #9
        DIV ACC, #0
        HALT
    "#);
    assert_eq!(outcome.result, Err(Fault::DivideByZero));
}

#[test]
fn running_off_the_end() {
    // Falls through into zeroed memory. A zero word is ST X, #0, which
    // targets address 0.
    let outcome = run("NOP");
    assert_eq!(outcome.result, Err(Fault::ProtectedWrite{addr: 0, val: 0}));
    assert_eq!(outcome.cpu.unwrap().num_ins(), 2);
}
