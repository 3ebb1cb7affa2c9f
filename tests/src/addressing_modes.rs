use crate::harness::*;

use common::asm::{AddrMode, Ins, Opcode, Reg};

#[test]
fn direct_read_write() {
    let outcome = run(r#"
            LD ACC, val
            ADD ACC, val
            ST ACC, out
            HALT
            ORG 0x200
        val: WORD 21
        out: WORD 0
    "#);
    assert_eq!(mem_word(&outcome, 0x201), 42);
}

#[test]
fn bracketed_direct() {
    let outcome = run(r#"
            LD ACC, [0x200]
            ST ACC, [0x300]
            HALT
            ORG 0x200
            WORD -9
    "#);
    assert_eq!(mem_word(&outcome, 0x300), -9);
}

#[test]
fn indirect() {
    let outcome = run(r#"
            LD ACC, @ptr
            INC ACC
            ST ACC, @ptr
            HALT
            ORG 0x200
        ptr: WORD 0x210
            ORG 0x210
            WORD 99
    "#);
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(outcome.cpu.as_ref().unwrap().acc(), 100);
    assert_eq!(mem_word(&outcome, 0x210), 100);
    assert_eq!(mem_word(&outcome, 0x200), 0x210);
}

#[test]
fn indexed() {
    let outcome = run(r#"
            LDI X, #2
            LD ACC, table(X)
            ST ACC, 0x300(X)
            HALT
            ORG 0x200
        table: WORD 10
            WORD 20
            WORD 30
    "#);
    assert_eq!(outcome.cpu.as_ref().unwrap().acc(), 30);
    assert_eq!(mem_word(&outcome, 0x302), 30);
}

#[test]
fn immediate_label_is_address() {
    let outcome = run(r#"
            LDI ACC, #data
            HALT
            ORG 0x234
        data: WORD 1
    "#);
    assert_eq!(outcome.cpu.unwrap().acc(), 0x234);
}

// X = 0xffff wraps the indexed address onto BUS_IDLE. No device answers, so
// the load picks up whatever the data lines last carried: the LD itself.
#[test]
fn indexed_read_of_idle_address_is_stale() {
    let outcome = run(r#"
        LDI X, #0
        DEC X
        LD ACC, 0(X)
        ST ACC, 0x300
        HALT
    "#);
    let fetched = Ins::new(Opcode::Ld, Reg::Acc, AddrMode::Indexed, 0).encode() as i32;
    assert_eq!(outcome.result, Ok(()));
    let cpu = outcome.cpu.as_ref().unwrap();
    assert_eq!(cpu.x(), 0xffff);
    assert_eq!(cpu.acc(), fetched);
    assert_eq!(mem_word(&outcome, 0x300), fetched);
}
