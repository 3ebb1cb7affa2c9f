use crate::harness::*;

use emu_lib::IoRegion;

use std::sync::Arc;

#[test]
fn hello() {
    let io = Arc::new(IoRegion::private());
    let outcome = run_with_io(r#"
            LDI X, #0
        loop:
            LD ACC, msg(X)
            JZ done
            ST ACC, 0xfff0
            INC X
            JMP loop
        done:
            HALT

            ORG 0x200
        msg: WORD 104
            WORD 101
            WORD 108
            WORD 108
            WORD 111
            WORD 0
    "#, io.clone());
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(io.output().drain(), b"hello");
}

#[test]
fn display_status_always_ready() {
    let io = Arc::new(IoRegion::private());
    let outcome = run_with_io(r#"
        LD ACC, 0xfff1
        ST ACC, 0x300
        LD X, 0xfff0
        ST X, 0x301
        HALT
    "#, io.clone());
    assert_eq!(mem_word(&outcome, 0x300), 1);
    assert_eq!(mem_word(&outcome, 0x301), 0);
    assert!(io.output().is_empty());
}

#[test]
fn keyboard_echo() {
    let io = Arc::new(IoRegion::private());
    io.input().write(b"hey\0");
    let outcome = run_with_io(r#"
        wait:
            LD ACC, 0xfff3
            JZ wait
            LD ACC, 0xfff2
            JZ done
            ST ACC, 0xfff0
            JMP wait
        done:
            HALT
    "#, io.clone());
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(io.output().drain(), b"hey");
    assert!(io.input().is_empty());
}

#[test]
fn empty_keyboard_reads_zero() {
    let io = Arc::new(IoRegion::private());
    let outcome = run_with_io(r#"
        LDI ACC, #7
        LD ACC, 0xfff3
        ST ACC, 0x300
        LDI ACC, #7
        LD ACC, 0xfff2
        ST ACC, 0x301
        HALT
    "#, io);
    assert_eq!(mem_word(&outcome, 0x300), 0);
    assert_eq!(mem_word(&outcome, 0x301), 0);
}

#[test]
fn display_keeps_low_byte() {
    let io = Arc::new(IoRegion::private());
    run_with_io(r#"
        LDI ACC, #0x141
        ST ACC, 0xfff0
        HALT
    "#, io.clone());
    assert_eq!(io.output().drain(), b"A");
}
