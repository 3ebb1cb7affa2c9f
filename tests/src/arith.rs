use crate::harness::*;

#[test]
fn add_store_halt() {
    let outcome = run(r#"
        LDI ACC, #5
        ADD ACC, #3
        ST ACC, 0x300
        HALT
    "#);
    assert_eq!(outcome.result, Ok(()));
    let cpu = outcome.cpu.as_ref().unwrap();
    assert_eq!(cpu.acc(), 8);
    assert_eq!(cpu.num_ins(), 4);
    assert_eq!(mem_word(&outcome, 0x300), 8);
}

#[test]
fn subtract_to_negative() {
    let outcome = run(r#"
        LDI ACC, #3
        SUB ACC, #10
        ST ACC, 0x300
        HALT
    "#);
    let cpu = outcome.cpu.as_ref().unwrap();
    assert_eq!(cpu.acc(), 0xfff9);
    assert!(cpu.flags.negative);
    assert!(!cpu.flags.zero);
    assert_eq!(mem_word(&outcome, 0x300), 0xfff9);
}

#[test]
fn mul_div_mod() {
    let outcome = run(r#"
        LDI ACC, #7
        MUL ACC, #6
        ST ACC, 0x300
        DIV ACC, #5
        ST ACC, 0x301
        LDI ACC, #17
        MOD ACC, #5
        ST ACC, 0x302
        HALT
    "#);
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(mem_word(&outcome, 0x300), 42);
    assert_eq!(mem_word(&outcome, 0x301), 8);
    assert_eq!(mem_word(&outcome, 0x302), 2);
}

// A negative result is stored masked, so it can't feed the next ALU op.
#[test]
fn negative_result_feeds_no_further_alu_op() {
    let outcome = run(r#"
        LDI ACC, #5
        SUB ACC, #8
        MUL ACC, #2
        HALT
    "#);
    assert_eq!(outcome.result, Err(emu_lib::Fault::OperandOutOfRange(0xfffd, 2)));
    assert_eq!(outcome.cpu.unwrap().acc(), 0xfffd);
}

// Immediates aren't sign extended, so a negative one is a large positive
// ALU operand.
#[test]
fn negative_immediate_is_out_of_range() {
    let outcome = run(r#"
        LDI ACC, #-1
        ADD ACC, #1
        HALT
    "#);
    assert_eq!(outcome.result, Err(emu_lib::Fault::OperandOutOfRange(0xffff, 1)));
    assert_eq!(outcome.cpu.unwrap().acc(), 0xffff);
}

#[test]
fn logic_ops() {
    let outcome = run(r#"
        LDI ACC, #0x0ff0
        AND ACC, #0x00ff
        ST ACC, 0x300
        OR ACC, #0x0f00
        ST ACC, 0x301
        XOR ACC, #0x0ff0
        ST ACC, 0x302
        NOT ACC
        ST ACC, 0x303
        HALT
    "#);
    assert_eq!(mem_word(&outcome, 0x300), 0x00f0);
    assert_eq!(mem_word(&outcome, 0x301), 0x0ff0);
    assert_eq!(mem_word(&outcome, 0x302), 0);
    assert_eq!(mem_word(&outcome, 0x303), 0xffff);
    assert!(outcome.cpu.unwrap().flags.negative);
}

#[test]
fn clr_inc_dec() {
    let outcome = run(r#"
        LDI X, #41
        INC X
        ST X, 0x300
        DEC X
        DEC X
        ST X, 0x301
        CLR X
        HALT
    "#);
    let cpu = outcome.cpu.as_ref().unwrap();
    assert_eq!(mem_word(&outcome, 0x300), 42);
    assert_eq!(mem_word(&outcome, 0x301), 40);
    assert_eq!(cpu.x(), 0);
    assert!(cpu.flags.zero);
}
