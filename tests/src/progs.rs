use crate::harness::*;

#[test]
fn countdown() {
    let outcome = run(r#"
            LDI X, #5
            LDI ACC, #0
        loop:
            ADD ACC, #3
            DEC X
            JZ done
            JMP loop
        done:
            ST ACC, 0x300
            HALT
    "#);
    assert_eq!(outcome.result, Ok(()));
    let cpu = outcome.cpu.as_ref().unwrap();
    assert_eq!(cpu.x(), 0);
    assert_eq!(mem_word(&outcome, 0x300), 15);
    // 2 + 5 * (ADD, DEC, JZ) + 4 JMPs + ST + HALT
    assert_eq!(cpu.num_ins(), 2 + 5 * 3 + 4 + 2);
}

#[test]
fn sum_array() {
    let outcome = run(r#"
            LDI X, #0
            LDI ACC, #0
        loop:
            ADD ACC, arr(X)
            INC X
            ST ACC, sum
            ST X, idx
            LD ACC, idx
            SUB ACC, #4
            JZ done
            LD ACC, sum
            JMP loop
        done:
            HALT
            ORG 0x200
        idx: WORD 0
        sum: WORD 0
        arr: WORD 4
            WORD 5
            WORD 6
            WORD 7
    "#);
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(mem_word(&outcome, 0x201), 22);
}

#[test]
fn jn_branches_on_negative() {
    let outcome = run(r#"
            LDI ACC, #2
        loop:
            DEC ACC
            JN neg
            JMP loop
        neg:
            ST ACC, 0x300
            HALT
    "#);
    assert_eq!(mem_word(&outcome, 0x300), 0xffff);
}

#[test]
fn nop_only_advances() {
    let outcome = run("NOP\nNOP\nHALT");
    let cpu = outcome.cpu.unwrap();
    assert_eq!(cpu.num_ins(), 3);
    assert_eq!(cpu.pc(), 3);
    assert_eq!(cpu.acc(), 0);
}
