use crate::harness::*;

use as_lib::assemble;
use disassembler::disassemble;
use emu_lib::{IoRegion, Memory};

use std::sync::Arc;

const PROG: &str = r#"
        LDI X, #3
    loop:
        LD ACC, @ptr
        ADD ACC, table(X)
        ST ACC, out
        DEC X
        JZ done
        JMP loop
    done:
        NOT ACC
        HALT
        ORG 0x200
    ptr: WORD out
    out: WORD 0
    table: WORD 1
"#;

#[test]
fn disassembly_matches_source() {
    let prog = assemble(PROG).unwrap();
    let image: Vec<i32> = prog.words.iter().map(|w| *w as i32).collect();
    let listing: Vec<Option<String>> = disassemble(&image[..9]).into_iter().map(|d| d.interp).collect();
    let expected = [
        "LDI X, #0x0003",
        "LD ACC, @0x0200",
        "ADD ACC, 0x0202(X)",
        "ST ACC, 0x0201",
        "DEC X",
        "JZ 0x0007",
        "JMP 0x0001",
        "NOT ACC",
        "HALT",
    ];
    let expected: Vec<Option<String>> = expected.iter().map(|s| Some(s.to_string())).collect();
    assert_eq!(listing, expected);
}

#[test]
fn image_file_round_trip() {
    let prog = assemble(r#"
        LDI ACC, #0x1234
        ST ACC, 0x300
        HALT
    "#).unwrap();

    let path = std::env::temp_dir().join(format!("asoc-test-{}.bin", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    prog.write_to(&mut file).unwrap();
    drop(file);

    let mem = Memory::from_image_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert_eq!(mem.read_word(0), prog.words[0] as i32);

    let outcome = run_memory(mem, Arc::new(IoRegion::private()));
    assert_eq!(outcome.result, Ok(()));
    assert_eq!(mem_word(&outcome, 0x300), 0x1234);
}
