use common::asm::*;

use crate::error::AsmError;
use crate::helpers::{is_ident, parse_int, strip_comment};
use crate::ir::*;

// One source line to one statement. `line` is 1-based and only used for
// error messages.
pub fn parse_line(src: &str, line: usize) -> Result<Stmt, AsmError> {
    let mut text = strip_comment(src);
    let mut label_def = None;

    if let Some((label, rest)) = text.split_once(':') {
        if is_ident(label) {
            label_def = Some(label.to_string());
            text = rest.trim();
        }
    }

    if text.is_empty() {
        return Ok(Stmt::new(line, label_def, None));
    }

    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    };

    let cmd = if word.eq_ignore_ascii_case("ORG") {
        let val = parse_int(rest).ok_or_else(|| AsmError::InvalidNumber(line, rest.to_string()))?;
        Cmd::LocDef(val as u16)
    } else if word.eq_ignore_ascii_case("WORD") {
        Cmd::Word(parse_value(rest, line)?)
    } else {
        Cmd::Ins(parse_ins(word, rest, line)?)
    };
    Ok(Stmt::new(line, label_def, Some(cmd)))
}

fn parse_value(tok: &str, line: usize) -> Result<Value, AsmError> {
    let tok = tok.trim();
    if tok.is_empty() {
        return Err(AsmError::EmptyOperand(line));
    }
    Ok(match parse_int(tok) {
        Some(val) => Value::Num(val),
        None => Value::SymbolRef(tok.to_string()),
    })
}

// `#v` immediate, `@v` indirect, `v(X)` indexed, `v` or `[v]` direct.
fn parse_operand(tok: &str, line: usize) -> Result<Operand, AsmError> {
    let tok = tok.trim();

    if let Some(val) = tok.strip_prefix('#') {
        return Ok(Operand::new(AddrMode::Immediate, parse_value(val, line)?));
    }

    let upper = tok.to_ascii_uppercase();
    if upper.ends_with("(X)") {
        let inner = &tok[..tok.len() - "(X)".len()];
        return Ok(Operand::new(AddrMode::Indexed, parse_value(inner, line)?));
    }

    if let Some(val) = tok.strip_prefix('@') {
        return Ok(Operand::new(AddrMode::Indirect, parse_value(val, line)?));
    }

    let inner = tok
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(tok);
    Ok(Operand::new(AddrMode::Direct, parse_value(inner, line)?))
}

// Commas inside brackets don't separate operands.
fn split_operands(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(s[start..i].trim());
                start = i + 1;
            },
            _ => (),
        }
    }
    out.push(s[start..].trim());
    out.retain(|op| !op.is_empty());
    out
}

fn parse_reg(tok: &str, line: usize) -> Result<Reg, AsmError> {
    Reg::from_name(tok).ok_or_else(|| AsmError::UnknownRegister(line, tok.to_string()))
}

fn parse_ins(mnemonic: &str, rest: &str, line: usize) -> Result<InsStmt, AsmError> {
    let op = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AsmError::UnknownInstruction(line, mnemonic.to_ascii_uppercase()))?;
    let ops = split_operands(rest);

    let expected = match op.format() {
        Format::RegOperand => "REG, operand",
        Format::RegImmediate => "REG, #imm",
        Format::Reg => "REG",
        Format::Operand => "operand",
        Format::Bare => "no operands",
    };
    let count_err = || AsmError::OperandCount{line, op, expected};

    let ins = match op.format() {
        Format::RegOperand | Format::RegImmediate => {
            let [reg, operand] = ops[..] else {
                return Err(count_err());
            };
            let reg = parse_reg(reg, line)?;
            let operand = parse_operand(operand, line)?;
            if op.format().is_reg_immediate() && operand.mode != AddrMode::Immediate {
                return Err(AsmError::LdiNotImmediate(line));
            }
            InsStmt{op, reg, operand: Some(operand)}
        },
        Format::Reg => {
            let [reg] = ops[..] else {
                return Err(count_err());
            };
            InsStmt{op, reg: parse_reg(reg, line)?, operand: None}
        },
        Format::Operand => {
            let [operand] = ops[..] else {
                return Err(count_err());
            };
            InsStmt{op, reg: Reg::X, operand: Some(parse_operand(operand, line)?)}
        },
        Format::Bare => {
            if !ops.is_empty() {
                return Err(count_err());
            }
            InsStmt{op, reg: Reg::X, operand: None}
        },
    };
    Ok(ins)
}
