use common::asm::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Num(i64),
    SymbolRef(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub mode: AddrMode,
    pub val: Value,
}

impl Operand {
    pub fn new(mode: AddrMode, val: Value) -> Operand {
        Operand{mode, val}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsStmt {
    pub op: Opcode,
    pub reg: Reg,
    pub operand: Option<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    Ins(InsStmt),
    Word(Value),
    LocDef(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub line: usize,
    pub label_def: Option<String>,
    pub cmd: Option<Cmd>,
}

impl Stmt {
    pub fn new(line: usize, label_def: Option<String>, cmd: Option<Cmd>) -> Stmt {
        Stmt{line, label_def, cmd}
    }

    pub fn is_empty(&self) -> bool {
        self.label_def.is_none() && self.cmd.is_none()
    }

    // Size, in words, of the assembled statement. ORG has to be handled by
    // the caller.
    pub fn size(&self) -> Option<usize> {
        match &self.cmd {
            None => Some(0),
            Some(Cmd::Ins(_)) | Some(Cmd::Word(_)) => Some(1),
            Some(Cmd::LocDef(_)) => None,
        }
    }
}
