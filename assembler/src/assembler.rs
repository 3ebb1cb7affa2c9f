use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::AsmError;
use crate::ir::*;
use crate::parser::parse_line;
use common::asm::*;
use common::constants::MEM_WORDS;
use common::mem::write_image;

use log::trace;

#[derive(Debug)]
pub struct Program {
    pub words: Vec<u32>,
    pub symbols: HashMap<String, SymbolValue>,
}

impl Program {
    // Raw little-endian words, loadable at address 0.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        write_image(out, &self.words)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).map(|sym| sym.val)
    }

    pub fn sorted_symbols(&self) -> Vec<(&str, u16)> {
        let mut out: Vec<_> = self.symbols.iter().map(|(name, sym)| (name.as_str(), sym.val)).collect();
        out.sort();
        out
    }
}

pub fn assemble(prog: &str) -> Result<Program, AsmError> {
    Assembler::new().assemble(prog)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolValue {
    pub val: u16,
    pub line: usize,
}

impl SymbolValue {
    fn new(val: u16, line: usize) -> SymbolValue {
        Self{val, line}
    }
}

struct Assembler {
    symbols: HashMap<String, SymbolValue>,
    unresolved: BTreeSet<String>,
}

impl Assembler {
    const IMM_MIN: i64 = i16::MIN as i64;
    const IMM_MAX: i64 = u16::MAX as i64;

    fn new() -> Assembler {
        Assembler{
            symbols: HashMap::new(),
            unresolved: BTreeSet::new(),
        }
    }

    // Unknown symbols evaluate to 0 and are reported together at the end.
    fn eval(&mut self, val: &Value) -> i64 {
        match val {
            Value::Num(n) => *n,
            Value::SymbolRef(symbol) => match self.symbols.get(symbol) {
                Some(sym) => {
                    trace!("Resolving symbol \"{symbol}\" to {:#06x}", sym.val);
                    sym.val as i64
                },
                None => {
                    self.unresolved.insert(symbol.clone());
                    0
                },
            },
        }
    }

    fn encode_operand(&mut self, operand: &Operand, line: usize) -> Result<u16, AsmError> {
        let val = self.eval(&operand.val);
        if operand.mode == AddrMode::Immediate && !(Self::IMM_MIN..=Self::IMM_MAX).contains(&val) {
            return Err(AsmError::ImmediateOutOfRange(line, val));
        }
        Ok(val as u16)
    }

    fn encode_ins(&mut self, ins: &InsStmt, line: usize) -> Result<u32, AsmError> {
        let ins = match &ins.operand {
            Some(operand) => {
                let val = self.encode_operand(operand, line)?;
                Ins::new(ins.op, ins.reg, operand.mode, val)
            },
            None => Ins::new(ins.op, ins.reg, AddrMode::Immediate, 0),
        };
        Ok(ins.encode())
    }

    // First pass: addresses for every label.
    fn collect_labels(&mut self, prog: &[Stmt]) -> Result<Vec<usize>, AsmError> {
        let mut addrs = Vec::with_capacity(prog.len());
        let mut addr: usize = 0;
        for stmt in prog {
            if let Some(label) = &stmt.label_def {
                if let Some(first) = self.symbols.get(label) {
                    return Err(AsmError::DuplicateLabel{line: stmt.line, label: label.clone(), first: first.line});
                }
                self.symbols.insert(label.clone(), SymbolValue::new(addr as u16, stmt.line));
            }

            match (&stmt.cmd, stmt.size()) {
                (Some(Cmd::LocDef(loc)), _) => addr = *loc as usize,
                (_, Some(size)) if size > 0 => {
                    if addr >= MEM_WORDS {
                        return Err(AsmError::PastEndOfMemory(stmt.line, addr));
                    }
                    addrs.push(addr);
                    addr += size;
                },
                _ => (),
            }
        }
        Ok(addrs)
    }

    fn assemble(mut self, prog: &str) -> Result<Program, AsmError> {
        let prog: Vec<Stmt> = prog
            .lines()
            .zip(1..)
            .map(|(src, line)| parse_line(src, line))
            .filter(|stmt| !matches!(stmt, Ok(stmt) if stmt.is_empty()))
            .collect::<Result<_, _>>()?;

        let addrs = self.collect_labels(&prog)?;
        let len = addrs.iter().max().map_or(0, |max| max + 1);
        let mut words = vec![0u32; len];

        let emitting = prog.iter().filter_map(|stmt| stmt.cmd.as_ref().map(|cmd| (stmt.line, cmd)));
        let emitting = emitting.filter(|(_, cmd)| !matches!(cmd, Cmd::LocDef(_)));
        for ((line, cmd), addr) in emitting.zip(addrs) {
            words[addr] = match cmd {
                Cmd::Ins(ins) => self.encode_ins(ins, line)?,
                Cmd::Word(val) => self.eval(val) as u32,
                Cmd::LocDef(_) => continue,
            };
            trace!("{addr:#06x}: {:#010x}", words[addr]);
        }

        if !self.unresolved.is_empty() {
            return Err(AsmError::Unresolved(self.unresolved.into_iter().collect()));
        }

        Ok(Program{words, symbols: self.symbols})
    }
}
