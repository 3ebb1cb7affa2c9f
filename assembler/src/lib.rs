pub mod assembler;
pub mod error;
pub mod helpers;
pub mod ir;
pub mod parser;

pub use assembler::{assemble, Program, SymbolValue};
pub use error::AsmError;
