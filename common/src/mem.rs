use std::io::{self, Write};

use crate::constants::WORD_BYTES;

// Images are little-endian 32-bit words. Trailing bytes that don't make a
// whole word are dropped; see `trailing_bytes`.
pub fn words_from_bytes(input: &[u8]) -> Vec<i32> {
    input
        .chunks_exact(WORD_BYTES)
        .map(|chunk| i32::from_le_bytes(bytemuck::pod_read_unaligned(chunk)))
        .collect()
}

pub fn trailing_bytes(input: &[u8]) -> usize {
    input.len() % WORD_BYTES
}

////////////////////////////////////////////////////////////////////////////////

pub trait WriteWord {
    fn write_word(&mut self, val: u32) -> io::Result<()>;
}

impl<T: Write> WriteWord for T {
    fn write_word(&mut self, val: u32) -> io::Result<()> {
        self.write_all(&val.to_le_bytes())
    }
}

pub fn write_image(out: &mut impl Write, words: &[u32]) -> io::Result<()> {
    for word in words {
        out.write_word(*word)?;
    }
    Ok(())
}
