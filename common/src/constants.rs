
pub const WORD_BYTES: usize = 4; // Image words are 32 bits.

pub const MEM_WORDS: usize = 0x10000;

pub const RESET_VECTOR: u16 = 0x0000;

// Everything below the barrier is read-only once the image is loaded.
pub const DATA_BARRIER: u16 = 0x0200;

pub const DISPLAY_DATA: u16 = 0xfff0;
pub const DISPLAY_STATUS: u16 = 0xfff1;
pub const KEYBOARD_DATA: u16 = 0xfff2;
pub const KEYBOARD_STATUS: u16 = 0xfff3;

pub const MMIO_ADDRS: &[u16] = &[DISPLAY_DATA, DISPLAY_STATUS, KEYBOARD_DATA, KEYBOARD_STATUS];

// Written back by whichever device answered; no device responds to it.
pub const BUS_IDLE: u16 = 0xffff;

pub const I16_MIN: i32 = i16::MIN as i32;
pub const I16_MAX: i32 = i16::MAX as i32;

pub fn is_mmio(addr: u16) -> bool {
    MMIO_ADDRS.contains(&addr)
}
