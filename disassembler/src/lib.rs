use common::decoder::decode;

use std::fmt;
use std::ops::Range;

pub struct Disassembled {
    pub addr: u16,
    pub repr: u32,
    pub interp: Option<String>,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let interp = self.interp.as_deref().unwrap_or("???");
        write!(f, "{:#06x}: {:#010x}  {interp}", self.addr, self.repr)
    }
}

pub fn disassemble(image: &[i32]) -> Vec<Disassembled> {
    image
        .iter()
        .take(u16::MAX as usize + 1)
        .enumerate()
        .map(|(addr, word)| {
            let repr = *word as u32;
            Disassembled {
                addr: addr as u16,
                repr,
                interp: decode(repr).ok().map(|ins| ins.to_string()),
            }
        })
        .collect()
}

// Runs of more than THRESH zero words keep only their first and last entry;
// the gap in addresses marks where the rest went.
pub fn remove_long_zeros(disassembly: &mut Vec<Disassembled>) {
    const THRESH: usize = 8;

    let mut ranges = vec![];
    let mut range_start = None;
    for (i, dis) in disassembly.iter().enumerate() {
        if dis.repr == 0 {
            range_start.get_or_insert(i);
        } else if let Some(start) = range_start.take() {
            ranges.push(Range{start, end: i});
        }
    }
    if let Some(start) = range_start {
        ranges.push(Range{start, end: disassembly.len()});
    }

    for range in ranges.iter().rev() {
        if range.len() > THRESH {
            disassembly.drain(range.start + 1..range.end - 1);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_words() {
        let dis = disassemble(&[0x0210_0005, 0x0011_0300, 0x1300_0000]);
        let lines: Vec<String> = dis.iter().map(|d| d.to_string()).collect();
        assert_eq!(lines, vec![
            "0x0000: 0x02100005  LDI ACC, #0x0005",
            "0x0001: 0x00110300  ST ACC, 0x0300",
            "0x0002: 0x13000000  HALT",
        ]);
    }

    #[test]
    fn undecodable() {
        let dis = disassemble(&[0x7f00_0000, 0x0020_0000]);
        assert!(dis.iter().all(|d| d.interp.is_none()));
        assert!(dis[0].to_string().ends_with("???"));
    }

    #[test]
    fn collapses_zero_runs() {
        let mut image = vec![0x1300_0000];
        image.extend([0; 20]);
        image.push(0x1000_0000);
        image.extend([0; 3]);
        image.push(0x1000_0000);
        image.extend([0; 12]);

        let mut dis = disassemble(&image);
        remove_long_zeros(&mut dis);
        let addrs: Vec<u16> = dis.iter().map(|d| d.addr).collect();
        assert_eq!(addrs, vec![0, 1, 20, 21, 22, 23, 24, 25, 26, 37]);
    }
}
