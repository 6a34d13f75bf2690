//! Instruction counting over extracted RISC-V bytecode.
//!
//! Only the length encoding in the low bits of the first 16-bit parcel is
//! decoded; nothing here looks at opcodes or operands.

use byteorder::{ByteOrder, LE};

const PARCEL: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructionCount {
    /// Instructions of every length, compressed ones included.
    pub total: usize,
    /// 16-bit (RVC) instructions.
    pub compressed: usize,
    /// Bytes left over after the last whole instruction.
    pub trailing_bytes: usize,
}

/// Length in bytes of the instruction whose first parcel is `parcel`, or
/// `None` for the reserved >= 192-bit encoding.
pub fn instruction_length(parcel: u16) -> Option<usize> {
    if parcel & 0b11 != 0b11 {
        Some(2)
    } else if parcel & 0b1_1100 != 0b1_1100 {
        Some(4)
    } else if parcel & 0b11_1111 == 0b01_1111 {
        Some(6)
    } else if parcel & 0b111_1111 == 0b011_1111 {
        Some(8)
    } else {
        match (parcel >> 12) & 0b111 {
            0b111 => None,
            nnn => Some(10 + 2 * nnn as usize),
        }
    }
}

pub fn count_instructions(bytecode: &[u8]) -> InstructionCount {
    let mut count = InstructionCount::default();
    let mut pos = 0;

    while bytecode.len() - pos >= PARCEL {
        let parcel = LE::read_u16(&bytecode[pos..]);
        let Some(len) = instruction_length(parcel) else {
            log::debug!("reserved instruction encoding {parcel:#06x} at {pos:#x}");
            break;
        };
        if pos + len > bytecode.len() {
            break;
        }
        count.total += 1;
        if len == PARCEL {
            count.compressed += 1;
        }
        pos += len;
    }

    count.trailing_bytes = bytecode.len() - pos;
    count
}
