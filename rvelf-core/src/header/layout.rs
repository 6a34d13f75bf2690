//! Field offsets for the parts of the ELF header and section header entries
//! that the section walk touches.
//!
//! Reference: [ELF Specification v1.2](https://refspecs.linuxfoundation.org/elf/elf.pdf)

/// Width of `e_shentsize`, `e_shnum` and `e_shstrndx` (`ElfN_Half`).
pub const HALF_SIZE: u64 = 2;

/// Width of `sh_name` (`ElfN_Word`), the same for both classes.
pub const NAME_SIZE: u64 = 4;

/// Byte offsets of the fields needed to find a named section.
///
/// The first four are offsets into the file header, the last three are
/// offsets into a single section header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTable {
    /// Width of `e_shoff`, `sh_offset` and `sh_size`.
    pub word_size: u64,

    /// `e_shoff`: file offset of the section header table.
    pub sh_offset: u64,

    /// `e_shentsize`: size of one section header entry.
    pub sh_entsize: u64,

    /// `e_shnum`: number of section header entries.
    pub sh_num: u64,

    /// `e_shstrndx`: index of the section name string table.
    pub sh_strndx: u64,

    /// `sh_name`: offset of the name within the string table.
    pub entry_name: u64,

    /// `sh_offset`: file offset of the section contents.
    pub entry_data_offset: u64,

    /// `sh_size`: size of the section contents in the file.
    pub entry_data_size: u64,
}

/// `Elf32_Ehdr` / `Elf32_Shdr`.
pub const ELF32: OffsetTable = OffsetTable {
    word_size: 4,
    sh_offset: 32,
    sh_entsize: 46,
    sh_num: 48,
    sh_strndx: 50,
    entry_name: 0,
    entry_data_offset: 16,
    entry_data_size: 20,
};

/// `Elf64_Ehdr` / `Elf64_Shdr`.
pub const ELF64: OffsetTable = OffsetTable {
    word_size: 8,
    sh_offset: 40,
    sh_entsize: 58,
    sh_num: 60,
    sh_strndx: 62,
    entry_name: 0,
    entry_data_offset: 24,
    entry_data_size: 32,
};
