pub mod layout;

pub use layout::OffsetTable;

use crate::buffer::ByteView;
use crate::error::{ElfError, Result};
use goblin::elf::header::{EI_CLASS, ELFCLASS32, ELFCLASS64, ELFMAG, SELFMAG};
use layout::HALF_SIZE;
use std::fmt;

/// ELF class of a file: the width of addresses and offsets in its headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    #[default]
    Unknown,
    Bits32,
    Bits64,
}

impl AddressWidth {
    /// Maps `e_ident[EI_CLASS]` to a width.
    pub fn from_class(class: u8) -> Result<Self> {
        match class {
            ELFCLASS32 => Ok(AddressWidth::Bits32),
            ELFCLASS64 => Ok(AddressWidth::Bits64),
            _ => Err(ElfError::UnsupportedClass { class }),
        }
    }

    /// Returns the field offsets for this width.
    pub fn layout(self) -> Result<&'static OffsetTable> {
        match self {
            AddressWidth::Bits32 => Ok(&layout::ELF32),
            AddressWidth::Bits64 => Ok(&layout::ELF64),
            AddressWidth::Unknown => Err(ElfError::UnknownAddressWidth),
        }
    }

    /// Size in bytes of an address or file offset.
    pub fn word_size(self) -> Result<u64> {
        Ok(self.layout()?.word_size)
    }

    pub fn is_64(self) -> bool {
        self == AddressWidth::Bits64
    }
}

impl fmt::Display for AddressWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressWidth::Unknown => "unknown",
            AddressWidth::Bits32 => "ELF32",
            AddressWidth::Bits64 => "ELF64",
        };
        write!(f, "{}", name)
    }
}

/// The file header fields needed to reach the section header table, read
/// lazily out of the original buffer.
#[derive(Debug, Clone, Copy)]
pub struct FileHeader<'a> {
    file: ByteView<'a>,
    width: AddressWidth,
    layout: &'static OffsetTable,
}

impl<'a> FileHeader<'a> {
    /// Reads the class byte and selects the matching offset table.
    pub fn read(file: ByteView<'a>) -> Result<Self> {
        if file.is_empty() {
            return Err(ElfError::EmptyInput);
        }

        if file.as_bytes().get(..SELFMAG) != Some(&ELFMAG[..]) {
            log::warn!("ELF magic missing; continuing with class byte at offset {EI_CLASS}");
        }

        let class = file.read_uint(EI_CLASS as u64, 1)? as u8;
        let width = AddressWidth::from_class(class)?;
        log::debug!("ELF class {class} -> {width}");

        Ok(Self {
            file,
            width,
            layout: width.layout()?,
        })
    }

    pub fn address_width(&self) -> AddressWidth {
        self.width
    }

    pub fn layout(&self) -> &'static OffsetTable {
        self.layout
    }

    /// `e_shoff`
    pub fn section_header_offset(&self) -> Result<u64> {
        self.file
            .read_uint(self.layout.sh_offset, self.layout.word_size)
    }

    /// `e_shentsize`
    pub fn section_header_entry_size(&self) -> Result<u64> {
        self.file.read_uint(self.layout.sh_entsize, HALF_SIZE)
    }

    /// `e_shnum`
    pub fn section_header_count(&self) -> Result<u64> {
        self.file.read_uint(self.layout.sh_num, HALF_SIZE)
    }

    /// `e_shstrndx`
    pub fn string_table_index(&self) -> Result<u64> {
        self.file.read_uint(self.layout.sh_strndx, HALF_SIZE)
    }
}
