use crate::buffer::ByteView;
use crate::error::{ElfError, Result};
use crate::header::layout::NAME_SIZE;
use crate::header::{FileHeader, OffsetTable};

/// One entry of the section header table, viewed in place.
#[derive(Debug, Clone, Copy)]
pub struct SectionHeader<'a> {
    index: u64,
    entry: ByteView<'a>,
    layout: &'static OffsetTable,
}

impl<'a> SectionHeader<'a> {
    pub fn index(&self) -> u64 {
        self.index
    }

    /// `sh_name`
    pub fn name_offset(&self) -> Result<u64> {
        self.entry.read_uint(self.layout.entry_name, NAME_SIZE)
    }

    /// `sh_offset`
    pub fn data_offset(&self) -> Result<u64> {
        self.entry
            .read_uint(self.layout.entry_data_offset, self.layout.word_size)
    }

    /// `sh_size`
    pub fn data_size(&self) -> Result<u64> {
        self.entry
            .read_uint(self.layout.entry_data_size, self.layout.word_size)
    }
}

/// The section header array, `e_shnum` entries of `e_shentsize` bytes each.
#[derive(Debug, Clone, Copy)]
pub struct SectionHeaderTable<'a> {
    view: ByteView<'a>,
    count: u64,
    entry_size: u64,
    layout: &'static OffsetTable,
}

impl<'a> SectionHeaderTable<'a> {
    /// Slices the table out of `file` using the offsets from `header`.
    pub fn locate(file: ByteView<'a>, header: &FileHeader<'a>) -> Result<Self> {
        let offset = header.section_header_offset()?;
        let count = header.section_header_count()?;
        let entry_size = header.section_header_entry_size()?;
        log::debug!("section header table at {offset:#x}: {count} entries of {entry_size} bytes");

        // Both factors are 16-bit fields, the product cannot overflow.
        let view = file.view(offset, count * entry_size)?;
        Ok(Self {
            view,
            count,
            entry_size,
            layout: header.layout(),
        })
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, index: u64) -> Result<SectionHeader<'a>> {
        if index >= self.count {
            return Err(ElfError::InvalidIndex {
                index,
                count: self.count,
            });
        }
        Ok(SectionHeader {
            index,
            entry: self.view.view(index * self.entry_size, self.entry_size)?,
            layout: self.layout,
        })
    }

    /// Entries in on-disk order.
    pub fn iter(&self) -> impl Iterator<Item = Result<SectionHeader<'a>>> + '_ {
        (0..self.count).map(move |index| self.get(index))
    }

    /// Resolves the section name string table stored at entry `index`.
    pub fn string_table(&self, file: ByteView<'a>, index: u64) -> Result<StringTable<'a>> {
        let base = self.get(index)?.data_offset()?;
        log::debug!("section name string table is section {index}, based at {base:#x}");
        Ok(StringTable { file, base })
    }
}

/// NUL-terminated names addressed relative to the start of the string table
/// section. Lookups are bounded by the end of the file, not by `sh_size`.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    file: ByteView<'a>,
    base: u64,
}

impl<'a> StringTable<'a> {
    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn name_at(&self, offset: u64) -> Result<&'a [u8]> {
        let start = self
            .base
            .checked_add(offset)
            .ok_or(ElfError::OutOfRange {
                offset: self.base,
                length: offset,
                limit: self.file.len(),
            })?;
        self.file.c_str(start)
    }
}

/// Owned summary of one section, detached from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub index: u64,
    pub name: String,
    pub file_offset: u64,
    pub size: u64,
}
