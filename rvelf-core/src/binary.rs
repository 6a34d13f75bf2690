use crate::buffer::ByteView;
use crate::error::{ElfError, Result};
use crate::header::{AddressWidth, FileHeader};
use crate::sections::{Section, SectionHeader, SectionHeaderTable, StringTable};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Name of the section holding executable code.
pub const TEXT_SECTION: &str = ".text";

/// Advisory attached to an otherwise successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// No section is named `.text`; the bytecode is empty.
    MissingTextSection,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::MissingTextSection => write!(f, "no {TEXT_SECTION} section found in ELF"),
        }
    }
}

/// What a parse extracts from an ELF file. Owns its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedElf {
    pub address_width: AddressWidth,
    pub text_bytecode: Vec<u8>,
    pub advisory: Option<Advisory>,
}

impl ParsedElf {
    pub fn has_text(&self) -> bool {
        self.advisory != Some(Advisory::MissingTextSection)
    }
}

/// Walks the section header table of an in-memory ELF image.
///
/// Construction resolves the address width, the section header table and the
/// section name string table; every later lookup is bounds-checked against
/// the original buffer.
#[derive(Debug, Clone, Copy)]
pub struct ElfSectionWalker<'a> {
    file: ByteView<'a>,
    header: FileHeader<'a>,
    table: SectionHeaderTable<'a>,
    names: StringTable<'a>,
}

impl<'a> ElfSectionWalker<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let file = ByteView::new(bytes);
        let header = FileHeader::read(file)?;
        let table = SectionHeaderTable::locate(file, &header)?;
        let names = table.string_table(file, header.string_table_index()?)?;

        Ok(Self {
            file,
            header,
            table,
            names,
        })
    }

    pub fn address_width(&self) -> AddressWidth {
        self.header.address_width()
    }

    pub fn section_headers(&self) -> &SectionHeaderTable<'a> {
        &self.table
    }

    pub fn section_name(&self, section: &SectionHeader<'a>) -> Result<&'a [u8]> {
        self.names.name_at(section.name_offset()?)
    }

    /// First section called `name`, in on-disk order.
    pub fn find_section(&self, name: &str) -> Result<Option<SectionHeader<'a>>> {
        for section in self.table.iter() {
            let section = section?;
            let section_name = self.section_name(&section)?;
            log::trace!(
                "section {}: {:?}",
                section.index(),
                String::from_utf8_lossy(section_name)
            );
            if section_name == name.as_bytes() {
                return Ok(Some(section));
            }
        }
        Ok(None)
    }

    /// The `sh_size` bytes at `sh_offset`, borrowed from the input.
    pub fn section_data(&self, section: &SectionHeader<'a>) -> Result<&'a [u8]> {
        let offset = section.data_offset()?;
        let size = section.data_size()?;
        Ok(self.file.view(offset, size)?.as_bytes())
    }

    pub fn text(&self) -> Result<Option<&'a [u8]>> {
        match self.find_section(TEXT_SECTION)? {
            Some(section) => {
                let data = self.section_data(&section)?;
                log::info!(
                    "{TEXT_SECTION} is section {} ({} bytes)",
                    section.index(),
                    data.len()
                );
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Summaries of every section header.
    pub fn sections(&self) -> Result<Vec<Section>> {
        self.table
            .iter()
            .map(|section| {
                let section = section?;
                Ok(Section {
                    index: section.index(),
                    name: String::from_utf8_lossy(self.section_name(&section)?).into_owned(),
                    file_offset: section.data_offset()?,
                    size: section.data_size()?,
                })
            })
            .collect()
    }
}

/// Extracts the `.text` section from an ELF image.
///
/// An image without `.text` parses successfully with empty bytecode and
/// [`Advisory::MissingTextSection`].
pub fn parse(bytes: &[u8]) -> Result<ParsedElf> {
    if bytes.is_empty() {
        return Err(ElfError::EmptyInput);
    }

    let walker = ElfSectionWalker::new(bytes)?;
    let address_width = walker.address_width();

    match walker.text()? {
        Some(text) => Ok(ParsedElf {
            address_width,
            text_bytecode: text.to_vec(),
            advisory: None,
        }),
        None => {
            let advisory = Advisory::MissingTextSection;
            log::warn!("{advisory}");
            Ok(ParsedElf {
                address_width,
                text_bytecode: Vec::new(),
                advisory: Some(advisory),
            })
        }
    }
}

/// Reads a whole file into memory. An empty file is [`ElfError::EmptyInput`].
pub fn read_raw_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| ElfError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(io_error)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(io_error)?;
    log::debug!("read {} bytes from {}", buf.len(), path.display());

    if buf.is_empty() {
        return Err(ElfError::EmptyInput);
    }
    Ok(buf)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedElf> {
    parse(&read_raw_bytes(path)?)
}
