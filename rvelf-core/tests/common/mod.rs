//! Builds small but well-formed little-endian ELF images for tests.

#![allow(dead_code)]

use byteorder::{ByteOrder, LE};

pub const SHT_PROGBITS: u64 = 1;
pub const SHT_STRTAB: u64 = 3;
pub const SHF_ALLOC_EXECINSTR: u64 = 0x6;
pub const EM_RISCV: u64 = 243;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    fn ehdr_size(self) -> usize {
        match self {
            Class::Elf32 => 52,
            Class::Elf64 => 64,
        }
    }

    fn shdr_size(self) -> usize {
        match self {
            Class::Elf32 => 40,
            Class::Elf64 => 64,
        }
    }

    fn word(self) -> usize {
        match self {
            Class::Elf32 => 4,
            Class::Elf64 => 8,
        }
    }
}

#[derive(Debug, Clone)]
struct SectionLayout {
    name: String,
    kind: u64,
    flags: u64,
    offset: Option<usize>,
    data: Vec<u8>,
}

/// Lays out: file header, section contents, `.shstrtab`, then the section
/// header table (null entry, user sections, `.shstrtab`).
#[derive(Debug, Clone)]
pub struct ElfBuilder {
    class: Class,
    sections: Vec<SectionLayout>,
    shstrndx: Option<u16>,
    shoff: Option<u64>,
}

impl ElfBuilder {
    pub fn new(class: Class) -> Self {
        Self {
            class,
            sections: Vec::new(),
            shstrndx: None,
            shoff: None,
        }
    }

    pub fn code(self, name: &str, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, SHF_ALLOC_EXECINSTR, None, data)
    }

    pub fn code_at(self, name: &str, offset: usize, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, SHF_ALLOC_EXECINSTR, Some(offset), data)
    }

    pub fn data(self, name: &str, data: &[u8]) -> Self {
        self.push(name, SHT_PROGBITS, 0x3, None, data)
    }

    pub fn shstrndx(mut self, index: u16) -> Self {
        self.shstrndx = Some(index);
        self
    }

    pub fn shoff(mut self, offset: u64) -> Self {
        self.shoff = Some(offset);
        self
    }

    fn push(mut self, name: &str, kind: u64, flags: u64, offset: Option<usize>, data: &[u8]) -> Self {
        self.sections.push(SectionLayout {
            name: name.to_string(),
            kind,
            flags,
            offset,
            data: data.to_vec(),
        });
        self
    }

    /// Number of section header entries the image will contain.
    pub fn section_count(&self) -> usize {
        self.sections.len() + 2
    }

    pub fn build(&self) -> Vec<u8> {
        let class = self.class;
        let mut out = vec![0u8; class.ehdr_size()];
        let mut placed = Vec::with_capacity(self.sections.len());

        for section in &self.sections {
            let offset = section.offset.unwrap_or_else(|| align(out.len(), 4));
            if out.len() < offset + section.data.len() {
                out.resize(offset + section.data.len(), 0);
            }
            out[offset..offset + section.data.len()].copy_from_slice(&section.data);
            placed.push(offset);
        }

        let mut strtab = vec![0u8];
        let mut name_offsets = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            name_offsets.push(strtab.len());
            strtab.extend_from_slice(section.name.as_bytes());
            strtab.push(0);
        }
        let shstrtab_name = strtab.len();
        strtab.extend_from_slice(b".shstrtab\0");

        let strtab_offset = out.len();
        out.extend_from_slice(&strtab);

        let shoff = align(out.len(), 8);
        let count = self.section_count();
        out.resize(shoff + count * class.shdr_size(), 0);

        // index 0 stays all-zero (SHN_UNDEF)
        for (i, section) in self.sections.iter().enumerate() {
            let entry = shoff + (i + 1) * class.shdr_size();
            self.write_shdr(
                &mut out[entry..],
                name_offsets[i],
                section.kind,
                section.flags,
                placed[i],
                section.data.len(),
            );
        }
        let entry = shoff + (count - 1) * class.shdr_size();
        self.write_shdr(
            &mut out[entry..],
            shstrtab_name,
            SHT_STRTAB,
            0,
            strtab_offset,
            strtab.len(),
        );

        self.write_ehdr(&mut out, shoff as u64, count as u16);
        out
    }

    fn write_ehdr(&self, out: &mut [u8], shoff: u64, shnum: u16) {
        let class = self.class;
        out[..4].copy_from_slice(b"\x7fELF");
        out[4] = match class {
            Class::Elf32 => 1,
            Class::Elf64 => 2,
        };
        out[5] = 1; // little-endian
        out[6] = 1; // EV_CURRENT
        LE::write_u16(&mut out[16..], 1); // ET_REL
        LE::write_u16(&mut out[18..], EM_RISCV as u16);
        LE::write_u32(&mut out[20..], 1);

        let shoff = self.shoff.unwrap_or(shoff);
        let shstrndx = self.shstrndx.unwrap_or(shnum - 1);
        let (shoff_at, ehsize_at) = match class {
            Class::Elf32 => (32, 40),
            Class::Elf64 => (40, 52),
        };
        LE::write_uint(&mut out[shoff_at..], shoff, class.word());
        LE::write_u16(&mut out[ehsize_at..], class.ehdr_size() as u16);
        // e_phentsize, e_phnum stay zero; then e_shentsize, e_shnum, e_shstrndx
        LE::write_u16(&mut out[ehsize_at + 6..], class.shdr_size() as u16);
        LE::write_u16(&mut out[ehsize_at + 8..], shnum);
        LE::write_u16(&mut out[ehsize_at + 10..], shstrndx);
    }

    fn write_shdr(&self, entry: &mut [u8], name: usize, kind: u64, flags: u64, offset: usize, size: usize) {
        let word = self.class.word();
        LE::write_u32(&mut entry[0..], name as u32);
        LE::write_u32(&mut entry[4..], kind as u32);
        match self.class {
            Class::Elf32 => {
                LE::write_u32(&mut entry[8..], flags as u32);
                LE::write_uint(&mut entry[16..], offset as u64, word);
                LE::write_uint(&mut entry[20..], size as u64, word);
                LE::write_u32(&mut entry[32..], 1);
            }
            Class::Elf64 => {
                LE::write_u64(&mut entry[8..], flags);
                LE::write_uint(&mut entry[24..], offset as u64, word);
                LE::write_uint(&mut entry[32..], size as u64, word);
                LE::write_u64(&mut entry[48..], 1);
            }
        }
    }
}

fn align(value: usize, to: usize) -> usize {
    value.div_ceil(to) * to
}

/// Patches `sh_size` of section header `index`.
pub fn set_section_size(image: &mut [u8], class: Class, index: usize, size: u64) {
    let (shoff, entsize, size_at) = match class {
        Class::Elf32 => (LE::read_u32(&image[32..]) as usize, 40, 20),
        Class::Elf64 => (LE::read_u64(&image[40..]) as usize, 64, 32),
    };
    LE::write_uint(&mut image[shoff + index * entsize + size_at..], size, class.word());
}

/// Patches `sh_name` of section header `index`.
pub fn set_section_name(image: &mut [u8], class: Class, index: usize, name_offset: u32) {
    let (shoff, entsize) = match class {
        Class::Elf32 => (LE::read_u32(&image[32..]) as usize, 40),
        Class::Elf64 => (LE::read_u64(&image[40..]) as usize, 64),
    };
    LE::write_u32(&mut image[shoff + index * entsize..], name_offset);
}
