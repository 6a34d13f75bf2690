use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while pulling a section out of an ELF image.
///
/// Offsets and limits are absolute file offsets so a malformed file can be
/// inspected with a hex editor at the reported position.
#[derive(Debug, Error)]
pub enum ElfError {
    /// The file could not be read into memory.
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input buffer has zero length.
    #[error("input is empty")]
    EmptyInput,

    /// The class byte (`e_ident[EI_CLASS]`) is neither ELFCLASS32 nor ELFCLASS64.
    #[error("unsupported ELF class {class:#x}, expected 1 (32-bit) or 2 (64-bit)")]
    UnsupportedClass { class: u8 },

    /// A computed range `offset..offset + length` runs past `limit`.
    #[error("range {offset:#x}+{length:#x} runs past end of buffer at {limit:#x}")]
    OutOfRange { offset: u64, length: u64, limit: u64 },

    /// `e_shstrndx` (or a caller-supplied index) is not a real section header.
    #[error("section header index {index} out of range, table has {count} entries")]
    InvalidIndex { index: u64, count: u64 },

    /// An integer view wider than 8 bytes.
    #[error("cannot decode {size} bytes as an unsigned integer (max 8)")]
    InvalidSize { size: usize },

    /// A field offset was requested before the address width was known.
    #[error("address width has not been determined")]
    UnknownAddressWidth,
}

pub type Result<T, E = ElfError> = std::result::Result<T, E>;
