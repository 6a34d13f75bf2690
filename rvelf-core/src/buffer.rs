//! Bounds-checked, read-only windows over a byte buffer.
//!
//! Every sub-view remembers where it starts in the original buffer, so range
//! errors raised deep inside a section header still point at absolute file
//! offsets.

use crate::error::{ElfError, Result};
use byteorder::{ByteOrder, LE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
    origin: u64,
}

impl<'a> ByteView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, origin: 0 }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offset of the first byte of this view within the original buffer.
    pub fn origin(&self) -> u64 {
        self.origin
    }

    fn limit(&self) -> u64 {
        self.origin + self.len()
    }

    /// Returns exactly `length` bytes starting at `start` (relative to this view).
    ///
    /// Fails with [`ElfError::OutOfRange`] if the window does not fit; a view
    /// is never truncated.
    pub fn view(&self, start: u64, length: u64) -> Result<ByteView<'a>> {
        let end = start
            .checked_add(length)
            .filter(|&end| end <= self.len())
            .ok_or_else(|| ElfError::OutOfRange {
                offset: self.origin.saturating_add(start),
                length,
                limit: self.limit(),
            })?;

        // `end <= self.len()`, so both casts are lossless.
        Ok(ByteView {
            bytes: &self.bytes[start as usize..end as usize],
            origin: self.origin + start,
        })
    }

    /// Decodes the whole view as a zero-extended little-endian integer.
    pub fn to_u64(self) -> Result<u64> {
        match self.bytes.len() {
            0 => Ok(0),
            n @ 1..=8 => Ok(LE::read_uint(self.bytes, n)),
            n => Err(ElfError::InvalidSize { size: n }),
        }
    }

    /// Shorthand for `self.view(start, width)?.to_u64()`.
    pub fn read_uint(&self, start: u64, width: u64) -> Result<u64> {
        self.view(start, width)?.to_u64()
    }

    /// Returns the bytes from `start` up to, not including, the next NUL.
    ///
    /// The scan is confined to this view. A string that reaches the end of
    /// the view without a terminator is reported as [`ElfError::OutOfRange`]
    /// covering the scanned bytes plus the missing terminator.
    pub fn c_str(&self, start: u64) -> Result<&'a [u8]> {
        let tail = self.view(start, self.len().saturating_sub(start))?;
        match tail.bytes.iter().position(|&b| b == 0) {
            Some(end) => Ok(&tail.bytes[..end]),
            None => Err(ElfError::OutOfRange {
                offset: tail.origin,
                length: tail.len() + 1,
                limit: self.limit(),
            }),
        }
    }
}
