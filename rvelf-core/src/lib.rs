pub mod analyze;
pub mod binary;
pub mod buffer;
pub mod error;
pub mod header;
pub mod sections;

pub use analyze::*;
pub use binary::*;
pub use buffer::ByteView;
pub use error::{ElfError, Result};
pub use header::{AddressWidth, FileHeader, OffsetTable};
pub use sections::*;
