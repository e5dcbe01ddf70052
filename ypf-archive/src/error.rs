//! Error types for YPF archive parsing and creation

use thiserror::Error;

/// Result type for YPF archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// YPF archive error types
///
/// Every variant is fatal for the archive being processed; callers decide
/// whether to continue with the next queued archive.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Engine version outside the supported [234, 500] range
    #[error("Engine version {0} is not supported (expected 234..=500)")]
    UnsupportedVersion(i32),

    /// Invalid archive magic bytes
    #[error("Invalid archive signature: expected 'YPF\\0', got {0:?}")]
    InvalidSignature([u8; 4]),

    /// Non-positive file count in the header
    #[error("Invalid file count: {0}")]
    InvalidFileCount(i32),

    /// Non-positive header/table size in the header
    #[error("Invalid header size: {0}")]
    InvalidHeaderSize(i32),

    /// Serialized table did not end at the declared header size
    #[error("Header size mismatch: declared {declared} bytes, table ended at {actual}")]
    HeaderSizeMismatch { declared: u64, actual: u64 },

    /// File type byte outside the known enum range
    #[error("Unknown file type byte: {0:#04x}")]
    UnknownFileType(u8),

    /// Stored name checksum disagrees with the recomputed one
    #[error("Name checksum mismatch for '{name}': stored {stored:08x}, computed {computed:08x}")]
    NameChecksumMismatch {
        name: String,
        stored: u32,
        computed: u32,
    },

    /// Stored data checksum disagrees with the recomputed one
    #[error("Data checksum mismatch for '{name}': stored {stored:08x}, computed {computed:08x}")]
    DataChecksumMismatch {
        name: String,
        stored: u32,
        computed: u32,
    },

    /// Decompressed payload length differs from the recorded raw size
    #[error("Decompressed size mismatch for '{name}': expected {expected} bytes, got {actual}")]
    DecompressedSizeMismatch {
        name: String,
        expected: u32,
        actual: u64,
    },

    /// Zlib inflation failed
    #[error("Decompression failed: {0}")]
    Decompress(String),

    /// Source file exceeds the 32-bit size field
    #[error("File '{0}' exceeds the 32-bit size limit of this archive version")]
    FileTooLarge(String),

    /// Content offset exceeds the 32-bit offset field of legacy versions
    #[error("Offset {0:#x} exceeds the 32-bit limit of this archive version")]
    OffsetOverflow(u64),

    /// Encoded filename longer than the single stored length byte allows
    #[error("Encoded filename '{name}' is {len} bytes, limit is 255")]
    NameTooLong { name: String, len: usize },

    /// Filename cannot be represented in Shift-JIS
    #[error("Filename '{0}' cannot be encoded as Shift-JIS")]
    NameEncoding(String),

    /// Logical filename is empty after suffix stripping
    #[error("Empty logical filename (source file '{0}')")]
    EmptyFileName(String),

    /// Two source files collapse to the same logical filename
    #[error("Duplicate filename in archive: '{0}'")]
    DuplicateFileName(String),

    /// Stored filename escapes the extraction directory
    #[error("Refusing to extract unsafe path '{0}'")]
    UnsafeFileName(String),
}
