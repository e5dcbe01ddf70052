//! Checksum algorithms used across YPF engine versions
//!
//! Three independent 32-bit hashes appear in the wild: a zlib-style Adler-32
//! and a standard CRC-32 on legacy archives, and MurmurHash2 on engine
//! versions 479 and later. None of these are cryptographic; they exist for
//! table ordering and corruption detection only.

mod adler32;
mod crc32;
mod murmur2;

pub use adler32::adler32;
pub use crc32::crc32;
pub use murmur2::murmur2;

use std::io::Read;

/// Closed set of checksum algorithms selected by the version profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// zlib Adler-32 (legacy data checksum)
    Adler32,
    /// Standard reflected CRC-32 (legacy name checksum)
    Crc32,
    /// 32-bit MurmurHash2 with seed 0 (both checksums on v479+)
    Murmur2,
}

impl ChecksumKind {
    /// Algorithm name as printed by `info` output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Adler32 => "Adler32",
            Self::Crc32 => "Crc32",
            Self::Murmur2 => "MurmurHash2",
        }
    }

    /// Hash a byte slice.
    pub fn hash(self, data: &[u8]) -> u32 {
        match self {
            Self::Adler32 => adler32(data),
            Self::Crc32 => crc32(data),
            Self::Murmur2 => murmur2(data),
        }
    }

    /// Hash exactly `len` bytes read from `reader`.
    ///
    /// The window is materialised into a transient buffer so validation of a
    /// single entry never needs the whole archive in memory.
    pub fn hash_reader<R: Read>(self, reader: &mut R, len: usize) -> std::io::Result<u32> {
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        Ok(self.hash(&buf))
    }
}
