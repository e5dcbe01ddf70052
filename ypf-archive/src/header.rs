//! Archive header and entry table codec
//!
//! On-disk layout, all integers little-endian:
//!
//! | Offset | Field                | Size     |
//! |--------|----------------------|----------|
//! | 0      | magic `"YPF\0"`      | 4        |
//! | 4      | version              | 4        |
//! | 8      | entry count          | 4        |
//! | 12     | header/table size    | 4        |
//! | 16     | reserved             | 16       |
//! | 32     | entry table          | variable |
//!
//! Each table record: nameChecksum(4) + lengthByte(1) + obfuscatedName(N) +
//! type(1) + isCompressed(1) + rawSize(4) + compressedSize(4) + offset(4|8) +
//! dataChecksum(4). Entries are ordered by ascending name checksum.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::entry::{ArchiveEntry, FileType};
use crate::name;
use crate::profile::VersionProfile;
use crate::{Error, Result};

/// YPF magic bytes
pub const MAGIC: [u8; 4] = *b"YPF\0";

/// Size of the fixed preamble before the entry table.
pub const PREAMBLE_SIZE: u64 = 32;

/// Parsed archive preamble and entry table.
#[derive(Debug)]
pub struct ArchiveHeader {
    /// Format rules resolved from the archive's version field.
    pub profile: VersionProfile,
    /// Declared byte length of preamble + entry table; content starts here.
    pub header_size: u64,
    /// Entries in on-disk table order.
    pub entries: Vec<ArchiveEntry>,
}

impl ArchiveHeader {
    /// Parse the preamble and entry table from the start of `reader`.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(Error::InvalidSignature(magic));
        }

        let version = reader.read_i32::<LittleEndian>()?;
        let profile = VersionProfile::resolve(version)?;

        let count = reader.read_i32::<LittleEndian>()?;
        let header_size = reader.read_i32::<LittleEndian>()?;

        if count <= 0 {
            return Err(Error::InvalidFileCount(count));
        }
        if header_size <= 0 {
            return Err(Error::InvalidHeaderSize(header_size));
        }

        reader.seek(SeekFrom::Current(16))?;

        debug!(version, count, header_size, "parsed archive preamble");

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(read_entry(reader, &profile)?);
        }

        // The declared size must land exactly at the end of the table
        let actual = reader.stream_position()?;
        if actual != header_size as u64 {
            return Err(Error::HeaderSizeMismatch {
                declared: header_size as u64,
                actual,
            });
        }

        Ok(Self {
            profile,
            header_size: header_size as u64,
            entries,
        })
    }

    /// Serialize the preamble and entry table at the start of `writer`.
    ///
    /// Entries must already be in ascending name-checksum order with all
    /// fields finalized. Fails with [`Error::HeaderSizeMismatch`] if the
    /// table does not end exactly at the declared size.
    pub fn write_to<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_i32::<LittleEndian>(self.profile.version())?;
        writer.write_i32::<LittleEndian>(self.entries.len() as i32)?;
        writer.write_i32::<LittleEndian>(self.header_size as i32)?;
        writer.write_all(&[0u8; 16])?;

        for entry in &self.entries {
            write_entry(writer, &self.profile, entry)?;
        }

        let actual = writer.stream_position()?;
        if actual != self.header_size {
            return Err(Error::HeaderSizeMismatch {
                declared: self.header_size,
                actual,
            });
        }

        debug!(
            version = self.profile.version(),
            count = self.entries.len(),
            header_size = self.header_size,
            "wrote archive header"
        );

        Ok(())
    }
}

fn read_entry<R: Read>(reader: &mut R, profile: &VersionProfile) -> Result<ArchiveEntry> {
    let name_checksum = reader.read_u32::<LittleEndian>()?;

    let stored_len = reader.read_u8()?;
    let name_len = name::deobfuscate_length(profile, stored_len);

    let mut encoded_name = vec![0u8; name_len as usize];
    reader.read_exact(&mut encoded_name)?;
    name::deobfuscate_name(profile, &mut encoded_name);

    let type_byte = reader.read_u8()?;
    let is_compressed = reader.read_u8()? == 1;
    let raw_size = reader.read_u32::<LittleEndian>()?;
    let compressed_size = reader.read_u32::<LittleEndian>()?;

    let offset = if profile.wide_offsets() {
        reader.read_u64::<LittleEndian>()?
    } else {
        u64::from(reader.read_u32::<LittleEndian>()?)
    };

    let data_checksum = reader.read_u32::<LittleEndian>()?;

    // The stored checksum covers the encoded name before obfuscation
    let computed = profile.name_checksum().hash(&encoded_name);
    let file_name = name::decode_name(&encoded_name)?;
    if computed != name_checksum {
        return Err(Error::NameChecksumMismatch {
            name: file_name,
            stored: name_checksum,
            computed,
        });
    }

    let file_type = FileType::try_from(type_byte)?;

    Ok(ArchiveEntry {
        file_name,
        name_checksum,
        data_checksum,
        raw_size,
        compressed_size,
        is_compressed,
        file_type,
        offset,
    })
}

fn write_entry<W: Write>(
    writer: &mut W,
    profile: &VersionProfile,
    entry: &ArchiveEntry,
) -> Result<()> {
    writer.write_u32::<LittleEndian>(entry.name_checksum)?;

    let mut encoded_name = name::encode_name(&entry.file_name)?;
    writer.write_u8(name::obfuscate_length(profile, encoded_name.len() as u8))?;
    name::obfuscate_name(profile, &mut encoded_name);
    writer.write_all(&encoded_name)?;

    writer.write_u8(entry.file_type as u8)?;
    writer.write_u8(u8::from(entry.is_compressed))?;
    writer.write_u32::<LittleEndian>(entry.raw_size)?;
    writer.write_u32::<LittleEndian>(entry.compressed_size)?;

    if profile.wide_offsets() {
        writer.write_u64::<LittleEndian>(entry.offset)?;
    } else {
        writer.write_u32::<LittleEndian>(entry.offset as u32)?;
    }

    writer.write_u32::<LittleEndian>(entry.data_checksum)?;

    Ok(())
}
