//! Archive entry model

use crate::{Error, Result};

/// File type tag stored with every entry.
///
/// Derived from the source file's extension on create; unrecognized
/// extensions map to [`FileType::Text`]. YCG files are PNG images renamed by
/// the engine's converter, so their synthetic `.ycg` suffix is stripped from
/// the logical name and restored on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileType {
    Text = 0,
    Bmp = 1,
    Png = 2,
    Jpg = 3,
    Gif = 4,
    Wav = 5,
    Ogg = 6,
    Psd = 7,
    Ycg = 8,
    Psb = 9,
}

impl FileType {
    /// Map a lowercase file extension (without dot) to its type tag.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "bmp" => Self::Bmp,
            "png" => Self::Png,
            "jpg" => Self::Jpg,
            "gif" => Self::Gif,
            "wav" => Self::Wav,
            "ogg" => Self::Ogg,
            "psd" => Self::Psd,
            "ycg" => Self::Ycg,
            "psb" => Self::Psb,
            _ => Self::Text,
        }
    }

    /// Lowercase tag name as printed by `info` output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bmp => "bmp",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Psd => "psd",
            Self::Ycg => "ycg",
            Self::Psb => "psb",
        }
    }
}

impl TryFrom<u8> for FileType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::Text,
            1 => Self::Bmp,
            2 => Self::Png,
            3 => Self::Jpg,
            4 => Self::Gif,
            5 => Self::Wav,
            6 => Self::Ogg,
            7 => Self::Psd,
            8 => Self::Ycg,
            9 => Self::Psb,
            other => return Err(Error::UnknownFileType(other)),
        })
    }
}

/// One stored file's metadata record within the archive table.
///
/// Built during the directory scan (create) or table parse (extract/inspect).
/// During the create write pass the size, offset and data checksum fields are
/// filled in once per entry; a finalized entry is never mutated again.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Logical name, unique within the archive, `\`-separated.
    pub file_name: String,
    /// Hash of the encoded filename bytes, before obfuscation.
    pub name_checksum: u32,
    /// Hash of the bytes as physically stored (compressed form if
    /// `is_compressed`, raw form otherwise).
    pub data_checksum: u32,
    /// Uncompressed content length.
    pub raw_size: u32,
    /// Stored content length (equals `raw_size` when not compressed).
    pub compressed_size: u32,
    /// Whether the stored bytes are zlib-compressed.
    pub is_compressed: bool,
    /// Type tag derived from the source extension.
    pub file_type: FileType,
    /// Byte position of the stored content within the archive file.
    /// Deduplicated entries share the offset of the first identical payload.
    pub offset: u64,
}

impl ArchiveEntry {
    /// New entry with only the scan-phase fields populated.
    pub fn new(file_name: String, name_checksum: u32, file_type: FileType) -> Self {
        Self {
            file_name,
            name_checksum,
            data_checksum: 0,
            raw_size: 0,
            compressed_size: 0,
            is_compressed: false,
            file_type,
            offset: 0,
        }
    }

    /// Name of the source/destination file on disk, with the synthetic
    /// `.ycg` suffix restored for YCG entries.
    pub fn disk_name(&self) -> String {
        if self.file_type == FileType::Ycg {
            format!("{}.ycg", self.file_name)
        } else {
            self.file_name.clone()
        }
    }
}
