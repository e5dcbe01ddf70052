//! Archive creation pipeline
//!
//! Packs a directory tree into a single archive in two passes. The scan pass
//! builds the entry table (logical names, type tags, name checksums) and the
//! exact header size. The write pass streams each file's content — compressed
//! when that actually wins — past the reserved header region, deduplicating
//! byte-identical payloads, then seeks back and emits the table.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::compress;
use crate::entry::{ArchiveEntry, FileType};
use crate::header::{ArchiveHeader, PREAMBLE_SIZE};
use crate::name;
use crate::profile::VersionProfile;
use crate::{Error, Result};

/// Pack the contents of `source_dir` into a new archive at `output_file`,
/// laid out for engine `version`.
pub fn create_archive(source_dir: &Path, output_file: &Path, version: i32) -> Result<()> {
    let profile = VersionProfile::resolve(version)?;

    info!(
        source = %source_dir.display(),
        output = %output_file.display(),
        version,
        "creating archive"
    );

    let (mut entries, header_size) = scan_source_tree(source_dir, &profile)?;

    // On-disk table order; ties keep scan order (stable sort) so output is
    // reproducible for identical inputs
    entries.sort_by_key(|e| e.name_checksum);

    let file = File::create(output_file)?;
    let mut writer = BufWriter::new(file);

    // Content goes first, past the reserved header region
    writer.seek(SeekFrom::Start(header_size))?;

    for i in 0..entries.len() {
        write_entry_content(source_dir, &profile, &mut entries, i, &mut writer)?;
    }

    debug!("finalizing header");

    writer.seek(SeekFrom::Start(0))?;
    let header = ArchiveHeader {
        profile,
        header_size,
        entries,
    };
    header.write_to(&mut writer)?;
    writer.flush()?;

    info!(
        count = header.entries.len(),
        "archive created"
    );

    Ok(())
}

/// Enumerate the source tree into scan-phase entries and compute the exact
/// serialized header size.
fn scan_source_tree(
    source_dir: &Path,
    profile: &VersionProfile,
) -> Result<(Vec<ArchiveEntry>, u64)> {
    let mut entries: Vec<ArchiveEntry> = Vec::new();
    let mut header_size = PREAMBLE_SIZE;

    // Sorted traversal keeps enumeration order platform-independent
    let walker = WalkDir::new(source_dir).sort_by_file_name();
    for dir_entry in walker {
        let dir_entry = dir_entry.map_err(|e| Error::Io(e.into()))?;
        if !dir_entry.file_type().is_file() {
            continue;
        }

        // Walkdir only yields paths under its root, so this cannot fail in
        // practice; propagate rather than panic regardless
        let rel = dir_entry.path().strip_prefix(source_dir).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        let disk_name = rel
            .to_str()
            .ok_or_else(|| Error::NameEncoding(rel.to_string_lossy().into_owned()))?;

        // Archives store the engine's native backslash separators
        let disk_name = disk_name.replace('/', "\\");

        let extension = disk_name
            .rsplit('.')
            .next()
            .filter(|ext| ext.len() < disk_name.len())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let file_type = FileType::from_extension(&extension);

        // The .ycg suffix is synthetic; the engine addresses the file by the
        // name underneath it
        let file_name = if file_type == FileType::Ycg {
            disk_name[..disk_name.len() - 4].to_string()
        } else {
            disk_name
        };

        // A bare ".ycg" strips down to nothing
        if file_name.is_empty() {
            return Err(Error::EmptyFileName(rel.to_string_lossy().into_owned()));
        }

        // A PNG and its YCG twin collapse to the same logical name
        if entries.iter().any(|e| e.file_name == file_name) {
            return Err(Error::DuplicateFileName(file_name));
        }

        let encoded = name::encode_name(&file_name)?;
        let name_checksum = profile.name_checksum().hash(&encoded);

        header_size += profile.entry_record_size(encoded.len());
        entries.push(ArchiveEntry::new(file_name, name_checksum, file_type));
    }

    Ok((entries, header_size))
}

/// Read, compress and store one entry's content, finalizing its table fields.
///
/// Entries before `index` are already finalized; the dedup scan only reads
/// those. The entry at `index` is filled in with a single assignment at the
/// end so no other scan ever observes a half-filled record.
fn write_entry_content<W: Write + Seek>(
    source_dir: &Path,
    profile: &VersionProfile,
    entries: &mut [ArchiveEntry],
    index: usize,
    writer: &mut W,
) -> Result<()> {
    let entry = &entries[index];
    debug!(name = %entry.file_name, "adding");

    let source_path = source_dir.join(entry.disk_name().replace('\\', std::path::MAIN_SEPARATOR_STR));
    let raw = std::fs::read(&source_path)?;

    if raw.len() as u64 > i32::MAX as u64 {
        return Err(Error::FileTooLarge(entry.file_name.clone()));
    }
    let raw_size = raw.len() as u32;

    // Store compressed only when it is strictly smaller
    let compressed = compress::compress(&raw)?;
    let (candidate, is_compressed) = if compressed.len() < raw.len() {
        (compressed, true)
    } else {
        (raw, false)
    };

    let data_checksum = profile.data_checksum().hash(&candidate);

    // Identical stored bytes are written once; both entries then point at
    // the same offset. Checksumming the candidate (post-compression) form
    // means a shared offset/compressedSize pair is valid for both.
    let duplicate = entries[..index]
        .iter()
        .find(|e| e.data_checksum == data_checksum && e.raw_size == raw_size)
        .map(|e| e.offset);

    let offset = match duplicate {
        Some(offset) => {
            debug!(name = %entries[index].file_name, offset, "deduplicated");
            offset
        }
        None => {
            let offset = writer.stream_position()?;
            writer.write_all(&candidate)?;
            offset
        }
    };

    if !profile.wide_offsets() {
        let position = writer.stream_position()?;
        if position > i32::MAX as u64 {
            return Err(Error::OffsetOverflow(position));
        }
    }

    let entry = &mut entries[index];
    entry.raw_size = raw_size;
    entry.compressed_size = candidate.len() as u32;
    entry.is_compressed = is_compressed;
    entry.data_checksum = data_checksum;
    entry.offset = offset;

    Ok(())
}
