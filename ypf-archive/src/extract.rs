//! Archive extraction and inspection pipeline
//!
//! Both operations parse the header table, then walk the content region in
//! ascending offset order. Extraction materializes every file under a
//! destination directory; inspection prints the table and runs the same
//! validation pass with the output discarded.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compress;
use crate::entry::ArchiveEntry;
use crate::header::ArchiveHeader;
use crate::profile::VersionProfile;
use crate::{Error, Result};

/// Extract every entry of the archive at `input_file` into `output_dir`.
///
/// Directories are created on demand; the synthetic `.ycg` suffix is
/// restored for YCG entries. Stored paths that would escape `output_dir`
/// are rejected.
pub fn extract_archive(input_file: &Path, output_dir: &Path) -> Result<()> {
    info!(
        archive = %input_file.display(),
        output = %output_dir.display(),
        "extracting archive"
    );

    let file = File::open(input_file)?;
    let mut reader = BufReader::new(file);
    let mut header = ArchiveHeader::read_from(&mut reader)?;

    // Deduplicated entries can share an offset; walking in offset order
    // avoids backward seeks but changes nothing about correctness
    header.entries.sort_by_key(|e| e.offset);

    let count = header.entries.len();
    for (i, entry) in header.entries.iter().enumerate() {
        debug!(name = %entry.file_name, "[{}/{count}] extracting", i + 1);

        let data = read_entry_content(&mut reader, &header.profile, entry)?;

        let destination = output_dir.join(sanitized_relative_path(&entry.disk_name())?);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(destination, data)?;
    }

    info!(count, "archive extracted");

    Ok(())
}

/// Print the header and every entry of the archive at `input_file`, then
/// validate all content checksums unless `skip_data_check` is set.
pub fn inspect_archive(input_file: &Path, skip_data_check: bool) -> Result<()> {
    info!(archive = %input_file.display(), "inspecting archive");

    let file = File::open(input_file)?;
    let mut reader = BufReader::new(file);
    let mut header = ArchiveHeader::read_from(&mut reader)?;

    println!("[HEADER]");
    println!("Version: {}", header.profile.version());
    println!("Files Count: {}", header.entries.len());
    println!("Header Size: {}", header.header_size);
    println!(
        "Name Checksum Algorithm: {}",
        header.profile.name_checksum().name()
    );
    println!(
        "Data Checksum Algorithm: {}",
        header.profile.data_checksum().name()
    );
    println!(
        "Filename Encryption Key: {:02x}",
        header.profile.filename_key()
    );
    println!();

    println!("[FILES]");
    let count = header.entries.len();
    for (i, entry) in header.entries.iter().enumerate() {
        println!("[{}/{count}]", i + 1);
        println!("\tFilename: {}", entry.file_name);
        println!("\tCompressed: {}", entry.is_compressed);
        println!("\tSize: {}", entry.raw_size);
        println!("\tCompressed Size: {}", entry.compressed_size);
        println!("\tOffset: {}", entry.offset);
        println!("\tType: {}", entry.file_type.name());
        println!("\tName Checksum: {:08x}", entry.name_checksum);
        println!("\tData Checksum: {:08x}", entry.data_checksum);
        println!();
    }

    if !skip_data_check {
        println!("[DATA]");
        print!("Checking Data Checksum...");

        header.entries.sort_by_key(|e| e.offset);
        for entry in &header.entries {
            // Same validation as extraction, output discarded
            read_entry_content(&mut reader, &header.profile, entry)?;
        }

        println!(" Complete");
    }

    Ok(())
}

/// Read one entry's stored bytes, validate the data checksum, and return the
/// decompressed content.
fn read_entry_content<R: Read + Seek>(
    reader: &mut R,
    profile: &VersionProfile,
    entry: &ArchiveEntry,
) -> Result<Vec<u8>> {
    reader.seek(SeekFrom::Start(entry.offset))?;

    let mut stored = vec![0u8; entry.compressed_size as usize];
    reader.read_exact(&mut stored)?;

    let computed = profile.data_checksum().hash(&stored);
    if computed != entry.data_checksum {
        return Err(Error::DataChecksumMismatch {
            name: entry.file_name.clone(),
            stored: entry.data_checksum,
            computed,
        });
    }

    if entry.is_compressed {
        compress::decompress(&stored, entry.raw_size, &entry.file_name)
    } else {
        Ok(stored)
    }
}

/// Turn a stored `\`-separated name into a relative path that cannot escape
/// the extraction directory.
fn sanitized_relative_path(stored_name: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for component in stored_name.split(['\\', '/']) {
        if component.is_empty() || component == "." || component == ".." || component.contains(':')
        {
            return Err(Error::UnsafeFileName(stored_name.to_string()));
        }
        path.push(component);
    }
    Ok(path)
}
