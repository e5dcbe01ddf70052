//! Zlib compression collaborator
//!
//! Content is stored either raw or as a zlib stream; the archive format does
//! not care how the stream was produced. Level 9 matches what the engine's
//! own tooling emits.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::trace;

use crate::{Error, Result};

/// Compress `data` into a zlib stream.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;

    trace!("zlib: {} bytes -> {} bytes", data.len(), compressed.len());
    Ok(compressed)
}

/// Decompress a zlib stream, verifying the result is exactly
/// `expected_len` bytes.
pub fn decompress(data: &[u8], expected_len: u32, name: &str) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::with_capacity(expected_len as usize);

    decoder
        .read_to_end(&mut result)
        .map_err(|e| Error::Decompress(format!("zlib inflation failed for '{name}': {e}")))?;

    if result.len() as u64 != u64::from(expected_len) {
        return Err(Error::DecompressedSizeMismatch {
            name: name.to_string(),
            expected: expected_len,
            actual: result.len() as u64,
        });
    }

    Ok(result)
}
