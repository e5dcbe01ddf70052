//! Port of Austin Appleby's [MurmurHash2][0] to Rust.
//!
//! YPF versions 479 and later use this for both name and data checksums,
//! always with seed 0. The algorithm reads 4-byte little-endian blocks, so
//! its output is endian-sensitive by construction; the engine only ever ran
//! on little-endian machines and we reproduce that behaviour exactly.
//!
//! [0]: https://github.com/aappleby/smhasher/blob/master/src/MurmurHash2.cpp

/// Multiply constant, generated offline by the original author.
const M: u32 = 0x5bd1e995;
/// Shift constant.
const R: u32 = 24;

/// Compute the 32-bit MurmurHash2 of `data` with seed 0.
///
/// Zero-length input hashes to 0: the initial value `seed ^ len` is 0 and
/// passes through finalization unchanged.
pub fn murmur2(data: &[u8]) -> u32 {
    let seed: u32 = 0;
    let mut h = seed ^ (data.len() as u32);

    let mut chunks = data.chunks_exact(4);
    for block in &mut chunks {
        // chunks_exact guarantees 4-byte blocks
        let mut k = u32::from_le_bytes(block.try_into().unwrap());

        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h = h.wrapping_mul(M);
        h ^= k;
    }

    // Fold in the 1-3 remaining tail bytes
    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    // Final avalanche so the last bytes are well incorporated
    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;

    h
}
