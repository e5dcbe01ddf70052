//! Standard reflected CRC-32 (the zlib/IEEE 802.3 construction).
//!
//! Legacy YPF versions hash encoded filenames with this before obfuscating
//! them. Polynomial 0xEDB88320, initial value and final xor 0xFFFFFFFF; the
//! lookup table is generated at compile time and matches zlib's bit-for-bit.

/// 256-entry CRC table for the reflected polynomial 0xEDB88320.
const CRC_TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                0xedb88320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Compute the CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c: u32 = 0xffffffff;
    for &b in data {
        c = CRC_TABLE[((c ^ u32::from(b)) & 0xff) as usize] ^ (c >> 8);
    }
    c ^ 0xffffffff
}
