//! Port of zlib's [`adler32.c`][0] to Rust.
//!
//! YPF archives before version 479 use this as the data checksum. The block
//! structure of the original is kept so the short-input fast paths can be
//! checked against the general path.
//!
//! [0]: https://github.com/madler/zlib/blob/master/adler32.c

/// Largest prime smaller than 65536.
const BASE: u32 = 65521;

/// Largest n such that 255n(n+1)/2 + (n+1)(BASE-1) fits in 32 bits.
const NMAX: usize = 5552;

/// Compute the Adler-32 checksum of `data`, starting from the initial
/// value 1.
pub fn adler32(data: &[u8]) -> u32 {
    let mut adler: u32 = 1;
    let mut sum2: u32 = (adler >> 16) & 0xffff;
    adler &= 0xffff;

    // Byte-at-a-time callers stay fast
    if data.len() == 1 {
        adler += u32::from(data[0]);
        if adler >= BASE {
            adler -= BASE;
        }
        sum2 += adler;
        if sum2 >= BASE {
            sum2 -= BASE;
        }
        return adler | (sum2 << 16);
    }

    if data.is_empty() {
        return 1;
    }

    // Short inputs need no block splitting
    if data.len() < 16 {
        for &b in data {
            adler += u32::from(b);
            sum2 += adler;
        }
        if adler >= BASE {
            adler -= BASE;
        }
        sum2 %= BASE;
        return adler | (sum2 << 16);
    }

    // NMAX-sized blocks require just one modulo reduction each
    for block in data.chunks(NMAX) {
        for &b in block {
            adler += u32::from(b);
            sum2 += adler;
        }
        adler %= BASE;
        sum2 %= BASE;
    }

    adler | (sum2 << 16)
}
