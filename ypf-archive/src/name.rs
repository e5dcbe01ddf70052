//! Filename encoding and obfuscation
//!
//! Stored filenames go through two layers. First the logical name is encoded
//! with the legacy double-byte Japanese code page (Shift-JIS / codepage 932).
//! Then the encoded bytes and their length byte are obfuscated: the length is
//! run through the profile's permutation table and one's-complemented, and
//! each name byte is XORed with the profile key and one's-complemented. Both
//! layers are fully reversible; this is obfuscation, not a security boundary.

use encoding_rs::SHIFT_JIS;

use crate::profile::VersionProfile;
use crate::{Error, Result};

/// Encode a logical filename to its Shift-JIS byte form.
///
/// The result is what name checksums are computed over, before obfuscation.
/// Fails with [`Error::NameEncoding`] on characters codepage 932 cannot
/// represent and [`Error::NameTooLong`] when the encoded form exceeds the
/// single stored length byte.
pub fn encode_name(name: &str) -> Result<Vec<u8>> {
    let (encoded, _, had_errors) = SHIFT_JIS.encode(name);
    if had_errors {
        return Err(Error::NameEncoding(name.to_string()));
    }
    if encoded.len() > 0xff {
        return Err(Error::NameTooLong {
            name: name.to_string(),
            len: encoded.len(),
        });
    }
    Ok(encoded.into_owned())
}

/// Decode Shift-JIS filename bytes back to text.
pub fn decode_name(encoded: &[u8]) -> Result<String> {
    let (decoded, _, had_errors) = SHIFT_JIS.decode(encoded);
    if had_errors {
        return Err(Error::NameEncoding(hex::encode(encoded)));
    }
    Ok(decoded.into_owned())
}

/// Obfuscate the length byte of an encoded filename for storage.
pub fn obfuscate_length(profile: &VersionProfile, len: u8) -> u8 {
    !profile.encode_length(len)
}

/// Recover the real length from a stored length byte.
pub fn deobfuscate_length(profile: &VersionProfile, stored: u8) -> u8 {
    profile.decode_length(!stored)
}

/// Obfuscate encoded filename bytes in place for storage.
pub fn obfuscate_name(profile: &VersionProfile, bytes: &mut [u8]) {
    for b in bytes {
        *b = !(*b ^ profile.filename_key());
    }
}

/// Recover encoded filename bytes from their stored form in place.
pub fn deobfuscate_name(profile: &VersionProfile, bytes: &mut [u8]) {
    for b in bytes {
        *b = !*b ^ profile.filename_key();
    }
}
