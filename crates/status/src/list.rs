//! Status list decoding for verifiers

use std::io::Read;

use base64ct::{Base64UrlUnpadded, Encoding};
use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use flate2::read::GzDecoder;

use crate::error::invalid;
use crate::{Error, Result};

// base64url encoding of the GZIP magic bytes (`1f 8b 08`)
const GZIP_PREFIX: &str = "H4sI";

/// Largest decompressed list accepted (16 MiB, or 134,217,728 entries).
pub const MAX_LIST_BYTES: usize = 16 * 1024 * 1024;

/// A decoded status list bitstring.
///
/// Bits are indexed left to right: index 0 is the most significant bit of
/// the first byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusList {
    bits: BitVec<u8, Msb0>,
}

impl StatusList {
    /// Decode a status list credential's `encodedList`.
    ///
    /// The value is the base64url encoding of a GZIP-compressed bitstring.
    /// Trailing padding and a multibase `u` prefix are tolerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not valid base64url, the GZIP
    /// decompression fails, or the list is larger than [`MAX_LIST_BYTES`].
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let mut encoded = encoded.trim().trim_end_matches('=');
        if let Some(stripped) = encoded.strip_prefix('u').filter(|s| s.starts_with(GZIP_PREFIX)) {
            encoded = stripped;
        }

        let compressed = Base64UrlUnpadded::decode_vec(encoded)
            .map_err(|e| invalid!("invalid base64url-encoded list: {e}"))?;
        let decoder = GzDecoder::new(compressed.as_slice());
        let mut inflated = Vec::new();
        decoder
            .take(MAX_LIST_BYTES as u64 + 1)
            .read_to_end(&mut inflated)
            .map_err(|e| invalid!("issue decompressing list: {e}"))?;
        if inflated.len() > MAX_LIST_BYTES {
            return Err(invalid!("decompressed list exceeds {MAX_LIST_BYTES} bytes"));
        }

        Ok(Self { bits: BitVec::from_vec(inflated) })
    }

    /// The status bit for the credential at `index`: `true` means the
    /// status (e.g. revocation) is set.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` lies outside the list.
    pub fn status(&self, index: usize) -> Result<bool> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(Error::OutOfRange { index, len: self.bits.len() })
    }

    /// Number of entries in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}
