//! Status list encoding for the mock issuer.

use std::io::Write;

use anyhow::Result;
use base64ct::{Base64UrlUnpadded, Encoding};
use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use flate2::Compression;
use flate2::write::GzEncoder;

/// Minimum list size (16KB) recommended for herd privacy.
pub const LIST_SIZE: usize = 131_072;

/// A mutable status list bitstring.
#[derive(Clone, Debug)]
pub struct Bitstring(BitVec<u8, Msb0>);

impl Default for Bitstring {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitstring {
    /// Create a list of [`LIST_SIZE`] entries, all unset.
    #[must_use]
    pub fn new() -> Self {
        Self(BitVec::repeat(false, LIST_SIZE))
    }

    /// Set the bit at `index`.
    pub fn set(&mut self, index: usize, value: bool) {
        self.0.set(index, value);
    }

    /// GZIP-compress and base64url-encode the list.
    ///
    /// # Errors
    ///
    /// Returns an error if compression fails.
    pub fn encode(&self) -> Result<String> {
        let mut encoder = GzEncoder::new(vec![], Compression::best());
        encoder.write_all(self.0.as_raw_slice())?;
        let compressed = encoder.finish()?;
        Ok(Base64UrlUnpadded::encode_string(&compressed))
    }
}
