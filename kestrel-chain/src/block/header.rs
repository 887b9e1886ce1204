use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::serialization::{sha256d, SerializationError};

use super::Hash;

/// An opaque, fixed-size block header.
///
/// The relay protocol forwards headers verbatim and identifies them by the
/// SHA256d of their 80 bytes; it never looks at the fields inside. Parsing
/// version/prev-hash/merkle-root out of the header is left to the embedder.
#[derive(Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Header(#[serde(with = "BigArray")] [u8; 80]);

impl Header {
    /// Returns length of a serialized header in bytes
    pub const fn len() -> usize {
        80
    }

    /// Wrap exactly 80 header bytes.
    pub fn from_bytes_exact(bytes: [u8; 80]) -> Header {
        Header(bytes)
    }

    /// Copy a header out of the front of a byte slice.
    pub fn read_from(src: &[u8]) -> Result<Header, SerializationError> {
        if src.len() < Header::len() {
            return Err(SerializationError::Parse(
                "not enough bytes in block header",
            ));
        }
        let mut bytes = [0u8; 80];
        bytes.copy_from_slice(&src[..Header::len()]);
        Ok(Header(bytes))
    }

    /// The raw header bytes.
    pub fn as_bytes(&self) -> &[u8; 80] {
        &self.0
    }

    /// Compute the hash of this header.
    pub fn hash(&self) -> Hash {
        let mut hash_writer = sha256d::Writer::default();
        hash_writer
            .write_all(&self.0[..])
            .expect("writing to a sha256d Writer is infallible");
        Hash(hash_writer.finish())
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("block::Header").field(&self.hash()).finish()
    }
}
