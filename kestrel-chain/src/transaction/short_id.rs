use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use super::Hash;

/// The first 8 bytes of a transaction hash, used as a compact wire key.
///
/// Equality and hashing use all 8 bytes, in internal byte-order. Two
/// distinct transactions sharing a short id within one block is a protocol
/// error on the relay wire.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct ShortId(pub [u8; 8]);

impl ShortId {
    /// Returns length of a serialized short id in bytes
    pub const fn len() -> usize {
        8
    }

    /// Wrap exactly 8 bytes.
    pub fn from_bytes_exact(bytes: [u8; 8]) -> ShortId {
        ShortId(bytes)
    }

    /// Copy a short id out of the front of a byte slice.
    ///
    /// Panics if the slice is shorter than 8 bytes; callers check framing
    /// before slicing.
    pub fn from_slice(src: &[u8]) -> ShortId {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&src[..ShortId::len()]);
        ShortId(bytes)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<&Hash> for ShortId {
    fn from(hash: &Hash) -> Self {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.0[..ShortId::len()]);
        ShortId(bytes)
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ShortId").field(&hex::encode(&self.0)).finish()
    }
}
