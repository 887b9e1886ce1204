//! Transactions and transaction-related structures.

mod hash;
mod short_id;

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;
#[cfg(test)]
mod tests;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use hash::Hash;
pub use short_id::ShortId;

use crate::serialization::sha256d;

/// A transaction, as the relay sees it: an opaque blob of serialized bytes
/// plus its SHA256d identifier.
///
/// The hash is computed once at construction; a `Transaction` is immutable
/// afterwards, so the two fields can never disagree.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    bytes: Bytes,
    hash: Hash,
}

impl Transaction {
    /// Build a transaction from its raw serialized bytes, computing its hash.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Transaction {
        let bytes = bytes.into();
        let hash = Hash(sha256d::double(&bytes));
        Transaction { bytes, hash }
    }

    /// The raw serialized bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The serialized length, in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the serialized form is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get the hash of this transaction.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// The compact 8-byte wire key for this transaction.
    pub fn short_id(&self) -> ShortId {
        ShortId::from(&self.hash)
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("hash", &self.hash)
            .field("len", &self.bytes.len())
            .finish()
    }
}
