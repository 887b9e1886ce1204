//! Blocks and block-related structures (headers, hashes).

mod hash;
mod header;

#[cfg(any(test, feature = "proptest-impl"))]
mod arbitrary;
#[cfg(test)]
mod tests;

use std::{fmt, sync::Arc};

pub use hash::Hash;
pub use header::Header;

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// The maximum size of a block, in bytes.
///
/// Also the upper bound applied to every length field on the relay wire.
pub const MAX_BLOCK_BYTES: u64 = 4_000_000;

/// A block: an opaque 80-byte header plus an ordered list of transactions.
///
/// Transactions are reference-counted so a block handed to the embedder can
/// share bytes with the per-connection caches that resolved it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: Header,
    /// The block transactions, in consensus order.
    pub transactions: Vec<Arc<Transaction>>,
}

impl Block {
    /// Compute the hash of this block, i.e. the SHA256d of its header.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Total serialized length of the block's transactions, in bytes.
    pub fn transaction_bytes(&self) -> usize {
        self.transactions.iter().map(|tx| tx.len()).sum()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("hash", &self.hash())
            .field("transactions", &self.transactions.len())
            .finish()
    }
}
