use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use crate::serialization::impl_id_hex;

/// A block id: the SHA256d digest of the block's 80-byte header.
///
/// The header commits to everything in the block, so this one digest
/// names the whole block — it is what `relayed_blocks` deduplicates on.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct Hash(pub [u8; 32]);

impl_id_hex!(Hash, "block::Hash");
