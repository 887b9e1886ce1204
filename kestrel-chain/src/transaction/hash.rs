use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use crate::serialization::impl_id_hex;

/// A transaction id: the SHA256d digest of the serialized transaction.
///
/// The full 32 bytes key the send-side caches; the leading 8 bytes
/// become the [`super::ShortId`] that travels on the wire.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
pub struct Hash(pub [u8; 32]);

impl_id_hex!(Hash, "transaction::Hash");
