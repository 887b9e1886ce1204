//! Definitions of constants.

/// Magic value prefixing every framed relay message, big-endian.
pub const MAGIC: u32 = 0xF2BE_EF42;

/// The length of a relay frame header: magic, frame type, length.
pub const HEADER_LEN: usize = 12;

/// Wire index announcing that an inline transaction follows, in
/// cache-index block records.
pub const INLINE_TX_SENTINEL: u16 = 0xFFFF;

/// First cache position that no longer fits the 16-bit wire index space.
///
/// `0xFFFF` is reserved as the inline sentinel, so `0xFFFE` and above can
/// never travel as an index; hitting one on the send side is an internal
/// inconsistency, not a peer fault.
pub const CACHE_INDEX_LIMIT: u64 = 0xFFFE;

/// Exclusive upper bound on transactions carried inline inside a block,
/// imposed by their 24-bit length prefix.
pub const MAX_INLINE_TX_BYTES: usize = 1 << 24;

/// Block hashes remembered per peer to suppress duplicate block relays.
pub const RELAYED_BLOCK_CACHE: usize = 50;

/// Worker count for the outbound block pool.
pub const BLOCK_POOL_WORKERS: usize = 4;
/// Queued outbound block sends accepted before `send_block` callers wait.
pub const BLOCK_POOL_BURST: usize = 50;

/// Worker count for the outbound transaction pool.
pub const TX_POOL_WORKERS: usize = 4;
/// Queued outbound transaction sends accepted before `send_transaction`
/// callers wait.
pub const TX_POOL_BURST: usize = 25;
