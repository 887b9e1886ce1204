//! Definitions of relay network messages.

use std::{fmt, sync::Arc};

use bytes::Bytes;

use kestrel_chain::{
    block::Header,
    transaction::{ShortId, Transaction},
};

/// The frame type discriminant carried in every 12-byte frame header.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FrameKind {
    /// A version string, opening the handshake.
    Version = 0,
    /// A block header plus transaction references.
    Block = 1,
    /// A loose transaction's raw bytes.
    Transaction = 2,
    /// End of the block in flight. Mandatory after every block.
    EndBlock = 3,
    /// The newest version string the sender speaks, offered to an older
    /// peer.
    MaxVersion = 4,
}

impl FrameKind {
    /// Decode a frame type field.
    pub fn from_u32(value: u32) -> Option<FrameKind> {
        match value {
            0 => Some(FrameKind::Version),
            1 => Some(FrameKind::Block),
            2 => Some(FrameKind::Transaction),
            3 => Some(FrameKind::EndBlock),
            4 => Some(FrameKind::MaxVersion),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FrameKind::Version => "version",
            FrameKind::Block => "block",
            FrameKind::Transaction => "transaction",
            FrameKind::EndBlock => "end_block",
            FrameKind::MaxVersion => "max_version",
        })
    }
}

/// One transaction record of an outbound `CACHE_ID` block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TxRecord {
    /// The peer holds this transaction at the given cache position.
    Cached(u16),
    /// The peer has not seen this transaction; its bytes travel inline.
    Inline(Arc<Transaction>),
}

/// An outbound block with its per-transaction encoding already decided.
///
/// The send path plans the block under the per-peer send lock, where the
/// caches live; the encoder then writes the plan without touching shared
/// state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutboundBlock {
    /// Short-id references, with missing transactions framed after the
    /// block as raw length-prefixed records.
    AbbrevHash {
        /// The 80-byte block header.
        header: Header,
        /// One short id per transaction, in block order.
        short_ids: Vec<ShortId>,
        /// Transactions the peer has not been sent, in block order.
        fresh: Vec<Arc<Transaction>>,
    },
    /// Positional cache indices with inline bytes where the peer's cache
    /// cannot help.
    CacheId {
        /// The 80-byte block header.
        header: Header,
        /// One record per transaction, in block order.
        records: Vec<TxRecord>,
    },
}

/// An outbound relay message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Message {
    /// A `VERSION` frame carrying an ASCII version string.
    Version(String),
    /// A `MAX_VERSION` frame carrying the sender's newest version string.
    MaxVersion(String),
    /// A loose transaction.
    Transaction(Arc<Transaction>),
    /// A block, pre-planned against the peer's caches.
    Block(OutboundBlock),
    /// The mandatory block terminator.
    EndBlock,
}

impl Message {
    /// The frame type this message travels under.
    pub fn kind(&self) -> FrameKind {
        match self {
            Message::Version(_) => FrameKind::Version,
            Message::MaxVersion(_) => FrameKind::MaxVersion,
            Message::Transaction(_) => FrameKind::Transaction,
            Message::Block(_) => FrameKind::Block,
            Message::EndBlock => FrameKind::EndBlock,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.kind().fmt(f)
    }
}

/// A decoded wire event, produced by the codec and consumed by the session
/// engine.
///
/// Block payloads decode incrementally: a `CACHE_ID` block arrives as one
/// [`Event::BlockStart`] followed by one record event per transaction, so
/// the session can resolve references against its caches as bytes arrive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// The peer's VERSION frame.
    Version(String),
    /// The peer's MAX_VERSION frame.
    MaxVersion(String),
    /// A loose transaction's raw bytes.
    Transaction(Bytes),
    /// An `ABBREV_HASH` block: header and the full short-id list.
    BlockAnnounce {
        /// The 80-byte block header.
        header: Header,
        /// One short id per transaction, in block order.
        short_ids: Vec<ShortId>,
    },
    /// A `CACHE_ID` block header; `transaction_count` record events
    /// follow.
    BlockStart {
        /// The 80-byte block header.
        header: Header,
        /// Number of transaction records in this block.
        transaction_count: u32,
    },
    /// A `CACHE_ID` record referencing the receive cache by position.
    BlockTxCached(u16),
    /// Raw bytes of a transaction carried inside the block in flight
    /// (a `CACHE_ID` inline record or an `ABBREV_HASH` follow-on record).
    BlockTxInline(Bytes),
    /// The block terminator frame.
    EndBlock,
}
