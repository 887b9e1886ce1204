//! The relay wire protocol: framing, message types, and the version table.

/// A Tokio codec that transforms an `AsyncRead` into a `Stream` of relay
/// events.
pub mod codec;
/// Definitions of relay messages and decoded events.
pub mod message;
/// The static relay version table.
pub mod version;

pub use codec::Codec;
pub use message::{Event, FrameKind, Message, OutboundBlock, TxRecord};
pub use version::{RelayMode, VersionParams};
