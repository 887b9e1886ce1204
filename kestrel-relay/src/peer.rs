//! Per-peer connection state: the receive state machine, the block
//! reassembler, and the outbound send pipeline.

mod client;
mod connection;
mod pending_block;
mod sender;

pub use client::{Builder, Peer};
pub use connection::Connection;

/// Which side of the version exchange this engine plays.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Sends its version string first.
    Initiator,
    /// Waits for the peer's version string, then answers.
    Responder,
}
