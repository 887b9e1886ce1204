//! The kestrel relay peer protocol engine.
//!
//! One engine instance serves one remote relay peer over an injected duplex
//! byte stream. After a version exchange fixes the cache capacity, the
//! loose-transaction size limit, and the relay mode, blocks travel as an
//! 80-byte header plus per-transaction cache references; only transactions
//! the peer has not seen are sent as raw bytes. Per-connection bounded
//! caches on both sides keep the references resolvable.
//!
//! The engine owns framing, version negotiation, the caches, block
//! reassembly, and the outbound send pipeline. Sockets, TLS, supervision,
//! and semantic chain validation are the embedder's: the stream comes in as
//! any `AsyncRead + AsyncWrite`, validation and transaction interning are
//! injected through [`ChainBackend`], and decoded blocks and transactions
//! come back out through [`RelayHooks`].

pub mod cache;
pub mod constants;
mod error;
mod hooks;
pub mod peer;
pub mod pool;
pub mod protocol;

pub use error::RelayError;
pub use hooks::{ChainBackend, RelayHooks, VerifyError};
pub use peer::{Connection, Peer, Role};
pub use pool::SendPools;
