use std::sync::Arc;

use thiserror::Error;

use kestrel_chain::{
    block::{Block, Header},
    transaction::Transaction,
};

/// A rejection from the embedder's semantic validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct VerifyError(pub String);

/// Callbacks delivered from a connection's receive path.
///
/// All of them run on the connection's receive task and must not block;
/// hand the data off if there is real work to do.
pub trait RelayHooks: Send + Sync {
    /// A block frame's header was parsed, before any transaction
    /// resolution.
    fn on_block_header(&self, _header: &Header) {}

    /// A block finished reassembly and passed the block verifier.
    fn on_block(&self, _block: Arc<Block>) {}

    /// A loose (out-of-block) transaction was accepted into the receive
    /// cache.
    fn on_transaction(&self, _transaction: &Arc<Transaction>) {}

    /// Free-form connection event line.
    fn on_log(&self, _line: &str) {}

    /// Best-effort per-block statistics line.
    fn on_log_stats(&self, _line: &str) {}

    /// Version negotiation completed.
    fn on_connected(&self, _line: &str) {}
}

/// Chain services the embedder injects into the engine.
pub trait ChainBackend: Send + Sync {
    /// Process-wide transaction deduplication. The returned transaction
    /// must be equal-by-hash to the argument; whether it shares storage is
    /// the embedder's choice.
    fn intern(&self, transaction: Transaction) -> Arc<Transaction>;

    /// Semantic transaction validation. An error closes the connection.
    fn verify_transaction(&self, transaction: &Transaction) -> Result<(), VerifyError>;

    /// Semantic block validation, run after reassembly. An error closes
    /// the connection.
    fn verify_block(&self, block: &Block) -> Result<(), VerifyError>;
}
