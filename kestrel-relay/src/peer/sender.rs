//! The outbound half of a relay connection.
//!
//! Everything a send touches — the stream's write half, the negotiated
//! parameters, and the `sent_txs` / `relayed_blocks` caches — lives behind
//! one per-peer mutex. Frames reach the wire in the order their jobs
//! acquired the lock; jobs for different peers never contend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::prelude::*;
use tokio::io::AsyncWrite;
use tokio::sync::{Mutex, Notify};
use tokio_util::codec::FramedWrite;
use tracing::warn;

use kestrel_chain::{
    block::{self, Block},
    transaction::{self, Transaction},
};

use crate::cache::BoundedSet;
use crate::constants::{CACHE_INDEX_LIMIT, MAX_INLINE_TX_BYTES, RELAYED_BLOCK_CACHE};
use crate::error::RelayError;
use crate::hooks::RelayHooks;
use crate::protocol::{
    message::{Message, OutboundBlock, TxRecord},
    version::{RelayMode, VersionParams},
    Codec,
};

pub(crate) type BoxedWriter = FramedWrite<Box<dyn AsyncWrite + Send + Unpin>, Codec>;

pub(crate) struct SendState {
    pub(crate) writer: BoxedWriter,
    pub(crate) params: Option<&'static VersionParams>,
    /// Hashes of transactions already forwarded to this peer. In
    /// cache-index mode its positions mirror the peer's receive cache.
    pub(crate) sent_txs: BoundedSet<transaction::Hash>,
    /// Block hashes already relayed to this peer.
    pub(crate) relayed_blocks: BoundedSet<block::Hash>,
}

impl SendState {
    pub(crate) fn new(writer: BoxedWriter) -> SendState {
        SendState {
            writer,
            params: None,
            // Placeholder until negotiation fixes the real capacity.
            sent_txs: BoundedSet::new(1),
            relayed_blocks: BoundedSet::new(RELAYED_BLOCK_CACHE),
        }
    }

    /// Fix the negotiated parameters and size the send cache.
    pub(crate) fn negotiate(&mut self, params: &'static VersionParams) {
        self.params = Some(params);
        self.sent_txs = BoundedSet::new(params.cache_capacity);
    }
}

/// State shared between the connection task, the peer handle, and pool
/// workers.
pub(crate) struct Shared {
    pub(crate) send: Mutex<SendState>,
    pub(crate) hooks: Arc<dyn RelayHooks>,
    closed: AtomicBool,
    close_signal: Notify,
}

impl Shared {
    pub(crate) fn new(send: SendState, hooks: Arc<dyn RelayHooks>) -> Arc<Shared> {
        Arc::new(Shared {
            send: Mutex::new(send),
            hooks,
            closed: AtomicBool::new(false),
            close_signal: Notify::new(),
        })
    }

    /// Poison the connection: the receive loop exits and further sends
    /// become no-ops.
    pub(crate) fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.close_signal.notify_waiters();
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Resolve once the connection is closed.
    pub(crate) async fn wait_closed(&self) {
        loop {
            let notified = self.close_signal.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }
}

/// Forward a loose transaction, deduplicated against `sent_txs`.
///
/// Dropped silently when the version exchange has not finished, the
/// transaction exceeds the negotiated size, or the peer already has it.
pub(crate) async fn transaction_job(shared: Arc<Shared>, tx: Arc<Transaction>) {
    if shared.is_closed() {
        return;
    }
    let mut send = shared.send.lock().await;
    let params = match send.params {
        Some(params) => params,
        None => return,
    };
    if tx.len() > params.max_free_tx_bytes {
        return;
    }
    let hash = tx.hash();
    if send.sent_txs.contains(&hash) {
        return;
    }
    match send.writer.send(Message::Transaction(tx)).await {
        Ok(()) => {
            send.sent_txs.insert(hash);
        }
        Err(error) => log_write_error(&shared, &error),
    }
}

/// Relay a block, shrunk against the peer's caches, followed by the
/// mandatory END_BLOCK.
pub(crate) async fn block_job(shared: Arc<Shared>, block: Arc<Block>) {
    if shared.is_closed() {
        return;
    }
    let mut send = shared.send.lock().await;
    let params = match send.params {
        Some(params) => params,
        None => return,
    };
    let block_hash = block.hash();
    if send.relayed_blocks.contains(&block_hash) {
        return;
    }

    let outbound = match params.mode {
        RelayMode::AbbrevHash => plan_abbrev(&send, &block),
        RelayMode::CacheId => match plan_cache_id(&mut send, &block) {
            Ok(outbound) => outbound,
            Err(message) => {
                shared.hooks.on_log(message);
                shared.close();
                return;
            }
        },
    };

    if let Err(error) = send.writer.feed(Message::Block(outbound)).await {
        log_write_error(&shared, &error);
        return;
    }
    if let Err(error) = send.writer.send(Message::EndBlock).await {
        log_write_error(&shared, &error);
        return;
    }
    send.relayed_blocks.insert(block_hash);
}

/// Short ids for every transaction; raw bytes follow for the ones the
/// peer was never sent.
fn plan_abbrev(send: &SendState, block: &Block) -> OutboundBlock {
    let mut short_ids = Vec::with_capacity(block.transactions.len());
    let mut fresh = Vec::new();
    for tx in &block.transactions {
        short_ids.push(tx.short_id());
        if !send.sent_txs.contains(&tx.hash()) {
            fresh.push(tx.clone());
        }
    }
    OutboundBlock::AbbrevHash {
        header: block.header,
        short_ids,
        fresh,
    }
}

/// Cache positions where the peer holds the transaction — consuming the
/// entry, mirroring the peer's receive side — and inline bytes elsewhere.
fn plan_cache_id(send: &mut SendState, block: &Block) -> Result<OutboundBlock, &'static str> {
    let mut records = Vec::with_capacity(block.transactions.len());
    for tx in &block.transactions {
        let hash = tx.hash();
        match send.sent_txs.position_of(&hash) {
            Some(position) if position < CACHE_INDEX_LIMIT => {
                records.push(TxRecord::Cached(position as u16));
                send.sent_txs.remove(&hash);
            }
            Some(_) => {
                return Err("INTERNAL ERROR: send cache position overflowed the wire index space");
            }
            None => {
                if tx.len() >= MAX_INLINE_TX_BYTES {
                    return Err("INTERNAL ERROR: transaction exceeds the 24-bit inline length");
                }
                records.push(TxRecord::Inline(tx.clone()));
            }
        }
    }
    Ok(OutboundBlock::CacheId {
        header: block.header,
        records,
    })
}

fn log_write_error(shared: &Shared, error: &RelayError) {
    // The read side sees the disconnect and tears the connection down.
    warn!(%error, "write to relay peer failed");
    shared
        .hooks
        .on_log(&format!("write to relay peer failed: {}", error));
}
