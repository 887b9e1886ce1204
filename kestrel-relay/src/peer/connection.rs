//! The receive state machine for one relay peer.

use std::sync::Arc;

use bytes::Bytes;
use futures::prelude::*;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use tracing::trace;

use kestrel_chain::{
    block::Header,
    transaction::{self, ShortId, Transaction},
};

use crate::cache::BoundedMap;
use crate::error::RelayError;
use crate::hooks::{ChainBackend, RelayHooks};
use crate::protocol::{
    message::{Event, Message},
    version::{self, RelayMode, VersionParams},
    Codec,
};

use super::pending_block::PendingBlock;
use super::sender::Shared;
use super::Role;

type BoxedReader = FramedRead<Box<dyn AsyncRead + Send + Sync + Unpin>, Codec>;

/// Receive caches, shaped by the negotiated relay mode.
enum ReceiveCache {
    /// Version exchange not finished yet.
    None,
    /// Short id to transaction, looked up (not consumed) when a block
    /// references it.
    AbbrevHash(BoundedMap<ShortId, Arc<Transaction>>),
    /// Transactions addressable by cache position, consumed on use.
    CacheId(BoundedMap<transaction::Hash, Arc<Transaction>>),
}

/// The receive half of one relay connection.
///
/// Sole mutator of the per-connection receive state: the receive caches,
/// the block in flight, and the negotiation state. The embedder spawns
/// [`Connection::run`] and keeps the matching [`super::Peer`] handle for
/// sending.
pub struct Connection {
    role: Role,
    hooks: Arc<dyn RelayHooks>,
    backend: Arc<dyn ChainBackend>,
    reader: BoxedReader,
    shared: Arc<Shared>,
    params: Option<&'static VersionParams>,
    received: ReceiveCache,
    pending: Option<PendingBlock>,
}

impl Connection {
    pub(crate) fn new(
        role: Role,
        hooks: Arc<dyn RelayHooks>,
        backend: Arc<dyn ChainBackend>,
        reader: BoxedReader,
        shared: Arc<Shared>,
    ) -> Connection {
        Connection {
            role,
            hooks,
            backend,
            reader,
            shared,
            params: None,
            received: ReceiveCache::None,
            pending: None,
        }
    }

    /// Drive the connection until EOF, close, or a fatal error.
    ///
    /// Every error is fatal for this connection only; other connections
    /// and the embedder are unaffected.
    pub async fn run(mut self) -> Result<(), RelayError> {
        let result = self.drive().await;
        self.shared.close();
        match &result {
            Err(RelayError::UnknownVersion(name)) => {
                // An incompatible peer is routine; nothing alarming to log.
                self.hooks
                    .on_log(&format!("relay peer speaks unsupported version {:?}", name));
            }
            Err(error @ RelayError::Internal(_)) => {
                self.hooks.on_log(&format!("INTERNAL ERROR: {}", error));
            }
            Err(error) => {
                self.hooks.on_log(&format!("closing relay peer: {}", error));
            }
            Ok(()) => {}
        }
        result
    }

    async fn drive(&mut self) -> Result<(), RelayError> {
        if self.role == Role::Initiator {
            self.send_now(Message::Version(version::current().name.to_owned()))
                .await?;
        }

        let shared = self.shared.clone();
        loop {
            let event = tokio::select! {
                _ = shared.wait_closed() => return Ok(()),
                event = self.reader.next() => match event {
                    None => return Ok(()),
                    Some(event) => event?,
                },
            };
            self.on_event(event).await?;
        }
    }

    async fn send_now(&self, message: Message) -> Result<(), RelayError> {
        let mut send = self.shared.send.lock().await;
        send.writer.send(message).await
    }

    async fn on_event(&mut self, event: Event) -> Result<(), RelayError> {
        trace!(?event, "relay event");
        if self.params.is_none() && !matches!(event, Event::Version(_)) {
            return Err(RelayError::Protocol("expected a version frame first"));
        }
        match event {
            Event::Version(name) => self.on_version(name).await,
            Event::MaxVersion(name) => {
                self.hooks
                    .on_log(&format!("peer also speaks protocol version {:?}", name));
                Ok(())
            }
            Event::Transaction(bytes) => self.on_loose_transaction(bytes),
            Event::BlockAnnounce { header, short_ids } => {
                self.on_block_announce(header, short_ids)
            }
            Event::BlockStart {
                header,
                transaction_count,
            } => self.on_block_start(header, transaction_count),
            Event::BlockTxCached(index) => self.on_block_cached(index),
            Event::BlockTxInline(bytes) => self.on_block_inline(bytes),
            Event::EndBlock => self.on_end_block(),
        }
    }

    async fn on_version(&mut self, name: String) -> Result<(), RelayError> {
        if self.params.is_some() {
            return Err(RelayError::Protocol("unexpected second version frame"));
        }
        let params =
            version::lookup(&name).ok_or_else(|| RelayError::UnknownVersion(name.clone()))?;

        self.params = Some(params);
        self.reader.decoder_mut().reconfigure(params);
        self.received = match params.mode {
            RelayMode::AbbrevHash => {
                ReceiveCache::AbbrevHash(BoundedMap::new(params.cache_capacity))
            }
            RelayMode::CacheId => ReceiveCache::CacheId(BoundedMap::new(params.cache_capacity)),
        };

        {
            let mut send = self.shared.send.lock().await;
            send.negotiate(params);
            if self.role == Role::Responder {
                // Answer with the version both sides will speak.
                send.writer
                    .send(Message::Version(params.name.to_owned()))
                    .await?;
            }
            if version::is_older(params, version::current()) {
                // Tell an older peer what it could upgrade to.
                send.writer
                    .send(Message::MaxVersion(version::current().name.to_owned()))
                    .await?;
            }
        }

        self.hooks.on_connected(&format!(
            "relay peer connected, protocol version {:?}",
            params.name
        ));
        Ok(())
    }

    /// A loose transaction: intern, verify, then either resolve the block
    /// in flight or enter the receive cache.
    fn on_loose_transaction(&mut self, bytes: Bytes) -> Result<(), RelayError> {
        let tx = self.backend.intern(Transaction::from_bytes(bytes));
        self.backend.verify_transaction(&tx)?;

        if let Some(pending) = self.pending.as_mut() {
            if pending.wants(&tx.short_id()) {
                let complete = pending.resolve(tx)?;
                if complete {
                    self.finish_block()?;
                }
                return Ok(());
            }
        }

        let accepted = match &mut self.received {
            ReceiveCache::AbbrevHash(cache) => cache.insert(tx.short_id(), tx.clone()),
            ReceiveCache::CacheId(cache) => cache.insert(tx.hash(), tx.clone()),
            ReceiveCache::None => {
                return Err(RelayError::Protocol("transaction before version negotiation"))
            }
        };
        if accepted {
            self.hooks.on_transaction(&tx);
        }
        Ok(())
    }

    fn on_block_announce(
        &mut self,
        header: Header,
        short_ids: Vec<ShortId>,
    ) -> Result<(), RelayError> {
        if self.pending.is_some() {
            return Err(RelayError::Protocol(
                "block announced while another is in flight",
            ));
        }
        self.hooks.on_block_header(&header);

        let cache = match &self.received {
            ReceiveCache::AbbrevHash(cache) => cache,
            _ => {
                return Err(RelayError::Protocol(
                    "short-id block outside abbreviated-hash mode",
                ))
            }
        };
        let pending = PendingBlock::from_short_ids(header, short_ids, cache)?;
        let complete = pending.unresolved() == 0;
        self.pending = Some(pending);
        if complete {
            self.finish_block()?;
        }
        Ok(())
    }

    fn on_block_start(&mut self, header: Header, transaction_count: u32) -> Result<(), RelayError> {
        if self.pending.is_some() {
            return Err(RelayError::Protocol(
                "block announced while another is in flight",
            ));
        }
        self.hooks.on_block_header(&header);
        self.pending = Some(PendingBlock::with_transaction_count(
            header,
            transaction_count,
        ));
        Ok(())
    }

    fn on_block_cached(&mut self, index: u16) -> Result<(), RelayError> {
        let complete = {
            let pending = self.pending.as_mut().ok_or(RelayError::Protocol(
                "transaction record without a block in flight",
            ))?;
            let cache = match &mut self.received {
                ReceiveCache::CacheId(cache) => cache,
                _ => {
                    return Err(RelayError::Protocol(
                        "cache index record outside cache-index mode",
                    ))
                }
            };
            let tx = cache.take_at(index as u64).ok_or(RelayError::Protocol(
                "block referenced an unknown cache position",
            ))?;
            pending.push_transaction(tx, true)
        };
        if complete {
            self.finish_block()?;
        }
        Ok(())
    }

    /// Raw transaction bytes carried inside the block in flight.
    fn on_block_inline(&mut self, bytes: Bytes) -> Result<(), RelayError> {
        let tx = self.backend.intern(Transaction::from_bytes(bytes));
        self.backend.verify_transaction(&tx)?;

        let mode = self
            .params
            .expect("in-block events imply a negotiated version")
            .mode;
        let complete = {
            let pending = self.pending.as_mut().ok_or(RelayError::Protocol(
                "inline transaction without a block in flight",
            ))?;
            match mode {
                RelayMode::CacheId => pending.push_transaction(tx, false),
                RelayMode::AbbrevHash => pending.resolve(tx)?,
            }
        };
        if complete {
            self.finish_block()?;
        }
        Ok(())
    }

    /// The mandatory block terminator; completes a block no resolution
    /// step finished.
    fn on_end_block(&mut self) -> Result<(), RelayError> {
        let mut pending = self.pending.take().ok_or(RelayError::Protocol(
            "end-block without a block in flight",
        ))?;
        if !pending.is_built() {
            if pending.unresolved() > 0 {
                return Err(RelayError::Protocol(
                    "block terminated with unresolved transactions",
                ));
            }
            self.deliver(&mut pending)?;
        }
        Ok(())
    }

    /// Assemble and deliver the block in flight, leaving its
    /// `already_built` guard armed until END_BLOCK releases it.
    fn finish_block(&mut self) -> Result<(), RelayError> {
        if let Some(mut pending) = self.pending.take() {
            let result = self.deliver(&mut pending);
            self.pending = Some(pending);
            result?;
        }
        Ok(())
    }

    fn deliver(&mut self, pending: &mut PendingBlock) -> Result<(), RelayError> {
        let block = match pending.build() {
            Some(block) => block,
            None => return Ok(()),
        };
        self.backend.verify_block(&block)?;
        let block = Arc::new(block);
        self.hooks.on_log_stats(&format!(
            "reassembled block {}: {} transactions, {} from cache, {} transaction bytes",
            block.hash(),
            block.transactions.len(),
            pending.cached_hits(),
            block.transaction_bytes(),
        ));
        self.hooks.on_block(block);
        Ok(())
    }
}
