use std::sync::Arc;

use tokio::io::{split, AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

use kestrel_chain::{block::Block, transaction::Transaction};

use crate::hooks::{ChainBackend, RelayHooks};
use crate::pool::SendPools;
use crate::protocol::Codec;

use super::connection::Connection;
use super::sender::{block_job, transaction_job, SendState, Shared};
use super::Role;

/// The embedder's handle to one relay peer.
///
/// Cheap to clone; all clones drive the same connection.
#[derive(Clone)]
pub struct Peer {
    shared: Arc<Shared>,
    pools: Arc<SendPools>,
}

impl Peer {
    /// Return a builder for attaching an engine to one peer's stream.
    pub fn builder(
        hooks: Arc<dyn RelayHooks>,
        backend: Arc<dyn ChainBackend>,
        pools: Arc<SendPools>,
    ) -> Builder {
        Builder {
            hooks,
            backend,
            pools,
            role: Role::Initiator,
            metrics_label: None,
        }
    }

    /// Queue a loose transaction for this peer.
    ///
    /// Dropped silently when the peer already has it, it exceeds the
    /// negotiated size limit, or no version is negotiated yet. Waits when
    /// the transaction pool's burst queue is full.
    pub async fn send_transaction(&self, transaction: Arc<Transaction>) {
        self.pools
            .transactions
            .dispatch(transaction_job(self.shared.clone(), transaction))
            .await;
    }

    /// Queue a block for this peer, shrunk against the shared caches.
    ///
    /// Dropped silently when the block was already relayed to this peer or
    /// no version is negotiated yet. Waits when the block pool's burst
    /// queue is full.
    pub async fn send_block(&self, block: Arc<Block>) {
        self.pools
            .blocks
            .dispatch(block_job(self.shared.clone(), block))
            .await;
    }

    /// Poison the connection: the receive loop exits and queued sends for
    /// this peer become no-ops. In-flight writes finish or fail on their
    /// own.
    pub fn close(&self) {
        self.shared.close();
    }
}

/// A builder for specifying a [`Peer`]'s options.
pub struct Builder {
    hooks: Arc<dyn RelayHooks>,
    backend: Arc<dyn ChainBackend>,
    pools: Arc<SendPools>,
    role: Role,
    metrics_label: Option<String>,
}

impl Builder {
    /// Configure which side of the version exchange this engine plays.
    /// Defaults to [`Role::Initiator`].
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Configure the peer address label used for metrics.
    pub fn with_metrics_label(mut self, metrics_label: String) -> Self {
        self.metrics_label = Some(metrics_label);
        self
    }

    /// Attach the engine to the peer's duplex stream.
    ///
    /// Returns the sending handle and the connection driver; the embedder
    /// spawns [`Connection::run`] on its runtime.
    pub fn connect<S>(self, stream: S) -> (Peer, Connection)
    where
        S: AsyncRead + AsyncWrite + Send + Sync + 'static,
    {
        let (read, write) = split(stream);

        let mut read_codec = Codec::builder();
        let mut write_codec = Codec::builder();
        if let Some(label) = &self.metrics_label {
            read_codec = read_codec.with_metrics_label(label.clone());
            write_codec = write_codec.with_metrics_label(label.clone());
        }

        let reader = FramedRead::new(
            Box::new(read) as Box<dyn AsyncRead + Send + Sync + Unpin>,
            read_codec.finish(),
        );
        let writer = FramedWrite::new(
            Box::new(write) as Box<dyn AsyncWrite + Send + Unpin>,
            write_codec.finish(),
        );

        let shared = Shared::new(SendState::new(writer), self.hooks.clone());
        let connection = Connection::new(
            self.role,
            self.hooks,
            self.backend,
            reader,
            shared.clone(),
        );
        (
            Peer {
                shared,
                pools: self.pools,
            },
            connection,
        )
    }
}
