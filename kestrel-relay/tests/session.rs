//! End-to-end session tests driving an engine over an in-memory duplex
//! stream, either from a hand-rolled remote peer or from a second engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{duplex, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use kestrel_chain::{
    block::{Block, Header},
    transaction::Transaction,
};
use kestrel_relay::{
    constants::{INLINE_TX_SENTINEL, MAGIC},
    ChainBackend, Peer, RelayError, RelayHooks, Role, SendPools, VerifyError,
};

const VERSION: u32 = 0;
const BLOCK: u32 = 1;
const TRANSACTION: u32 = 2;
const END_BLOCK: u32 = 3;

/// Hooks that record every callback for later assertions.
#[derive(Default)]
struct Recorder {
    headers: Mutex<Vec<Header>>,
    blocks: Mutex<Vec<Arc<Block>>>,
    transactions: Mutex<Vec<Arc<Transaction>>>,
    connected: Mutex<Vec<String>>,
    lines: Mutex<Vec<String>>,
}

impl Recorder {
    fn new() -> Arc<Recorder> {
        Arc::new(Recorder::default())
    }

    fn headers(&self) -> Vec<Header> {
        self.headers.lock().unwrap().clone()
    }

    fn blocks(&self) -> Vec<Arc<Block>> {
        self.blocks.lock().unwrap().clone()
    }

    fn transaction_count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }

    fn connected_count(&self) -> usize {
        self.connected.lock().unwrap().len()
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl RelayHooks for Recorder {
    fn on_block_header(&self, header: &Header) {
        self.headers.lock().unwrap().push(*header);
    }

    fn on_block(&self, block: Arc<Block>) {
        self.blocks.lock().unwrap().push(block);
    }

    fn on_transaction(&self, transaction: &Arc<Transaction>) {
        self.transactions.lock().unwrap().push(transaction.clone());
    }

    fn on_log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }

    fn on_connected(&self, line: &str) {
        self.connected.lock().unwrap().push(line.to_owned());
    }
}

/// A backend that accepts everything and interns by plain allocation.
struct AcceptAll;

impl ChainBackend for AcceptAll {
    fn intern(&self, transaction: Transaction) -> Arc<Transaction> {
        Arc::new(transaction)
    }

    fn verify_transaction(&self, _transaction: &Transaction) -> Result<(), VerifyError> {
        Ok(())
    }

    fn verify_block(&self, _block: &Block) -> Result<(), VerifyError> {
        Ok(())
    }
}

fn frame(kind: u32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(12 + payload.len());
    bytes.extend_from_slice(&MAGIC.to_be_bytes());
    bytes.extend_from_slice(&kind.to_be_bytes());
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

fn tx(byte: u8, len: usize) -> Transaction {
    Transaction::from_bytes(vec![byte; len])
}

/// Spawn a responder engine; the returned stream plays the remote peer.
fn spawn_responder() -> (
    Arc<Recorder>,
    Peer,
    JoinHandle<Result<(), RelayError>>,
    DuplexStream,
) {
    let (local, remote) = duplex(1 << 16);
    let hooks = Recorder::new();
    let (peer, connection) = Peer::builder(hooks.clone(), Arc::new(AcceptAll), SendPools::spawn())
        .with_role(Role::Responder)
        .connect(local);
    let handle = tokio::spawn(connection.run());
    (hooks, peer, handle, remote)
}

async fn wait_until(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting until {}", what);
}

#[tokio::test]
async fn unknown_version_closes_without_callbacks() {
    let (hooks, _peer, handle, mut remote) = spawn_responder();

    remote
        .write_all(&frame(VERSION, b"wombat"))
        .await
        .unwrap();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(RelayError::UnknownVersion(_))));
    assert!(hooks.headers().is_empty());
    assert!(hooks.blocks().is_empty());
    assert_eq!(hooks.transaction_count(), 0);
    assert_eq!(hooks.connected_count(), 0);
}

#[tokio::test]
async fn single_inline_transaction_block() {
    let (hooks, peer, handle, mut remote) = spawn_responder();
    let coinbase = tx(0xC0, 42);
    let header = Header::from_bytes_exact([5u8; 80]);

    remote
        .write_all(&frame(VERSION, b"dashing dingo"))
        .await
        .unwrap();

    // One record; the block frame's length field is the record count.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_be_bytes());
    bytes.extend_from_slice(&BLOCK.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&header.as_bytes()[..]);
    bytes.extend_from_slice(&INLINE_TX_SENTINEL.to_be_bytes());
    bytes.extend_from_slice(&[0, 0, 42]);
    bytes.extend_from_slice(coinbase.bytes());
    bytes.extend_from_slice(&frame(END_BLOCK, b""));
    remote.write_all(&bytes).await.unwrap();

    wait_until("the block is delivered", || hooks.blocks().len() == 1).await;

    assert_eq!(hooks.headers(), vec![header]);
    let block = &hooks.blocks()[0];
    assert_eq!(block.header, header);
    assert_eq!(block.transactions.len(), 1);
    assert_eq!(*block.transactions[0], coinbase);
    // The inline transaction was in-block, never a loose one.
    assert_eq!(hooks.transaction_count(), 0);

    peer.close();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn all_cached_block_consumes_indices() {
    let (hooks, _peer, handle, mut remote) = spawn_responder();
    let txs = [tx(1, 30), tx(2, 40), tx(3, 50)];

    remote
        .write_all(&frame(VERSION, b"dashing dingo"))
        .await
        .unwrap();
    for t in &txs {
        remote.write_all(&frame(TRANSACTION, t.bytes())).await.unwrap();
    }
    wait_until("all transactions are cached", || {
        hooks.transaction_count() == 3
    })
    .await;

    // Reference all three by position, no inline data.
    let header = Header::from_bytes_exact([6u8; 80]);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_be_bytes());
    bytes.extend_from_slice(&BLOCK.to_be_bytes());
    bytes.extend_from_slice(&3u32.to_be_bytes());
    bytes.extend_from_slice(&header.as_bytes()[..]);
    for position in 0u16..3 {
        bytes.extend_from_slice(&position.to_be_bytes());
    }
    bytes.extend_from_slice(&frame(END_BLOCK, b""));
    remote.write_all(&bytes).await.unwrap();

    wait_until("the block is delivered", || hooks.blocks().len() == 1).await;
    let block = &hooks.blocks()[0];
    assert_eq!(
        block.transactions.iter().map(|t| t.hash()).collect::<Vec<_>>(),
        txs.iter().map(|t| t.hash()).collect::<Vec<_>>(),
    );

    // Every index was consumed: referencing position 0 again is fatal.
    let header = Header::from_bytes_exact([7u8; 80]);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC.to_be_bytes());
    bytes.extend_from_slice(&BLOCK.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&header.as_bytes()[..]);
    bytes.extend_from_slice(&0u16.to_be_bytes());
    remote.write_all(&bytes).await.unwrap();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(RelayError::Protocol(_))));
}

#[tokio::test]
async fn loose_transaction_resolves_block_in_flight() {
    let (hooks, peer, handle, mut remote) = spawn_responder();
    let known = tx(7, 25);
    let missing = tx(8, 35);

    remote
        .write_all(&frame(VERSION, b"charming chameleon"))
        .await
        .unwrap();
    remote
        .write_all(&frame(TRANSACTION, known.bytes()))
        .await
        .unwrap();
    wait_until("the known transaction is cached", || {
        hooks.transaction_count() == 1
    })
    .await;

    let header = Header::from_bytes_exact([8u8; 80]);
    let mut body = Vec::new();
    body.extend_from_slice(&header.as_bytes()[..]);
    body.extend_from_slice(&2u32.to_be_bytes());
    body.extend_from_slice(&known.short_id().as_bytes()[..]);
    body.extend_from_slice(&missing.short_id().as_bytes()[..]);
    remote.write_all(&frame(BLOCK, &body)).await.unwrap();

    wait_until("the header is delivered", || hooks.headers().len() == 1).await;
    assert!(hooks.blocks().is_empty());

    // The unresolved slot fills from an interleaved loose transaction;
    // the block completes before END_BLOCK arrives.
    remote
        .write_all(&frame(TRANSACTION, missing.bytes()))
        .await
        .unwrap();
    wait_until("the block is delivered", || hooks.blocks().len() == 1).await;
    remote.write_all(&frame(END_BLOCK, b"")).await.unwrap();

    let block = &hooks.blocks()[0];
    assert_eq!(*block.transactions[0], known);
    assert_eq!(*block.transactions[1], missing);
    // The resolving transaction went into the block, not the loose cache.
    assert_eq!(hooks.transaction_count(), 1);

    peer.close();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn duplicate_short_id_closes_the_connection() {
    let (hooks, _peer, handle, mut remote) = spawn_responder();
    let repeated = tx(9, 20);

    remote
        .write_all(&frame(VERSION, b"charming chameleon"))
        .await
        .unwrap();

    let header = Header::from_bytes_exact([9u8; 80]);
    let mut body = Vec::new();
    body.extend_from_slice(&header.as_bytes()[..]);
    body.extend_from_slice(&2u32.to_be_bytes());
    body.extend_from_slice(&repeated.short_id().as_bytes()[..]);
    body.extend_from_slice(&repeated.short_id().as_bytes()[..]);
    remote.write_all(&frame(BLOCK, &body)).await.unwrap();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(RelayError::Protocol(_))));
    assert!(hooks.blocks().is_empty());
    assert!(hooks
        .lines()
        .iter()
        .any(|line| line.contains("protocol error")));
}

#[tokio::test]
async fn oversized_loose_transaction_closes_the_connection() {
    let (hooks, _peer, handle, mut remote) = spawn_responder();

    remote
        .write_all(&frame(VERSION, b"charming chameleon"))
        .await
        .unwrap();
    // One byte past charming chameleon's loose-transaction limit.
    remote
        .write_all(&frame(TRANSACTION, &vec![0u8; 10_001]))
        .await
        .unwrap();

    let result = handle.await.unwrap();
    assert!(matches!(result, Err(RelayError::Protocol(_))));
    assert_eq!(hooks.transaction_count(), 0);
}

#[tokio::test]
async fn two_engines_relay_a_block() {
    let (a_stream, b_stream) = duplex(1 << 20);
    let a_hooks = Recorder::new();
    let b_hooks = Recorder::new();
    let pools = SendPools::spawn();

    let (a_peer, a_connection) =
        Peer::builder(a_hooks.clone(), Arc::new(AcceptAll), pools.clone())
            .with_role(Role::Initiator)
            .connect(a_stream);
    let (b_peer, b_connection) =
        Peer::builder(b_hooks.clone(), Arc::new(AcceptAll), pools.clone())
            .with_role(Role::Responder)
            .connect(b_stream);
    let a_handle = tokio::spawn(a_connection.run());
    let b_handle = tokio::spawn(b_connection.run());

    wait_until("both sides negotiate", || {
        a_hooks.connected_count() == 1 && b_hooks.connected_count() == 1
    })
    .await;

    let cached = Arc::new(tx(1, 100));
    let fresh = Arc::new(tx(2, 120));

    a_peer.send_transaction(cached.clone()).await;
    wait_until("the transaction arrives", || b_hooks.transaction_count() == 1).await;

    // A resend of the same hash never reaches the wire.
    a_peer.send_transaction(cached.clone()).await;

    let block = Arc::new(Block {
        header: Header::from_bytes_exact([3u8; 80]),
        transactions: vec![cached.clone(), fresh.clone()],
    });
    a_peer.send_block(block.clone()).await;
    wait_until("the block arrives", || b_hooks.blocks().len() == 1).await;

    assert_eq!(b_hooks.blocks()[0].as_ref(), block.as_ref());
    assert_eq!(b_hooks.transaction_count(), 1);

    // The block was recorded as relayed; resending it is a no-op.
    a_peer.send_block(block.clone()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(b_hooks.blocks().len(), 1);

    a_peer.close();
    b_peer.close();
    a_handle.await.unwrap().unwrap();
    b_handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn abbrev_hash_engines_relay_a_block() {
    // Pin the engine to an abbreviated-hash version by initiating with
    // one from the raw stream side.
    let (a_stream, b_stream) = duplex(1 << 20);
    let a_hooks = Recorder::new();

    let (_a_peer, a_connection) =
        Peer::builder(a_hooks.clone(), Arc::new(AcceptAll), SendPools::spawn())
            .with_role(Role::Responder)
            .connect(a_stream);
    let a_handle = tokio::spawn(a_connection.run());

    // The test plays the initiating peer on the raw stream.
    let mut remote = b_stream;
    remote
        .write_all(&frame(VERSION, b"charming chameleon"))
        .await
        .unwrap();
    wait_until("the engine negotiates", || a_hooks.connected_count() == 1).await;

    let missing = tx(4, 60);
    let header = Header::from_bytes_exact([4u8; 80]);
    let mut body = Vec::new();
    body.extend_from_slice(&header.as_bytes()[..]);
    body.extend_from_slice(&1u32.to_be_bytes());
    body.extend_from_slice(&missing.short_id().as_bytes()[..]);

    // Block frame, then the missing transaction as a bare record, then
    // END_BLOCK.
    remote.write_all(&frame(BLOCK, &body)).await.unwrap();
    let mut record = Vec::new();
    record.extend_from_slice(&(missing.len() as u32).to_be_bytes());
    record.extend_from_slice(missing.bytes());
    remote.write_all(&record).await.unwrap();
    remote.write_all(&frame(END_BLOCK, b"")).await.unwrap();

    wait_until("the block is delivered", || a_hooks.blocks().len() == 1).await;
    let block = &a_hooks.blocks()[0];
    assert_eq!(block.header, header);
    assert_eq!(*block.transactions[0], missing);

    drop(remote);
    a_handle.await.unwrap().unwrap();
}
