//! Bounded worker pools for outbound relay work.
//!
//! Two pools serve every connection in the process: one for block sends,
//! one for transaction sends. Each pool runs a fixed number of workers;
//! jobs queue up to a burst limit, beyond which enqueuing waits — the
//! backpressure lands on the embedder calling `send_*`. Per-peer frame
//! ordering comes from the peer's send mutex, not from the pools, so
//! workers are free to make progress on different peers in parallel.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::constants::{
    BLOCK_POOL_BURST, BLOCK_POOL_WORKERS, TX_POOL_BURST, TX_POOL_WORKERS,
};

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A fixed-concurrency pool fed by a bounded queue.
pub struct SendPool {
    queue: mpsc::Sender<Job>,
}

impl SendPool {
    /// Start a pool with `workers` concurrent jobs and room for `burst`
    /// queued ones. Must be called from within a tokio runtime.
    pub fn spawn(workers: usize, burst: usize) -> SendPool {
        let (queue, mut jobs) = mpsc::channel::<Job>(burst);
        let permits = Arc::new(Semaphore::new(workers));
        tokio::spawn(async move {
            while let Some(job) = jobs.recv().await {
                let permit = permits
                    .clone()
                    .acquire_owned()
                    .await
                    .expect("send pool semaphore is never closed");
                tokio::spawn(async move {
                    job.await;
                    drop(permit);
                });
            }
        });
        SendPool { queue }
    }

    /// Enqueue a job, waiting if the pool's burst queue is full.
    pub async fn dispatch(&self, job: impl Future<Output = ()> + Send + 'static) {
        // An error means the process is shutting down and the dispatcher
        // is gone; the job is dropped with it.
        let _ = self.queue.send(Box::pin(job)).await;
    }
}

/// The process-wide pair of outbound pools, shared by every peer.
pub struct SendPools {
    pub(crate) blocks: SendPool,
    pub(crate) transactions: SendPool,
}

impl SendPools {
    /// Start both pools at their standard sizes.
    pub fn spawn() -> Arc<SendPools> {
        Arc::new(SendPools {
            blocks: SendPool::spawn(BLOCK_POOL_WORKERS, BLOCK_POOL_BURST),
            transactions: SendPool::spawn(TX_POOL_WORKERS, TX_POOL_BURST),
        })
    }
}
