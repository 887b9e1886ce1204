//! Reassembly state for a block being received.

use std::collections::HashMap;
use std::sync::Arc;

use kestrel_chain::{
    block::{Block, Header},
    transaction::{ShortId, Transaction},
};

use crate::cache::BoundedMap;
use crate::error::RelayError;

/// A block in flight: its header, the transactions recovered so far, and
/// the bookkeeping needed to finish it.
///
/// The session engine owns the pending block and passes its caches in by
/// reference; the pending block never reaches back into connection state.
#[derive(Debug)]
pub(crate) struct PendingBlock {
    header: Header,
    /// Transactions in block order. Abbreviated-hash blocks may hold
    /// unresolved slots awaiting a matching transaction; cache-index
    /// blocks grow one filled slot per record.
    slots: Vec<Slot>,
    /// Short id to slot position, for abbreviated-hash resolution.
    /// Empty for cache-index blocks.
    by_short_id: HashMap<ShortId, usize>,
    /// Slots still waiting for a transaction.
    unresolved: usize,
    /// Total slot count the block will have once complete.
    expected: usize,
    /// How many slots were answered from the receive cache.
    cached_hits: usize,
    /// Guards against assembling twice when both completion conditions
    /// fire.
    already_built: bool,
}

#[derive(Debug)]
enum Slot {
    Filled(Arc<Transaction>),
    Wanted(ShortId),
}

impl PendingBlock {
    /// Start an abbreviated-hash block: resolve every short id against the
    /// receive cache, leaving unresolved slots for the rest.
    ///
    /// A short id appearing twice is a protocol error: short ids must be
    /// unique within a block.
    pub(crate) fn from_short_ids(
        header: Header,
        short_ids: Vec<ShortId>,
        cache: &BoundedMap<ShortId, Arc<Transaction>>,
    ) -> Result<PendingBlock, RelayError> {
        let expected = short_ids.len();
        let mut slots = Vec::with_capacity(expected);
        let mut by_short_id = HashMap::with_capacity(expected);
        let mut unresolved = 0;
        let mut cached_hits = 0;

        for (position, short_id) in short_ids.into_iter().enumerate() {
            if by_short_id.insert(short_id, position).is_some() {
                return Err(RelayError::Protocol("duplicate short id within one block"));
            }
            match cache.get(&short_id) {
                Some(tx) => {
                    slots.push(Slot::Filled(tx.clone()));
                    cached_hits += 1;
                }
                None => {
                    slots.push(Slot::Wanted(short_id));
                    unresolved += 1;
                }
            }
        }

        Ok(PendingBlock {
            header,
            slots,
            by_short_id,
            unresolved,
            expected,
            cached_hits,
            already_built: false,
        })
    }

    /// Start a cache-index block expecting `transaction_count` records.
    pub(crate) fn with_transaction_count(header: Header, transaction_count: u32) -> PendingBlock {
        let expected = transaction_count as usize;
        PendingBlock {
            header,
            slots: Vec::with_capacity(expected),
            by_short_id: HashMap::new(),
            unresolved: expected,
            expected,
            cached_hits: 0,
            already_built: false,
        }
    }

    /// Whether this block has a slot (resolved or not) for `short_id`.
    pub(crate) fn wants(&self, short_id: &ShortId) -> bool {
        self.by_short_id.contains_key(short_id)
    }

    /// Slots still waiting for a transaction.
    pub(crate) fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// Whether the block already went out through `build`.
    pub(crate) fn is_built(&self) -> bool {
        self.already_built
    }

    /// How many slots were answered from the receive cache.
    pub(crate) fn cached_hits(&self) -> usize {
        self.cached_hits
    }

    /// Fill the slot matching this transaction's short id.
    ///
    /// Returns `true` when this was the last unresolved slot. Resolving a
    /// slot twice, or a transaction with no slot, is a protocol error.
    pub(crate) fn resolve(&mut self, tx: Arc<Transaction>) -> Result<bool, RelayError> {
        let position = *self
            .by_short_id
            .get(&tx.short_id())
            .ok_or(RelayError::Protocol(
                "transaction does not belong to the block in flight",
            ))?;
        let slot = &mut self.slots[position];
        match slot {
            Slot::Filled(_) => Err(RelayError::Protocol("transaction slot resolved twice")),
            Slot::Wanted(_) => {
                *slot = Slot::Filled(tx);
                self.unresolved -= 1;
                Ok(self.unresolved == 0)
            }
        }
    }

    /// Append the next transaction of a cache-index block, marking whether
    /// it came out of the receive cache.
    ///
    /// Returns `true` when the block is complete.
    pub(crate) fn push_transaction(&mut self, tx: Arc<Transaction>, from_cache: bool) -> bool {
        debug_assert!(self.slots.len() < self.expected);
        self.slots.push(Slot::Filled(tx));
        if from_cache {
            self.cached_hits += 1;
        }
        self.unresolved -= 1;
        self.unresolved == 0
    }

    /// Assemble the block, once.
    ///
    /// Returns `None` if slots are still unresolved or the block was
    /// already built.
    pub(crate) fn build(&mut self) -> Option<Block> {
        if self.already_built || self.unresolved > 0 {
            return None;
        }
        self.already_built = true;
        let transactions = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Filled(tx) => tx.clone(),
                Slot::Wanted(_) => unreachable!("zero unresolved slots means every slot is filled"),
            })
            .collect();
        Some(Block {
            header: self.header,
            transactions,
        })
    }
}
