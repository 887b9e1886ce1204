//! Chain data structures for the kestrel block relay.
//!
//! The relay engine treats the chain as opaque: transactions are raw byte
//! blobs identified by their double-SHA-256 hash, and block headers are
//! fixed 80-byte strings. Semantic validation (scripts, Merkle roots,
//! consensus rules) is the embedder's business, so none of it lives here.

#![allow(clippy::unit_arg)]

pub mod block;
pub mod serialization;
pub mod transaction;

pub use serialization::SerializationError;
