use kestrel_chain::block::MAX_BLOCK_BYTES;

/// How block transactions are referenced on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RelayMode {
    /// Transactions travel as 8-byte short ids; ones the peer is missing
    /// follow the block as separately framed raw records.
    AbbrevHash,
    /// Transactions travel as 16-bit positional cache indices, with
    /// `0xFFFF` announcing inline bytes.
    CacheId,
}

/// The parameters a version string pins down for the life of a connection.
#[derive(Debug)]
pub struct VersionParams {
    /// The ASCII version string exchanged in VERSION frames.
    pub name: &'static str,
    /// Capacity of the per-connection transaction caches on both sides.
    pub cache_capacity: usize,
    /// Maximum byte size of a loose (out-of-block) transaction.
    pub max_free_tx_bytes: usize,
    /// The block reference scheme.
    pub mode: RelayMode,
}

/// Every version this engine speaks, oldest first.
///
/// The triple a string maps to is frozen at negotiation and never resized.
pub static VERSIONS: [VersionParams; 3] = [
    VersionParams {
        name: "efficient eagle",
        cache_capacity: 2000,
        max_free_tx_bytes: MAX_BLOCK_BYTES as usize,
        mode: RelayMode::AbbrevHash,
    },
    VersionParams {
        name: "charming chameleon",
        cache_capacity: 1000,
        max_free_tx_bytes: 10_000,
        mode: RelayMode::AbbrevHash,
    },
    VersionParams {
        name: "dashing dingo",
        cache_capacity: 1000,
        max_free_tx_bytes: 25_000,
        mode: RelayMode::CacheId,
    },
];

/// The newest version this engine speaks; what an initiator offers.
pub fn current() -> &'static VersionParams {
    &VERSIONS[VERSIONS.len() - 1]
}

/// Look a peer's version string up in the table.
pub fn lookup(name: &str) -> Option<&'static VersionParams> {
    VERSIONS.iter().find(|params| params.name == name)
}

/// Whether `version` predates `other` in the table.
pub fn is_older(version: &'static VersionParams, other: &'static VersionParams) -> bool {
    ordinal(version) < ordinal(other)
}

fn ordinal(params: &'static VersionParams) -> usize {
    VERSIONS
        .iter()
        .position(|candidate| std::ptr::eq(candidate, params))
        .expect("version params always come from the static table")
}
