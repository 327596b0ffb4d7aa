use thiserror::Error;

use crate::fgk::tree::{NodeIndex, Rank};

/// Failures of the adaptive tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    NodeOutOfBounds(NodeIndex),
    #[error("node {0} is not a leaf")]
    NotALeaf(NodeIndex),
    #[error("the root cannot change position")]
    RootExchange,
    #[error("node {ancestor} is an ancestor of node {descendant}, they cannot exchange positions")]
    AncestorExchange { ancestor: NodeIndex, descendant: NodeIndex },
    #[error("no ranks left below {0} to introduce a new symbol")]
    AlphabetExhausted(Rank),
    #[error("tree invariant violated: {0}")]
    InvariantViolated(String),
}

/// Failures of an encode or decode session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("compressed stream ended after {read_bits} bits without an end-of-stream marker")]
    TruncatedStream { read_bits: usize },
    #[error("nothing to process: the input is empty")]
    EmptyInput,
    #[error("payload byte {position} equals the end-of-stream sentinel {sentinel:#04x}")]
    SentinelInPayload { position: usize, sentinel: u8 },
    #[error("stream introduces symbol {symbol:#04x} a second time")]
    DuplicateLiteral { symbol: u8 },
    #[error("symbol {symbol:#04x} has no codeword")]
    UnknownSymbol { symbol: u8 },
    #[error("every byte value occurs in the payload, none is free for the sentinel")]
    NoFreeSentinel,
    #[error(transparent)]
    Tree(#[from] TreeError),
}
