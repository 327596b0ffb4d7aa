//! Adaptive (FGK) prefix coding.
//!
//! Encoder and decoder each grow their own [`AdaptiveTree`] from the same symbol
//! history, so the compressed stream carries no table: a symbol is written as its
//! current root-to-leaf path, or, the first time it shows up, as the path of the
//! not-yet-seen leaf followed by its raw 8-bit value. The stream ends with the
//! sentinel symbol.

pub mod tree;
pub mod encoder;
pub mod decoder;

use serde::{Serialize, Deserialize};
use tracing::debug;

pub use crate::error::{CodecError, TreeError};
pub use self::{decoder::{decode, FgkDecoder}, encoder::{encode, FgkEncoder}, tree::{AdaptiveTree, NodeIndex, NodeKind}};

use self::tree::ALPHABET_SIZE;

/// ASCII end-of-text.
pub const END_OF_TEXT: u8 = 0x03;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Symbol appended to the payload to mark the end of the stream.
    pub sentinel: u8,
    /// Run the full invariant checker after every symbol.
    pub verify_invariants: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { sentinel: END_OF_TEXT, verify_invariants: false }
    }
}

/// Leaf of every symbol introduced so far. Entries are only ever added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTable {
    leaves: [Option<NodeIndex>; ALPHABET_SIZE],
    len: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self { leaves: [None; ALPHABET_SIZE], len: 0 }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn get(&self, symbol: u8) -> Option<NodeIndex> {
        self.leaves[symbol as usize]
    }

    #[inline(always)]
    pub fn contains(&self, symbol: u8) -> bool {
        self.leaves[symbol as usize].is_some()
    }

    pub fn insert(&mut self, symbol: u8, leaf: NodeIndex) {
        if self.leaves[symbol as usize].replace(leaf).is_none() {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Runs a whole encoding session over `payload` and the configured sentinel,
/// returning the encoder before its bits are packed.
///
/// The payload must not contain the sentinel itself: a decoder would stop at it.
pub fn encode_payload(payload: &[u8], config: &CodecConfig) -> Result<FgkEncoder, CodecError> {
    if let Some(position) = payload.iter().position(|&b| b == config.sentinel) {
        return Err(CodecError::SentinelInPayload { position, sentinel: config.sentinel });
    }

    let mut encoder = FgkEncoder::with_config(*config);
    for &symbol in payload {
        encoder.encode_symbol(symbol)?;
    }
    encoder.encode_symbol(config.sentinel)?;

    Ok(encoder)
}

/// Compresses `payload`, appending the configured sentinel.
pub fn compress(payload: &[u8], config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
    let written = encode_payload(payload, config)?.finish();
    debug!(
        payload = payload.len(),
        compressed = written.len(),
        bits = written.written_bits,
        "compressed payload"
    );

    Ok(written.into_vec())
}

/// Inverse of [`compress`].
pub fn decompress(stream: &[u8], config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
    let mut decoder = FgkDecoder::with_config(stream.into(), *config);
    decoder.decode_to_end()
}

/// Sentinel for `payload`: `preferred` when given, otherwise [`END_OF_TEXT`] unless
/// the payload contains it, otherwise the smallest free byte.
pub fn choose_sentinel(payload: &[u8], preferred: Option<u8>) -> Result<u8, CodecError> {
    match preferred {
        Some(sentinel) => Ok(sentinel),
        None if !payload.contains(&END_OF_TEXT) => Ok(END_OF_TEXT),
        None => pick_sentinel(payload).ok_or(CodecError::NoFreeSentinel),
    }
}

/// Smallest byte value absent from `payload`, usable as its sentinel.
pub fn pick_sentinel(payload: &[u8]) -> Option<u8> {
    let mut present = [false; ALPHABET_SIZE];
    for &b in payload {
        present[b as usize] = true;
    }

    present.iter().position(|&seen| !seen).map(|b| b as u8)
}
