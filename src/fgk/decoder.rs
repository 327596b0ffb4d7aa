use tracing::debug;

use crate::bitstreams::BinaryReader;
use crate::error::{CodecError, TreeError};

use super::{tree::{AdaptiveTree, NodeKind}, CodecConfig, SymbolTable};

/// One decoding session over a complete compressed buffer.
///
/// Iterating yields the decoded bytes until the sentinel is reached; the sentinel
/// itself is not yielded. After an error the iterator is fused.
pub struct FgkDecoder {
    tree: AdaptiveTree,
    symbols: SymbolTable,
    reader: BinaryReader,
    config: CodecConfig,
    decoded: usize,
    done: bool,
}

impl FgkDecoder {
    pub fn new(stream: Box<[u8]>, sentinel: u8) -> Self {
        Self::with_config(stream, CodecConfig { sentinel, ..Default::default() })
    }

    pub fn with_config(stream: Box<[u8]>, config: CodecConfig) -> Self {
        Self {
            tree: AdaptiveTree::new(),
            symbols: SymbolTable::new(),
            reader: BinaryReader::new(stream),
            config,
            decoded: 0,
            done: false,
        }
    }

    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn reader(&self) -> &BinaryReader {
        &self.reader
    }

    /// Number of payload symbols decoded so far.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Decodes the next symbol, `None` once the sentinel has been read.
    pub fn decode_symbol(&mut self) -> Result<Option<u8>, CodecError> {
        if self.done {
            return Ok(None);
        }

        let mut node = self.tree.root();
        while let Some((left, right)) = self.tree.node(node)?.children() {
            node = if self.reader.read_bit()? { right } else { left };
        }

        let (symbol, visited) = match self.tree.node(node)?.kind() {
            NodeKind::NotYetSeen => {
                let symbol = self.reader.read_int(8)? as u8;
                if self.symbols.contains(symbol) {
                    return Err(CodecError::DuplicateLiteral { symbol });
                }

                let (internal, leaf) = self.tree.split_not_yet_seen(symbol)?;
                self.symbols.insert(symbol, leaf);
                (symbol, internal)
            }
            NodeKind::Symbol(symbol) => (symbol, node),
            NodeKind::Internal { .. } => return Err(TreeError::NotALeaf(node).into()),
        };

        if symbol == self.config.sentinel {
            self.done = true;
            debug!(
                symbols = self.decoded,
                distinct = self.symbols.len(),
                bits = self.reader.read_bits,
                "decoding session finished"
            );
            return Ok(None);
        }

        self.tree.rebalance(visited)?;

        if self.config.verify_invariants {
            self.tree.check_invariants()?;
        }

        self.decoded += 1;
        Ok(Some(symbol))
    }

    /// Decodes up to the sentinel.
    pub fn decode_to_end(&mut self) -> Result<Vec<u8>, CodecError> {
        if self.reader.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let mut output = Vec::new();
        for symbol in self.by_ref() {
            output.push(symbol?);
        }

        Ok(output)
    }
}

impl Iterator for FgkDecoder {
    type Item = Result<u8, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decode_symbol() {
            Ok(symbol) => symbol.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Decodes a complete stream terminated by `sentinel`; the sentinel is not part of
/// the result.
pub fn decode(stream: &[u8], sentinel: u8) -> Result<Vec<u8>, CodecError> {
    FgkDecoder::new(stream.into(), sentinel).decode_to_end()
}
