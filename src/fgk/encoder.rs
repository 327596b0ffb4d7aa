use tracing::debug;

use crate::bitstreams::{BinaryWriter, BinaryWriterBuilder};
use crate::error::CodecError;

use super::{tree::AdaptiveTree, CodecConfig, SymbolTable};

/// One encoding session: owns its tree, its symbol table and the output bits.
pub struct FgkEncoder {
    tree: AdaptiveTree,
    symbols: SymbolTable,
    writer: BinaryWriterBuilder,
    config: CodecConfig,
    encoded: usize,
}

impl Default for FgkEncoder {
    fn default() -> Self {
        Self::with_config(CodecConfig::default())
    }
}

impl FgkEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            tree: AdaptiveTree::new(),
            symbols: SymbolTable::new(),
            writer: BinaryWriterBuilder::new(),
            config,
            encoded: 0,
        }
    }

    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Number of symbols encoded so far.
    pub fn encoded(&self) -> usize {
        self.encoded
    }

    pub fn written_bits(&self) -> usize {
        self.writer.written_bits
    }

    /// Writes the codeword of `symbol` and updates the tree.
    pub fn encode_symbol(&mut self, symbol: u8) -> Result<(), CodecError> {
        match self.symbols.get(symbol) {
            Some(leaf) => {
                self.writer.extend(self.tree.code_path(leaf)?);
                self.tree.rebalance(leaf)?;
            }
            None => {
                self.writer.extend(self.tree.code_path(self.tree.not_yet_seen())?);
                self.writer.push_bits(symbol as u64, 8);

                let (internal, leaf) = self.tree.split_not_yet_seen(symbol)?;
                self.symbols.insert(symbol, leaf);
                self.tree.rebalance(internal)?;
            }
        }

        if self.config.verify_invariants {
            self.tree.check_invariants()?;
        }

        self.encoded += 1;
        Ok(())
    }

    /// Packs the bits written so far, padding the last byte.
    pub fn finish(self) -> BinaryWriter {
        debug!(
            symbols = self.encoded,
            distinct = self.symbols.len(),
            bits = self.writer.written_bits,
            "encoding session finished"
        );
        self.writer.build()
    }
}

/// Encodes `symbols` verbatim; the caller has already appended the sentinel.
pub fn encode(symbols: &[u8]) -> Result<BinaryWriter, CodecError> {
    if symbols.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut encoder = FgkEncoder::new();
    for &symbol in symbols {
        encoder.encode_symbol(symbol)?;
    }

    Ok(encoder.finish())
}
