//! Two-pass (static) Huffman coding of bytes.
//!
//! Used as a yardstick for the adaptive coder: it sees the whole payload before
//! assigning codewords and carries no header, so its size is the payload part only.

use std::{collections::{BTreeMap, BinaryHeap}, rc::Rc, cmp::Reverse};

use serde::Serialize;

use crate::{bitstreams::{BinaryWriterBuilder, BinaryReader, BinaryWriter}, error::CodecError};

#[derive(Default, Debug)]
struct HeapNode {
    /// The byte value for leaves, a creation counter above 255 for merged nodes.
    key: usize,
    weight: u64,
    left: Option<Rc<HeapNode>>,
    right: Option<Rc<HeapNode>>,
}

impl HeapNode {
    fn new(key: usize, weight: u64) -> Self {
        Self { key, weight, ..Default::default() }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight.cmp(&other.weight).then(self.key.cmp(&other.key))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for HeapNode {}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.key == other.key
    }
}

#[derive(Debug, Serialize)]
pub struct StaticHuffman {
    #[serde(skip)]
    root: Rc<HeapNode>,
    frequencies: BTreeMap<u8, u64>,
    /// Codeword of every byte in the payload, `true` for a right branch.
    codes: BTreeMap<u8, Vec<bool>>,
}

impl StaticHuffman {
    /// Builds the code for `payload`. Ties are broken by byte value, merged nodes
    /// after leaves, so the same payload always yields the same code.
    pub fn build(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let mut frequencies = BTreeMap::new();
        for &b in payload {
            frequencies.entry(b).and_modify(|freq| *freq += 1).or_insert(1);
        }

        let mut freq_tree = BinaryHeap::with_capacity(frequencies.len());
        for (&b, &freq) in frequencies.iter() {
            freq_tree.push(Reverse(Rc::new(HeapNode::new(b as usize, freq))));
        }

        let mut next_key = 256;
        while freq_tree.len() > 1 {
            let (Some(Reverse(node1)), Some(Reverse(node2))) = (freq_tree.pop(), freq_tree.pop()) else {
                break;
            };

            let mut new_node = HeapNode::new(next_key, node1.weight + node2.weight);
            new_node.left = Some(node1);
            new_node.right = Some(node2);
            next_key += 1;

            freq_tree.push(Reverse(Rc::new(new_node)));
        }

        let root = match freq_tree.pop() {
            Some(Reverse(root)) => root,
            None => return Err(CodecError::EmptyInput),
        };

        let mut codes = BTreeMap::new();
        if root.is_leaf() {
            codes.insert(root.key as u8, vec![false]);
        } else {
            Self::collect_codes(&root, &mut Vec::new(), &mut codes);
        }

        Ok(Self { root, frequencies, codes })
    }

    fn collect_codes(node: &HeapNode, prefix: &mut Vec<bool>, codes: &mut BTreeMap<u8, Vec<bool>>) {
        if node.is_leaf() {
            codes.insert(node.key as u8, prefix.clone());
            return;
        }

        for (bit, child) in [(false, &node.left), (true, &node.right)] {
            if let Some(child) = child {
                prefix.push(bit);
                Self::collect_codes(child, prefix, codes);
                prefix.pop();
            }
        }
    }

    pub fn frequencies(&self) -> &BTreeMap<u8, u64> {
        &self.frequencies
    }

    pub fn codes(&self) -> &BTreeMap<u8, Vec<bool>> {
        &self.codes
    }

    /// Size in bits of the encoded payload, header excluded.
    pub fn encoded_bits(&self) -> u64 {
        self.frequencies
            .iter()
            .map(|(b, &freq)| freq * self.codes[b].len() as u64)
            .sum()
    }

    pub fn encode(&self, payload: &[u8]) -> Result<BinaryWriter, CodecError> {
        let mut writer = BinaryWriterBuilder::new();

        for &b in payload {
            let code = self.codes.get(&b).ok_or(CodecError::UnknownSymbol { symbol: b })?;
            writer.extend(code.iter().copied());
        }

        Ok(writer.build())
    }

    /// Decodes `count` bytes from `stream`.
    pub fn decode(&self, stream: &[u8], count: usize) -> Result<Vec<u8>, CodecError> {
        let mut reader = BinaryReader::new(stream.into());
        let mut output = Vec::with_capacity(count);

        for _ in 0..count {
            let mut node = &self.root;

            if node.is_leaf() {
                reader.read_bit()?;
            }

            while !node.is_leaf() {
                let next = if reader.read_bit()? { &node.right } else { &node.left };
                node = match next {
                    Some(child) => child,
                    None => break,
                };
            }

            output.push(node.key as u8);
        }

        Ok(output)
    }
}

#[test]
fn test_codes_for_skewed_frequencies() {
    let huff = StaticHuffman::build(b"aaaabbc").unwrap();

    assert_eq!(huff.frequencies().get(&b'a'), Some(&4));
    assert_eq!(huff.codes()[&b'a'], vec![true]);
    assert_eq!(huff.codes()[&b'c'], vec![false, false]);
    assert_eq!(huff.codes()[&b'b'], vec![false, true]);
    assert_eq!(huff.encoded_bits(), 10);
}

#[test]
fn test_single_symbol() {
    let huff = StaticHuffman::build(b"zzzz").unwrap();

    assert_eq!(huff.codes()[&b'z'], vec![false]);
    assert_eq!(huff.encoded_bits(), 4);

    let written = huff.encode(b"zzzz").unwrap();
    assert_eq!(written.written_bits, 4);
    assert_eq!(huff.decode(&written.os, 4).unwrap(), b"zzzz");
}

#[test]
fn test_static_round_trip() {
    let payload = b"she sells sea shells by the sea shore, the shells she sells are sea shells";
    let huff = StaticHuffman::build(payload).unwrap();

    let written = huff.encode(payload).unwrap();

    assert_eq!(written.written_bits as u64, huff.encoded_bits());
    assert_eq!(huff.decode(&written.os, payload.len()).unwrap(), payload);
}

#[test]
fn test_static_errors() {
    assert_eq!(StaticHuffman::build(&[]).unwrap_err(), CodecError::EmptyInput);

    let huff = StaticHuffman::build(b"ab").unwrap();
    assert_eq!(huff.encode(b"abc").unwrap_err(), CodecError::UnknownSymbol { symbol: b'c' });
    assert!(matches!(huff.decode(&[0x40], 9), Err(CodecError::TruncatedStream { .. })));
}
