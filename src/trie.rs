//! Decoding trie
//!
//! Nodes live in a single arena and refer to their children by index, so the
//! whole tree is released with the trie.

use std::io::{Read, Write};

use crate::bitio::BitSource;
use crate::codebook::{Code, CodeTable};
use crate::error::CodecError;

const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct Node {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct DecodingTrie {
    nodes: Vec<Node>,
}

impl DecodingTrie {
    /// Build from a code table, rejecting tables that are not prefix-free.
    pub fn from_codes(codes: &CodeTable) -> Result<Self, CodecError> {
        let mut trie = Self {
            nodes: vec![Node::default()],
        };
        for (symbol, code) in codes.iter() {
            trie.insert(symbol, code)?;
        }
        Ok(trie)
    }

    fn insert(&mut self, symbol: u8, code: &Code) -> Result<(), CodecError> {
        if code.is_empty() {
            return Err(CodecError::ZeroCodeLength { symbol });
        }
        let mut node = ROOT;
        for bit in code.bits() {
            if self.nodes[node].symbol.is_some() {
                return Err(CodecError::AmbiguousCode(symbol));
            }
            let next = self.nodes[node].children[bit as usize];
            node = match next {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children[bit as usize] = Some(child);
                    child
                }
            };
        }
        let end = &mut self.nodes[node];
        if end.symbol.is_some() || end.children.iter().any(Option::is_some) {
            return Err(CodecError::AmbiguousCode(symbol));
        }
        end.symbol = Some(symbol);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve exactly one symbol, or `None` if the source ends first.
    pub fn next_symbol<R: Read>(&self, bits: &mut BitSource<R>) -> Result<Option<u8>, CodecError> {
        let mut node = ROOT;
        loop {
            let bit = match bits.read_bit()? {
                Some(bit) => bit,
                None => return Ok(None),
            };
            node = self.nodes[node].children[bit as usize]
                .ok_or_else(|| CodecError::InvalidBitSequence(bits.bits_read() - 1))?;
            if let Some(symbol) = self.nodes[node].symbol {
                return Ok(Some(symbol));
            }
        }
    }

    /// Decode `count` symbols into `out`. With `strict_trailing`, the rest of
    /// the final byte must be zero padding and nothing may follow it.
    pub fn decode_into<R: Read, W: Write>(
        &self,
        bits: &mut BitSource<R>,
        out: &mut W,
        count: u64,
        strict_trailing: bool,
    ) -> Result<(), CodecError> {
        let mut decoded = 0u64;
        while decoded < count {
            match self.next_symbol(bits)? {
                Some(symbol) => out.write_all(&[symbol])?,
                None => {
                    return Err(CodecError::TruncatedPayload {
                        decoded,
                        expected: count,
                    })
                }
            }
            decoded += 1;
        }

        if strict_trailing {
            while !bits.is_aligned() {
                if bits.read_bit()? == Some(true) {
                    return Err(CodecError::TrailingData);
                }
            }
            if bits.read_bit()?.is_some() {
                return Err(CodecError::TrailingData);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitSink;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        let mut codes = CodeTable::new();
        for &(symbol, code) in entries {
            codes.insert(symbol, Code::from_ascii(code.as_bytes()).unwrap());
        }
        codes
    }

    fn pack(bits: &str) -> Vec<u8> {
        let mut sink = BitSink::new(Vec::new());
        for c in bits.chars() {
            sink.write_bit(c == '1').unwrap();
        }
        sink.finish().unwrap()
    }

    fn decode(codes: &CodeTable, payload: &[u8], count: u64, strict: bool) -> Result<Vec<u8>, CodecError> {
        let trie = DecodingTrie::from_codes(codes)?;
        let mut bits = BitSource::new(payload);
        let mut out = Vec::new();
        trie.decode_into(&mut bits, &mut out, count, strict)?;
        Ok(out)
    }

    #[test]
    fn test_decode_simple() {
        let codes = table(&[(b'a', "0"), (b'b', "10"), (b'c', "11")]);
        let payload = pack("0101100");
        assert_eq!(decode(&codes, &payload, 5, true).unwrap(), b"abcaa".to_vec());
    }

    #[test]
    fn test_node_count() {
        let trie = DecodingTrie::from_codes(&table(&[(b'a', "0"), (b'b', "10"), (b'c', "11")])).unwrap();
        assert_eq!(trie.node_count(), 5);
    }

    #[test]
    fn test_stops_at_count_ignoring_padding() {
        let codes = table(&[(b'x', "0")]);
        let payload = pack("000");
        assert_eq!(decode(&codes, &payload, 3, true).unwrap(), b"xxx".to_vec());
    }

    #[test]
    fn test_truncated_payload() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        let payload = pack("01");
        assert!(matches!(
            decode(&codes, &payload, 9, false),
            Err(CodecError::TruncatedPayload { decoded: 8, expected: 9 })
        ));
    }

    #[test]
    fn test_missing_edge() {
        let codes = table(&[(b'x', "0")]);
        let payload = pack("001");
        assert!(matches!(
            decode(&codes, &payload, 3, false),
            Err(CodecError::InvalidBitSequence(2))
        ));
    }

    #[test]
    fn test_flipped_padding_detected() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        let mut payload = pack("011");
        payload[0] |= 0b0000_0001;
        assert!(matches!(
            decode(&codes, &payload, 3, true),
            Err(CodecError::TrailingData)
        ));
        assert_eq!(decode(&codes, &payload, 3, false).unwrap(), b"abb".to_vec());
    }

    #[test]
    fn test_extra_bytes_detected() {
        let codes = table(&[(b'a', "0"), (b'b', "1")]);
        let mut payload = pack("01");
        payload.push(0);
        assert!(matches!(
            decode(&codes, &payload, 2, true),
            Err(CodecError::TrailingData)
        ));
    }

    #[test]
    fn test_prefix_collision_rejected() {
        let result = DecodingTrie::from_codes(&table(&[(1, "0"), (2, "01")]));
        assert!(matches!(result, Err(CodecError::AmbiguousCode(2))));

        let result = DecodingTrie::from_codes(&table(&[(1, "01"), (2, "0")]));
        assert!(matches!(result, Err(CodecError::AmbiguousCode(2))));

        let result = DecodingTrie::from_codes(&table(&[(1, "10"), (2, "10")]));
        assert!(matches!(result, Err(CodecError::AmbiguousCode(2))));
    }
}
