//! Per-call working state
//!
//! A fresh session is created for every encode or decode, so nothing carries
//! over between runs.

use std::io::{Read, Write};

use serde::Serialize;

use crate::bitio::{BitSink, BitSource};
use crate::codebook::build_code_table;
use crate::dictionary::Dictionary;
use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::trie::DecodingTrie;

/// Outcome of one encode call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeSummary {
    pub original_size: u64,
    pub distinct_symbols: usize,
    pub dictionary_size: usize,
    pub payload_size: u64,
    pub payload_bits: u64,
    /// (dictionary + payload) / original
    pub ratio: f64,
    pub entropy_bits: f64,
    pub average_code_length: f64,
}

/// Outcome of one decode call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub original_size: u64,
    pub payload_bits: u64,
}

#[derive(Debug, Default)]
pub struct EncodeSession {
    pub frequencies: FrequencyTable,
    pub dictionary: Dictionary,
}

impl EncodeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// First pass: count symbols and derive the code table.
    pub fn analyze<R: Read>(&mut self, reader: R, buffer_size: usize) -> Result<(), CodecError> {
        self.frequencies = FrequencyTable::scan(reader, buffer_size)?;
        let codes = build_code_table(&self.frequencies);
        self.dictionary = Dictionary::new(self.frequencies.total(), codes);
        Ok(())
    }

    pub fn write_dictionary<W: Write>(&self, writer: W) -> Result<usize, CodecError> {
        self.dictionary.write_to(writer)
    }

    /// Second pass: translate every byte to its code. Returns the payload bit count.
    pub fn write_payload<R: Read, W: Write>(&self, reader: R, sink: W) -> Result<u64, CodecError> {
        let lookup = self.dictionary.codes.lookup();
        let expected = self.dictionary.original_len;
        let mut bits = BitSink::new(sink);
        let mut actual = 0u64;

        for byte in reader.bytes() {
            let byte = byte?;
            let code = lookup[byte as usize].ok_or(CodecError::UnknownSymbol(byte))?;
            bits.write_code(code)?;
            actual += 1;
        }
        if actual != expected {
            return Err(CodecError::LengthMismatch { expected, actual });
        }

        let written = bits.bits_written();
        bits.finish()?;
        Ok(written)
    }

    pub fn summary(&self, dictionary_size: usize, payload_bits: u64) -> EncodeSummary {
        let original_size = self.frequencies.total();
        let payload_size = (payload_bits + 7) / 8;
        let (ratio, average_code_length) = if original_size == 0 {
            (1.0, 0.0)
        } else {
            (
                (dictionary_size as u64 + payload_size) as f64 / original_size as f64,
                payload_bits as f64 / original_size as f64,
            )
        };
        EncodeSummary {
            original_size,
            distinct_symbols: self.dictionary.codes.len(),
            dictionary_size,
            payload_size,
            payload_bits,
            ratio,
            entropy_bits: self.frequencies.entropy_bits(),
            average_code_length,
        }
    }
}

#[derive(Debug)]
pub struct DecodeSession {
    pub dictionary: Dictionary,
    trie: Option<DecodingTrie>,
}

impl DecodeSession {
    pub fn read_dictionary<R: Read>(reader: R) -> Result<Self, CodecError> {
        Ok(Self {
            dictionary: Dictionary::read_from(reader)?,
            trie: None,
        })
    }

    /// Decode `original_len` symbols from `input`. Returns the payload bits consumed.
    pub fn decode_payload<R: Read, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
        strict_trailing: bool,
    ) -> Result<u64, CodecError> {
        let trie = match self.trie.take() {
            Some(trie) => trie,
            None => DecodingTrie::from_codes(&self.dictionary.codes)?,
        };
        let trie = self.trie.insert(trie);

        let mut bits = BitSource::new(input);
        trie.decode_into(&mut bits, output, self.dictionary.original_len, strict_trailing)?;
        Ok(bits.bits_read())
    }
}
