//! shannon-fano: lossless byte-stream compression with Shannon-Fano prefix codes.
//!
//! Encoding produces two streams:
//! - a dictionary holding the original length and every symbol's code
//! - a delimiter-free payload of MSB-first packed code bits
//!
//! The payload carries no end marker; the decoder stops after emitting the
//! number of bytes the dictionary declares.

pub mod bitio;
pub mod codebook;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod frequency;
pub mod session;
pub mod source;
pub mod trie;

use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};

use tracing::{debug, info};

pub use crate::codebook::{build_code_table, Code, CodeTable};
pub use crate::config::CodecConfig;
pub use crate::dictionary::Dictionary;
pub use crate::error::CodecError;
pub use crate::frequency::FrequencyTable;
pub use crate::session::{DecodeSession, DecodeSummary, EncodeSession, EncodeSummary};
pub use crate::source::InputSource;

/// In-memory result of [`ShannonFano::compress`]
#[derive(Debug, Clone)]
pub struct Compressed {
    pub dictionary: Vec<u8>,
    pub payload: Vec<u8>,
    pub summary: EncodeSummary,
}

/// The codec entry point
#[derive(Debug, Clone, Default)]
pub struct ShannonFano {
    config: CodecConfig,
}

impl ShannonFano {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `input`, writing the payload to `output` and the dictionary to
    /// `dictionary`. Empty input produces a dictionary and no payload.
    pub fn encode<W: Write, D: Write>(
        &self,
        input: InputSource<'_>,
        output: W,
        dictionary: D,
    ) -> Result<EncodeSummary, CodecError> {
        match input {
            InputSource::Seekable(reader) => self.encode_rewindable(reader, output, dictionary),
            InputSource::Stream(reader) => {
                let data = source::spool(reader, self.config.max_buffered_input)?;
                debug!(bytes = data.len(), "buffered non-seekable input");
                self.encode_rewindable(&mut Cursor::new(data), output, dictionary)
            }
        }
    }

    fn encode_rewindable<R, W, D>(
        &self,
        reader: &mut R,
        output: W,
        dictionary: D,
    ) -> Result<EncodeSummary, CodecError>
    where
        R: Read + Seek + ?Sized,
        W: Write,
        D: Write,
    {
        let cap = self.config.io_buffer_size;
        let start = reader.stream_position()?;

        let mut session = EncodeSession::new();
        session.analyze(&mut *reader, cap)?;
        let dictionary_size = session.write_dictionary(BufWriter::with_capacity(cap, dictionary))?;

        if session.frequencies.is_empty() {
            info!("empty input, wrote dictionary only");
            return Ok(session.summary(dictionary_size, 0));
        }

        reader.seek(SeekFrom::Start(start))?;
        let payload_bits = session.write_payload(
            BufReader::with_capacity(cap, &mut *reader),
            BufWriter::with_capacity(cap, output),
        )?;

        let summary = session.summary(dictionary_size, payload_bits);
        info!(
            original = summary.original_size,
            symbols = summary.distinct_symbols,
            dictionary = summary.dictionary_size,
            payload = summary.payload_size,
            "encoded"
        );
        Ok(summary)
    }

    /// Decode `input` using `dictionary`, writing the original bytes to `output`.
    pub fn decode<R: Read, D: Read, W: Write>(
        &self,
        input: R,
        dictionary: D,
        output: W,
    ) -> Result<DecodeSummary, CodecError> {
        let cap = self.config.io_buffer_size;
        let mut session = DecodeSession::read_dictionary(BufReader::with_capacity(cap, dictionary))?;
        let original_size = session.dictionary.original_len;
        let mut out = BufWriter::with_capacity(cap, output);

        if original_size == 0 {
            out.flush()?;
            info!("dictionary declares empty input");
            return Ok(DecodeSummary {
                original_size,
                payload_bits: 0,
            });
        }

        let payload_bits = session.decode_payload(
            BufReader::with_capacity(cap, input),
            &mut out,
            self.config.strict_trailing,
        )?;
        out.flush()?;

        info!(original = original_size, payload_bits, "decoded");
        Ok(DecodeSummary {
            original_size,
            payload_bits,
        })
    }

    pub fn compress(&self, data: &[u8]) -> Result<Compressed, CodecError> {
        let mut dictionary = Vec::new();
        let mut payload = Vec::new();
        let summary = self.encode(
            InputSource::seekable(&mut Cursor::new(data)),
            &mut payload,
            &mut dictionary,
        )?;
        Ok(Compressed {
            dictionary,
            payload,
            summary,
        })
    }

    pub fn decompress(&self, dictionary: &[u8], payload: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut output = Vec::new();
        self.decode(payload, dictionary, &mut output)?;
        Ok(output)
    }

    /// Parse a dictionary without decoding anything.
    pub fn inspect<D: Read>(&self, dictionary: D) -> Result<Dictionary, CodecError> {
        Dictionary::read_from(BufReader::with_capacity(self.config.io_buffer_size, dictionary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let codec = ShannonFano::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = codec.compress(data).unwrap();
        let decompressed = codec
            .decompress(&compressed.dictionary, &compressed.payload)
            .unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_empty_input() {
        let codec = ShannonFano::default();
        let compressed = codec.compress(b"").unwrap();
        assert_eq!(compressed.dictionary.len(), 10);
        assert!(compressed.payload.is_empty());
        assert!(codec.decompress(&compressed.dictionary, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol() {
        let codec = ShannonFano::default();
        let data = vec![b'q'; 1000];
        let compressed = codec.compress(&data).unwrap();
        let dict = codec.inspect(&compressed.dictionary[..]).unwrap();
        assert_eq!(dict.codes.len(), 1);
        assert_eq!(dict.codes.get(b'q').unwrap().to_string(), "0");
        assert_eq!(compressed.payload, vec![0u8; 125]);
        assert_eq!(codec.decompress(&compressed.dictionary, &compressed.payload).unwrap(), data);
    }

    #[test]
    fn test_stream_input_buffered() {
        let codec = ShannonFano::default();
        let data = b"streamed input is buffered before the first pass";
        let mut stream: &[u8] = data;
        let (mut payload, mut dictionary) = (Vec::new(), Vec::new());
        codec
            .encode(InputSource::stream(&mut stream), &mut payload, &mut dictionary)
            .unwrap();
        assert_eq!(codec.decompress(&dictionary, &payload).unwrap(), data);
    }

    #[test]
    fn test_seekable_input_rewinds_to_start_position() {
        let codec = ShannonFano::default();
        let mut cursor = Cursor::new(b"skipABBA".to_vec());
        cursor.set_position(4);
        let (mut payload, mut dictionary) = (Vec::new(), Vec::new());
        let summary = codec
            .encode(InputSource::seekable(&mut cursor), &mut payload, &mut dictionary)
            .unwrap();
        assert_eq!(summary.original_size, 4);
        assert_eq!(codec.decompress(&dictionary, &payload).unwrap(), b"ABBA");
    }

    #[test]
    fn test_buffering_limit() {
        let codec = ShannonFano::new(CodecConfig {
            max_buffered_input: 4,
            ..CodecConfig::default()
        });
        let mut stream: &[u8] = b"too long";
        let result = codec.encode(InputSource::stream(&mut stream), Vec::new(), Vec::new());
        assert!(matches!(result, Err(CodecError::InputTooLarge { limit: 4 })));
    }

    #[test]
    fn test_compression_ratio() {
        let codec = ShannonFano::default();
        let data = "aaaaaaaaab".repeat(100);
        let compressed = codec.compress(data.as_bytes()).unwrap();
        assert!(compressed.summary.ratio < 0.2, "skewed data should compress well");
        assert!(compressed.summary.average_code_length >= compressed.summary.entropy_bits);
    }
}
