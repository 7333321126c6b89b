//! Dictionary serialization
//!
//! Layout, in order:
//! - original length: u64, little-endian
//! - entry count: u16, little-endian
//! - per entry, ascending by symbol: symbol (u8), code length (u8), then
//!   `code length` bytes of ASCII `'0'`/`'1'`

use std::io::{self, Read, Write};

use serde::Serialize;

use crate::codebook::{Code, CodeTable};
use crate::error::CodecError;

const HEADER_LEN: usize = 8 + 2;
const MAX_ENTRIES: u16 = 256;

/// Everything the decoder needs besides the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dictionary {
    pub original_len: u64,
    pub codes: CodeTable,
}

impl Dictionary {
    pub fn new(original_len: u64, codes: CodeTable) -> Self {
        Self {
            original_len,
            codes,
        }
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.codes.iter().map(|(_, c)| 2 + c.len()).sum::<usize>()
    }

    /// Write the dictionary and return the number of bytes written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize, CodecError> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.original_len.to_le_bytes());
        out.extend_from_slice(&(self.codes.len() as u16).to_le_bytes());

        for (symbol, code) in self.codes.iter() {
            let len = u8::try_from(code.len()).map_err(|_| CodecError::CodeTooLong {
                symbol,
                len: code.len(),
            })?;
            out.push(symbol);
            out.push(len);
            out.extend_from_slice(&code.to_ascii());
        }

        writer.write_all(&out)?;
        writer.flush()?;
        Ok(out.len())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, CodecError> {
        let mut len_buf = [0u8; 8];
        read_field(&mut reader, &mut len_buf, "original length")?;
        let original_len = u64::from_le_bytes(len_buf);

        let mut count_buf = [0u8; 2];
        read_field(&mut reader, &mut count_buf, "entry count")?;
        let count = u16::from_le_bytes(count_buf);
        if count > MAX_ENTRIES {
            return Err(CodecError::TooManyEntries(count));
        }

        let mut codes = CodeTable::new();
        for _ in 0..count {
            let mut entry = [0u8; 2];
            read_field(&mut reader, &mut entry[..1], "entry symbol")?;
            read_field(&mut reader, &mut entry[1..], "entry code length")?;
            let [symbol, len] = entry;
            if len == 0 {
                return Err(CodecError::ZeroCodeLength { symbol });
            }

            let mut ascii = vec![0u8; len as usize];
            read_field(&mut reader, &mut ascii, "entry code")?;
            let code = parse_code(symbol, &ascii)?;

            if codes.insert(symbol, code).is_some() {
                return Err(CodecError::DuplicateSymbol(symbol));
            }
        }

        if codes.is_empty() && original_len > 0 {
            return Err(CodecError::EmptyCodeTable(original_len));
        }

        Ok(Self {
            original_len,
            codes,
        })
    }
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], field: &'static str) -> Result<(), CodecError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => CodecError::TruncatedDictionary(field),
        _ => CodecError::Io(e),
    })
}

fn parse_code(symbol: u8, ascii: &[u8]) -> Result<Code, CodecError> {
    if let Some(&found) = ascii.iter().find(|&&c| c != b'0' && c != b'1') {
        return Err(CodecError::InvalidCodeChar { symbol, found });
    }
    Code::from_ascii(ascii).ok_or(CodecError::ZeroCodeLength { symbol })
}
