//! Error types for shannon-fano

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary truncated while reading {0}")]
    TruncatedDictionary(&'static str),

    #[error("dictionary entry for symbol {symbol:#04x} has a zero code length")]
    ZeroCodeLength { symbol: u8 },

    #[error("code for symbol {symbol:#04x} is {len} bits long, the dictionary allows at most 255")]
    CodeTooLong { symbol: u8, len: usize },

    #[error("dictionary declares {0} entries, only 256 symbols exist")]
    TooManyEntries(u16),

    #[error("invalid code character {found:#04x} in entry for symbol {symbol:#04x}")]
    InvalidCodeChar { symbol: u8, found: u8 },

    #[error("symbol {0:#04x} appears more than once in the dictionary")]
    DuplicateSymbol(u8),

    #[error("code for symbol {0:#04x} is a prefix of, or prefixed by, another code")]
    AmbiguousCode(u8),

    #[error("dictionary declares {0} original bytes but contains no codes")]
    EmptyCodeTable(u64),

    #[error("input size mismatch: expected {expected} bytes, read {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("symbol {0:#04x} has no code; input changed between passes")]
    UnknownSymbol(u8),

    #[error("invalid bit sequence at bit {0}: no matching code")]
    InvalidBitSequence(u64),

    #[error("compressed data truncated: decoded {decoded} of {expected} bytes")]
    TruncatedPayload { decoded: u64, expected: u64 },

    #[error("unexpected data after the final code")]
    TrailingData,

    #[error("non-seekable input exceeds the {limit}-byte buffering limit")]
    InputTooLarge { limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}
