//! Shannon-Fano code construction
//!
//! Symbols are ordered by descending frequency (ties by ascending value) and
//! recursively split into two runs of near-equal weight. The left run extends
//! the code with `0`, the right run with `1`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::frequency::FrequencyTable;

/// A prefix code word, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub(crate) fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Parse ASCII `'0'`/`'1'` characters. `None` for empty or non-binary input.
    pub fn from_ascii(ascii: &[u8]) -> Option<Self> {
        if ascii.is_empty() {
            return None;
        }
        ascii
            .iter()
            .map(|&c| match c {
                b'0' => Some(false),
                b'1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Self)
    }

    pub fn to_ascii(&self) -> Vec<u8> {
        self.0.iter().map(|&b| if b { b'1' } else { b'0' }).collect()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, other: &Code) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Symbol to code mapping, iterated in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous code if the symbol was already present.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Direct index from byte value to code for the encoding hot loop.
    pub fn lookup(&self) -> [Option<&Code>; 256] {
        let mut table = [None; 256];
        for (&symbol, code) in &self.codes {
            table[symbol as usize] = Some(code);
        }
        table
    }

    /// Payload size in bits when `freqs` is encoded with this table.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        self.codes
            .iter()
            .map(|(&s, c)| freqs.count(s) * c.len() as u64)
            .sum()
    }

    pub fn is_prefix_free(&self) -> bool {
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        // In lexicographic order a prefix sorts directly before its extensions.
        sorted.windows(2).all(|w| !w[1].starts_with(w[0]))
    }
}

/// Assign a prefix code to every symbol present in `freqs`.
pub fn build_code_table(freqs: &FrequencyTable) -> CodeTable {
    let symbols = freqs.sorted_symbols();
    let mut table = CodeTable::new();

    match symbols.as_slice() {
        [] => {}
        [(symbol, _)] => {
            table.insert(*symbol, Code::from_bits(vec![false]));
        }
        _ => {
            let mut prefix = Vec::new();
            assign(&symbols, &mut prefix, &mut table);
        }
    }

    debug!(
        symbols = table.len(),
        longest = table.max_code_len(),
        "built code table"
    );
    table
}

fn assign(symbols: &[(u8, u64)], prefix: &mut Vec<bool>, table: &mut CodeTable) {
    match symbols {
        [] => {}
        [(symbol, freq)] => {
            let code = Code::from_bits(prefix.clone());
            trace!(symbol, freq, code = %code, "assigned code");
            table.insert(*symbol, code);
        }
        _ => {
            let at = split_point(symbols);
            prefix.push(false);
            assign(&symbols[..at], prefix, table);
            prefix.pop();
            prefix.push(true);
            assign(&symbols[at..], prefix, table);
            prefix.pop();
        }
    }
}

/// Start index of the right partition. Candidates are scanned left to right
/// and only a strictly smaller weight difference moves the split, so the
/// first minimum wins. Both sides are always non-empty.
fn split_point(symbols: &[(u8, u64)]) -> usize {
    let total: u64 = symbols.iter().map(|&(_, f)| f).sum();
    let mut left = 0u64;
    let mut best = 1;
    let mut min_diff = u64::MAX;

    for (i, &(_, freq)) in symbols[..symbols.len() - 1].iter().enumerate() {
        left += freq;
        let diff = left.abs_diff(total - left);
        if diff < min_diff {
            min_diff = diff;
            best = i + 1;
        }
    }
    best
}
