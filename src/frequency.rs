//! Byte frequency analysis.

use std::io::{self, Read};

/// Occurrence count for each of the 256 byte values, plus the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.observe(data);
        table
    }

    /// Count every byte of `reader` until end of input.
    pub fn scan<R: Read>(mut reader: R, buffer_size: usize) -> io::Result<Self> {
        let mut table = Self::new();
        let mut buf = vec![0u8; buffer_size.max(1)];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.observe(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(table)
    }

    pub fn observe(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Present symbols ordered by descending count, ties by ascending value.
    pub fn sorted_symbols(&self) -> Vec<(u8, u64)> {
        let mut symbols: Vec<(u8, u64)> = (0..=255u8)
            .map(|s| (s, self.counts[s as usize]))
            .filter(|&(_, c)| c > 0)
            .collect();
        symbols.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        symbols
    }

    /// Shannon entropy in bits per byte.
    pub fn entropy_bits(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let len = self.total as f64;
        let mut entropy = 0.0;
        for &c in &self.counts {
            if c > 0 {
                let p = c as f64 / len;
                entropy -= p * p.log2();
            }
        }
        entropy
    }
}
