//! Symbol counting: the single frequency pre-scan every compression starts with.

use std::io::{BufRead, BufReader, Read};

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::symbol::{check_byte, Symbol, BYTE_ALPHABET};

/// Occurrence counts for every byte value.
///
/// `PSEUDO_EOF` is never stored here; the tree builder synthesizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; BYTE_ALPHABET as usize],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: [0; BYTE_ALPHABET as usize],
        }
    }

    /// Count one more occurrence of `symbol`.
    pub fn add(&mut self, symbol: Symbol) -> Result<()> {
        let idx = check_byte(symbol)?;
        self.counts[idx] += 1;
        Ok(())
    }

    /// Overwrite the count for `symbol`.
    pub fn set(&mut self, symbol: Symbol, count: u64) -> Result<()> {
        let idx = check_byte(symbol)?;
        self.counts[idx] = count;
        Ok(())
    }

    /// Count for `symbol`; absent symbols are 0.
    pub fn get(&self, symbol: Symbol) -> Result<u64> {
        let idx = check_byte(symbol)?;
        Ok(self.counts[idx])
    }

    pub fn clear(&mut self) {
        self.counts = [0; BYTE_ALPHABET as usize];
    }

    /// Nonzero entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(s, &c)| (s as Symbol, c))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of byte values seen at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Shannon entropy in bits per byte.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for (_, f) in self.iter() {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Read `reader` to exhaustion, returning the frequencies and the number of
/// bytes read. The two always agree: `table.total() == read`.
pub fn count<R: Read>(reader: R) -> Result<(FrequencyTable, u64)> {
    count_with_capacity(reader, DEFAULT_BUFFER_SIZE)
}

/// Like [`count`], reading through a buffer of `capacity` bytes.
pub fn count_with_capacity<R: Read>(reader: R, capacity: usize) -> Result<(FrequencyTable, u64)> {
    let mut reader = BufReader::with_capacity(capacity, reader);
    let mut table = FrequencyTable::new();
    let mut read = 0u64;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &b in chunk {
            table.counts[b as usize] += 1;
        }
        let n = chunk.len();
        read += n as u64;
        reader.consume(n);
    }

    Ok((table, read))
}
