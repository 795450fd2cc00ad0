//! huff-compress: Huffman file compression with a self-describing header.
//!
//! A compressed file is laid out bit by bit as:
//! - a 32-bit magic marker
//! - the code tree in preorder (see [`header`])
//! - one variable-length code per original byte
//! - the code for the end-of-stream symbol, then zero padding
//!
//! Compression scans the input twice: once to count symbols and size the
//! result, once to emit codes. When the coded form would not be smaller than
//! the input, nothing is written unless the caller forces it.

pub mod codes;
pub mod compress;
pub mod config;
pub mod counter;
pub mod decompress;
pub mod error;
pub mod header;
pub mod symbol;
pub mod tree;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use bitstream_io::{BigEndian, BitReader};
use tracing::{info, warn};

pub use crate::codes::{Code, CodeTable};
pub use crate::compress::{Analysis, CompressSummary};
pub use crate::config::CompressionConfig;
pub use crate::counter::FrequencyTable;
pub use crate::error::{CompressError, Result};
pub use crate::symbol::{Symbol, ALPHABET_SIZE, PSEUDO_EOF};
pub use crate::tree::HuffNode;

/// The main compressor engine
pub struct Compressor {
    config: CompressionConfig,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress between streams. The input is read twice, hence `Seek`.
    pub fn compress<R: Read + Seek, W: Write>(
        &self,
        input: R,
        output: W,
        force: bool,
    ) -> Result<CompressSummary> {
        compress::compress(input, output, force, &self.config)
    }

    /// Decompress between streams. Returns the number of bytes produced.
    pub fn decompress<R: Read, W: Write>(&self, input: R, output: W) -> Result<u64> {
        decompress::decompress(input, output)
    }

    /// Frequencies, tree and codes for a file, without writing anything.
    pub fn inspect_file(&self, input: &Path) -> Result<Analysis> {
        compress::analyze(File::open(input)?, &self.config)
    }

    /// Compress `input` into a new file at `output`.
    ///
    /// The output file is only created once the size gate has passed, so a
    /// refused compression leaves nothing behind.
    pub fn compress_file(
        &self,
        input: &Path,
        output: &Path,
        force: bool,
    ) -> Result<CompressSummary> {
        let mut file = File::open(input)?;
        let start = file.stream_position()?;
        let mut analysis = compress::analyze(&mut file, &self.config)?;
        if !analysis.should_write(force) {
            warn!(
                "Skipping {}: {} bits estimated vs {} original",
                input.display(),
                analysis.summary.compressed_bits,
                analysis.summary.original_bits
            );
            return Ok(analysis.summary);
        }

        file.seek(SeekFrom::Start(start))?;
        let result = File::create(output).map_err(CompressError::from).and_then(|out| {
            let writer = BufWriter::with_capacity(self.config.buffer_capacity(), out);
            compress::write_compressed(&mut file, writer, &analysis, &self.config)
        });
        if let Err(e) = result {
            self.discard_partial(output);
            return Err(e);
        }

        analysis.summary.written = true;
        info!(
            "Compressed {} -> {} ({} bytes, ratio {:.3})",
            input.display(),
            output.display(),
            analysis.summary.symbols_read,
            analysis.summary.ratio()
        );
        Ok(analysis.summary)
    }

    /// Decompress `input` into a new file at `output`.
    ///
    /// The header is validated before `output` is created.
    pub fn decompress_file(&self, input: &Path, output: &Path) -> Result<u64> {
        let reader = BufReader::with_capacity(self.config.buffer_capacity(), File::open(input)?);
        let mut bits = BitReader::endian(reader, BigEndian);
        let root = header::read_header(&mut bits)?;

        let result = File::create(output).map_err(CompressError::from).and_then(|out| {
            let writer = BufWriter::with_capacity(self.config.buffer_capacity(), out);
            decompress::decode_body(&root, &mut bits, writer)
        });
        if result.is_err() {
            self.discard_partial(output);
        }
        result
    }

    fn discard_partial(&self, path: &Path) {
        if !self.config.discard_partial_output {
            return;
        }
        match std::fs::remove_file(path) {
            Ok(()) => warn!("Discarded partial output {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not discard partial output {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_stream_roundtrip() {
        let compressor = Compressor::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let mut packed = Vec::new();
        let summary = compressor
            .compress(Cursor::new(&data[..]), &mut packed, true)
            .unwrap();
        assert!(summary.written);

        let mut unpacked = Vec::new();
        let n = compressor.decompress(&packed[..], &mut unpacked).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_compression_ratio() {
        let compressor = Compressor::default();
        let data = "aaaaaaaaaa".repeat(100);
        let summary = compressor
            .compress(Cursor::new(data.as_bytes()), Vec::new(), false)
            .unwrap();
        assert!(summary.written);
        assert!(summary.ratio() < 0.2, "repetitive data should compress well");
    }

    #[test]
    fn test_summary_serializes() {
        let compressor = Compressor::default();
        let summary = compressor
            .compress(Cursor::new(&b"abcabcabc"[..]), Vec::new(), true)
            .unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["symbols_read"], 9);
        assert_eq!(json["distinct_symbols"], 3);
        assert_eq!(json["written"], true);
    }
}
