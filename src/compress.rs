//! Compression: count, build codes, decide whether it pays off, then re-encode.

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};

use bitstream_io::{BigEndian, BitWrite, BitWriter};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codes::{Code, CodeTable};
use crate::config::CompressionConfig;
use crate::counter::{count_with_capacity, FrequencyTable};
use crate::error::{CompressError, Result};
use crate::header::{header_size, write_header};
use crate::symbol::{Symbol, BITS_PER_BYTE, PSEUDO_EOF};
use crate::tree::{build_tree, HuffNode};

/// Outcome of a compression run.
#[derive(Debug, Clone, Serialize)]
pub struct CompressSummary {
    pub symbols_read: u64,
    pub distinct_symbols: usize,
    pub original_bits: u64,
    pub header_bits: u64,
    /// Header plus body plus end marker, before padding to a whole byte.
    pub compressed_bits: u64,
    pub entropy_bits: f64,
    /// False when the size gate refused to write anything.
    pub written: bool,
}

impl CompressSummary {
    pub fn ratio(&self) -> f64 {
        if self.original_bits == 0 {
            1.0
        } else {
            self.compressed_bits as f64 / self.original_bits as f64
        }
    }

    /// Whether compressing is smaller than leaving the input as is.
    pub fn saves_space(&self) -> bool {
        self.compressed_bits < self.original_bits
    }
}

/// Everything derived from the first pass over the input.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub frequencies: FrequencyTable,
    pub tree: HuffNode,
    pub codes: CodeTable,
    pub summary: CompressSummary,
}

impl Analysis {
    pub fn should_write(&self, force: bool) -> bool {
        force || self.summary.saves_space()
    }
}

/// First pass: frequencies, tree, codes and the size estimate.
pub fn analyze<R: Read>(input: R, config: &CompressionConfig) -> Result<Analysis> {
    let (frequencies, symbols_read) = count_with_capacity(input, config.buffer_capacity())?;
    if symbols_read > config.max_input_size {
        return Err(CompressError::InputTooLarge {
            size: symbols_read,
            limit: config.max_input_size,
        });
    }

    let tree = build_tree(&frequencies);
    let codes = CodeTable::from_tree(&tree)?;
    let header_bits = header_size(&tree);
    let compressed_bits = estimate_bits(&frequencies, &codes, header_bits)?;

    debug!(
        "Built tree: {} leaves, depth {}, header {} bits",
        tree.leaf_count(),
        tree.depth(),
        header_bits
    );

    let summary = CompressSummary {
        symbols_read,
        distinct_symbols: frequencies.distinct(),
        original_bits: symbols_read * BITS_PER_BYTE,
        header_bits,
        compressed_bits,
        entropy_bits: frequencies.entropy(),
        written: false,
    };

    Ok(Analysis {
        frequencies,
        tree,
        codes,
        summary,
    })
}

fn estimate_bits(freq: &FrequencyTable, codes: &CodeTable, header_bits: u64) -> Result<u64> {
    let mut bits = header_bits;
    for (symbol, f) in freq.iter() {
        bits += code_for(codes, symbol)?.len() as u64 * f;
    }
    bits += code_for(codes, PSEUDO_EOF)?.len() as u64;
    Ok(bits)
}

fn code_for(codes: &CodeTable, symbol: Symbol) -> Result<&Code> {
    codes
        .get(symbol)?
        .ok_or(CompressError::MissingCode { symbol })
}

/// Second pass: header, one code per input byte, then the end marker.
/// Returns the number of bits emitted before padding.
pub fn write_compressed<R: Read, W: Write>(
    input: R,
    output: W,
    analysis: &Analysis,
    config: &CompressionConfig,
) -> Result<u64> {
    let codes = &analysis.codes;
    let mut reader = BufReader::with_capacity(config.buffer_capacity(), input);
    let mut w = BitWriter::endian(output, BigEndian);

    let mut bits = write_header(&analysis.tree, &mut w)?;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        for &b in chunk {
            bits += write_code(&mut w, code_for(codes, b as Symbol)?)?;
        }
        let n = chunk.len();
        reader.consume(n);
    }
    bits += write_code(&mut w, code_for(codes, PSEUDO_EOF)?)?;

    w.byte_align()?;
    w.into_writer().flush()?;
    Ok(bits)
}

fn write_code<W: BitWrite>(w: &mut W, code: &Code) -> std::io::Result<u64> {
    for &bit in code.bits() {
        w.write_bit(bit)?;
    }
    Ok(code.len() as u64)
}

/// Compress `input` into `output`.
///
/// If the result would not be smaller than the input and `force` is false,
/// nothing is written and the returned summary carries the estimate with
/// `written == false`.
///
/// Both passes start from the input's position at the time of the call.
pub fn compress<R: Read + Seek, W: Write>(
    mut input: R,
    output: W,
    force: bool,
    config: &CompressionConfig,
) -> Result<CompressSummary> {
    let start = input.stream_position()?;
    let mut analysis = analyze(&mut input, config)?;
    if !analysis.should_write(force) {
        warn!(
            "Compression not worthwhile: {} bits estimated vs {} original",
            analysis.summary.compressed_bits, analysis.summary.original_bits
        );
        return Ok(analysis.summary);
    }

    input.seek(SeekFrom::Start(start))?;
    let bits = write_compressed(&mut input, output, &analysis, config)?;
    debug_assert_eq!(bits, analysis.summary.compressed_bits);
    analysis.summary.written = true;

    info!(
        "Compressed {} bytes to {} bits (ratio {:.3})",
        analysis.summary.symbols_read,
        bits,
        analysis.summary.ratio()
    );
    Ok(analysis.summary)
}
