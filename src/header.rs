//! Tree header: a 32-bit magic marker followed by the tree in preorder.
//!
//! An internal node is a single `0` bit followed by its left then right
//! subtree. A leaf is a `1` bit followed by a 9-bit symbol, wide enough for
//! `PSEUDO_EOF`. Weights are not stored; only shape matters for decoding.

use std::io;

use bitstream_io::{BitRead, BitWrite};

use crate::error::{CompressError, Result};
use crate::symbol::{Symbol, ALPHABET_SIZE, PSEUDO_EOF};
use crate::tree::HuffNode;

pub const MAGIC_NUMBER: u32 = 0xFACE_8200;
pub const MAGIC_BITS: u32 = 32;
pub const SYMBOL_BITS: u32 = 9;

// A tree over the whole alphabet can be at most this deep.
const MAX_DEPTH: usize = ALPHABET_SIZE as usize - 1;

/// Exact size in bits of the header `write_header` produces for `root`.
pub fn header_size(root: &HuffNode) -> u64 {
    MAGIC_BITS as u64
        + root.internal_count() as u64
        + root.leaf_count() as u64 * (1 + SYMBOL_BITS as u64)
}

/// Write the magic marker and the serialized tree. Returns the bits written.
pub fn write_header<W: BitWrite>(root: &HuffNode, out: &mut W) -> io::Result<u64> {
    out.write(MAGIC_BITS, MAGIC_NUMBER)?;
    Ok(MAGIC_BITS as u64 + write_node(root, out)?)
}

fn write_node<W: BitWrite>(node: &HuffNode, out: &mut W) -> io::Result<u64> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            out.write_bit(true)?;
            out.write(SYMBOL_BITS, *symbol)?;
            Ok(1 + SYMBOL_BITS as u64)
        }
        HuffNode::Internal { left, right, .. } => {
            out.write_bit(false)?;
            Ok(1 + write_node(left, out)? + write_node(right, out)?)
        }
    }
}

/// Verify the magic marker and rebuild the tree. Reconstructed weights are 0.
pub fn read_header<R: BitRead>(input: &mut R) -> Result<HuffNode> {
    let magic: u32 = input.read(MAGIC_BITS).map_err(header_error)?;
    if magic != MAGIC_NUMBER {
        return Err(CompressError::BadMagic { found: magic });
    }
    read_node(input, 0)
}

fn read_node<R: BitRead>(input: &mut R, depth: usize) -> Result<HuffNode> {
    if depth > MAX_DEPTH {
        return Err(CompressError::HeaderTooDeep { depth: MAX_DEPTH });
    }
    if input.read_bit().map_err(header_error)? {
        let symbol: Symbol = input.read(SYMBOL_BITS).map_err(header_error)?;
        if symbol > PSEUDO_EOF {
            return Err(CompressError::InvalidHeaderSymbol { symbol });
        }
        Ok(HuffNode::leaf(symbol, 0))
    } else {
        let left = read_node(input, depth + 1)?;
        let right = read_node(input, depth + 1)?;
        Ok(HuffNode::internal(left, right))
    }
}

fn header_error(e: io::Error) -> CompressError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        CompressError::TruncatedHeader
    } else {
        CompressError::IoError(e)
    }
}
