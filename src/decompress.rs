//! Decompression: rebuild the tree from the header, then walk it one bit at a
//! time until the end-of-stream leaf is reached.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader};
use tracing::info;

use crate::error::{CompressError, Result};
use crate::header::read_header;
use crate::symbol::PSEUDO_EOF;
use crate::tree::HuffNode;

#[derive(Debug, Clone, Copy)]
enum DecodeState<'a> {
    Walking(&'a HuffNode),
    Done,
}

/// Decode a whole compressed stream. Returns the number of bytes written.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<u64> {
    let mut reader = BitReader::endian(input, BigEndian);
    let root = read_header(&mut reader)?;
    decode_body(&root, &mut reader, output)
}

/// Decode the body that follows a header already read into `root`.
///
/// Running out of input before the end-of-stream leaf is a
/// `TruncatedBody` error. Pad bits after it are ignored.
pub fn decode_body<R: BitRead, W: Write>(
    root: &HuffNode,
    reader: &mut R,
    mut output: W,
) -> Result<u64> {
    let mut decoded = 0u64;
    let mut state = DecodeState::Walking(root);

    while let DecodeState::Walking(node) = state {
        let next = match node {
            HuffNode::Internal { left, right, .. } => {
                if read_bit(reader, decoded)? {
                    &**right
                } else {
                    &**left
                }
            }
            // Only a lone-leaf root is walked from a leaf; its code is `0`.
            HuffNode::Leaf { .. } => {
                if read_bit(reader, decoded)? {
                    return Err(CompressError::CorruptBody { decoded });
                }
                node
            }
        };

        state = match next {
            HuffNode::Leaf { symbol, .. } if *symbol == PSEUDO_EOF => DecodeState::Done,
            HuffNode::Leaf { symbol, .. } => {
                output.write_all(&[*symbol as u8])?;
                decoded += 1;
                DecodeState::Walking(root)
            }
            HuffNode::Internal { .. } => DecodeState::Walking(next),
        };
    }

    output.flush()?;
    info!("Decompressed {} bytes", decoded);
    Ok(decoded)
}

fn read_bit<R: BitRead>(reader: &mut R, decoded: u64) -> Result<bool> {
    reader.read_bit().map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CompressError::TruncatedBody { decoded }
        } else {
            CompressError::IoError(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::compress;
    use crate::config::CompressionConfig;
    use std::io::Cursor;

    fn packed(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        compress(Cursor::new(data), &mut out, true, &CompressionConfig::default()).unwrap();
        out
    }

    #[test]
    fn test_huffman_roundtrip() {
        let data = b"hello world hello world hello";
        let mut out = Vec::new();
        let n = decompress(&packed(data)[..], &mut out).unwrap();
        assert_eq!(out, data);
        assert_eq!(n, data.len() as u64);
    }

    #[test]
    fn test_huffman_single_char() {
        let data = b"aaaaaa";
        let mut out = Vec::new();
        decompress(&packed(data)[..], &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_huffman_all_bytes() {
        let data: Vec<u8> = (0..=255).collect();
        let mut out = Vec::new();
        decompress(&packed(&data)[..], &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_empty_roundtrip() {
        let mut out = Vec::new();
        assert_eq!(decompress(&packed(b"")[..], &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_bad_magic_writes_nothing() {
        let mut bytes = packed(b"some data to pack");
        bytes[1] ^= 0x5A;
        let mut out = Vec::new();
        let err = decompress(&bytes[..], &mut out).unwrap_err();
        assert!(matches!(err, CompressError::BadMagic { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_truncated_body() {
        let data = "the quick brown fox jumps over the lazy dog".repeat(4);
        let bytes = packed(data.as_bytes());
        let mut out = Vec::new();
        let err = decompress(&bytes[..bytes.len() - 4], &mut out).unwrap_err();
        match err {
            CompressError::TruncatedBody { decoded } => {
                assert!(decoded > 0);
                assert_eq!(out.len() as u64, decoded);
                assert_eq!(&out[..], &data.as_bytes()[..out.len()]);
            }
            other => panic!("expected truncated body, got {other:?}"),
        }
    }

    #[test]
    fn test_lone_root_rejects_one_bit() {
        let mut bytes = packed(b"");
        // 32 magic + 10 leaf bits, so the end-marker bit is bit 42
        bytes[5] |= 0b0010_0000;
        let err = decompress(&bytes[..], Vec::new()).unwrap_err();
        assert!(matches!(err, CompressError::CorruptBody { decoded: 0 }));
    }
}
