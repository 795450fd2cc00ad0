//! Error types for huff-compress

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CompressError>;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("bad magic number 0x{found:08x}: not a huff-compress file")]
    BadMagic { found: u32 },

    #[error("truncated header: input ended while reading the code tree")]
    TruncatedHeader,

    #[error("invalid symbol {symbol} in header")]
    InvalidHeaderSymbol { symbol: u16 },

    #[error("header tree nested deeper than {depth} levels")]
    HeaderTooDeep { depth: usize },

    #[error("truncated body: input ended before end-of-stream marker ({decoded} bytes decoded)")]
    TruncatedBody { decoded: u64 },

    #[error("corrupt body: invalid code after {decoded} decoded bytes")]
    CorruptBody { decoded: u64 },

    #[error("symbol {symbol} out of range [0, {limit})")]
    SymbolOutOfRange { symbol: u16, limit: u16 },

    #[error("internal error: no code for symbol {symbol} on second pass")]
    MissingCode { symbol: u16 },

    #[error("input of {size} bytes exceeds limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CompressError {
    /// True for errors caused by a malformed or foreign compressed stream.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            CompressError::BadMagic { .. }
                | CompressError::TruncatedHeader
                | CompressError::InvalidHeaderSymbol { .. }
                | CompressError::HeaderTooDeep { .. }
                | CompressError::TruncatedBody { .. }
                | CompressError::CorruptBody { .. }
        )
    }

    /// True when the error signals a bug rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompressError::MissingCode { .. })
    }
}
