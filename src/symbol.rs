//! The symbol space: every byte value plus a reserved end-of-stream marker.

use crate::error::{CompressError, Result};

/// One alphabet unit. Byte values occupy `0..256`, `PSEUDO_EOF` sits just above.
pub type Symbol = u16;

/// Number of real byte values.
pub const BYTE_ALPHABET: u16 = 256;

/// Sentinel marking the logical end of a compressed body.
pub const PSEUDO_EOF: Symbol = BYTE_ALPHABET;

/// Number of distinct symbols, `PSEUDO_EOF` included.
pub const ALPHABET_SIZE: u16 = BYTE_ALPHABET + 1;

pub const BITS_PER_BYTE: u64 = 8;

/// Reject anything that is not a real byte value.
pub(crate) fn check_byte(symbol: Symbol) -> Result<usize> {
    check_below(symbol, BYTE_ALPHABET)
}

/// Reject anything outside the full alphabet.
pub(crate) fn check_symbol(symbol: Symbol) -> Result<usize> {
    check_below(symbol, ALPHABET_SIZE)
}

fn check_below(symbol: Symbol, limit: u16) -> Result<usize> {
    if symbol < limit {
        Ok(symbol as usize)
    } else {
        Err(CompressError::SymbolOutOfRange { symbol, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_eof_outside_byte_range() {
        assert!(check_byte(PSEUDO_EOF).is_err());
        assert_eq!(check_symbol(PSEUDO_EOF).unwrap(), 256);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = check_symbol(300).unwrap_err();
        assert!(matches!(
            err,
            CompressError::SymbolOutOfRange { symbol: 300, limit: 257 }
        ));
    }
}
