//! Typed binary codec
//!
//! Pure conversions between scalar value strings and little-endian hex
//! byte sequences, for every [`ValueType`] the scanner understands. The
//! encoded pattern's byte length doubles as the remote read size for a
//! candidate value, so [`byte_length`] must be consulted before any read.

mod decode;
mod encode;

pub use decode::{decode_value, UNREADABLE};
pub use encode::encode_value;

use crate::core::types::ValueType;

/// Byte length of an encoded value of the given type.
///
/// Fixed-width types have an intrinsic width; the variable-length types
/// derive it from the encoded hex content.
pub fn byte_length(value_type: ValueType, encoded: &str) -> u64 {
    match value_type.width() {
        Some(w) => w as u64,
        None => encoded.len() as u64 / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_length_fixed() {
        assert_eq!(byte_length(ValueType::Int8, ""), 1);
        assert_eq!(byte_length(ValueType::Uint32, "64000000"), 4);
        assert_eq!(byte_length(ValueType::Float64, ""), 8);
    }

    #[test]
    fn test_byte_length_variable() {
        assert_eq!(byte_length(ValueType::Utf8, "68656c6c6f"), 5);
        assert_eq!(byte_length(ValueType::Bytes, "deadbeef"), 4);
        assert_eq!(byte_length(ValueType::Utf16, "680065006c006c006f00"), 10);
    }
}
