//! Little-endian hex to display-value decoding

use crate::core::types::ValueType;

/// Placeholder shown for values that could not be decoded.
///
/// Decoding is on the render path; it must never propagate an error
/// upward, so malformed hex and short buffers collapse to this marker.
pub const UNREADABLE: &str = "????????";

/// Decodes a little-endian hex string into a display value.
///
/// Total over all inputs: failures yield [`UNREADABLE`] instead of an
/// error.
pub fn decode_value(hex_str: &str, value_type: ValueType) -> String {
    try_decode(hex_str, value_type).unwrap_or_else(|| UNREADABLE.to_string())
}

fn try_decode(hex_str: &str, value_type: ValueType) -> Option<String> {
    let bytes = hex::decode(hex_str).ok()?;

    match value_type {
        ValueType::Int8 => Some((take::<1>(&bytes)?[0] as i8).to_string()),
        ValueType::Uint8 => Some(take::<1>(&bytes)?[0].to_string()),
        ValueType::Int16 => Some(i16::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Uint16 => Some(u16::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Int32 => Some(i32::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Uint32 => Some(u32::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Int64 => Some(i64::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Uint64 => Some(u64::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Float32 => Some(f32::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Float64 => Some(f64::from_le_bytes(take(&bytes)?).to_string()),
        ValueType::Utf8 => Some(String::from_utf8_lossy(&bytes).into_owned()),
        ValueType::Utf16 => {
            if bytes.len() % 2 != 0 {
                return None;
            }
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect();
            Some(String::from_utf16_lossy(&units))
        }
        // The hex itself is the display value for raw patterns
        ValueType::Bytes => Some(hex_str.to_string()),
        ValueType::Regex => Some(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

/// First `N` bytes of the buffer, or `None` when it is too short
fn take<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.get(..N)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_integers() {
        assert_eq!(decode_value("ff", ValueType::Int8), "-1");
        assert_eq!(decode_value("ff", ValueType::Uint8), "255");
        assert_eq!(decode_value("64000000", ValueType::Int32), "100");
        assert_eq!(decode_value("feff", ValueType::Int16), "-2");
        assert_eq!(
            decode_value("ffffffffffffffff", ValueType::Uint64),
            u64::MAX.to_string()
        );
    }

    #[test]
    fn test_decode_floats() {
        assert_eq!(decode_value("0000803f", ValueType::Float32), "1");
        assert_eq!(decode_value("000000000000f03f", ValueType::Float64), "1");
        assert_eq!(decode_value("00004040", ValueType::Float32), "3");
    }

    #[test]
    fn test_decode_strings() {
        assert_eq!(decode_value("4142", ValueType::Utf8), "AB");
        assert_eq!(decode_value("41004200", ValueType::Utf16), "AB");
    }

    #[test]
    fn test_decode_byte_pattern_passthrough() {
        assert_eq!(decode_value("deadbeef", ValueType::Bytes), "deadbeef");
    }

    #[test]
    fn test_decode_failures_yield_sentinel() {
        // malformed hex
        assert_eq!(decode_value("zz", ValueType::Int8), UNREADABLE);
        // short buffer
        assert_eq!(decode_value("64", ValueType::Int32), UNREADABLE);
        // odd utf-16 byte count
        assert_eq!(decode_value("410042", ValueType::Utf16), UNREADABLE);
        // empty input for a fixed type
        assert_eq!(decode_value("", ValueType::Uint8), UNREADABLE);
    }

    #[test]
    fn test_decode_longer_buffer_reads_prefix() {
        // extra trailing bytes are ignored for fixed-width types
        assert_eq!(decode_value("64000000deadbeef", ValueType::Int32), "100");
    }
}
