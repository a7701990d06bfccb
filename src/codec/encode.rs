//! Value-string to little-endian hex encoding

use crate::core::types::{ClientError, ClientResult, ValueType};

/// Encodes a scalar value string into little-endian hex for the wire.
///
/// Integer input is truncated two's-complement style to the target
/// width, so `"256"` as `uint8` wraps to `00` and `"-1"` as `int8`
/// encodes as `ff`. Malformed input is a precondition error; no request
/// may be built from it.
pub fn encode_value(value: &str, value_type: ValueType) -> ClientResult<String> {
    match value_type {
        ValueType::Int8 | ValueType::Uint8 => encode_int(value, value_type, 1),
        ValueType::Int16 | ValueType::Uint16 => encode_int(value, value_type, 2),
        ValueType::Int32 | ValueType::Uint32 => encode_int(value, value_type, 4),
        ValueType::Int64 | ValueType::Uint64 => encode_int(value, value_type, 8),
        ValueType::Float32 => {
            let v: f32 = value
                .trim()
                .parse()
                .map_err(|_| ClientError::invalid_value(value, value_type))?;
            Ok(hex::encode(v.to_le_bytes()))
        }
        ValueType::Float64 => {
            let v: f64 = value
                .trim()
                .parse()
                .map_err(|_| ClientError::invalid_value(value, value_type))?;
            Ok(hex::encode(v.to_le_bytes()))
        }
        ValueType::Utf8 => Ok(hex::encode(value.as_bytes())),
        ValueType::Utf16 => {
            // One 16-bit LE unit per code unit; surrogate halves encode
            // independently, so non-BMP round trips are not guaranteed.
            let bytes: Vec<u8> = value.encode_utf16().flat_map(u16::to_le_bytes).collect();
            Ok(hex::encode(bytes))
        }
        ValueType::Bytes => encode_byte_pattern(value),
        // The service compiles the expression itself; the client passes
        // the raw text through untouched.
        ValueType::Regex => Ok(value.to_string()),
    }
}

/// Parses through i128 so out-of-range input wraps instead of failing,
/// matching the panel's historical truncation behavior.
fn encode_int(value: &str, value_type: ValueType, width: usize) -> ClientResult<String> {
    let v: i128 = value
        .trim()
        .parse()
        .map_err(|_| ClientError::invalid_value(value, value_type))?;
    let le = (v as u128).to_le_bytes();
    Ok(hex::encode(&le[..width]))
}

fn encode_byte_pattern(value: &str) -> ClientResult<String> {
    let stripped: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() || stripped.len() % 2 != 0 {
        return Err(ClientError::InvalidPattern(value.to_string()));
    }
    if !stripped.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ClientError::InvalidPattern(value.to_string()));
    }
    Ok(stripped.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_signed_integers() {
        assert_eq!(encode_value("-1", ValueType::Int8).unwrap(), "ff");
        assert_eq!(encode_value("100", ValueType::Int32).unwrap(), "64000000");
        assert_eq!(
            encode_value("-2", ValueType::Int16).unwrap(),
            "feff"
        );
        assert_eq!(
            encode_value("-1", ValueType::Int64).unwrap(),
            "ffffffffffffffff"
        );
    }

    #[test]
    fn test_encode_unsigned_integers() {
        assert_eq!(encode_value("255", ValueType::Uint8).unwrap(), "ff");
        // 8-bit two's-complement wrap
        assert_eq!(encode_value("256", ValueType::Uint8).unwrap(), "00");
        assert_eq!(encode_value("257", ValueType::Uint8).unwrap(), "01");
        assert_eq!(
            encode_value("4294967295", ValueType::Uint32).unwrap(),
            "ffffffff"
        );
    }

    #[test]
    fn test_encode_64bit_beyond_53_bits() {
        // 2^60 + 1 cannot survive a 53-bit float intermediate
        let v = (1u64 << 60) + 1;
        let encoded = encode_value(&v.to_string(), ValueType::Uint64).unwrap();
        assert_eq!(encoded, "0100000000000010");
    }

    #[test]
    fn test_encode_floats() {
        assert_eq!(encode_value("1.0", ValueType::Float32).unwrap(), "0000803f");
        assert_eq!(
            encode_value("1.0", ValueType::Float64).unwrap(),
            "000000000000f03f"
        );
    }

    #[test]
    fn test_encode_strings() {
        assert_eq!(encode_value("AB", ValueType::Utf8).unwrap(), "4142");
        assert_eq!(encode_value("AB", ValueType::Utf16).unwrap(), "41004200");
        // multi-byte UTF-8
        assert_eq!(encode_value("é", ValueType::Utf8).unwrap(), "c3a9");
    }

    #[test]
    fn test_encode_byte_pattern_strips_whitespace() {
        assert_eq!(
            encode_value("DE AD BE EF", ValueType::Bytes).unwrap(),
            "deadbeef"
        );
        assert_eq!(
            encode_value("de\tad be\nef", ValueType::Bytes).unwrap(),
            "deadbeef"
        );
    }

    #[test]
    fn test_encode_rejects_malformed_input() {
        assert!(encode_value("abc", ValueType::Int32).is_err());
        assert!(encode_value("", ValueType::Uint8).is_err());
        assert!(encode_value("1.5.2", ValueType::Float32).is_err());
        assert!(encode_value("xyz", ValueType::Bytes).is_err());
        assert!(encode_value("abc", ValueType::Bytes).is_err()); // odd length
    }

    #[test]
    fn test_encode_regex_passthrough() {
        assert_eq!(
            encode_value("ab.?cd", ValueType::Regex).unwrap(),
            "ab.?cd"
        );
    }
}
