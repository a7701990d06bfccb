//! memprobe — typed codec and scan/dump client core for a remote
//! process-memory inspection service
//!
//! The crate drives the service's request/response contract: encoding
//! scalar values to and from little-endian byte sequences, classifying
//! regions against tri-state protection filters, running multi-round
//! scan/filter sessions, and packaging region and application-bundle
//! dumps into zip archives.

pub mod codec;
pub mod config;
pub mod core;
pub mod dump;
pub mod region;
pub mod remote;
pub mod scan;

// Re-export main types from the core module
pub use crate::core::types::{
    Address, ClientError, ClientResult, FilterMode, FindMode, MemoryRegion, ModuleImage,
    Protection, ScanMatch, ScanOutcome, ValueType,
};

// Re-export the primary component entry points
pub use crate::codec::{byte_length, decode_value, encode_value, UNREADABLE};
pub use crate::dump::{dump_app, dump_memory, BundleDump, MemoryDump};
pub use crate::region::{ProtectionFilter, TriState};
pub use crate::remote::{HttpMemoryAccess, MemoryAccess};
pub use crate::scan::{PatchReport, ScanSession};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_reexports_accessible() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_u64(), 0x1000);

        let err = ClientError::InvalidAddress("bad".to_string());
        assert!(err.to_string().contains("Invalid memory address"));

        assert_eq!(crate::core::VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_codec_reexports_accessible() {
        assert_eq!(encode_value("100", ValueType::Int32).unwrap(), "64000000");
        assert_eq!(decode_value("64000000", ValueType::Int32), "100");
        assert_eq!(byte_length(ValueType::Int32, ""), 4);
    }

    #[test]
    fn test_session_reexport_accessible() {
        let session = ScanSession::new("Scan 1");
        assert!(session.is_first_scan());
        assert_eq!(session.protection(), ProtectionFilter::default());
    }
}
