//! Core type definitions for the memprobe client
//!
//! This module contains all fundamental types used throughout the crate,
//! including the address wrapper, region snapshots, scan value types, and
//! error types.

mod address;
mod error;
mod region;
mod scan;
mod value;

// Re-export all public types
pub use address::Address;
pub use error::{ClientError, ClientResult};
pub use region::{MemoryRegion, ModuleImage, Protection};
pub use scan::{FilterMode, FilterRequest, FindMode, ScanMatch, ScanOutcome, ScanRequest};
pub use value::ValueType;

// Common type aliases
pub type ProcessId = i32;
pub type AddressRange = (u64, u64);
