//! Core module containing fundamental types for the memprobe client
//!
//! This module provides the foundational building blocks used throughout
//! the crate: address handling, region snapshots, scan value types, and
//! error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, ClientError, ClientResult, MemoryRegion, ModuleImage, Protection, ScanMatch,
    ScanOutcome, ValueType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
